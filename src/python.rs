use once_cell::sync::Lazy;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::bias_scorer::{self, ScoredCandidate, ScoringEngine, ToxicLexicon};
use crate::detector::{BiasDetector, Match, MatchSet};
use crate::error::GuardError;
use crate::fuzzy::FuzzyMatcher;
use crate::language::Language;
use crate::screening::Screener;
use crate::selector::{DecodeConfig, Selector};
use crate::vocabulary::Vocabulary;

static ENGINE: Lazy<ScoringEngine<'static>> = Lazy::new(|| {
    ScoringEngine::new(
        BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::default()),
        ToxicLexicon::default(),
    )
});

fn to_py_err(err: GuardError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_tuples(matches: &MatchSet) -> Vec<(String, String)> {
    matches
        .iter()
        .map(|m| (m.term.clone(), m.language.to_string()))
        .collect()
}

fn candidate_dict<'py>(py: Python<'py>, c: &ScoredCandidate) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("candidate", &c.text)?;
    dict.set_item("bias_count", c.bias_count)?;
    dict.set_item("bias_matches", to_tuples(&c.bias_matches))?;
    dict.set_item("toxicity", c.toxicity)?;
    dict.set_item("fluency", c.fluency)?;
    dict.set_item("combined", c.combined)?;
    Ok(dict)
}

/// Return the (term, language) pairs found in `text`.
#[pyfunction]
pub fn detect_bias_terms(text: &str) -> Vec<(String, String)> {
    to_tuples(&ENGINE.detector().detect(text))
}

/// Return (count, matches).
#[pyfunction]
pub fn bias_score(text: &str) -> (usize, Vec<(String, String)>) {
    let (count, matches) = ENGINE.bias_score(text);
    (count, to_tuples(&matches))
}

#[pyfunction]
pub fn toxicity_score(text: &str) -> f64 {
    ENGINE.toxicity_score(text)
}

#[pyfunction]
#[pyo3(name = "fluency_score")]
pub fn py_fluency_score(text: &str) -> f64 {
    bias_scorer::fluency_score(text)
}

#[pyfunction]
#[pyo3(signature = (prompt, kb_matches=None))]
pub fn neutralize_response(
    prompt: &str,
    kb_matches: Option<Vec<(String, String)>>,
) -> PyResult<String> {
    let mut matches = Vec::new();
    for (term, tag) in kb_matches.unwrap_or_default() {
        let language: Language = tag.parse().map_err(to_py_err)?;
        matches.push(Match::new(term, language));
    }
    Ok(crate::neutralize::neutralize(prompt, &matches))
}

/// Score `candidates`, pick the best and neutralize it when thresholds are exceeded.
///
/// Returns a dict with keys: prompt, candidates, selected, violated, justification.
#[pyfunction]
#[pyo3(signature = (prompt, candidates, bias_threshold=1, toxicity_threshold=0.2, fluency_weight=1.0))]
pub fn constitution_aware_decode(
    py: Python<'_>,
    prompt: &str,
    candidates: Vec<String>,
    bias_threshold: usize,
    toxicity_threshold: f64,
    fluency_weight: f64,
) -> PyResult<Py<PyDict>> {
    let config = DecodeConfig {
        bias_threshold,
        toxicity_threshold,
        fluency_weight,
    };
    let selector = Selector::new(ENGINE.clone(), config).map_err(to_py_err)?;
    let result = selector.decode(prompt, &candidates).map_err(to_py_err)?;

    let scored = PyList::empty(py);
    for c in &result.candidates {
        scored.append(candidate_dict(py, c)?)?;
    }

    let dict = PyDict::new(py);
    dict.set_item("prompt", &result.prompt)?;
    dict.set_item("candidates", scored)?;
    dict.set_item("selected", &result.selected)?;
    dict.set_item("violated", result.violated)?;
    dict.set_item("justification", result.justification.as_str())?;
    Ok(dict.unbind())
}

/// Judge a single existing text against the thresholds.
#[pyfunction]
#[pyo3(signature = (text, bias_threshold=1, toxicity_threshold=0.2))]
pub fn screen_text(
    py: Python<'_>,
    text: &str,
    bias_threshold: usize,
    toxicity_threshold: f64,
) -> PyResult<Py<PyDict>> {
    let config = DecodeConfig {
        bias_threshold,
        toxicity_threshold,
        ..DecodeConfig::default()
    };
    config.validate().map_err(to_py_err)?;
    let verdict = Screener::new(ENGINE.clone(), config).screen(text);

    let dict = PyDict::new(py);
    dict.set_item("text", &verdict.text)?;
    dict.set_item("bias_count", verdict.bias_count)?;
    dict.set_item("bias_matches", to_tuples(&verdict.bias_matches))?;
    dict.set_item("toxicity", verdict.toxicity)?;
    dict.set_item("fluency", verdict.fluency)?;
    dict.set_item("violated", verdict.violated)?;
    dict.set_item("justification", verdict.outcome.as_str())?;
    Ok(dict.unbind())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(detect_bias_terms, m)?)?;
    m.add_function(wrap_pyfunction!(bias_score, m)?)?;
    m.add_function(wrap_pyfunction!(toxicity_score, m)?)?;
    m.add_function(wrap_pyfunction!(py_fluency_score, m)?)?;
    m.add_function(wrap_pyfunction!(neutralize_response, m)?)?;
    m.add_function(wrap_pyfunction!(constitution_aware_decode, m)?)?;
    m.add_function(wrap_pyfunction!(screen_text, m)?)?;
    Ok(())
}

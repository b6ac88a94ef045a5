use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::Serialize;

use crate::detector::{BiasDetector, MatchSet};
use crate::error::Result;

/// Deliberately mild, general keywords; no slurs.
pub const DEFAULT_TOXIC_KEYWORDS: &[&str] = &[
    "stupid",
    "inferior",
    "dirty",
    "backward",
    "lazy",
    "illiterate",
    "unclean",
    "hate",
    "fight",
    "terror",
    "villain",
];

static DEFAULT_LEXICON: Lazy<ToxicLexicon> =
    Lazy::new(|| ToxicLexicon::new(DEFAULT_TOXIC_KEYWORDS.iter().copied()).unwrap());

const TOXIC_SATURATION: f64 = 3.0;
const BIAS_WEIGHT: f64 = 0.5;
const TOXICITY_WEIGHT: f64 = 0.8;

const FLUENT_MIN_WORDS: usize = 8;
const FLUENT_MAX_WORDS: usize = 20;
const SHORT_PENALTY: f64 = 0.1;
const LONG_PENALTY: f64 = 0.02;

/// Case-insensitive substring scan over a fixed keyword list.
#[derive(Debug, Clone)]
pub struct ToxicLexicon {
    keywords: Vec<String>,
    set: RegexSet,
}

impl Default for ToxicLexicon {
    fn default() -> Self {
        DEFAULT_LEXICON.clone()
    }
}

impl ToxicLexicon {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !list.contains(&kw) {
                list.push(kw);
            }
        }
        let set = RegexSet::new(list.iter().map(|k| format!("(?i){}", regex::escape(k))))?;
        Ok(Self {
            keywords: list,
            set,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Number of distinct keywords present in `text`.
    pub fn hits(&self, text: &str) -> usize {
        self.set.matches(text).iter().count()
    }
}

/// Scores for one candidate text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub text: String,
    pub bias_count: usize,
    pub bias_matches: MatchSet,
    pub toxicity: f64,
    pub fluency: f64,
    pub combined: f64,
}

/// Length-based fluency proxy in [0, 1].
pub fn fluency_score(text: &str) -> f64 {
    let n = text.split_whitespace().count();
    if n == 0 {
        return 0.0;
    }
    if (FLUENT_MIN_WORDS..=FLUENT_MAX_WORDS).contains(&n) {
        1.0
    } else if n < FLUENT_MIN_WORDS {
        (1.0 - (FLUENT_MIN_WORDS - n) as f64 * SHORT_PENALTY).max(0.0)
    } else {
        (1.0 - (n - FLUENT_MAX_WORDS) as f64 * LONG_PENALTY).max(0.0)
    }
}

/// Weighted ranking score: rewards fluency, penalises bias matches and toxicity.
pub fn combined_score(fluency_weight: f64, fluency: f64, bias_count: usize, toxicity: f64) -> f64 {
    fluency_weight * fluency - BIAS_WEIGHT * bias_count as f64 - TOXICITY_WEIGHT * toxicity
}

#[derive(Debug, Clone)]
pub struct ScoringEngine<'v> {
    detector: BiasDetector<'v>,
    lexicon: ToxicLexicon,
}

impl<'v> ScoringEngine<'v> {
    pub fn new(detector: BiasDetector<'v>, lexicon: ToxicLexicon) -> Self {
        Self { detector, lexicon }
    }

    pub fn detector(&self) -> &BiasDetector<'v> {
        &self.detector
    }

    /// Returns (number of distinct matches, matches).
    pub fn bias_score(&self, text: &str) -> (usize, MatchSet) {
        let matches = self.detector.detect(text);
        (matches.len(), matches)
    }

    /// Distinct toxic keyword hits / 3, capped at 1.0.
    pub fn toxicity_score(&self, text: &str) -> f64 {
        (self.lexicon.hits(text) as f64 / TOXIC_SATURATION).min(1.0)
    }

    pub fn fluency_score(&self, text: &str) -> f64 {
        fluency_score(text)
    }

    pub fn score(&self, text: &str, fluency_weight: f64) -> ScoredCandidate {
        let (bias_count, bias_matches) = self.bias_score(text);
        let toxicity = self.toxicity_score(text);
        let fluency = fluency_score(text);
        let combined = combined_score(fluency_weight, fluency, bias_count, toxicity);
        tracing::debug!(bias_count, toxicity, fluency, combined, "scored candidate");
        ScoredCandidate {
            text: text.to_string(),
            bias_count,
            bias_matches,
            toxicity,
            fluency,
            combined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::FuzzyMatcher;
    use crate::vocabulary::Vocabulary;

    fn engine() -> ScoringEngine<'static> {
        ScoringEngine::new(
            BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::default()),
            ToxicLexicon::default(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fluency_zero_tokens() {
        assert_eq!(fluency_score(""), 0.0);
        assert_eq!(fluency_score("   \n\t"), 0.0);
    }

    #[test]
    fn test_fluency_band_is_exactly_one() {
        for n in 8..=20 {
            let text = vec!["word"; n].join(" ");
            assert_eq!(fluency_score(&text), 1.0, "n = {n}");
        }
    }

    #[test]
    fn test_fluency_penalties() {
        assert!(close(fluency_score("one two three four five"), 0.7));
        assert!(close(fluency_score("solo"), 0.3));
        assert!(close(fluency_score(&vec!["w"; 25].join(" ")), 0.9));
        assert_eq!(fluency_score(&vec!["w"; 80].join(" ")), 0.0);
    }

    #[test]
    fn test_toxicity_saturates() {
        let e = engine();
        assert_eq!(e.toxicity_score("A calm and kind sentence."), 0.0);
        assert!(close(e.toxicity_score("They are lazy."), 1.0 / 3.0));
        assert!(close(e.toxicity_score("They are lazy and stupid."), 2.0 / 3.0));
        assert_eq!(e.toxicity_score("lazy stupid dirty"), 1.0);
        assert_eq!(e.toxicity_score("lazy stupid dirty backward hate"), 1.0);
    }

    #[test]
    fn test_toxicity_counts_distinct_keywords() {
        let e = engine();
        assert!(close(e.toxicity_score("lazy lazy lazy"), 1.0 / 3.0));
    }

    #[test]
    fn test_toxicity_monotonic() {
        let e = engine();
        let mut last = 0.0;
        let mut text = String::new();
        for kw in DEFAULT_TOXIC_KEYWORDS {
            text.push_str(kw);
            text.push(' ');
            let score = e.toxicity_score(&text);
            assert!(score >= last);
            last = score;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_toxicity_case_insensitive() {
        let e = engine();
        assert_eq!(e.toxicity_score("STUPID"), e.toxicity_score("stupid"));
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = ToxicLexicon::new(["Awful", "awful", " ", "a.b"]).unwrap();
        assert_eq!(lexicon.keywords(), ["awful", "a.b"]);
        assert_eq!(lexicon.hits("That was AWFUL"), 1);
        // escaped, so '.' is literal
        assert_eq!(lexicon.hits("axb"), 0);
    }

    #[test]
    fn test_bias_score_counts_matches() {
        let e = engine();
        let (count, matches) = e.bias_score("dalit families");
        assert_eq!(count, matches.len());
        assert!(count > 0);
        assert_eq!(e.bias_score("").0, 0);
    }

    #[test]
    fn test_combined_formula() {
        assert!(close(combined_score(1.0, 0.8, 2, 0.5), 0.8 - 1.0 - 0.4));
        assert!(close(combined_score(2.0, 1.0, 0, 0.0), 2.0));
    }

    #[test]
    fn test_score_record() {
        let e = engine();
        let scored = e.score("The weather is lazy today.", 1.0);
        assert_eq!(scored.text, "The weather is lazy today.");
        assert!(close(scored.fluency, 0.7));
        assert!(close(scored.toxicity, 1.0 / 3.0));
        assert!(close(
            scored.combined,
            combined_score(1.0, scored.fluency, scored.bias_count, scored.toxicity)
        ));
    }
}

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::bias_scorer::{ScoredCandidate, ScoringEngine};
use crate::candidates::CandidateSource;
use crate::error::{GuardError, Result};
use crate::neutralize::neutralize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub bias_threshold: usize,
    pub toxicity_threshold: f64,
    pub fluency_weight: f64,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            bias_threshold: 1,
            toxicity_threshold: 0.2,
            fluency_weight: 1.0,
        }
    }
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.toxicity_threshold.is_finite() || self.toxicity_threshold < 0.0 {
            return Err(GuardError::InvalidConfig(format!(
                "toxicity_threshold must be a finite value >= 0, got {}",
                self.toxicity_threshold
            )));
        }
        if !self.fluency_weight.is_finite() {
            return Err(GuardError::InvalidConfig(format!(
                "fluency_weight must be finite, got {}",
                self.fluency_weight
            )));
        }
        Ok(())
    }

    /// Strictly above either threshold.
    pub fn is_violation(&self, bias_count: usize, toxicity: f64) -> bool {
        bias_count > self.bias_threshold || toxicity > self.toxicity_threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Neutralized,
    WithinLimits,
}

impl Justification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justification::Neutralized => {
                "TRUE: Candidate exceeded bias/toxicity threshold; neutralized."
            }
            Justification::WithinLimits => "FALSE: Candidate within safe limits.",
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Justification {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeResult {
    pub prompt: String,
    pub candidates: Vec<ScoredCandidate>,
    /// Index into `candidates` of the highest combined score.
    pub best_index: usize,
    pub selected: String,
    pub violated: bool,
    pub justification: Justification,
}

impl DecodeResult {
    pub fn best(&self) -> &ScoredCandidate {
        &self.candidates[self.best_index]
    }
}

/// Scores every candidate, keeps the best one and neutralizes it when it crosses a threshold.
#[derive(Debug, Clone)]
pub struct Selector<'v> {
    engine: ScoringEngine<'v>,
    config: DecodeConfig,
}

impl<'v> Selector<'v> {
    pub fn new(engine: ScoringEngine<'v>, config: DecodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    pub fn decode<I, S>(&self, prompt: &str, candidates: I) -> Result<DecodeResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|c| self.engine.score(c.as_ref(), self.config.fluency_weight))
            .collect();
        if scored.is_empty() {
            return Err(GuardError::NoCandidates {
                prompt: prompt.to_string(),
            });
        }

        // first maximum wins on ties
        let mut best_index = 0;
        for (i, cand) in scored.iter().enumerate().skip(1) {
            if cand.combined > scored[best_index].combined {
                best_index = i;
            }
        }

        let best = &scored[best_index];
        let violated = self.config.is_violation(best.bias_count, best.toxicity);
        let (selected, justification) = if violated {
            tracing::warn!(
                prompt,
                bias_count = best.bias_count,
                toxicity = best.toxicity,
                "best candidate exceeded thresholds; neutralizing"
            );
            (
                neutralize(prompt, &best.bias_matches),
                Justification::Neutralized,
            )
        } else {
            (best.text.clone(), Justification::WithinLimits)
        };

        tracing::info!(
            prompt,
            candidates = scored.len(),
            best_index,
            violated,
            "decode finished"
        );

        Ok(DecodeResult {
            prompt: prompt.to_string(),
            candidates: scored,
            best_index,
            selected,
            violated,
            justification,
        })
    }

    pub fn decode_from(
        &self,
        prompt: &str,
        source: &mut dyn CandidateSource,
    ) -> Result<DecodeResult> {
        self.decode(prompt, source.candidates(prompt))
    }
}

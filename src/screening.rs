use std::fmt;

use serde::{Serialize, Serializer};

use crate::bias_scorer::ScoringEngine;
use crate::detector::MatchSet;
use crate::selector::DecodeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    Safe,
    Violated,
}

impl ScreenOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenOutcome::Safe => "Safe",
            ScreenOutcome::Violated => "Violated thresholds",
        }
    }
}

impl fmt::Display for ScreenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScreenOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Scores for an existing text judged on its own, with no candidate generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextVerdict {
    pub text: String,
    pub bias_count: usize,
    pub bias_matches: MatchSet,
    pub toxicity: f64,
    pub fluency: f64,
    pub violated: bool,
    pub outcome: ScreenOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segregation {
    pub safe: Vec<TextVerdict>,
    pub violated: Vec<TextVerdict>,
}

impl Segregation {
    pub fn total(&self) -> usize {
        self.safe.len() + self.violated.len()
    }
}

#[derive(Debug, Clone)]
pub struct Screener<'v> {
    engine: ScoringEngine<'v>,
    config: DecodeConfig,
}

impl<'v> Screener<'v> {
    pub fn new(engine: ScoringEngine<'v>, config: DecodeConfig) -> Self {
        Self { engine, config }
    }

    pub fn screen(&self, text: &str) -> TextVerdict {
        let (bias_count, bias_matches) = self.engine.bias_score(text);
        let toxicity = self.engine.toxicity_score(text);
        let fluency = self.engine.fluency_score(text);
        let violated = self.config.is_violation(bias_count, toxicity);
        TextVerdict {
            text: text.to_string(),
            bias_count,
            bias_matches,
            toxicity,
            fluency,
            violated,
            outcome: if violated {
                ScreenOutcome::Violated
            } else {
                ScreenOutcome::Safe
            },
        }
    }

    /// One verdict per text, in input order.
    pub fn screen_all<I, S>(&self, texts: I) -> Vec<TextVerdict>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts.into_iter().map(|t| self.screen(t.as_ref())).collect()
    }

    /// Split texts into safe and violated, each side keeping input order.
    pub fn segregate<I, S>(&self, texts: I) -> Segregation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Segregation::default();
        for verdict in self.screen_all(texts) {
            if verdict.violated {
                out.violated.push(verdict);
            } else {
                out.safe.push(verdict);
            }
        }
        tracing::info!(
            total = out.total(),
            safe = out.safe.len(),
            violated = out.violated.len(),
            "screening complete"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias_scorer::ToxicLexicon;
    use crate::detector::BiasDetector;
    use crate::fuzzy::FuzzyMatcher;
    use crate::vocabulary::Vocabulary;

    fn screener() -> Screener<'static> {
        Screener::new(
            ScoringEngine::new(
                BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::default()),
                ToxicLexicon::default(),
            ),
            DecodeConfig::default(),
        )
    }

    #[test]
    fn test_empty_text_is_safe() {
        let v = screener().screen("");
        assert_eq!(v.bias_count, 0);
        assert_eq!(v.toxicity, 0.0);
        assert_eq!(v.fluency, 0.0);
        assert_eq!(v.outcome, ScreenOutcome::Safe);
    }

    #[test]
    fn test_segregate_mock_posts() {
        let posts = [
            "India is a great country with diverse culture.",
            "Some people are just lazy and stupid.",
            "The festival was celebrated with joy.",
            "Dalit communities face challenges.",
        ];
        let split = screener().segregate(posts);
        assert_eq!(split.total(), 4);

        let safe: Vec<&str> = split.safe.iter().map(|v| v.text.as_str()).collect();
        let violated: Vec<&str> = split.violated.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(safe, vec![posts[0], posts[2]]);
        assert_eq!(violated, vec![posts[1], posts[3]]);
        assert!(split.violated[1].bias_count > 1);
        assert_eq!(split.violated[0].outcome.as_str(), "Violated thresholds");
    }

    #[test]
    fn test_screen_all_keeps_input_order() {
        let posts = [
            "Dalit communities face challenges.",
            "The festival was celebrated with joy.",
            "Some people are just lazy and stupid.",
        ];
        let verdicts = screener().screen_all(posts);
        let texts: Vec<&str> = verdicts.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, posts);
        let flags: Vec<bool> = verdicts.iter().map(|v| v.violated).collect();
        assert_eq!(flags, [true, false, true]);
    }

    #[test]
    fn test_long_biased_post_is_violated() {
        let mut post = String::from("The Dalit families are lazy and dirty.");
        while post.chars().count() <= crate::fuzzy::DEFAULT_MAX_CHARS {
            post.push_str(" The weather is sunny today.");
        }
        let v = screener().screen(&post);
        assert!(v.bias_count > 1);
        assert!(v.violated);
        assert_eq!(v.outcome, ScreenOutcome::Violated);
    }

    #[test]
    fn test_count_at_threshold_stays_safe() {
        // "kapu" in English and Telugu: exactly at the threshold
        let s = Screener::new(
            ScoringEngine::new(
                BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::default()),
                ToxicLexicon::default(),
            ),
            DecodeConfig {
                bias_threshold: 2,
                ..DecodeConfig::default()
            },
        );
        let v = s.screen("Kapu leaders");
        assert_eq!(v.bias_count, 2);
        assert!(!v.violated);
    }
}

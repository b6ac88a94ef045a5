use std::collections::BTreeSet;

use serde::Serialize;

use crate::fuzzy::{Comparison, FuzzyMatcher, SkipReason};
use crate::language::Language;
use crate::normalize::fold;
use crate::vocabulary::Vocabulary;

/// A knowledge-base term found in a text, tagged with its language bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Match {
    pub term: String,
    pub language: Language,
}

impl Match {
    pub fn new(term: impl Into<String>, language: Language) -> Self {
        Self {
            term: term.into(),
            language,
        }
    }
}

pub type MatchSet = BTreeSet<Match>;

/// Which comparison inside detection produced a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Alias key against the input text.
    AliasKey,
    /// Alias native spelling against a knowledge-base term of the same language.
    AliasNative,
    /// Alias key against an English knowledge-base term.
    AliasEnglish,
    /// Knowledge-base term against the input text.
    Direct,
}

/// A comparison that could not be evaluated. `term` is the vocabulary side of the pair; the
/// input text is never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComparison {
    pub pass: Pass,
    pub term: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub matches: MatchSet,
    pub skipped: Vec<SkippedComparison>,
}

/// Finds culturally-sensitive terms in a text across every language of a [`Vocabulary`].
///
/// Two independent passes run over the folded input and their results are unioned:
///
/// 1. Alias-bridged: each alias key that matches the text pulls in the knowledge-base terms
///    matching its native spellings, plus English terms matching the key itself.
/// 2. Direct: each knowledge-base term is compared against the text.
///
/// Every comparison uses the same rule (see [`FuzzyMatcher::compare`]). A comparison that cannot
/// be evaluated is recorded as skipped and detection carries on.
#[derive(Debug, Clone, Copy)]
pub struct BiasDetector<'v> {
    vocabulary: &'v Vocabulary,
    matcher: FuzzyMatcher,
}

impl<'v> BiasDetector<'v> {
    pub fn new(vocabulary: &'v Vocabulary, matcher: FuzzyMatcher) -> Self {
        Self {
            vocabulary,
            matcher,
        }
    }

    pub fn matcher(&self) -> FuzzyMatcher {
        self.matcher
    }

    pub fn detect(&self, text: &str) -> MatchSet {
        self.detect_report(text).matches
    }

    /// Like [`detect`](Self::detect) but also returns every skipped comparison.
    pub fn detect_report(&self, text: &str) -> Detection {
        let mut detection = Detection::default();
        let folded = fold(text);
        if folded.trim().is_empty() {
            return detection;
        }

        self.alias_pass(&folded, &mut detection);
        self.direct_pass(&folded, &mut detection);

        if !detection.skipped.is_empty() {
            tracing::debug!(
                skipped = detection.skipped.len(),
                matches = detection.matches.len(),
                "detection finished with skipped comparisons"
            );
        }
        detection
    }

    fn alias_pass(&self, text: &str, detection: &mut Detection) {
        let kb = &self.vocabulary.knowledge_base;
        for (key, natives) in self.vocabulary.aliases.iter() {
            let key = fold(key);
            if !self.check(Pass::AliasKey, text, &key, detection) {
                continue;
            }

            for (lang, native) in natives {
                let native = fold(native);
                for kb_term in kb.terms(*lang) {
                    if self.check(Pass::AliasNative, &native, &fold(kb_term), detection) {
                        detection.matches.insert(Match::new(kb_term.as_str(), *lang));
                    }
                }
            }

            for kb_term in kb.terms(Language::English) {
                if self.check(Pass::AliasEnglish, &key, &fold(kb_term), detection) {
                    detection
                        .matches
                        .insert(Match::new(kb_term.as_str(), Language::English));
                }
            }
        }
    }

    fn direct_pass(&self, text: &str, detection: &mut Detection) {
        for (lang, term) in self.vocabulary.knowledge_base.iter() {
            if self.check(Pass::Direct, text, &fold(term), detection) {
                detection.matches.insert(Match::new(term, lang));
            }
        }
    }

    /// `term` is always the vocabulary operand.
    fn check(&self, pass: Pass, text: &str, term: &str, detection: &mut Detection) -> bool {
        match self.matcher.compare(text, term) {
            Comparison::Match => true,
            Comparison::Miss => false,
            Comparison::Skipped(reason) => {
                tracing::debug!(?pass, ?reason, term, "skipping comparison");
                detection.skipped.push(SkippedComparison {
                    pass,
                    term: term.to_string(),
                    reason,
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias_map::AliasMap;
    use crate::fuzzy::DEFAULT_MAX_CHARS;
    use crate::knowledge_base::KnowledgeBase;

    fn builtin() -> BiasDetector<'static> {
        BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::default())
    }

    #[test]
    fn test_empty_text_has_no_matches() {
        let detector = builtin();
        assert!(detector.detect("").is_empty());
        assert!(detector.detect("   \t ").is_empty());
    }

    #[test]
    fn test_case_invariance() {
        let detector = builtin();
        let upper = detector.detect("Dalit families");
        let lower = detector.detect("dalit families");
        assert!(!upper.is_empty());
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_idempotent() {
        let detector = builtin();
        let text = "Maratha politics and Reddy families";
        assert_eq!(detector.detect(text), detector.detect(text));
    }

    #[test]
    fn test_alias_bridges_into_native_scripts() {
        let detector = builtin();
        let matches = detector.detect("brahmin community");
        for lang in [
            Language::Hindi,
            Language::Tamil,
            Language::Bengali,
            Language::Telugu,
            Language::English,
        ] {
            assert!(
                matches.iter().any(|m| m.language == lang),
                "no {lang} match in {matches:?}"
            );
        }
        assert!(matches.contains(&Match::new("ब्राह्मण", Language::Hindi)));
        assert!(matches.contains(&Match::new("பிராமணர்", Language::Tamil)));
    }

    #[test]
    fn test_direct_native_match() {
        let detector = builtin();
        let matches = detector.detect("दलित परिवार");
        assert!(matches.contains(&Match::new("दलित", Language::Hindi)));
    }

    #[test]
    fn test_neutral_text() {
        let detector = builtin();
        assert!(detector.detect("The weather today is sunny.").is_empty());
    }

    #[test]
    fn test_both_passes_collapse_into_one_set() {
        let vocab = Vocabulary::new(
            KnowledgeBase::new([
                (Language::English, vec!["dalit"]),
                (Language::Hindi, vec!["दलित"]),
            ]),
            AliasMap::new([("dalit", vec![(Language::Hindi, "दलित")])]),
        );
        let detector = BiasDetector::new(&vocab, FuzzyMatcher::default());
        let matches = detector.detect("dalit दलित");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_unusable_term_is_skipped_not_fatal() {
        let vocab = Vocabulary::new(
            KnowledgeBase::new([(Language::English, vec!["\u{200B}", "dalit"])]),
            AliasMap::default(),
        );
        let detector = BiasDetector::new(&vocab, FuzzyMatcher::default());
        let report = detector.detect_report("dalit rights");
        assert!(report.matches.contains(&Match::new("dalit", Language::English)));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].pass, Pass::Direct);
        assert_eq!(report.skipped[0].reason, SkipReason::EmptyOperand);
    }

    #[test]
    fn test_oversized_text_still_matches_by_containment() {
        let text = "dalit families gathered in the village square";
        let detector = BiasDetector::new(Vocabulary::builtin(), FuzzyMatcher::new(80, 16));
        let report = detector.detect_report(text);
        assert!(report.matches.contains(&Match::new("dalit", Language::English)));
        assert!(report.matches.contains(&Match::new("दलित", Language::Hindi)));
        assert!(!report.skipped.is_empty());
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::TooLong { limit: 16, .. })));
        assert_eq!(report.matches, builtin().detect(text));
    }

    #[test]
    fn test_text_over_default_limit_is_detected() {
        let mut text = String::from("The Dalit families are lazy and dirty.");
        while text.chars().count() <= DEFAULT_MAX_CHARS {
            text.push_str(" The weather is sunny today.");
        }
        let detector = builtin();
        let long = detector.detect(&text);
        assert!(long.contains(&Match::new("dalit", Language::English)));
        assert_eq!(long, detector.detect("The Dalit families are lazy and dirty."));
    }
}

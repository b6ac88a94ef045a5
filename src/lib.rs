//! Multilingual detection of culturally-sensitive terms and constitution-aware selection among
//! candidate texts.

pub mod alias_map;
pub mod bias_scorer;
pub mod candidates;
pub mod config;
pub mod detector;
pub mod error;
pub mod fuzzy;
pub mod knowledge_base;
pub mod language;
pub mod neutralize;
pub mod normalize;
pub mod report;
pub mod screening;
pub mod selector;
pub mod vocabulary;

#[cfg(feature = "python")]
mod python;

pub use alias_map::AliasMap;
pub use bias_scorer::{fluency_score, ScoredCandidate, ScoringEngine, ToxicLexicon};
pub use candidates::{CandidateSource, FixedCandidates, TemplateSource};
pub use config::GuardConfig;
pub use detector::{BiasDetector, Detection, Match, MatchSet};
pub use error::{GuardError, Result};
pub use fuzzy::{Comparison, FuzzyMatcher, SkipReason};
pub use knowledge_base::KnowledgeBase;
pub use language::Language;
pub use neutralize::neutralize;
pub use screening::{Screener, Segregation, TextVerdict};
pub use selector::{DecodeConfig, DecodeResult, Justification, Selector};
pub use vocabulary::Vocabulary;

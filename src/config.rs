use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bias_scorer::ToxicLexicon;
use crate::error::{GuardError, Result};
use crate::fuzzy::{FuzzyMatcher, DEFAULT_MAX_CHARS, DEFAULT_THRESHOLD};
use crate::selector::DecodeConfig;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub matching: MatchingConfig,
    pub decode: DecodeSection,
    pub scoring: ScoringConfig,
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub fuzzy_threshold: u8,
    pub max_compare_chars: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_THRESHOLD,
            max_compare_chars: DEFAULT_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecodeSection {
    #[serde(flatten)]
    pub thresholds: DecodeConfig,
    /// How many templates a generated decode samples.
    pub candidates: usize,
}

impl Default for DecodeSection {
    fn default() -> Self {
        Self {
            thresholds: DecodeConfig::default(),
            candidates: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Replaces the built-in toxic keyword list when set.
    pub toxic_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// External vocabulary file; the embedded one is used when unset.
    pub path: Option<PathBuf>,
}

impl GuardConfig {
    /// Read and validate `path`. Relative vocabulary paths resolve against the config's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GuardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: GuardConfig = toml::from_str(&text).map_err(|source| GuardError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;
        if let (Some(vocab), Some(dir)) = (cfg.vocabulary.path.as_mut(), path.parent()) {
            if vocab.is_relative() {
                *vocab = dir.join(&*vocab);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: GuardConfig = toml::from_str(text).map_err(|source| GuardError::TomlParse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.fuzzy_threshold > 100 {
            return Err(GuardError::InvalidConfig(format!(
                "matching.fuzzy_threshold must be within 0..=100, got {}",
                self.matching.fuzzy_threshold
            )));
        }
        if self.matching.max_compare_chars == 0 {
            return Err(GuardError::InvalidConfig(
                "matching.max_compare_chars must be greater than 0".into(),
            ));
        }
        if self.decode.candidates == 0 {
            return Err(GuardError::InvalidConfig(
                "decode.candidates must be greater than 0".into(),
            ));
        }
        self.decode.thresholds.validate()
    }

    pub fn matcher(&self) -> FuzzyMatcher {
        FuzzyMatcher::new(
            self.matching.fuzzy_threshold,
            self.matching.max_compare_chars,
        )
    }

    pub fn lexicon(&self) -> Result<ToxicLexicon> {
        match &self.scoring.toxic_keywords {
            Some(list) => ToxicLexicon::new(list),
            None => Ok(ToxicLexicon::default()),
        }
    }

    /// The configured external vocabulary, or `None` to use [`Vocabulary::builtin`].
    pub fn load_vocabulary(&self) -> Result<Option<Vocabulary>> {
        self.vocabulary
            .path
            .as_ref()
            .map(|path| Vocabulary::load(path))
            .transpose()
    }
}

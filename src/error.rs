use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Debug, Error)]
pub enum GuardError {
    /// `decode` was called with an empty candidate list.
    #[error("no candidates supplied for prompt '{prompt}'")]
    NoCandidates { prompt: String },

    #[error("unknown language tag '{0}'")]
    UnknownLanguage(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not build toxic keyword matcher: {0}")]
    Lexicon(#[from] regex::Error),
}

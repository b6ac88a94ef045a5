use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::alias_map::AliasMap;
use crate::error::{GuardError, Result};
use crate::knowledge_base::KnowledgeBase;
use crate::language::Language;

pub const DEFAULT_VOCABULARY_TOML: &str = include_str!("../assets/vocabulary.toml");

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::from_toml_str(DEFAULT_VOCABULARY_TOML).expect("embedded vocabulary must parse")
});

/// Read-only matching data: the knowledge base plus the Latin alias map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub knowledge_base: KnowledgeBase,
    pub aliases: AliasMap,
}

#[derive(Debug, Default, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    knowledge_base: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    aliases: BTreeMap<String, BTreeMap<String, String>>,
}

impl VocabularyFile {
    fn into_vocabulary(self) -> Result<Vocabulary> {
        let mut buckets = Vec::with_capacity(self.knowledge_base.len());
        for (tag, terms) in self.knowledge_base {
            buckets.push((tag.parse::<Language>()?, terms));
        }

        let mut entries = Vec::with_capacity(self.aliases.len());
        for (key, natives) in self.aliases {
            let mut parsed = Vec::with_capacity(natives.len());
            for (tag, native) in natives {
                parsed.push((tag.parse::<Language>()?, native));
            }
            entries.push((key, parsed));
        }

        Ok(Vocabulary {
            knowledge_base: KnowledgeBase::new(buckets),
            aliases: AliasMap::new(entries),
        })
    }
}

impl Vocabulary {
    pub fn new(knowledge_base: KnowledgeBase, aliases: AliasMap) -> Self {
        Self {
            knowledge_base,
            aliases,
        }
    }

    /// Process-wide default vocabulary (Hindi, Telugu, Tamil, Bengali, English).
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        parse_toml(text, Path::new("<inline>"))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        parse_json(text, Path::new("<inline>"))
    }

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GuardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let vocab = if is_json {
            parse_json(&text, path)?
        } else {
            parse_toml(&text, path)?
        };
        tracing::info!(
            path = %path.display(),
            terms = vocab.knowledge_base.len(),
            aliases = vocab.aliases.len(),
            "loaded vocabulary"
        );
        Ok(vocab)
    }
}

fn parse_toml(text: &str, path: &Path) -> Result<Vocabulary> {
    let file: VocabularyFile = toml::from_str(text).map_err(|source| GuardError::TomlParse {
        path: PathBuf::from(path),
        source,
    })?;
    file.into_vocabulary()
}

fn parse_json(text: &str, path: &Path) -> Result<Vocabulary> {
    let file: VocabularyFile =
        serde_json::from_str(text).map_err(|source| GuardError::JsonParse {
            path: PathBuf::from(path),
            source,
        })?;
    file.into_vocabulary()
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GuardError;

/// Language tag attached to every vocabulary entry.
///
/// Variants are declared alphabetically so `Ord` sorts the same way the tags do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Bengali,
    English,
    Hindi,
    Marathi,
    Tamil,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Bengali,
        Language::English,
        Language::Hindi,
        Language::Marathi,
        Language::Tamil,
        Language::Telugu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Bengali => "bengali",
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Marathi => "marathi",
            Language::Tamil => "tamil",
            Language::Telugu => "telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| GuardError::UnknownLanguage(tag.to_string()))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" telugu ".parse::<Language>().unwrap(), Language::Telugu);
    }

    #[test]
    fn test_unknown_tag() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(matches!(err, GuardError::UnknownLanguage(ref t) if t == "klingon"));
    }

    #[test]
    fn test_order_matches_tag_order() {
        let mut tags: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        let by_enum = tags.clone();
        tags.sort();
        assert_eq!(tags, by_enum);
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&Language::Bengali).unwrap();
        assert_eq!(json, "\"bengali\"");
        let back: Language = serde_json::from_str("\"tamil\"").unwrap();
        assert_eq!(back, Language::Tamil);
    }
}

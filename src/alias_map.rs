use std::collections::BTreeMap;

use crate::language::Language;

/// Canonical Latin-script key -> native spelling per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: BTreeMap<String, BTreeMap<Language, String>>,
}

impl AliasMap {
    /// Keys are lowercased and trimmed. Entries with an empty key or an empty native spelling are
    /// dropped.
    pub fn new<I, M, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        M: IntoIterator<Item = (Language, S)>,
        S: AsRef<str>,
    {
        let mut map = Self::default();
        for (key, natives) in entries {
            let key = key.as_ref().trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let slot = map.entries.entry(key).or_default();
            for (lang, native) in natives {
                let native = native.as_ref().trim();
                if !native.is_empty() {
                    slot.insert(lang, native.to_string());
                }
            }
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&BTreeMap<Language, String>> {
        self.entries.get(&key.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<Language, String>)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_lowercased() {
        let map = AliasMap::new([(
            "Dalit",
            vec![(Language::Hindi, "दलित"), (Language::Tamil, "தலித்")],
        )]);
        let natives = map.get("dalit").unwrap();
        assert_eq!(natives[&Language::Hindi], "दलित");
        assert!(map.get("DALIT ").is_some());
    }

    #[test]
    fn test_empty_entries_dropped() {
        let map = AliasMap::new([
            ("", vec![(Language::Hindi, "दलित")]),
            ("jat", vec![(Language::Hindi, "")]),
        ]);
        assert_eq!(map.len(), 1);
        assert!(map.get("jat").unwrap().is_empty());
    }
}

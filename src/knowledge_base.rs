use std::collections::BTreeMap;

use crate::language::Language;

/// Per-language ordered lists of sensitive terms in native script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    buckets: BTreeMap<Language, Vec<String>>,
}

impl KnowledgeBase {
    /// Build from `(language, terms)` pairs. Terms are trimmed; empty and repeated terms within a
    /// bucket are dropped, keeping the first occurrence.
    pub fn new<I, T, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (Language, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kb = Self::default();
        for (lang, terms) in buckets {
            let bucket = kb.buckets.entry(lang).or_default();
            for term in terms {
                let term = term.as_ref().trim();
                if term.is_empty() || bucket.iter().any(|t| t == term) {
                    continue;
                }
                bucket.push(term.to_string());
            }
        }
        kb
    }

    pub fn terms(&self, lang: Language) -> &[String] {
        self.buckets.get(&lang).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(lang, terms)| terms.iter().map(move |t| (*lang, t.as_str())))
    }

    /// Total number of terms across all languages.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

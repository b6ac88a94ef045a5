//! Approximate string matching.
//!
//! `similarity` is a partial ratio: the shorter operand is the needle and is slid over every
//! window of the same length in the longer operand (the haystack). On equal lengths the first
//! operand is the needle and the plain ratio is returned. Each window is scored with
//! `strsim::normalized_levenshtein`, scaled to 0..=100.

pub const DEFAULT_THRESHOLD: u8 = 80;
pub const DEFAULT_MAX_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// One side folded down to nothing.
    EmptyOperand,
    TooLong { chars: usize, limit: usize },
}

/// Outcome of comparing one pair of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Miss,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatcher {
    threshold: u8,
    max_chars: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: u8, max_chars: usize) -> Self {
        Self {
            threshold: threshold.min(100),
            max_chars,
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Similarity score in [0, 100]; 0 when either side is empty.
    pub fn similarity(&self, a: &str, b: &str) -> u8 {
        partial_ratio(a, b)
    }

    /// Containment in either direction, or similarity at or above the threshold.
    ///
    /// Containment is always checked. Only the similarity scan is bounded by `max_chars`: a pair
    /// that is not contained and has an operand over the limit is skipped.
    ///
    /// Operands are expected to be folded already (see [`crate::normalize::fold`]).
    pub fn compare(&self, a: &str, b: &str) -> Comparison {
        if a.is_empty() || b.is_empty() {
            return Comparison::Skipped(SkipReason::EmptyOperand);
        }
        if a.contains(b) || b.contains(a) {
            return Comparison::Match;
        }

        let longest = a.chars().count().max(b.chars().count());
        if longest > self.max_chars {
            return Comparison::Skipped(SkipReason::TooLong {
                chars: longest,
                limit: self.max_chars,
            });
        }
        if partial_ratio(a, b) >= self.threshold {
            Comparison::Match
        } else {
            Comparison::Miss
        }
    }
}

fn ratio(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// Best ratio of the shorter string against every equal-length window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0;
    }

    let (needle, haystack) = if b_chars.len() < a_chars.len() {
        (&b_chars, &a_chars)
    } else {
        (&a_chars, &b_chars)
    };
    if needle.len() == haystack.len() {
        return ratio(a, b);
    }

    let width = needle.len();
    let needle: String = needle.iter().collect();
    let mut best = 0u8;
    for window in haystack.windows(width) {
        let window: String = window.iter().collect();
        let score = ratio(&needle, &window);
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    best
}

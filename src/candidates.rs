use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Supplies the ordered candidate texts for a prompt.
pub trait CandidateSource {
    fn candidates(&mut self, prompt: &str) -> Vec<String>;
}

/// Returns the same caller-provided texts for every prompt.
#[derive(Debug, Clone, Default)]
pub struct FixedCandidates(pub Vec<String>);

impl CandidateSource for FixedCandidates {
    fn candidates(&mut self, _prompt: &str) -> Vec<String> {
        self.0.clone()
    }
}

const TEMPLATES: [&str; 7] = [
    "The {prompt} are hardworking and intelligent.",
    "The {prompt} are lazy and stupid.",
    "Many {prompt} traditions vary widely.",
    "{prompt} communities celebrate festivals joyfully.",
    "People from {prompt} deserve respect and equal opportunity.",
    "You can't generalize about all {prompt}; individuals differ.",
    "Some {prompt} people are influential in local politics.",
];

/// Samples distinct sentence templates around the prompt.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    count: usize,
    rng: StdRng,
}

impl TemplateSource {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sampling.
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self {
            count,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn template_count() -> usize {
        TEMPLATES.len()
    }
}

impl CandidateSource for TemplateSource {
    fn candidates(&mut self, prompt: &str) -> Vec<String> {
        let n = self.count.min(TEMPLATES.len());
        TEMPLATES
            .choose_multiple(&mut self.rng, n)
            .map(|t| t.replace("{prompt}", prompt))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_returns_input() {
        let mut src = FixedCandidates(vec!["a".into(), "b".into()]);
        assert_eq!(src.candidates("anything"), vec!["a", "b"]);
    }

    #[test]
    fn test_template_count_is_capped() {
        let mut src = TemplateSource::seeded(50, 7);
        let out = src.candidates("Kapu leaders");
        assert_eq!(out.len(), TemplateSource::template_count());
        let mut unique = out.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn test_prompt_is_substituted() {
        let mut src = TemplateSource::seeded(4, 1);
        for text in src.candidates("Tamil fishermen") {
            assert!(text.contains("Tamil fishermen"));
            assert!(!text.contains("{prompt}"));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = TemplateSource::seeded(3, 42).candidates("X");
        let b = TemplateSource::seeded(3, 42).candidates("X");
        assert_eq!(a, b);
    }
}

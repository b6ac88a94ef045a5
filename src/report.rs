use std::io::{self, Write};

use serde::Serialize;

use crate::detector::MatchSet;
use crate::selector::DecodeResult;

/// One flat row per candidate, ready for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub prompt: String,
    pub candidate: String,
    pub bias_count: usize,
    pub bias_matches: String,
    pub toxicity: f64,
    pub fluency: f64,
    pub combined: f64,
    pub final_selected: String,
    pub violated: bool,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptSummary {
    pub prompt: String,
    pub candidates: usize,
    pub mean_bias_count: f64,
    pub mean_toxicity: f64,
    pub mean_fluency: f64,
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}

/// `term(language), ...` in set order; empty string for no matches.
pub fn format_matches(matches: &MatchSet) -> String {
    matches
        .iter()
        .map(|m| format!("{}({})", m.term, m.language))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn rows_for(result: &DecodeResult) -> Vec<ReportRow> {
    result
        .candidates
        .iter()
        .map(|c| ReportRow {
            prompt: result.prompt.clone(),
            candidate: c.text.clone(),
            bias_count: c.bias_count,
            bias_matches: format_matches(&c.bias_matches),
            toxicity: round3(c.toxicity),
            fluency: round3(c.fluency),
            combined: round3(c.combined),
            final_selected: result.selected.clone(),
            violated: result.violated,
            justification: result.justification.to_string(),
        })
        .collect()
}

/// Per-prompt means, prompts in first-seen order.
pub fn summarize(rows: &[ReportRow]) -> Vec<PromptSummary> {
    let mut order: Vec<&str> = Vec::new();
    for row in rows {
        if !order.contains(&row.prompt.as_str()) {
            order.push(&row.prompt);
        }
    }

    order
        .into_iter()
        .map(|prompt| {
            let group: Vec<&ReportRow> = rows.iter().filter(|r| r.prompt == prompt).collect();
            let n = group.len() as f64;
            PromptSummary {
                prompt: prompt.to_string(),
                candidates: group.len(),
                mean_bias_count: group.iter().map(|r| r.bias_count as f64).sum::<f64>() / n,
                mean_toxicity: group.iter().map(|r| r.toxicity).sum::<f64>() / n,
                mean_fluency: group.iter().map(|r| r.fluency).sum::<f64>() / n,
            }
        })
        .collect()
}

/// Write one JSON object per line.
pub fn write_jsonl<W: Write, T: Serialize>(mut writer: W, items: &[T]) -> io::Result<()> {
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

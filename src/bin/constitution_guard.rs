//! Command-line front end.
//!
//! Usage:
//!   constitution-guard detect "Dalit families"
//!   constitution-guard decode "Telugu farmers" "Kapu leaders" --candidates 4 --seed 7 --summary
//!   constitution-guard screen --input posts.txt
//!
//! Results go to stdout as JSON / JSON Lines; logs go to stderr (filter with RUST_LOG).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use constitution_guard::candidates::TemplateSource;
use constitution_guard::report;
use constitution_guard::{
    BiasDetector, GuardConfig, Screener, ScoringEngine, Selector, Vocabulary,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "constitution-guard")]
#[command(about = "Flag culturally-sensitive terms and pick neutral candidate texts")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sensitive terms found in a text
    Detect { text: String },

    /// Generate template candidates for each prompt and select the best
    Decode {
        #[arg(required = true)]
        prompts: Vec<String>,

        /// Templates sampled per prompt (defaults to the config value)
        #[arg(
            long,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        candidates: Option<usize>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Also print per-prompt means after the rows
        #[arg(long)]
        summary: bool,
    },

    /// Judge existing texts, one per line
    Screen {
        /// Input file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn read_lines(input: Option<&PathBuf>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading input")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GuardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GuardConfig::default(),
    };
    let external = config.load_vocabulary()?;
    let vocabulary = external.as_ref().unwrap_or_else(|| Vocabulary::builtin());
    let engine = ScoringEngine::new(
        BiasDetector::new(vocabulary, config.matcher()),
        config.lexicon()?,
    );
    let stdout = io::stdout().lock();

    match args.command {
        Command::Detect { text } => {
            let matches = engine.detector().detect(&text);
            serde_json::to_writer_pretty(stdout, &matches)?;
            println!();
        }
        Command::Decode {
            prompts,
            candidates,
            seed,
            summary,
        } => {
            let count = candidates.unwrap_or(config.decode.candidates);
            let mut source = match seed {
                Some(seed) => TemplateSource::seeded(count, seed),
                None => TemplateSource::new(count),
            };
            let selector = Selector::new(engine, config.decode.thresholds)?;

            let mut rows = Vec::new();
            let mut violated = 0usize;
            for prompt in &prompts {
                let result = selector.decode_from(prompt, &mut source)?;
                if result.violated {
                    violated += 1;
                }
                rows.extend(report::rows_for(&result));
            }
            info!(prompts = prompts.len(), rows = rows.len(), violated, "decode run complete");

            if summary {
                let mut out = stdout;
                report::write_jsonl(&mut out, &rows)?;
                report::write_jsonl(&mut out, &report::summarize(&rows))?;
            } else {
                report::write_jsonl(stdout, &rows)?;
            }
        }
        Command::Screen { input } => {
            let texts = read_lines(input.as_ref())?;
            let screener = Screener::new(engine, config.decode.thresholds);
            let verdicts = screener.screen_all(&texts);
            let violated = verdicts.iter().filter(|v| v.violated).count();
            info!(total = verdicts.len(), violated, "screening complete");
            report::write_jsonl(stdout, &verdicts)?;
        }
    }

    Ok(())
}

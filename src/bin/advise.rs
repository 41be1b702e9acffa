use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use riftadvisor::{
    load_cards_from_json_with_hints, load_policy_from_json, Advisor, AdvisorError, AdvisorPolicy, Evaluation,
    GameState, GameStateInput, JsonlObserver,
};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Mulligan,
    Playables,
}

#[derive(Debug, Parser)]
#[command(name = "advise", about = "Riftbound mulligan and play advisor")]
struct Args {
    /// Cards JSON path
    #[arg(long, default_value = "data/cards.json")]
    cards: PathBuf,

    /// Optional advisor policy JSON (missing fields take defaults)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Request kind
    #[arg(long, value_enum, default_value_t = Mode::Playables)]
    mode: Mode,

    /// Single request JSON file; reads stdin when omitted or '-'
    #[arg(long)]
    state: Option<PathBuf>,

    /// JSONL file with one request per line, evaluated in parallel
    #[arg(long, conflicts_with = "state")]
    batch: Option<PathBuf>,

    /// Append one evaluation record per request to this JSONL file
    #[arg(long)]
    observe: Option<PathBuf>,

    /// Show a progress bar for batch runs (stderr)
    #[arg(long, default_value_t = false)]
    progress: bool,

    /// Print a one-line summary per evaluation to stderr
    #[arg(long, default_value_t = false)]
    summary: bool,
}

/// Mulligan requests accept a bare hand or a full snapshot (my hand is used).
#[derive(Deserialize)]
#[serde(untagged)]
enum MulliganRequest {
    Hand { hand: Vec<String> },
    State(Box<GameStateInput>),
}

fn evaluate_one(advisor: &Advisor<'_>, mode: Mode, input: &str) -> Result<Evaluation, AdvisorError> {
    let hints = &advisor.policy().text_hints;
    match mode {
        Mode::Playables => {
            let state = GameState::from_json(input, hints)?;
            Ok(advisor.evaluate_playables(&state))
        }
        Mode::Mulligan => {
            let req: MulliganRequest = serde_json::from_str(input)
                .map_err(|e| AdvisorError::MalformedGameState(format!("invalid JSON: {e}")))?;
            let hand = match req {
                MulliganRequest::Hand { hand } => hand,
                MulliganRequest::State(input) => GameState::from_input_with_hints(*input, hints)?.me.hand,
            };
            Ok(advisor.evaluate_mulligan(&hand))
        }
    }
}

fn read_single(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let policy = match args.policy.as_ref() {
        Some(p) => load_policy_from_json(p).map_err(|e| format!("Policy load error: {e}"))?,
        None => AdvisorPolicy::default(),
    };
    let cards = load_cards_from_json_with_hints(&args.cards, &policy.text_hints)
        .map_err(|e| format!("Cards load error: {e}"))?;
    info!(cards = cards.len(), fingerprint = cards.fingerprint(), "catalog ready");

    let observer = match args.observe.as_ref() {
        Some(p) => Some(Arc::new(JsonlObserver::create(p)?)),
        None => None,
    };
    let mut advisor = Advisor::with_policy(&cards, policy)?;
    if let Some(obs) = observer.as_ref() {
        advisor = advisor.with_observer(obs.clone());
    }

    let mut failures = 0usize;
    if let Some(batch) = args.batch.as_ref() {
        let data = fs::read_to_string(batch).map_err(|e| format!("Failed to read batch: {e}"))?;
        let lines: Vec<(usize, &str)> = data
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .collect();

        let pb = if args.progress {
            let pb = ProgressBar::new(lines.len() as u64);
            pb.set_style(ProgressStyle::with_template(
                "[{elapsed_precise}] requests {bar:40.cyan/blue} {pos}/{len}",
            )?);
            Some(pb)
        } else {
            None
        };

        // Results keep input order regardless of scheduling.
        let results: Vec<(usize, Result<Evaluation, AdvisorError>)> = lines
            .par_iter()
            .map(|&(n, line)| {
                let r = evaluate_one(&advisor, args.mode, line);
                if let Some(pb) = pb.as_ref() {
                    pb.inc(1);
                }
                (n, r)
            })
            .collect();
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        for (n, r) in results {
            match r {
                Ok(eval) => {
                    if args.summary {
                        eprintln!("[advise] line {}: {}", n + 1, eval.summary());
                    }
                    println!("{}", serde_json::to_string(&eval)?);
                }
                Err(e) => {
                    failures += 1;
                    eprintln!("[advise] line {}: {e}", n + 1);
                }
            }
        }
        if failures > 0 {
            eprintln!("[advise] {failures} of {} requests rejected", lines.len());
        }
    } else {
        let input = read_single(args.state.as_ref()).map_err(|e| format!("Failed to read state: {e}"))?;
        match evaluate_one(&advisor, args.mode, &input) {
            Ok(eval) => {
                if args.summary {
                    eprintln!("[advise] {}", eval.summary());
                }
                println!("{}", serde_json::to_string(&eval)?);
            }
            Err(e) => {
                failures += 1;
                eprintln!("[advise] {e}");
            }
        }
    }

    // Drop the advisor's handle before flushing the writer.
    drop(advisor);
    if let Some(obs) = observer {
        let stats = obs.finish()?;
        info!(lines = stats.total_lines, sha256 = %stats.sha256_hex, "observer flushed");
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ABOUTME: Command-line interface for the argos-dice evaluator.
// ABOUTME: Answers roll commands one at a time or line by line, optionally as JSON.

use argos_dice::{Evaluation, FastRng, Limits, Rng, SecureRng};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "argos-dice")]
#[command(about = "Evaluates dice roll commands the way the chat bot answers them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of dice one expression may roll
    #[arg(long, global = true, default_value_t = argos_dice::DEFAULT_DICE_LIMIT)]
    dice_limit: u32,

    /// Terms with more dice than this show only their total
    #[arg(long, global = true, default_value_t = argos_dice::DEFAULT_BREAKDOWN_LIMIT)]
    breakdown_limit: usize,

    /// Seed a reproducible (non-secure) RNG instead of the OS source
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one expression
    Roll {
        /// Dice expression (e.g., "4d6k3", "2d20kl + 5")
        #[arg(required = true, num_args = 1..)]
        expression: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one expression per line from stdin
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let limits = Limits {
        dice: cli.dice_limit,
        breakdown: cli.breakdown_limit,
    };

    let ok = match cli.seed {
        Some(seed) => run(&cli.command, &limits, &mut FastRng::with_seed(seed)),
        None => run(&cli.command, &limits, &mut SecureRng),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns false if any evaluation failed.
fn run(command: &Commands, limits: &Limits, rng: &mut impl Rng) -> bool {
    match command {
        Commands::Roll { expression, json } => {
            let input = expression.join(" ");
            let canonical = argos_dice::normalize(&input);
            let result = argos_dice::evaluate_canonical(&canonical, limits, rng);

            if *json {
                print_json(&canonical, &result);
            } else {
                println!("{}", argos_dice::report(&canonical, &result));
            }
            result.is_ok()
        }
        Commands::Repl => repl(limits, rng),
    }
}

fn repl(limits: &Limits, rng: &mut impl Rng) -> bool {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut ok = true;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let canonical = argos_dice::normalize(&line);
        let result = argos_dice::evaluate_canonical(&canonical, limits, rng);
        ok &= result.is_ok();
        if writeln!(stdout, "{}\n", argos_dice::report(&canonical, &result)).is_err() {
            return false;
        }
    }

    ok
}

fn print_json(canonical: &str, result: &argos_dice::Result<Evaluation>) {
    let output = match result {
        Ok(evaluation) => json!({
            "input": evaluation.input,
            "rolls": evaluation.rolls.iter().map(|roll| json!({
                "term": roll.term,
                "dice": roll.dice.iter().map(|d| json!({
                    "value": d.value,
                    "kept": d.kept,
                })).collect::<Vec<_>>(),
                "total": roll.total,
            })).collect::<Vec<_>>(),
            "total": evaluation.total,
        }),
        Err(e) => json!({
            "input": canonical,
            "error": e.to_string(),
        }),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

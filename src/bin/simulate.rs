//! Batch battle simulator.
//!
//! Plays many battles with an autopilot party and outputs one JSON record
//! per battle.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --battles N     Number of battles to play (default: 100)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --max-rounds N  Abandon undecided battles after N rounds (default: 100)
//!   --run-below F   Run when party health falls below fraction F
//!   --setup FILE    Battle setup JSON (default: built-in encounter)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;

use skirmish::config::{load_setup, BattleSetup};
use skirmish::simulate::{self, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut setup = BattleSetup::default();
    let mut output_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--battles" => {
                i += 1;
                config.battles = parse_arg(&args, i, "--battles");
            }
            "--threads" => {
                i += 1;
                config.threads = parse_arg(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = parse_arg(&args, i, "--seed");
            }
            "--max-rounds" => {
                i += 1;
                config.max_rounds = parse_arg(&args, i, "--max-rounds");
            }
            "--run-below" => {
                i += 1;
                config.run_when_below = Some(parse_arg(&args, i, "--run-below"));
            }
            "--setup" => {
                i += 1;
                let path: String = parse_arg(&args, i, "--setup");
                setup = load_setup(Path::new(&path)).unwrap_or_else(|e| {
                    eprintln!("{}", e);
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(parse_arg(&args, i, "--output"));
            }
            "--quiet" => {
                quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if !quiet {
        eprintln!(
            "Simulating {} battles, {} threads, max {} rounds",
            config.battles, config.threads, config.max_rounds
        );
    }

    let records = match simulate::run_simulation(&setup, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("failed to build thread pool: {}", e);
            process::exit(1);
        }
    };

    if !quiet {
        simulate::print_summary(&records);
    }

    let written = match output_path {
        Some(path) => File::create(&path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            simulate::write_jsonl(&records, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&records, &mut writer)
        }
    };
    if let Err(e) = written {
        eprintln!("failed to write output: {}", e);
        process::exit(1);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|v| v.parse::<T>()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --battles N      Number of battles to play (default: 100)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --max-rounds N   Abandon undecided battles after N rounds (default: 100)");
    eprintln!("  --run-below F    Run when party health falls below fraction F");
    eprintln!("  --setup FILE     Battle setup JSON (default: built-in encounter)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}

//! Skirmish -- an interactive battle over a line protocol.
//!
//! Reads commands from stdin and writes responses to stdout. Diagnostics
//! go to stderr, filtered by `RUST_LOG`.
//!
//! Usage:
//!   skirmish [--setup FILE] [--seed N]

use std::env;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;

use skirmish::config::{load_setup, BattleSetup};
use skirmish::protocol::{parse_command, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut setup = BattleSetup::default();
    let mut seed = 0u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--setup" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    usage_error("--setup needs a file");
                };
                setup = match load_setup(Path::new(path)) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("{}", e);
                        process::exit(1);
                    }
                };
            }
            "--seed" => {
                i += 1;
                seed = match args.get(i).map(|v| v.parse::<u64>()) {
                    Some(Ok(n)) => n,
                    _ => usage_error("invalid --seed value"),
                };
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => usage_error(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(setup, seed, io::BufWriter::new(stdout.lock()));

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let result = match parse_command(&line) {
            Ok(Some(cmd)) => session.handle(cmd),
            Ok(None) => continue,
            Err(e) => session.report_error(&e.to_string()).map(|_| true),
        };

        match result {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("output error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: skirmish [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --setup FILE  Battle setup JSON (default: built-in encounter)");
    eprintln!("  --seed N      Random seed, 0 for entropy (default: 0)");
    eprintln!("  --help        Show this help");
    eprintln!();
    eprintln!("Commands: start, fight [N], magic [N], item [N], run, status, targets, pause, quit");
}

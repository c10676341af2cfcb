//! Forge balance simulator CLI.
//!
//! Run Monte Carlo simulations against the real enhancement engine.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                       # 10,000 attempts per level
//!   cargo run --bin simulate -- -n 1000 -s 42     # Small reproducible run
//!   cargo run --bin simulate -- --ladder 15       # Cost to reach +15

use forge::build_info;
use forge::logging::{init_tracing, LogLevel, TracingConfig};
use forge::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let (config, verbose) = parse_args(&args);

    let tracing_config = if verbose {
        TracingConfig::verbose(LogLevel::Debug)
    } else {
        TracingConfig::default()
    };
    init_tracing(&tracing_config);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              FORGE BALANCE SIMULATOR                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Attempts/Level: {}", config.attempts_per_level);
    println!("  Passion:        {}", config.force_passion);
    if config.ladder_runs > 0 {
        println!(
            "  Ladder:         {} runs to +{}",
            config.ladder_runs, config.ladder_target
        );
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "forge_sim_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }

    if !report.drifted_levels().is_empty() {
        std::process::exit(2);
    }
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--attempts" => {
                if i + 1 < args.len() {
                    config.attempts_per_level = args[i + 1].parse().unwrap_or(10_000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--passion" => {
                config.force_passion = true;
            }
            "--ladder" => {
                if i + 1 < args.len() {
                    if let Ok(target) = args[i + 1].parse::<u8>() {
                        config.ladder_target = target.min(forge::MAX_LEVEL);
                        i += 1;
                    }
                }
            }
            "--runs" => {
                if i + 1 < args.len() {
                    config.ladder_runs = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--no-ladder" => {
                config.ladder_runs = 0;
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-V" | "--version" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (config, verbose)
}

fn print_help() {
    println!("Forge Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --attempts <N>  Attempts measured per level (default: 10,000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    --passion           Measure every attempt with passion pending");
    println!("    --ladder <L>        Target level for ladder runs (default: 10)");
    println!("    --runs <R>          Number of ladder runs (default: 200)");
    println!("    --no-ladder         Skip the ladder runs");
    println!("    -v, --verbose       Debug logging to stderr");
    println!("    --json              Save JSON report");
    println!("    -V, --version       Print version and build stamp");
    println!("    -h, --help          Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                      # Default run");
    println!("    cargo run --bin simulate -- -n 1000 -s 42    # Reproducible");
    println!("    cargo run --bin simulate -- --passion        # Passion odds");
    println!("    cargo run --bin simulate -- --ladder 15      # Climb to +15");
}

//! Drive log replay CLI.
//!
//! Opens a replay session from a TOML config and steps it to exhaustion,
//! logging each channel as it becomes ready.
//!
//! ```bash
//! # Synthetic drive with default settings
//! cargo run --bin replay_drive
//!
//! # Recorded drive
//! cargo run --bin replay_drive -- --config replay.toml --path drives/0042
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use smriti_replay::{DriveSession, LogTelemetry, ReplayConfig};

struct Args {
    config_path: Option<String>,
    session_path: PathBuf,
    step_ms: u64,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: None,
        session_path: PathBuf::from("."),
        step_ms: 100,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--path" | "-p" => {
                if i + 1 < args.len() {
                    result.session_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--step-ms" => {
                if i + 1 < args.len() {
                    result.step_ms = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("replay_drive - drive log replay driver");
    println!();
    println!("USAGE:");
    println!("    replay_drive [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: built-in synthetic drive)");
    println!("    -p, --path <DIR>        Session root holding the recorded data (default: .)");
    println!("        --step-ms <N>       Target offset step per read call (default: 100)");
    println!("    -h, --help              Print help information");
}

fn load_config(args: &Args) -> ReplayConfig {
    match &args.config_path {
        Some(path) => match ReplayConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ReplayConfig::default(),
    }
}

fn run(args: &Args, config: &ReplayConfig) -> smriti_replay::Result<()> {
    let mut session = DriveSession::from_config(config, Arc::new(LogTelemetry))?;
    let anchor_us = session.open(&args.session_path)?;
    log::info!("anchor: {} us since epoch", anchor_us);

    let step_us = args.step_ms * 1_000;
    let mut target_offset_us = 0u64;
    let mut ready_events = 0u64;

    loop {
        let output = session.read(target_offset_us)?;
        if !output.data_remaining {
            break;
        }
        for channel in &output.channels_ready {
            ready_events += 1;
            log::info!(
                "channel '{}' ready at offset {} us",
                channel,
                output.offset_reached_us
            );
        }
        if output.channels_ready.is_empty() {
            target_offset_us += step_us;
        }
    }

    session.close()?;
    log::info!("replay complete: {} ready events", ready_events);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = parse_args();
    let config = load_config(&args);

    log::info!("replay_drive starting");
    log::info!("  Sources: {}", config.sources.len());
    log::info!("  Step: {} ms", args.step_ms);

    if let Err(e) = run(&args, &config) {
        log::error!("replay error: {}", e);
        std::process::exit(1);
    }
}

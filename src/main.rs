//! gridstore - run worksheet command scripts

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use gridstore::config::load_config;
use gridstore::script::Runner;
use gridstore_core::ActionEngine;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: gridstore [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  Command script to run (`-` reads stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run one command (can be repeated)");
    eprintln!("  --config <FILE>           Load engine settings from a TOML file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Set GRIDSTORE_LOG (e.g. GRIDSTORE_LOG=debug) to trace actions on stderr.");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GRIDSTORE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(script_path: Option<PathBuf>, commands: Vec<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref()).context("loading config")?;
    let engine = ActionEngine::with_config(config)?;
    let mut runner = Runner::new(engine, io::stdout().lock());

    for (index, command) in commands.iter().enumerate() {
        runner.run_line(index + 1, command)?;
    }

    let script = match script_path {
        Some(path) if path.as_os_str() == "-" => Some(read_stdin()?),
        Some(path) => Some(
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?,
        ),
        None if commands.is_empty() => Some(read_stdin()?),
        None => None,
    };
    if let Some(script) = script {
        runner.run_script(&script)?;
    }

    let (engine, _) = runner.into_parts();
    tracing::info!(
        undo = engine.undo_len(),
        redo = engine.redo_len(),
        "script finished"
    );
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("reading stdin")?;
    Ok(text)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut script_path: Option<PathBuf> = None;
    let mut commands: Vec<String> = Vec::new();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') && arg != "-" => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if script_path.is_none() {
                    script_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    init_logging();

    if let Err(e) = run(script_path, commands, config_path) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

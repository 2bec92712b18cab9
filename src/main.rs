//! Qeike Level Editor
//!
//! Interactive terminal editor for small voxel levels.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use qeike::{App, CliArgs, Config};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);
    info!("Starting qeike");

    match run(config) {
        Ok(notice) => {
            if let Some(notice) = notice {
                println!("{}", notice);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Where log records are written
#[derive(Debug, PartialEq, Eq)]
enum LogSink<'a> {
    File(&'a Path),
    Stderr,
    /// stderr is the terminal the editor draws on
    Discard,
}

fn log_sink(log_file: Option<&Path>, stderr_is_tty: bool) -> LogSink<'_> {
    match log_file {
        Some(path) => LogSink::File(path),
        None if stderr_is_tty => LogSink::Discard,
        None => LogSink::Stderr,
    }
}

fn init_logging(config: &Config) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    match log_sink(config.log_file.as_deref(), io::stderr().is_terminal()) {
        LogSink::File(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
                builder.target(env_logger::Target::Pipe(Box::new(io::sink())));
            }
        },
        LogSink::Discard => {
            builder.target(env_logger::Target::Pipe(Box::new(io::sink())));
        }
        LogSink::Stderr => {}
    }

    builder.init();
}

fn run(config: Config) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;
    // The terminal is restored when `run` returns
    app.run()?;
    Ok(app.exit_notice().map(str::to_string))
}

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use loglane::cli::{extract_config_file_arg, Cli};
use loglane::config_file::ConfigFile;
use loglane::runner;

const LOG_ENV: &str = "LOGLANE_LOG";

#[derive(Debug, Clone, Copy)]
enum ExitCode {
    Success = 0,
    GeneralError = 1,
}

impl ExitCode {
    fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();

    // Check for --show-config first, before any other processing
    if raw_args.iter().any(|arg| arg == "--show-config") {
        ConfigFile::show_config();
        ExitCode::Success.exit();
    }

    let config_file = if raw_args.iter().any(|arg| arg == "--ignore-config") {
        ConfigFile::default()
    } else {
        let config_file_path = extract_config_file_arg(&raw_args);
        match ConfigFile::load_with_custom_path(config_file_path.as_deref()) {
            Ok(config_file) => config_file,
            Err(e) => {
                eprintln!("loglane: Config file error: {:#}", e);
                ExitCode::GeneralError.exit();
            }
        }
    };

    let args = match config_file.process_args(raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("loglane: Config file error: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    };

    // Usage errors exit with clap's own status
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    match run(&cli, config_file) {
        Ok(()) => ExitCode::Success.exit(),
        Err(e) => {
            eprintln!("loglane: Error: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    }
}

fn run(cli: &Cli, config_file: ConfigFile) -> Result<()> {
    let mut output: Box<dyn Write> = match &cli.output_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let stats = runner::run(cli, config_file.parser, &mut output)?;

    if cli.stats {
        eprintln!("{}", stats.format_stats());
    }
    Ok(())
}

/// `LOGLANE_LOG` wins over `-v`; the default level only shows warnings
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

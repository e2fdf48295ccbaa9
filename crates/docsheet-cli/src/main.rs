//! `docsheet`: converts logistics documents into import spreadsheets.
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "azure")]
mod azure;
mod cli;
mod cmd;
mod error;
mod io;

use docsheet_core::ConversionContext;

use crate::cli::{Cli, Command};
use crate::cmd::Settings;
use crate::error::CliError;

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    if let Err(e) = &dotenv {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.message());
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides `default_level`.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings {
        output_dir: cli.output_dir,
        context: ConversionContext {
            today: cli.date.unwrap_or_else(|| Local::now().date_naive()),
        },
        max_file_size: cli.max_file_size,
    };

    match cli.command {
        Command::Dispatch {
            packing,
            order,
            quantity,
            suffix,
        } => cmd::dispatch::run(
            &packing,
            &order,
            quantity.as_deref(),
            suffix.as_deref(),
            &settings,
        ),
        Command::Invoice {
            file,
            invoice_number,
            suffix,
        } => cmd::invoice::run(
            &file,
            invoice_number.as_deref(),
            suffix.as_deref(),
            &settings,
        ),
        Command::Segment {
            file,
            document_no,
            store,
        } => cmd::segment::run(&file, &document_no, &store, &settings),
        Command::PdfItems { file, debug } => cmd::pdf::run_items(&file, debug, &settings),
        Command::PdfSummary { file } => cmd::pdf::run_summary(&file, &settings),
        Command::Ocr {
            file,
            endpoint,
            key,
        } => cmd::ocr::run(&file, endpoint.as_deref(), key.as_deref(), &settings),
    }
}

//! Clap CLI definition: root struct and subcommands.
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Default `--max-file-size`: 64 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// All top-level subcommands exposed by the `docsheet` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a dispatch advice from a packing list and an order confirmation.
    ///
    /// With `--quantity`, quantities come from the quantity file instead of
    /// the packing list.
    Dispatch {
        /// Packing list (.xls or .xlsx).
        #[arg(value_name = "PACKING")]
        packing: PathBuf,
        /// Order confirmation (.xls or .xlsx).
        #[arg(value_name = "ORDER")]
        order: PathBuf,
        /// Quantity file (.xls or .xlsx) listing EAN codes and quantities.
        #[arg(long, value_name = "FILE")]
        quantity: Option<PathBuf>,
        /// Suffix appended to the dispatch advice number (quantity mode only).
        #[arg(long, requires = "quantity")]
        suffix: Option<String>,
    },

    /// Reformat a supplier invoice workbook for the invoice import.
    Invoice {
        /// Invoice workbook (.xls or .xlsx).
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Invoice number used in the output filename.
        #[arg(long)]
        invoice_number: Option<String>,
        /// Suffix appended to every dispatch advice number.
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Split an invoice CSV export into purchase lines.
    Segment {
        /// Invoice export (.csv).
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Document number written on every line.
        #[arg(long)]
        document_no: String,
        /// Store (location) code written on every line.
        #[arg(long)]
        store: String,
    },

    /// Extract line items from a supplier PDF invoice.
    #[command(name = "pdf-items")]
    PdfItems {
        /// Invoice (.pdf).
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the extraction debug report as JSON instead of writing a
        /// workbook.
        #[arg(long)]
        debug: bool,
    },

    /// Collect labeled invoice fields from a PDF, one row per invoice.
    #[command(name = "pdf-summary")]
    PdfSummary {
        /// Invoice (.pdf).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Send a PDF to the document-analysis service and dump its lines and
    /// tables.
    Ocr {
        /// Document (.pdf).
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Form Recognizer endpoint, e.g. `https://<name>.cognitiveservices.azure.com`.
        #[arg(long, env = "AZURE_FORM_RECOGNIZER_ENDPOINT")]
        endpoint: Option<String>,
        /// Form Recognizer subscription key.
        #[arg(long, env = "AZURE_FORM_RECOGNIZER_KEY", hide_env_values = true)]
        key: Option<String>,
    },
}

/// Root CLI struct for the `docsheet` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "docsheet",
    version,
    about = "Convert logistics documents into import spreadsheets",
    long_about = "Converts packing lists, order confirmations, invoices, CSV exports\n\
                  and PDF invoices into .xlsx workbooks ready for import."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Directory the workbook is written to.
    #[arg(long, short = 'o', global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Conversion date (YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Suppress all stderr output except warnings and errors (incompatible
    /// with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every mapped and skipped row (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `DOCSHEET_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 67108864 (64 MiB).
    #[arg(
        long,
        global = true,
        env = "DOCSHEET_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE
    )]
    pub max_file_size: u64,
}

impl Cli {
    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

use clap::{Parser, Subcommand};
use sheetbind::cli::{self, ImportOptions};
use sheetbind::error::SheetBindResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(about = "Bind typed records to spreadsheet sheets")]
#[command(long_about = "sheetbind - struct ↔ spreadsheet data binding

Inspect .xlsx workbooks and dump their sheets as YAML or JSON tables.

COMMANDS:
  sheets   - List the sheets of a workbook with their dimensions
  import   - Dump one sheet as a table (headers + values)

EXAMPLES:
  sheetbind sheets report.xlsx
  sheetbind import report.xlsx report.yaml --sheet 2
  sheetbind import report.xlsx report.json --no-header --break-on-error

LOGGING:
  Set RUST_LOG (e.g. RUST_LOG=sheetbind=debug) to see skipped cells.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sheets of an Excel workbook
    Sheets {
        /// Path to Excel file (.xlsx)
        input: PathBuf,
    },

    #[command(long_about = "Import one sheet of an Excel workbook as a raw table.

The output format follows the output extension: .json writes JSON, anything
else writes YAML. Cells that cannot be read are left empty and logged,
unless --break-on-error is given.

CONFIG FILE (--config):
  culture: de-DE
  import:
    has_header: true
    break_on_error: false

Command line flags override the config file.")]
    /// Import a sheet to YAML or JSON
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Output file path (.yaml or .json)
        output: PathBuf,

        /// Sheet number, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        sheet: u16,

        /// First row holds data, not headings
        #[arg(long)]
        no_header: bool,

        /// Fail on the first unreadable cell
        #[arg(long)]
        break_on_error: bool,

        /// YAML config file
        #[arg(short, long, env = "SHEETBIND_CONFIG")]
        config: Option<PathBuf>,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> SheetBindResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetbind=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { input } => cli::sheets(input),

        Commands::Import {
            input,
            output,
            sheet,
            no_header,
            break_on_error,
            config,
            verbose,
        } => cli::import(
            input,
            output,
            ImportOptions {
                sheet: usize::from(sheet),
                no_header,
                break_on_error,
                config,
                verbose,
            },
        ),
    }
}

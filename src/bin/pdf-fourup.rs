//! PDF Four-Up CLI tool
//!
//! Generates one four-up handout per table row and merges them.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdf_fourup::batch::{run_files_with_progress, BatchOptions};

/// PDF Four-Up - Personalized four-to-a-sheet handouts from a template
#[derive(Parser)]
#[command(name = "pdf-fourup")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "TABLE FORMAT:
    Semicolon-delimited with a header row and the columns 'name' and 'pages':

        name;pages
        01 - Jane Doe;1,2,3
        02 - John Roe;4,5

EXAMPLES:
    # One row: OUTPUT is the file to write
    pdf-fourup single.csv template.pdf jane.pdf

    # Several rows: OUTPUT is a directory, merged.pdf is written there too
    pdf-fourup class.csv template.pdf handouts/")]
struct Cli {
    /// Data table (one record per row)
    table: PathBuf,

    /// Template PDF the pages are taken from
    template: PathBuf,

    /// Output file (single record) or directory (several records)
    output: PathBuf,

    /// Field delimiter of the table
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {:?} must be a single ASCII character", cli.delimiter))?;

    let options = BatchOptions {
        delimiter,
        ..Default::default()
    };

    let report = run_files_with_progress(&cli.table, &cli.template, &cli.output, &options, |path| {
        println!("Generated: {}", path.display());
    })
    .with_context(|| format!("failed to generate handouts from {}", cli.table.display()))?;

    if let Some(merged) = &report.merged {
        println!("Merged PDF created: {}", merged.display());
    }

    Ok(())
}

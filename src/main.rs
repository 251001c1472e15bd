//! datatable - Load, filter, sort and export typed tables

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use datatable::config::{load_schema, parse_schema, Config, FilterSpec, SortOrder};
use datatable::export::ExportFormat;
use datatable::parser::ParserFactory;
use datatable::pipeline::apply;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Csv,
    Html,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(f: CliExportFormat) -> Self {
        match f {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Html => ExportFormat::Html,
        }
    }
}

/// Load a CSV or JSON file into a typed table, filter and sort it, and export it
#[derive(clap::Parser, Debug)]
#[command(name = "datatable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (.csv, .tsv, .txt or .json)
    input: PathBuf,

    /// Column kinds, e.g. id:int,name:string (inferred when omitted)
    #[arg(long, value_parser = parse_schema)]
    schema: Option<datatable::model::Schema>,

    /// JSON file mapping column names to kinds
    #[arg(long, conflicts_with = "schema")]
    schema_file: Option<PathBuf>,

    /// Keep only rows where column equals value (column=value)
    #[arg(long)]
    filter: Option<FilterSpec>,

    /// Integer column to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    descending: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: CliExportFormat,

    /// Field delimiter of CSV input
    #[arg(long, default_value_t = ';')]
    delimiter: char,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter must be a single ASCII character: {:?}", cli.delimiter))?;

    let schema = match cli.schema_file {
        Some(path) => Some(load_schema(&path)?),
        None => cli.schema,
    };

    let config = Config {
        input: cli.input,
        schema,
        filter: cli.filter,
        sort_by: cli.sort,
        sort_order: if cli.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        },
        format: cli.format.into(),
        delimiter,
    };
    debug!(?config, "running");

    // Parse input
    let factory = ParserFactory::new();
    let table = factory
        .parse(&config.input, &config)
        .with_context(|| format!("Failed to parse input file: {}", config.input.display()))?;

    let output = apply(&table, &config)?;

    // Render output
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    output.write_to(config.format, &mut handle)?;
    handle.flush()?;

    Ok(())
}

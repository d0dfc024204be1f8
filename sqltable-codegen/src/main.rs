//! sqltable Codegen - entity generation from SQL Server table scripts
//!
//! Parses the `CREATE TABLE` statements found in the given files and
//! directories and writes Rust entities, a context module or JSON documents.

use clap::{Args, Parser, Subcommand};
use sqltable::{LoadReport, ParserConfig, TableLoader};
use sqltable_codegen::{CodegenSettings, Generator};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "sqltable-codegen")]
#[command(about = "Generate entities from SQL Server CREATE TABLE scripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Trace extraction and log every parsed table and column
    #[arg(long, global = true)]
    diagnostic: bool,

    /// Schema for tables declared without one
    #[arg(long, global = true)]
    default_schema: Option<String>,

    /// Parser configuration file
    #[arg(long, global = true, default_value = "config/config.toml")]
    config: PathBuf,

    /// Codegen settings file (TOML, `[type_map]` section)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Sources {
    /// Folders or files to process, comma separated or repeated
    #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
    files: Vec<PathBuf>,
}

#[derive(Args)]
struct Output {
    /// Database name, substituted for {Database}
    #[arg(long, default_value = "")]
    database: String,

    /// Output path pattern, e.g. out/{Database}/{Schema}/{Entity}.rs
    #[arg(long)]
    output_file_path: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one Rust entity file per table
    Entity {
        #[command(flatten)]
        sources: Sources,
        #[command(flatten)]
        output: Output,
    },

    /// Generate one module file declaring every entity
    Context {
        #[command(flatten)]
        sources: Sources,
        #[command(flatten)]
        output: Output,
    },

    /// Write one JSON document per table
    Json {
        #[command(flatten)]
        sources: Sources,
        #[command(flatten)]
        output: Output,
    },

    /// Parse and validate only
    Check {
        #[command(flatten)]
        sources: Sources,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose || cli.diagnostic {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every file and table loaded cleanly.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = ParserConfig::load_from(&cli.config)?;
    if cli.diagnostic {
        config = config.with_diagnostic_mode(true);
    }
    if let Some(schema) = cli.default_schema {
        config = config.with_default_schema(schema);
    }

    let settings = CodegenSettings::load(cli.settings.as_deref())?;
    let loader = TableLoader::new(config);

    match cli.command {
        Commands::Check { sources } => {
            let report = loader.load(&sources.files);
            print_check_report(&report);
            Ok(report.is_success())
        }
        Commands::Entity { sources, output } => {
            let mut report = loader.load(&sources.files);
            let generator =
                Generator::new(output.database, output.output_file_path, settings.type_map()?);
            let written = generator.entities(&mut report.tables)?;
            log::info!(
                "Generated {} entit{}",
                written.len(),
                if written.len() == 1 { "y" } else { "ies" }
            );
            Ok(report.is_success())
        }
        Commands::Context { sources, output } => {
            let report = loader.load(&sources.files);
            let generator =
                Generator::new(output.database, output.output_file_path, settings.type_map()?);
            generator.context(&report.tables)?;
            Ok(report.is_success())
        }
        Commands::Json { sources, output } => {
            let mut report = loader.load(&sources.files);
            let generator =
                Generator::new(output.database, output.output_file_path, settings.type_map()?);
            let written = generator.json(&mut report.tables)?;
            log::info!("Wrote {} JSON document(s)", written.len());
            Ok(report.is_success())
        }
    }
}

fn print_check_report(report: &LoadReport) {
    for table in &report.tables {
        println!("{}", table.diagnostic_string());
        for column in &table.columns {
            println!("    {:<60} {}", column.diagnostic_string(), column.sql);
        }
    }
    for warning in report.warnings() {
        println!("{}", warning);
    }
    for failure in &report.failures {
        eprintln!("{}", failure);
    }
    println!(
        "{} table(s), {} warning(s), {} failure(s)",
        report.tables.len(),
        report.warnings().count(),
        report.failures.len()
    );
}

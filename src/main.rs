//! metacheck CLI
//!
//! Usage:
//! - `metacheck schema <file> [--ddl <sql>]`
//! - `metacheck semantics <file> --root <dir>`
//! - `metacheck registry <root> [--manifest <file>] [--parallel] [--json] [--strict-sources]`
//!
//! Exits 1 when any finding is reported and 2 when the run itself fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use metacheck::SelectorPolicy;
use metacheck::project::{self, CheckConfig, FileReport, Report};

#[derive(Parser, Debug)]
#[command(name = "metacheck")]
#[command(about = "Validate schema and semantic-layer metadata against each other and their DDL")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one schema document
    Schema {
        file: PathBuf,
        /// CREATE TABLE file to cross-check against
        #[arg(long)]
        ddl: Option<PathBuf>,
    },
    /// Validate one semantic document
    Semantics {
        file: PathBuf,
        /// Registry root its sources are resolved under
        #[arg(long, env = "METACHECK_ROOT")]
        root: PathBuf,
        /// Report selector ids a source does not declare
        #[arg(long)]
        strict_sources: bool,
    },
    /// Validate every entry of a registry
    Registry {
        root: PathBuf,
        /// Manifest to read instead of registry.yaml / registry.yml
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Validate entries in parallel
        #[arg(long)]
        parallel: bool,
        /// Print one JSON record per finding
        #[arg(long)]
        json: bool,
        /// Report selector ids a source does not declare
        #[arg(long)]
        strict_sources: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "metacheck=debug" } else { "metacheck=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn policy(strict: bool) -> SelectorPolicy {
    if strict {
        SelectorPolicy::Strict
    } else {
        SelectorPolicy::Lenient
    }
}

fn print_file(report: &FileReport) {
    for message in report.messages() {
        println!("{}: {message}", report.path.display());
    }
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        for record in report.records() {
            println!("{}", serde_json::to_string(&record).context("serializing record")?);
        }
        return Ok(());
    }

    for entry in &report.entries {
        for diagnostic in &entry.diagnostics {
            println!("{}: {diagnostic}", entry.name);
        }
        for file in &entry.files {
            print_file(file);
        }
    }
    let failed = report.failed_entries().count();
    println!(
        "{} of {} entries passed",
        report.entries.len() - failed,
        report.entries.len()
    );
    Ok(())
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Schema { file, ddl } => {
            if !file.is_file() {
                bail!("schema document {} does not exist", file.display());
            }
            let report = project::check_schema(&file, ddl.as_deref());
            print_file(&report);
            Ok(report.passed())
        }
        Command::Semantics {
            file,
            root,
            strict_sources,
        } => {
            if !file.is_file() {
                bail!("semantic document {} does not exist", file.display());
            }
            if !root.is_dir() {
                bail!("registry root {} is not a directory", root.display());
            }
            let report = project::check_semantics(&file, &root, policy(strict_sources));
            print_file(&report);
            Ok(report.passed())
        }
        Command::Registry {
            root,
            manifest,
            parallel,
            json,
            strict_sources,
        } => {
            let mut config = CheckConfig::new(root)
                .with_parallel(parallel)
                .with_policy(policy(strict_sources));
            if let Some(manifest) = manifest {
                config = config.with_manifest(manifest);
            }
            let report = project::check_registry(&config)?;
            print_report(&report, json)?;
            Ok(report.passed())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

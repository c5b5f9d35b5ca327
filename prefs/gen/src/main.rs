//! Preference Accessor Generator
//!
//! Generates preference store implementations for traits annotated with
//! `#[preferences]`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use prefs_gen::config::CONFIG_FILE;
use prefs_gen::errors::GeneratorError;
use prefs_gen::{BatchReport, Generator, GeneratorConfig};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// prefs-gen - turns annotated accessor traits into preference store implementations
#[derive(Parser, Debug)]
#[command(name = "prefs-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source root scanned for `*.rs` files [default: src]
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output directory for generated units [default: target/prefs-gen]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file [default: prefs-gen.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional external signature manifest (repeatable)
    #[arg(short, long = "manifest")]
    manifests: Vec<PathBuf>,

    /// Lowest platform level the generated code must run on
    #[arg(long)]
    min_api_level: Option<u32>,

    /// Module path of the serializer access point (e.g. prefs_api::serializer)
    #[arg(long)]
    serializer: Option<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber based on verbosity level.
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_tracing(verbose: u8) {
    if verbose == 0 && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,prefs_gen=info".to_string(),
            2 => "info,prefs_gen=debug".to_string(),
            _ => "debug,prefs_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Merges the configuration file with CLI flags. Flags win.
fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, GeneratorError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None if Path::new(CONFIG_FILE).is_file() => GeneratorConfig::load(Path::new(CONFIG_FILE))?,
        None => GeneratorConfig::default(),
    };

    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if cli.min_api_level.is_some() {
        config.min_api_level = cli.min_api_level;
    }
    if cli.serializer.is_some() {
        config.serializer = cli.serializer.clone();
    }
    config.manifests.extend(cli.manifests.iter().cloned());
    config.validate()?;
    Ok(config)
}

fn print_report(report: &BatchReport, dry_run: bool) {
    for unit in &report.units {
        if dry_run && let Some(source) = &unit.source {
            println!("=== {} ===", unit.relative_path.display());
            println!("{}", source);
        }
        for diagnostic in &unit.diagnostics {
            eprintln!("{}", diagnostic.render());
        }
        if let Some(path) = &unit.written {
            eprintln!("{} {} -> {}", "generated".green().bold(), unit.root, path.display());
        } else if !unit.is_complete() {
            eprintln!("{} {} (incomplete, not written)", "skipped".red().bold(), unit.root);
        }
    }

    let summary = format!(
        "{} unit(s), {} error(s), {} warning(s)",
        report.units.len(),
        report.error_count(),
        report.warning_count()
    );
    if report.has_errors() {
        eprintln!("{}", summary.red());
    } else {
        eprintln!("{}", summary);
    }
}

fn run(cli: &Cli) -> Result<BatchReport, GeneratorError> {
    let config = resolve_config(cli)?;

    if cli.verbose > 0 {
        eprintln!("Source directory: {}", config.source.display());
        eprintln!("Output directory: {}", config.output.display());
        if cli.dry_run {
            eprintln!("Dry run mode - no files will be written");
        }
    }

    let generator = Generator::from_config(config)?;
    Ok(generator.generate_all(cli.dry_run))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            print_report(&report, cli.dry_run);
            if report.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

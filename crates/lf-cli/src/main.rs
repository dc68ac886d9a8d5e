//! Listforge CLI
//!
//! Drives the aggregation batch from a settings file and exposes the
//! hotspot report as a standalone diagnostic.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use lf_aggregator::{HttpFetcher, Pipeline, RunSummary, Settings};
use lf_core::{detect_hotspots, normalize, SourceKind, DEFAULT_HOTSPOT_LIMIT};

#[derive(Parser)]
#[command(name = "listforge")]
#[command(about = "Blocklist aggregator and rule set compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all configured sources and write the generated lists
    Build {
        /// Settings file
        #[arg(short, long, default_value = "settings.yaml")]
        settings: PathBuf,

        /// Rewrite outputs even when their content is unchanged
        #[arg(short, long)]
        force: bool,
    },

    /// Dry run: report which lists would change, write nothing
    Check {
        /// Settings file
        #[arg(short, long, default_value = "settings.yaml")]
        settings: PathBuf,
    },

    /// Report domains with unusually many subdomains in a local hosts file
    Hotspots {
        /// Hosts-format or plain domain file to analyze
        #[arg(short, long)]
        input: PathBuf,

        /// Minimum subdomain count to report
        #[arg(short, long, default_value_t = DEFAULT_HOTSPOT_LIMIT)]
        limit: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { settings, force } => cmd_run(&settings, force, false),
        Commands::Check { settings } => cmd_run(&settings, false, true),
        Commands::Hotspots { input, limit } => cmd_hotspots(&input, limit),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_run(settings_path: &Path, force: bool, dry_run: bool) -> Result<(), String> {
    let Some(settings) = Settings::load(settings_path).map_err(|e| e.to_string())? else {
        println!("No settings at '{}', nothing to do", settings_path.display());
        return Ok(());
    };

    let fetcher = HttpFetcher::new().map_err(|e| format!("Failed to build HTTP client: {e}"))?;
    let pipeline = Pipeline::new(&fetcher, &settings);

    let summary = pipeline.run(force, dry_run).map_err(|e| e.to_string())?;
    print_summary(&summary, dry_run);

    Ok(())
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let verb = if dry_run { "Would update" } else { "Updated" };
    println!(
        "{} {} lists ({} unchanged, {} skipped)",
        verb,
        summary.written.len(),
        summary.unchanged.len(),
        summary.skipped.len()
    );
    for name in &summary.written {
        println!("  {verb}: {name}");
    }
    for name in &summary.unchanged {
        println!("  Unchanged: {name}");
    }
    for name in &summary.skipped {
        println!("  Skipped:   {name}");
    }
}

fn cmd_hotspots(input: &Path, limit: usize) -> Result<(), String> {
    let raw = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;

    let Some(domains) = normalize(&raw, SourceKind::Hosts) else {
        println!("No usable entries in '{}'", input.display());
        return Ok(());
    };

    let hotspots = detect_hotspots(&domains, limit);
    if hotspots.is_empty() {
        println!("No domains with {limit} or more subdomains");
        return Ok(());
    }

    println!("{} hotspot(s) at limit {}:", hotspots.len(), limit);
    for (domain, count) in hotspots {
        println!("  {count:>6}  {domain}");
    }

    Ok(())
}

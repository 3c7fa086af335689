use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use autometa::checksum;
use autometa::cli;
use autometa::config::DatabaseConfig;
use autometa::taxonomy::TaxonomyDumps;

#[derive(Parser)]
#[command(
    name = "check_databases",
    about = "Verify NCBI database checksums and taxdump consistency"
)]
struct Cli {
    /// Path to the JSON database configuration file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Directory holding the downloaded databases and extracted taxdump files
    #[arg(short = 'd', long = "dir")]
    dir: PathBuf,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Check Databases");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = DatabaseConfig::from_file(&cli_args.config)?;
    cli::kv("Config", &cli_args.config.display().to_string());
    cli::kv("Directory", &cli_args.dir.display().to_string());
    eprintln!();

    let mut failures = 0usize;

    // ── Checksums ────────────────────────────────────────
    cli::section("Checksums");

    for (name, entry) in config.file_entries() {
        let path = cli_args.dir.join(entry.filename()?);
        if !path.exists() {
            cli::warning(&format!("{name}: {} not found", path.display()));
            continue;
        }
        match checksum::verify_md5(&path, &entry.md5) {
            Ok(()) => cli::success(&format!("{name} {}", "(verified)".dimmed())),
            Err(e) => {
                cli::failure(&e);
                failures += 1;
            }
        }
    }
    eprintln!();

    // ── Taxonomy ─────────────────────────────────────────
    cli::section("Taxonomy");

    match TaxonomyDumps::from_dir(&cli_args.dir).and_then(|dumps| {
        dumps.check_sync()?;
        Ok(dumps)
    }) {
        Ok(dumps) => {
            cli::kv("Nodes", &dumps.num_nodes().to_string());
            cli::success("nodes.dmp, names.dmp and merged.dmp are in sync");
        }
        Err(e) => {
            cli::failure(&e);
            failures += 1;
        }
    }

    cli::print_summary(start);

    if failures > 0 {
        eprintln!("{} {failures} check(s) failed", "✗".red().bold());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

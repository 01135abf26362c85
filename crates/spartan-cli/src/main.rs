//! spartan CLI - fixed-point rewriting of JSON syntax tree documents
//!
//! Every document found under the given paths becomes one compilation unit;
//! all units go through a single driver run. Check mode (the default) shows
//! what would change, `--fix` writes the transformed trees back.

mod config;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use spartan_core::{EventSink, TracingListener};
use spartan_engine::{CompilationUnit, Driver, NeverCancel};
use spartan_tippers::{Category, TipperRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::Config;
use output::{OutputFormat, Reporter};
use process::{load_unit, write_unit, EditCollector, LoadedUnit};

#[derive(Parser)]
#[command(name = "spartan")]
#[command(version)]
#[command(about = "Rewrite syntax trees to their shortest equivalent form")]
struct Cli {
    /// Tree documents or directories to process
    #[arg(required_unless_present = "list_tippers")]
    paths: Vec<PathBuf>,

    /// Report what would change without writing (default mode)
    #[arg(long, conflicts_with = "fix")]
    check: bool,

    /// Write transformed documents back
    #[arg(long, conflicts_with = "check")]
    fix: bool,

    /// Show verbose output and debug logs
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Only run these categories (can be specified multiple times). Overrides config file.
    #[arg(long, short = 'c', value_name = "CATEGORY")]
    category: Vec<String>,

    /// Categories to switch off (can be specified multiple times)
    #[arg(long, value_name = "CATEGORY")]
    disable: Vec<String>,

    /// Maximum number of passes
    #[arg(long, value_name = "N")]
    passes: Option<usize>,

    /// Process the units of each pass in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Path to config file (default: auto-detect .spartan.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// List available tippers and exit
    #[arg(long)]
    list_tippers: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,spartan_core=debug,spartan_engine=debug,spartan_tippers=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_tippers(registry: &TipperRegistry) {
    let tippers = registry.list();
    println!("{}", "Available tippers:".bold());
    for category in Category::ALL {
        println!();
        println!("{} - {}", category.to_string().cyan(), category.description());
        for info in tippers.iter().filter(|info| info.category == category) {
            println!(
                "  {} - {} {}",
                info.name.green(),
                info.description,
                format!("[{}]", info.kinds.join(", ")).dimmed()
            );
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = TipperRegistry::new();

    if cli.list_tippers {
        list_tippers(&registry);
        return Ok(ExitCode::SUCCESS);
    }

    // Load config file
    let loaded_config = if cli.no_config {
        None
    } else if let Some(config_path) = &cli.config {
        Some((Config::load_path(config_path)?, config_path.clone()))
    } else {
        Config::load()?
    };
    let config_path = loaded_config.as_ref().map(|(_, path)| path.clone());
    let config = loaded_config.map(|(cfg, _)| cfg).unwrap_or_default();

    // Determine output format: CLI, then config, then text
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let name = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(name).ok_or_else(|| {
            anyhow::anyhow!("Invalid output format '{}'. Valid options: text, json, diff", name)
        })?
    };
    let show_progress = cli.verbose && output_format == OutputFormat::Text;

    if show_progress {
        if let Some(path) = &config_path {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    let enablement = config.enablement(&cli.category, &cli.disable)?;
    if enablement.enabled().is_empty() {
        eprintln!("{}: No categories enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }
    let driver_config = config.driver_config(cli.passes, cli.parallel);

    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    if show_progress {
        println!("{}: {}", "Mode".bold(), if fix_mode { "fix" } else { "check" });
        println!(
            "{}: {}",
            "Categories".bold(),
            enablement
                .enabled()
                .iter()
                .map(Category::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("{}: {}", "Pass ceiling".bold(), driver_config.pass_ceiling);
        println!();
    }

    // Collect all document paths first
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in &cli.paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    // Sort for deterministic unit order
    file_paths.sort();
    file_paths.dedup();

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        if output_format == OutputFormat::Text {
            eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
        }
    }

    // Parse documents in parallel; failures are reported and skipped
    let loaded: Vec<(PathBuf, Result<LoadedUnit>)> = file_paths
        .into_par_iter()
        .map(|path| {
            let result = load_unit(&path);
            (path, result)
        })
        .collect();

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut old_sources: Vec<String> = Vec::new();
    let mut units: Vec<CompilationUnit> = Vec::new();
    for (path, result) in loaded {
        match result {
            Ok(LoadedUnit { unit, old_source }) => {
                paths.push(path);
                old_sources.push(old_source);
                units.push(unit);
            }
            Err(e) => reporter.report_error(&path, &format!("{:#}, skipping", e)),
        }
    }

    let collector = Arc::new(EditCollector::new());
    let mut sink = EventSink::with(Arc::new(TracingListener));
    sink.subscribe(collector.clone());

    let driver = Driver::new(&registry, &enablement, driver_config);
    let run_summary = driver.run_to_fixed_point(&mut units, &NeverCancel, &sink)?;

    for (i, ((path, unit), old_source)) in paths.iter().zip(&units).zip(&old_sources).enumerate() {
        let edits = collector.take(unit.name());
        if run_summary.unit_edits[i] == 0 {
            reporter.report_skipped(path);
        } else if fix_mode {
            write_unit(path, unit)?;
            reporter.report_fix(path, edits);
        } else {
            reporter.report_check(path, edits, old_source, &unit.tree().render_root());
        }
    }
    reporter.report_run(run_summary);

    // Determine exit code
    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 {
        ExitCode::from(1)
    } else if check_mode && summary.files_with_changes > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(check_mode)?;

    Ok(exit_code)
}

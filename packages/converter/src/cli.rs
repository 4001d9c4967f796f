//! Command-line interface for the converter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::accumulator::convert_input;
use crate::config::{ConverterConfig, DEFAULT_OUTPUT_DIR};
use crate::error::{ConverterError, Result};
use crate::ordering::NoticeOrderer;
use crate::output::{save_package, save_releases};
use crate::staging::NoticeStager;
use crate::types::{AccumulationMode, ConversionReport};

/// TED OCDS converter - Convert eForms procurement notices into OCDS releases.
#[derive(Parser)]
#[command(name = "ted-ocds")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a notice file or a directory of notices into releases.
    Convert {
        /// Notice XML file, or directory containing notice XML files
        input: PathBuf,

        /// Output directory (default: releases/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCID prefix (e.g., ocds-0c46vo)
        #[arg(long)]
        ocid_prefix: Option<String>,

        /// Accumulate one release per procedure instead of one per notice
        #[arg(long)]
        per_procedure: bool,

        /// Run the producers of each notice in parallel
        #[arg(long)]
        parallel: bool,

        /// Write a single release package instead of one file per release
        #[arg(long)]
        package: bool,
    },

    /// Print notices in processing order with their types.
    Order {
        /// Notice XML file, or directory containing notice XML files
        input: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            ocid_prefix,
            per_procedure,
            parallel,
            package,
        } => {
            let config = build_config(ocid_prefix, per_procedure, parallel)?;
            convert_command(&input, output.as_deref(), config, package)
        }
        Commands::Order { input } => order_command(&input),
    }
}

/// Environment defaults overridden by command-line flags.
fn build_config(
    ocid_prefix: Option<String>,
    per_procedure: bool,
    parallel: bool,
) -> Result<ConverterConfig> {
    let mut config = ConverterConfig::from_env()?;
    if let Some(prefix) = ocid_prefix {
        config = config.with_ocid_prefix(prefix)?;
    }
    if per_procedure {
        config = config.with_mode(AccumulationMode::PerProcedure);
    }
    if parallel {
        config = config.with_parallel_producers(true);
    }
    Ok(config)
}

/// Execute the convert command.
fn convert_command(
    input: &Path,
    output: Option<&Path>,
    config: ConverterConfig,
    package: bool,
) -> Result<()> {
    let output_dir = output.unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));

    // Validate the output location before doing any work
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ConverterError::Config(format!(
            "Output path is not a directory: {}",
            output_dir.display()
        )));
    }

    println!(
        "{} {} with prefix {}",
        style("Converting").bold(),
        style(input.display()).cyan(),
        style(&config.ocid_prefix).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Converting notices...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = match convert_input(input, config.clone()) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Saving releases...");

    let saved = if package {
        save_package(report.releases.clone(), output_dir, &config).map(|path| vec![path])
    } else {
        save_releases(&report.releases, output_dir)
    };
    let saved = match saved {
        Ok(paths) => paths,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    print_report(&report);

    println!();
    for path in &saved {
        println!("{} {}", style("Saved to:").green().bold(), path.display());
    }

    if report.failed() > 0 {
        return Err(ConverterError::ConversionFailed {
            failed: report.failed(),
            total: report.outcomes.len(),
        });
    }

    Ok(())
}

fn print_report(report: &ConversionReport) {
    for outcome in &report.outcomes {
        match outcome.error() {
            None => println!(
                "  {:<8} {} ({} fragments)",
                outcome.notice_type.short_label(),
                outcome.file_name,
                outcome.fragments
            ),
            Some(error) => println!(
                "  {:<8} {} {}",
                outcome.notice_type.short_label(),
                outcome.file_name,
                style(error).red()
            ),
        }
    }

    println!();
    println!("  Notices: {}", report.outcomes.len());
    println!("  Releases: {}", report.releases.len());
    if report.failed() > 0 {
        println!("  Failed: {}", style(report.failed()).red().bold());
    }
    if report.cancelled {
        println!("  {}", style("Cancelled before all notices were processed").yellow());
    }
}

/// Execute the order command.
fn order_command(input: &Path) -> Result<()> {
    let mut stager = NoticeStager::new()?;
    let staged = stager.stage(input)?;
    let ordered = NoticeOrderer::default().classify_and_order(&staged);

    if ordered.is_empty() {
        println!("{}", style("No recognizable notices").yellow());
        return Ok(());
    }

    for (index, file) in ordered.iter().enumerate() {
        println!(
            "{:>3}. {:<8} {}",
            index + 1,
            style(file.notice_type.short_label()).cyan(),
            file.file_name()
        );
    }

    Ok(())
}

//! CLI for the factor-prep library.
//!
//! This binary loads a stock panel, runs the preparation pipeline and prints
//! or writes its products.

use clap::{Parser, Subcommand};
use factor_prep::{
    PanelFrame, Pipeline, PipelineConfig, Result, complete_entities, filter_dates, load_panel,
    observation_counts, schema::FEATURES_SHORT,
};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "factor-prep")]
#[command(about = "Panel preparation for machine-learning factor studies", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, label, split and reshape a panel
    Prepare {
        /// Path to the panel CSV
        #[arg(short, long)]
        data: PathBuf,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory receiving train.csv, test.csv and returns.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show observation counts and the complete entities
    Universe {
        /// Path to the panel CSV
        #[arg(short, long)]
        data: PathBuf,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the short feature set
    Features,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Prepare {
            data,
            config,
            output,
        } => prepare(&data, config.as_deref(), output.as_deref()),
        Commands::Universe { data, config } => universe(&data, config.as_deref()),
        Commands::Features => {
            list_features();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    path.map_or_else(|| Ok(PipelineConfig::default()), PipelineConfig::from_json_file)
}

/// Run the pipeline and report its products.
fn prepare(data: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let cutoff = config.cutoff;
    let prepared = Pipeline::new(config).run(data)?;
    let (missing_short, missing_long) = prepared.labeled.missing_labels()?;
    let (dates, entities) = prepared.returns.shape();

    println!("Labeled panel: {} rows", prepared.labeled.height());
    println!("  missing R1M_Usd_C labels:  {missing_short}");
    println!("  missing R12M_Usd_C labels: {missing_long}");
    println!("Training sample (before {cutoff}): {} rows", prepared.train.height());
    println!("Testing sample (from {cutoff}): {} rows", prepared.test.height());
    println!("Returns matrix: {dates} dates x {entities} complete entities");
    println!("Features: {}", prepared.features.len());

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
        write_csv(&dir.join("train.csv"), &mut prepared.train.frame().clone())?;
        write_csv(&dir.join("test.csv"), &mut prepared.test.frame().clone())?;
        write_csv(&dir.join("returns.csv"), &mut prepared.returns.frame().clone())?;
        info!(dir = %dir.display(), "wrote prepared samples");
    }

    Ok(())
}

/// Print per-entity observation counts for the filtered panel.
fn universe(data: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let panel = filter_dates(&load_panel(data)?, &config.window)?;
    let counts = observation_counts(&panel)?;
    let complete = complete_entities(&panel)?;

    println!("Entities: {}", counts.height());
    println!("{counts}");
    println!("Complete entities ({}):", complete.len());
    for id in complete.iter() {
        println!("  {id}");
    }

    Ok(())
}

fn list_features() {
    println!("Short feature set ({} features):", FEATURES_SHORT.len());
    for name in FEATURES_SHORT {
        println!("  {name}");
    }
}

fn write_csv(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    Ok(())
}

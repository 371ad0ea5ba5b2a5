use anyhow::{Context as _, Result};
use brewlake::aggregate::aggregate_to_gold;
use brewlake::config::LakeConfig;
use brewlake::extract::extract_to_bronze;
use brewlake::partition::partition_to_silver;
use brewlake::pipeline;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brewlake", about = "Brewery data-lake batch pipeline")]
pub struct Cli {
    /// Path to a JSON lake configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root directory for the bronze/silver/gold layers (default: data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline once (the default when no command is given)
    Run,
    /// Capture the brewery listing into the bronze layer
    Extract,
    /// Partition a raw capture into the silver layer
    Partition {
        /// Raw capture to partition. Defaults to the newest bronze capture.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Aggregate the latest silver partitions into the gold layer
    Aggregate,
}

/// Dispatch a parsed command line, returning the process exit code.
pub fn run_command(cli: Cli) -> Result<u8> {
    let config = resolve_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let report = pipeline::run(&config);
            println!("{}", report.summary());
            Ok(report.exit_code())
        }
        Commands::Extract => {
            config.ensure_layout()?;
            let capture = extract_to_bronze(&config)?;
            println!("Raw capture written to {}", capture.display());
            Ok(0)
        }
        Commands::Partition { file } => {
            config.ensure_layout()?;
            let capture = match file {
                Some(path) => path,
                None => newest_bronze_capture(&config)?,
            };
            let silver = partition_to_silver(&config, &capture)?;
            println!("Partitions written under {}", silver.display());
            Ok(0)
        }
        Commands::Aggregate => {
            config.ensure_layout()?;
            match aggregate_to_gold(&config)? {
                Some(path) => println!("Aggregate written to {}", path.display()),
                None => println!("No silver partitions available; nothing aggregated."),
            }
            Ok(0)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<LakeConfig> {
    if let Some(path) = &cli.config {
        if cli.data_dir.is_some() {
            anyhow::bail!("--config and --data-dir are mutually exclusive");
        }
        return LakeConfig::load(path);
    }
    Ok(match &cli.data_dir {
        Some(dir) => LakeConfig::with_root(dir),
        None => LakeConfig::default(),
    })
}

fn newest_bronze_capture(config: &LakeConfig) -> Result<PathBuf> {
    let mut captures: Vec<PathBuf> = std::fs::read_dir(&config.bronze_root)
        .with_context(|| format!("Failed to read {}", config.bronze_root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    captures.sort();
    captures.pop().ok_or_else(|| {
        anyhow::anyhow!(
            "No raw captures in {} and no --file provided",
            config.bronze_root.display()
        )
    })
}

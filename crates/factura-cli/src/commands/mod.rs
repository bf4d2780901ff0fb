//! CLI subcommands.

pub mod config;
pub mod list;
pub mod parse;
pub mod process;
pub mod text;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use factura_core::models::config::FacturaConfig;
use factura_core::models::invoice::InvoiceRecord;
use factura_core::store::{JsonStore, RecordStore};

use process::{format_record, OutputFormat};

/// Where extracted records go and how they are printed.
#[derive(Args)]
pub struct OutputArgs {
    /// Record store file (default: store.path from the config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the record without saving it
    #[arg(long)]
    dry_run: bool,
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("factura")
        .join("config.json")
}

/// Load the explicit config file, else the default one if it exists, else defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<FacturaConfig> {
    if let Some(path) = explicit {
        return Ok(FacturaConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(FacturaConfig::from_file(&path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

/// Store selected by `--store`, falling back to the configured one.
pub fn open_store(store: Option<&Path>, config: &FacturaConfig) -> JsonStore {
    JsonStore::new(store.unwrap_or(config.store.path.as_path()))
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// Print a freshly extracted record and append it to the store.
pub fn emit_record(
    record: &InvoiceRecord,
    output: &OutputArgs,
    config: &FacturaConfig,
) -> anyhow::Result<()> {
    if record.is_empty() {
        eprintln!("{} No invoice fields found", style("⚠").yellow());
    }

    println!("{}", format_record(record, output.format)?);

    if output.dry_run {
        eprintln!("{} Dry run, record not saved", style("ℹ").blue());
        return Ok(());
    }

    let store = open_store(output.store.as_deref(), config);
    let count = store.append(record)?;
    eprintln!(
        "{} Saved to {} ({} records)",
        style("✓").green(),
        store.path().display(),
        count
    );

    Ok(())
}

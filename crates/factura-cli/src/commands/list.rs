//! List command - show saved records.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use factura_core::store::RecordStore;

use super::process::{format_records, OutputFormat};
use super::{load_config, open_store};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Record store file (default: store.path from the config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: ListArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(args.store.as_deref(), &config);

    let records = store.records()?;
    if records.is_empty() {
        eprintln!(
            "{} No records in {}",
            style("ℹ").blue(),
            store.path().display()
        );
        return Ok(());
    }

    println!("{}", format_records(&records, args.format)?);
    Ok(())
}

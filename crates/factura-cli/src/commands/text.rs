//! Text command - print what the OCR backend reads from an image.

use std::path::{Path, PathBuf};

use clap::Args;

use factura_core::ocr::create_engine;
use factura_core::pipeline::InvoicePipeline;

use super::{load_config, spinner};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Image to read
    #[arg(required = true)]
    input: PathBuf,

    /// Language hint for the backend (default: ocr.language from the config)
    #[arg(short, long)]
    language: Option<String>,
}

pub fn run(args: TextArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(language) = args.language {
        config.ocr.language = language;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = spinner("Running OCR...");
    let text = create_engine(&config.ocr)
        .map_err(anyhow::Error::from)
        .and_then(|engine| Ok(InvoicePipeline::new(engine, &config).recognize(&args.input)?));
    pb.finish_and_clear();

    println!("{}", text?.trim_end());
    Ok(())
}

//! Parse command - extract invoice fields from OCR text.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use factura_core::invoice::RuleExtractor;

use super::{emit_record, load_config, OutputArgs};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file to parse; `-` or nothing reads standard input
    input: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,

    /// Report which pattern matched each field
    #[arg(long)]
    explain: bool,
}

pub fn run(args: ParseArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let extractor = RuleExtractor::with_config(&config.extraction);
    let result = extractor.extract_with_hits(&text);

    if args.explain {
        for hit in &result.hits {
            eprintln!(
                "{} {} <- pattern {}: {:?}",
                style("ℹ").blue(),
                hit.field.key(),
                hit.pattern,
                hit.source
            );
        }
        let matched: Vec<_> = result.hits.iter().map(|h| h.field).collect();
        for rule in extractor.rules() {
            if !matched.contains(&rule.field()) {
                eprintln!("{} {} not found", style("-").dim(), rule.field().key());
            }
        }
    }

    emit_record(&result.record, &args.output, &config)
}

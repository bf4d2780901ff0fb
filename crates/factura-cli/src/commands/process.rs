//! Process command - OCR an invoice image and save the extracted record.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use factura_core::models::config::OcrBackend;
use factura_core::models::invoice::InvoiceRecord;
use factura_core::ocr::create_engine;
use factura_core::pipeline::InvoicePipeline;
use factura_core::store::to_pretty_json;

use super::{emit_record, load_config, spinner, OutputArgs};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Invoice image (PNG, JPEG, TIFF, BMP...)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    /// Print the recognized text before the record
    #[arg(long)]
    show_text: bool,

    /// OCR backend (default: ocr.backend from the config)
    #[arg(short, long, value_enum)]
    backend: Option<BackendArg>,

    /// Tesseract executable (default: ocr.tesseract_path from the config)
    #[arg(long)]
    tesseract_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendArg {
    /// External Tesseract executable
    Tesseract,
    /// Built-in ONNX models
    Onnx,
}

impl From<BackendArg> for OcrBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Tesseract => OcrBackend::Tesseract,
            BackendArg::Onnx => OcrBackend::Onnx,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(backend) = args.backend {
        config.ocr.backend = backend.into();
    }
    if let Some(path) = args.tesseract_path {
        config.ocr.tesseract_path = path;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = spinner("Loading OCR backend...");
    let result = create_engine(&config.ocr)
        .map_err(anyhow::Error::from)
        .and_then(|engine| {
            pb.set_message("Running OCR...");
            let pipeline = InvoicePipeline::new(engine, &config);
            Ok(pipeline.process_image(&args.input)?)
        });
    pb.finish_and_clear();
    let processed = result?;

    debug!("Processed in {}ms", processed.processing_time_ms);

    if args.show_text {
        println!("{}", style("Extracted text:").bold());
        println!("{}", processed.raw_text.trim_end());
        println!();
    }

    emit_record(&processed.record, &args.output, &config)
}

/// Render one record.
pub fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_pretty_json(record)?),
        _ => format_records(std::slice::from_ref(record), format),
    }
}

/// Render a list of records.
pub fn format_records(records: &[InvoiceRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_pretty_json(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[InvoiceRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(InvoiceRecord::KEYS)?;
    for record in records {
        let values = record.display_values();
        wtr.write_record(values.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn format_text(records: &[InvoiceRecord]) -> String {
    let width = InvoiceRecord::KEYS.iter().map(|k| k.len()).max().unwrap_or(0);

    records
        .iter()
        .map(|record| {
            InvoiceRecord::KEYS
                .iter()
                .zip(record.display_values())
                .map(|(key, value)| {
                    format!("{:width$}  {}", key, value.as_deref().unwrap_or("-"), width = width)
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use factura_core::models::invoice::InvoiceDate;

    fn sample() -> InvoiceRecord {
        InvoiceRecord {
            date: Some(InvoiceDate::new(5, 3, 2024)),
            invoice_number: Some("F-1".to_string()),
            emails: Some(vec!["a@b.es".to_string(), "c@d.es".to_string()]),
            ..InvoiceRecord::default()
        }
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_records(&[sample()], OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Fecha,NumeroFactura,BaseImponible"));
        assert!(lines[1].starts_with("05/03/2024,F-1,,"));
        assert!(lines[1].contains("a@b.es; c@d.es"));
    }

    #[test]
    fn test_text_marks_absent_fields() {
        let text = format_record(&sample(), OutputFormat::Text).unwrap();

        assert!(text.contains("NumeroFactura   F-1"));
        assert!(text.contains("Total           -"));
    }

    #[test]
    fn test_json_single_record_is_an_object() {
        let json = format_record(&sample(), OutputFormat::Json).unwrap();
        assert!(json.starts_with("{\n    \"Fecha\": \"05/03/2024\""));
    }
}

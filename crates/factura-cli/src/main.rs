//! CLI application for Spanish invoice OCR processing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use commands::{config, list, parse, process, text};

/// Spanish invoice OCR - Extract invoice fields from scanned invoices
#[derive(Parser)]
#[command(name = "factura")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR an invoice image, extract its fields and save the record
    Process(process::ProcessArgs),

    /// OCR an image and print the recognized text
    Text(text::TextArgs),

    /// Extract fields from text that has already been through OCR
    Parse(parse::ParseArgs),

    /// Show saved records
    List(list::ListArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path),
        Commands::Text(args) => text::run(args, config_path),
        Commands::Parse(args) => parse::run(args, config_path),
        Commands::List(args) => list::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}

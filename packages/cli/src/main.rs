#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `arretes`: batch extraction of building-safety orders.
//!
//! Reads page text (a page CSV or a directory of text files), runs every
//! document through the structural parser and the extractors, and writes
//! page, document and review tables.
//!
//! Uses `indicatif-log-bridge` (via [`arretes_cli_utils::init_logger`]) so
//! that per-document warnings and the progress bar share the terminal.

use std::{path::PathBuf, time::Instant};

use arretes_cli_utils::{IndicatifProgress, MultiProgress};
use arretes_pipeline::{Config, Document, Outputs, input, run_batch};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arretes", about = "Building-safety order extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a page CSV (`pdf,page_num,pagetxt,exclude`)
    Parse {
        /// Page CSV written by the text-extraction stage
        #[arg(long)]
        pages: PathBuf,
        #[command(flatten)]
        outputs: OutputArgs,
    },
    /// Process a directory of `.txt` files, one document per file with
    /// pages separated by form feeds
    ParseText {
        /// Directory holding the text files
        #[arg(long)]
        dir: PathBuf,
        #[command(flatten)]
        outputs: OutputArgs,
    },
    /// Print the effective configuration
    CheckConfig {
        /// Configuration file (defaults to the embedded one)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Per-page CSV (overwritten)
    #[arg(long)]
    out_pages: PathBuf,
    /// Per-document CSV, one row per address (overwritten)
    #[arg(long)]
    out_docs: PathBuf,
    /// Review report CSV with the data-quality flags of each document
    #[arg(long)]
    report: Option<PathBuf>,
    /// JSON dump of the parsed spans, for debugging the parser
    #[arg(long)]
    spans_json: Option<PathBuf>,
    /// Configuration file (defaults to the embedded one)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl OutputArgs {
    fn outputs(&self) -> Outputs {
        Outputs {
            pages: self.out_pages.clone(),
            documents: self.out_docs.clone(),
            report: self.report.clone(),
            spans_json: self.spans_json.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = arretes_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { pages, outputs } => {
            let config = Config::load(outputs.config.as_deref())?;
            let documents = input::group_documents(input::read_pages_file(&pages)?);
            process(&multi, &config, documents, &outputs)?;
        }
        Commands::ParseText { dir, outputs } => {
            let config = Config::load(outputs.config.as_deref())?;
            let documents = input::read_text_dir(&dir)?;
            process(&multi, &config, documents, &outputs)?;
        }
        Commands::CheckConfig { config } => {
            let config = Config::load(config.as_deref())?;
            config.load_gazetteers()?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn process(
    multi: &MultiProgress,
    config: &Config,
    documents: Vec<Document>,
    outputs: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let gazetteers = config.load_gazetteers()?;
    log::info!("Processing {} documents...", documents.len());

    let progress = IndicatifProgress::documents_bar(multi, "Parsing documents");
    let batch = run_batch(documents, config, &gazetteers, &progress);
    batch.write(&outputs.outputs())?;

    log::info!(
        "Done in {:.1}s: {} ({} pages)",
        start.elapsed().as_secs_f64(),
        batch.summary(),
        batch.pages.len()
    );
    Ok(())
}

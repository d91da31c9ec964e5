//! Overlay removal CLI
//!
//! Command-line frontend for the batch pipeline: collects input images,
//! runs one batch against the remote service, and writes cleaned outputs.

use crate::{
    completed_outputs, ingest_file, BatchItem, BatchProcessor, GeminiEditService, ItemStatus,
    ModelTier, ProcessingConfig, DEFAULT_INSTRUCTION,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Batch watermark and overlay removal tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "cleanmark")]
pub struct Cli {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<PathBuf>,

    /// Output directory for cleaned images
    #[arg(short, long, default_value = "cleaned")]
    pub output: PathBuf,

    /// Edit instruction sent with every image
    #[arg(short, long, default_value = DEFAULT_INSTRUCTION)]
    pub instruction: String,

    /// Model tier (pro requires a paid API key)
    #[arg(short, long, value_enum, default_value_t = CliModelTier::Standard)]
    pub model: CliModelTier,

    /// Ask the model for maximal fidelity at its native resolution
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub preserve_quality: bool,

    /// API key for the remote service (falls back to GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the service endpoint (testing/proxies)
    #[arg(long, hide = true)]
    pub endpoint: Option<String>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Enable verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Model tier selection on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliModelTier {
    Standard,
    Pro,
}

impl From<CliModelTier> for ModelTier {
    fn from(tier: CliModelTier) -> Self {
        match tier {
            CliModelTier::Standard => Self::Standard,
            CliModelTier::Pro => Self::Pro,
        }
    }
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Authorization is a precondition, not something the pipeline manages
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .context("No API key configured: pass --api-key or set GEMINI_API_KEY")?;

    let files = collect_input_files(&cli)?;
    if files.is_empty() {
        anyhow::bail!("No image files found in the given inputs");
    }
    info!(count = files.len(), "collected input files");

    let mut items = Vec::with_capacity(files.len());
    for path in &files {
        match ingest_file(path).await {
            Ok(item) => items.push(item),
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable image"),
        }
    }
    if items.is_empty() {
        anyhow::bail!("None of the inputs could be decoded as images");
    }

    let config = ProcessingConfig::builder()
        .instruction(&cli.instruction)
        .model(cli.model.into())
        .preserve_quality(cli.preserve_quality)
        .build()
        .context("Invalid processing configuration")?;

    let service = match &cli.endpoint {
        Some(endpoint) => GeminiEditService::with_endpoint(&api_key, endpoint),
        None => GeminiEditService::new(&api_key),
    }
    .context("Failed to create remote edit service")?;

    let bar = ProgressBar::new(items.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );
    let observer_bar = bar.clone();

    let processor = BatchProcessor::new(Box::new(service), config).with_progress_observer(
        Box::new(move |update| {
            observer_bar.set_position((update.index + 1) as u64);
            observer_bar.set_message(format!(
                "{} [{}]",
                update.file_name,
                status_label(update.status)
            ));
        }),
    );

    let run = processor.run_batch(&mut items).await;
    bar.finish_and_clear();

    match run {
        Ok(summary) => {
            write_outputs(&items, &cli.output)?;
            println!(
                "Completed {} of {} item(s), {} failed",
                summary.completed, summary.processed, summary.failed
            );
            for item in items.iter().filter(|i| i.status() == ItemStatus::Error) {
                eprintln!(
                    "  {}: {}",
                    item.file_name(),
                    item.error().unwrap_or("unknown error")
                );
            }
            Ok(())
        },
        Err(err) if err.is_batch_fatal() => {
            // One batch-level remediation message; items that finished before
            // the abort are still written out, the rest resume on a re-run.
            write_outputs(&items, &cli.output)?;
            Err(anyhow::anyhow!(err))
                .context("Batch aborted; fix the API key and rerun to resume the remaining items")
        },
        Err(err) => Err(anyhow::anyhow!(err)).context("Batch run failed"),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("cleanmark={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Pending => "pending",
        ItemStatus::Processing => "processing",
        ItemStatus::Completed => "completed",
        ItemStatus::Error => "error",
    }
}

fn collect_input_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in &cli.input {
        if input.is_dir() {
            let max_depth = if cli.recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(input).max_depth(max_depth).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && has_image_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input '{}' does not exist", input.display());
        }
    }
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "webp" | "bmp" | "tif" | "tiff"
            )
        })
}

fn write_outputs(items: &[BatchItem], output_dir: &Path) -> Result<()> {
    let outputs = completed_outputs(items);
    if outputs.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    for (name, payload) in outputs {
        let path = output_dir.join(name);
        std::fs::write(&path, &payload.bytes)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        info!(path = %path.display(), "wrote cleaned image");
    }
    Ok(())
}

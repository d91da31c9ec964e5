#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # cleanmark
//!
//! Batch removal of watermarks, logos, and text overlays from images using a
//! remote generative edit service, while preserving each original's exact
//! pixel resolution.
//!
//! Per item the pipeline is: capability-aware request construction
//! ([`EditRequest::build`]) → remote submission ([`EditService`]) →
//! resolution normalization ([`normalize_resolution`]).
//! [`BatchProcessor::run_batch`] drives a whole batch strictly sequentially
//! with an asymmetric error policy: authorization failures abort the run
//! once, any other failure is recorded on the failing item and the batch
//! continues. Re-running a batch re-attempts only `Pending` and `Error`
//! items, so a partially-aborted run resumes where it stopped.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cleanmark::{ingest_file, BatchProcessor, GeminiEditService, ProcessingConfig};
//!
//! # async fn example() -> cleanmark::Result<()> {
//! let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
//! let service = GeminiEditService::new(api_key)?;
//! let config = ProcessingConfig::builder()
//!     .instruction("Remove the watermark in the lower right corner")
//!     .build()?;
//!
//! let mut items = vec![ingest_file("photo.jpg").await?];
//! let processor = BatchProcessor::new(Box::new(service), config);
//! let summary = processor.run_batch(&mut items).await?;
//! println!("completed {} of {}", summary.completed, summary.processed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI usage
//!
//! The core pipeline is always available; enable the `cli` feature (default)
//! for the `cleanmark` command-line frontend.

pub mod aspect;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod processor;
pub mod remote;
pub mod request;
pub mod types;

pub use aspect::AspectRatio;
pub use config::{
    ModelCapabilities, ModelTier, ProcessingConfig, ProcessingConfigBuilder, ResolutionTier,
    DEFAULT_INSTRUCTION,
};
pub use error::{CleanmarkError, Result};
pub use ingest::{ingest_bytes, ingest_file};
pub use normalize::normalize_resolution;
pub use processor::{completed_outputs, BatchProcessor, ProgressObserver, ProgressUpdate};
pub use remote::{classify_remote_failure, EditService, GeminiEditService, DEFAULT_ENDPOINT};
pub use request::EditRequest;
pub use types::{BatchItem, BatchSummary, ImagePayload, ItemStatus};

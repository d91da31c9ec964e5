//! Batch orchestration for overlay removal
//!
//! Drives a collection of items through request construction, the remote edit
//! service, and resolution normalization. Items run strictly sequentially to
//! bound load on the remote service and keep per-item progress observable;
//! the error policy is asymmetric by design: an authorization failure aborts
//! the whole run (the same credential serves every item), while any other
//! failure is recorded on its item and the batch continues.

use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::normalize::normalize_resolution;
use crate::remote::EditService;
use crate::request::EditRequest;
use crate::types::{BatchItem, BatchSummary, ImagePayload, ItemStatus};
use tracing::{debug, info, warn};

/// Progress notification emitted after each item leaves `Processing`
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Zero-based position within the items selected for this run
    pub index: usize,
    /// Number of items selected for this run
    pub total: usize,
    /// Status the item ended up in
    pub status: ItemStatus,
    /// Original file name of the item
    pub file_name: String,
}

/// Observer callback for per-item progress
pub type ProgressObserver = Box<dyn Fn(&ProgressUpdate) + Send + Sync>;

/// Sequential batch processor; the sole writer of item state during a run
pub struct BatchProcessor {
    service: Box<dyn EditService>,
    config: ProcessingConfig,
    observer: Option<ProgressObserver>,
}

impl BatchProcessor {
    /// Create a processor over an edit service and a per-run configuration
    #[must_use]
    pub fn new(service: Box<dyn EditService>, config: ProcessingConfig) -> Self {
        Self {
            service,
            config,
            observer: None,
        }
    }

    /// Attach an observer called after every item finishes its transition
    #[must_use]
    pub fn with_progress_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The configuration this processor runs with
    #[must_use]
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Run one batch over `items`.
    ///
    /// Only `Pending` and `Error` items are attempted, so re-invoking after a
    /// partial run resumes where it left off and never re-processes
    /// `Completed` items. Items complete in selection order; exactly one is
    /// in flight at a time.
    ///
    /// # Errors
    /// - [`crate::CleanmarkError::Authorization`]: surfaced once as the
    ///   batch-level interrupt. The in-flight item is returned to `Pending`
    ///   (it was never processed) and all remaining items are left untouched
    ///   for a future resumed run.
    pub async fn run_batch(&self, items: &mut [BatchItem]) -> Result<BatchSummary> {
        let selected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_actionable())
            .map(|(index, _)| index)
            .collect();
        let total = selected.len();
        info!(
            selected = total,
            batch_size = items.len(),
            model = self.config.model.model_id(),
            "starting batch run"
        );

        let mut summary = BatchSummary::default();
        for (position, &index) in selected.iter().enumerate() {
            items[index].mark_processing();
            debug!(
                id = %items[index].id(),
                file = items[index].file_name(),
                "processing item"
            );

            match self.process_item(&items[index]).await {
                Ok(edited) => {
                    items[index].mark_completed(edited);
                    summary.completed += 1;
                },
                Err(err) if err.is_batch_fatal() => {
                    // The item was never actually processed; keep it eligible
                    // for a resumed run instead of stranding it in Processing.
                    items[index].reset();
                    warn!(
                        remaining = total - position,
                        "authorization failure, aborting remaining batch"
                    );
                    return Err(err);
                },
                Err(err) => {
                    warn!(id = %items[index].id(), %err, "item failed");
                    items[index].mark_error(err.to_string());
                    summary.failed += 1;
                },
            }
            summary.processed += 1;
            self.notify(position, total, &items[index]);
        }

        info!(
            processed = summary.processed,
            completed = summary.completed,
            failed = summary.failed,
            "batch run finished"
        );
        Ok(summary)
    }

    async fn process_item(&self, item: &BatchItem) -> Result<ImagePayload> {
        let request = EditRequest::build(item.source(), item.width(), item.height(), &self.config);
        let produced = self.service.submit(&request).await?;
        Ok(normalize_resolution(produced, item.width(), item.height()).await)
    }

    fn notify(&self, index: usize, total: usize, item: &BatchItem) {
        if let Some(observer) = &self.observer {
            observer(&ProgressUpdate {
                index,
                total,
                status: item.status(),
                file_name: item.file_name().to_owned(),
            });
        }
    }
}

/// Completed `{file name, payload}` pairs for the export collaborator.
///
/// File names keep the original stem with a `cleaned_` prefix and take their
/// extension from the output payload (normalization re-encodes as PNG, the
/// degraded fallback keeps whatever the service returned).
#[must_use]
pub fn completed_outputs(items: &[BatchItem]) -> Vec<(String, &ImagePayload)> {
    items
        .iter()
        .filter_map(|item| {
            item.edited().map(|payload| {
                let stem = std::path::Path::new(item.file_name())
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("image");
                (
                    format!("cleaned_{stem}.{}", payload.extension()),
                    payload,
                )
            })
        })
        .collect()
}

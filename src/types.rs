//! Core types for the batch overlay-removal pipeline

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An encoded image paired with its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
}

impl ImagePayload {
    /// Create a new image payload
    #[must_use]
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// File extension matching the declared media type
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "img",
        }
    }
}

/// Processing status of a single batch item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Waiting to be processed
    Pending,
    /// Currently in flight (at most one item per batch run)
    Processing,
    /// Finished successfully; the edited payload is available
    Completed,
    /// Failed with an item-local error
    Error,
}

/// Unit of work and result for one image in a batch run.
///
/// The source payload and its dimensions are captured at ingestion and never
/// change afterwards; the dimensions are the contract the resolution
/// normalizer has to satisfy. Status, edited output, and error text only
/// move through the transition methods, which keeps the invariant that
/// `edited` exists iff `Completed` and `error` exists iff `Error`.
#[derive(Debug, Clone)]
pub struct BatchItem {
    id: Uuid,
    file_name: String,
    source: ImagePayload,
    width: u32,
    height: u32,
    status: ItemStatus,
    edited: Option<ImagePayload>,
    error: Option<String>,
}

impl BatchItem {
    /// Create a new pending item from an ingested image
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        source: ImagePayload,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            source,
            width,
            height,
            status: ItemStatus::Pending,
            edited: None,
            error: None,
        }
    }

    /// Unique identifier assigned at ingestion
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Original file name, used for export naming
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Immutable original payload
    #[must_use]
    pub fn source(&self) -> &ImagePayload {
        &self.source
    }

    /// Original pixel width, ground truth for normalization
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Original pixel height, ground truth for normalization
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current processing status
    #[must_use]
    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Edited output payload; present iff the item is `Completed`
    #[must_use]
    pub fn edited(&self) -> Option<&ImagePayload> {
        self.edited.as_ref()
    }

    /// Failure description; present iff the item is `Error`
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this item is eligible for (re)processing
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        matches!(self.status, ItemStatus::Pending | ItemStatus::Error)
    }

    /// Return the item to `Pending`, discarding any result or error text.
    ///
    /// This is the caller-driven reset out of a terminal state; the batch
    /// processor also uses it when an authorization abort surfaces before the
    /// item was actually processed.
    pub fn reset(&mut self) {
        self.status = ItemStatus::Pending;
        self.edited = None;
        self.error = None;
    }

    pub(crate) fn mark_processing(&mut self) {
        self.status = ItemStatus::Processing;
        self.error = None;
        self.edited = None;
    }

    pub(crate) fn mark_completed(&mut self, edited: ImagePayload) {
        self.status = ItemStatus::Completed;
        self.edited = Some(edited);
        self.error = None;
    }

    pub(crate) fn mark_error(&mut self, message: impl Into<String>) {
        self.status = ItemStatus::Error;
        self.error = Some(message.into());
        self.edited = None;
    }
}

/// Counts reported by one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Items attempted during this run (selected as `Pending` or `Error`)
    pub processed: usize,
    /// Items that finished `Completed`
    pub completed: usize,
    /// Items that finished `Error`
    pub failed: usize,
}

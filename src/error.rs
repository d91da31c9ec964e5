//! Error types for overlay removal operations

use thiserror::Error;

/// Result type alias for overlay removal operations
pub type Result<T> = std::result::Result<T, CleanmarkError>;

/// Error taxonomy for the batch pipeline.
///
/// The first four variants mirror how the remote service can fail an item;
/// only [`CleanmarkError::Authorization`] aborts a whole batch run, everything
/// else stays local to the item that raised it.
#[derive(Error, Debug)]
pub enum CleanmarkError {
    /// Permission or API-key failure from the remote service (batch-fatal).
    ///
    /// Carries whether the premium tier was active, since the remediation
    /// differs: a Pro-tier 403 is usually a free-tier key, so suggesting the
    /// Standard engine is only useful there.
    #[error("403: {}", if *pro_tier {
        "Pro model requires a paid API key. Try switching to the Standard engine."
    } else {
        "Permission denied. Check your API key or usage limits."
    })]
    Authorization {
        /// Whether the premium tier was in use when the failure occurred
        pro_tier: bool,
    },

    /// The model rejected resolution/size directives it does not support
    #[error("Configuration error: {0}")]
    CapabilityMismatch(String),

    /// The remote service responded without any image part
    #[error("The service returned no image output")]
    NoOutput,

    /// Any other upstream failure, with the original message preserved
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// HTTP transport errors (client construction, response body decoding)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CleanmarkError {
    /// Create a new remote service error
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        Self::RemoteService(msg.into())
    }

    /// Create a new capability mismatch error
    pub fn capability_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::CapabilityMismatch(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error must abort the whole batch run.
    ///
    /// Authorization failures are batch-wide (the same credential serves
    /// every item); retrying the remaining items would waste calls and
    /// produce one confusing prompt per item instead of one per run.
    #[must_use]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}

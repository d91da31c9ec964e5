//! Configuration types for batch overlay removal

use crate::error::{CleanmarkError, Result};
use serde::{Deserialize, Serialize};

/// Default edit instruction sent with every image unless overridden
pub const DEFAULT_INSTRUCTION: &str = "Remove only watermarks, logos, or text overlays.";

/// Remote model tier selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelTier {
    /// Standard engine: 1K native output, no auxiliary tools
    Standard,
    /// Premium engine: 2K output directives and auxiliary tools enabled
    Pro,
}

impl Default for ModelTier {
    fn default() -> Self {
        Self::Standard
    }
}

impl ModelTier {
    /// Remote model identifier string sent to the service
    #[must_use]
    pub fn model_id(self) -> &'static str {
        match self {
            Self::Standard => "gemini-2.5-flash-image",
            Self::Pro => "gemini-3-pro-image-preview",
        }
    }

    /// Declared capability set for this tier.
    ///
    /// Request construction branches on this data instead of re-checking the
    /// tier in multiple places.
    #[must_use]
    pub fn capabilities(self) -> ModelCapabilities {
        match self {
            Self::Standard => ModelCapabilities {
                max_output_resolution: ResolutionTier::OneK,
                supports_extended_tools: false,
            },
            Self::Pro => ModelCapabilities {
                max_output_resolution: ResolutionTier::TwoK,
                supports_extended_tools: true,
            },
        }
    }

    /// Whether this is the premium tier
    #[must_use]
    pub fn is_pro(self) -> bool {
        matches!(self, Self::Pro)
    }
}

/// Maximum output resolution tier declared by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionTier {
    /// ~1024px output
    OneK,
    /// ~2048px output
    TwoK,
}

impl ResolutionTier {
    /// Wire directive understood by the service
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
        }
    }
}

/// Derived capability set for a model tier; governs request construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    /// Native output resolution tier
    pub max_output_resolution: ResolutionTier,
    /// Whether explicit size directives and auxiliary tool blocks are accepted
    pub supports_extended_tools: bool,
}

/// Per-batch-run processing configuration.
///
/// Immutable for the duration of one run; the batch processor reads it once
/// per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Free-text description of what to remove
    pub instruction: String,
    /// Which remote model tier to use
    pub model: ModelTier,
    /// Ask for maximal fidelity at the model's native tier, no smoothing
    pub preserve_quality: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_owned(),
            model: ModelTier::default(),
            preserve_quality: true,
        }
    }
}

impl ProcessingConfig {
    /// Create a new processing configuration builder
    #[must_use]
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::new()
    }
}

/// Builder for [`ProcessingConfig`]
#[derive(Debug, Clone, Default)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edit instruction
    #[must_use]
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = instruction.into();
        self
    }

    /// Set the model tier
    #[must_use]
    pub fn model(mut self, model: ModelTier) -> Self {
        self.config.model = model;
        self
    }

    /// Set the quality preference
    #[must_use]
    pub fn preserve_quality(mut self, preserve: bool) -> Self {
        self.config.preserve_quality = preserve;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Empty edit instruction
    pub fn build(self) -> Result<ProcessingConfig> {
        if self.config.instruction.trim().is_empty() {
            return Err(CleanmarkError::invalid_config(
                "edit instruction must not be empty",
            ));
        }
        Ok(self.config)
    }
}

//! Capability-aware request construction for the remote edit service
//!
//! Builds the `generateContent` wire body for one batch item. The only
//! branching here is driven by [`crate::config::ModelCapabilities`]: the standard tier
//! rejects explicit output-size directives and tool blocks outright, so those
//! fields exist on the wire iff the selected model declares support for them.

use crate::aspect::AspectRatio;
use crate::config::{ModelTier, ProcessingConfig};
use crate::types::ImagePayload;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

/// Fixed constraints prepended to every edit instruction.
///
/// These keep the model from "helpfully" removing real scene content: only
/// artificial overlays are fair game, and removed regions are reconstructed
/// from surrounding textures.
const SYSTEM_CONSTRAINTS: &str = "\
OBJECTIVE: High-fidelity removal of artificial overlays (watermarks, logos, text, stamps).
CRITICAL RULE: DO NOT REMOVE, CHANGE, OR BLUR real physical objects (e.g. faucets, sinks, furniture).
TARGET ONLY: The artificial elements described in the task.
INPAINTING: Reconstruct the area perfectly using surrounding textures.";

/// Inline binary part of a request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type of the encoded image
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// One part of the request content: either inline image data or text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Content block carrying the ordered request parts
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Image-specific generation settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Always present: the classified aspect ratio tag
    pub aspect_ratio: String,
    /// Present only for models that accept an explicit size directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

/// Generation settings wrapper
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

/// Auxiliary tool activation block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

/// Empty marker object enabling search grounding
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

/// Wire body of a `generateContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBody {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// A fully-constructed edit request: target model tier plus wire body
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Model tier the request is addressed to
    pub model: ModelTier,
    /// Serialized as the HTTP request body
    pub body: GenerateContentBody,
}

impl EditRequest {
    /// Build a capability-correct request for one image.
    ///
    /// Pure payload construction; validation of the instruction or image is
    /// out of scope here. `width`/`height` are the item's original
    /// dimensions, used only to classify the aspect ratio.
    #[must_use]
    pub fn build(
        source: &ImagePayload,
        width: u32,
        height: u32,
        config: &ProcessingConfig,
    ) -> Self {
        let caps = config.model.capabilities();
        let aspect = AspectRatio::classify(width, height);

        let quality = if config.preserve_quality {
            let tier = if caps.supports_extended_tools {
                caps.max_output_resolution.directive()
            } else {
                "native"
            };
            format!("QUALITY: Maximize {tier} resolution fidelity. Keep natural grain. No artificial smoothing.")
        } else {
            "QUALITY: Clean blending.".to_owned()
        };

        let prompt = format!(
            "{SYSTEM_CONSTRAINTS}\n\nTask: {}\n\nTechnical Standard: {quality}",
            config.instruction
        );

        let mut image_config = ImageConfig {
            aspect_ratio: aspect.as_str().to_owned(),
            image_size: None,
        };
        let mut tools = None;
        if caps.supports_extended_tools {
            image_config.image_size = Some(caps.max_output_resolution.directive().to_owned());
            tools = Some(vec![Tool {
                google_search: GoogleSearch {},
            }]);
        }

        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: source.media_type.clone(),
                            data: BASE64.encode(&source.bytes),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(prompt),
                    },
                ],
            }],
            generation_config: GenerationConfig { image_config },
            tools,
        };

        Self {
            model: config.model,
            body,
        }
    }
}

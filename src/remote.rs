//! Remote generative edit service client
//!
//! The pipeline talks to the generation API through the [`EditService`] trait
//! so tests and alternative frontends can inject their own implementation;
//! [`GeminiEditService`] is the production client.

use crate::error::{CleanmarkError, Result};
use crate::request::EditRequest;
use crate::types::ImagePayload;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default API endpoint for the generative language service
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Seam between the pipeline and the remote generation API
#[async_trait]
pub trait EditService: Send + Sync {
    /// Submit an edit request and return the first image the service produced.
    ///
    /// # Errors
    /// - [`CleanmarkError::Authorization`] on permission failures (batch-fatal)
    /// - [`CleanmarkError::CapabilityMismatch`] when the model rejects the
    ///   request's size directives
    /// - [`CleanmarkError::NoOutput`] when the response carries no image part
    /// - [`CleanmarkError::RemoteService`] for any other upstream failure
    async fn submit(&self, request: &EditRequest) -> Result<ImagePayload>;
}

/// Production client for the `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiEditService {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiEditService {
    /// Create a client against the default endpoint
    ///
    /// # Errors
    /// - Failed to construct the HTTP client
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used by tests and proxies)
    ///
    /// # Errors
    /// - Failed to construct the HTTP client
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl EditService for GeminiEditService {
    async fn submit(&self, request: &EditRequest) -> Result<ImagePayload> {
        let model_id = request.model.model_id();
        let url = format!("{}/v1beta/models/{}:generateContent", self.endpoint, model_id);
        debug!(model = model_id, "submitting edit request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| classify_remote_failure(None, &e.to_string(), request.model.is_pro()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "edit request rejected");
            return Err(classify_remote_failure(
                Some(status.as_u16()),
                &body,
                request.model.is_pro(),
            ));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_first_image(parsed)
    }
}

/// Map an upstream failure onto the crate's error taxonomy.
///
/// The service exposes no structured error codes, so classification is by
/// message inspection. Keeping the string matching in this one function means
/// the rest of the pipeline depends only on the error variants, never on
/// message text.
#[must_use]
pub fn classify_remote_failure(status: Option<u16>, message: &str, pro_tier: bool) -> CleanmarkError {
    let lower = message.to_ascii_lowercase();

    if status == Some(403) || lower.contains("403") || lower.contains("permission") {
        return CleanmarkError::Authorization { pro_tier };
    }

    // The size-directive rejection surfaces under a few different phrasings
    if lower.contains("image_size") || lower.contains("gempix") {
        return CleanmarkError::capability_mismatch(
            "the selected model does not support the current quality settings; try the Standard tier",
        );
    }

    let preserved = message.trim();
    if preserved.is_empty() {
        let fallback = status.map_or_else(
            || "processing failed".to_owned(),
            |code| format!("request failed with status {code}"),
        );
        CleanmarkError::RemoteService(fallback)
    } else {
        CleanmarkError::remote(preserved)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<ResponseInlineData>,
    #[allow(dead_code)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: String,
    data: String,
}

/// Pull the first image part out of a response; anything else is `NoOutput`
fn extract_first_image(response: GenerateContentResponse) -> Result<ImagePayload> {
    for candidate in response.candidates {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            if let Some(inline) = part.inline_data {
                let bytes = BASE64.decode(inline.data).map_err(|e| {
                    CleanmarkError::remote(format!("service returned undecodable image data: {e}"))
                })?;
                return Ok(ImagePayload::new(bytes, inline.mime_type));
            }
        }
    }
    Err(CleanmarkError::NoOutput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_permission_failures() {
        let err = classify_remote_failure(Some(403), "", true);
        assert!(matches!(err, CleanmarkError::Authorization { pro_tier: true }));

        let err = classify_remote_failure(None, "PERMISSION_DENIED: key not valid", false);
        assert!(matches!(err, CleanmarkError::Authorization { pro_tier: false }));

        let err = classify_remote_failure(None, "got 403 from upstream", false);
        assert!(err.is_batch_fatal());
    }

    #[test]
    fn test_classify_capability_mismatch() {
        let err = classify_remote_failure(Some(400), "invalid image_size for this model", false);
        assert!(matches!(err, CleanmarkError::CapabilityMismatch(_)));

        let err = classify_remote_failure(None, "gempix recipe rejected", true);
        assert!(matches!(err, CleanmarkError::CapabilityMismatch(_)));
    }

    #[test]
    fn test_classify_preserves_generic_messages() {
        let err = classify_remote_failure(Some(500), "model overloaded, please retry", false);
        match err {
            CleanmarkError::RemoteService(msg) => {
                assert_eq!(msg, "model overloaded, please retry");
            },
            other => panic!("expected RemoteService, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_empty_body_falls_back_to_status() {
        let err = classify_remote_failure(Some(503), "  ", false);
        match err {
            CleanmarkError::RemoteService(msg) => {
                assert_eq!(msg, "request failed with status 503");
            },
            other => panic!("expected RemoteService, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_first_image_part() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Removed the watermark." },
                        { "inlineData": { "mimeType": "image/png", "data": BASE64.encode([1u8, 2, 3]) } },
                        { "inlineData": { "mimeType": "image/webp", "data": BASE64.encode([9u8]) } }
                    ]
                }
            }]
        }))
        .unwrap();

        let payload = extract_first_image(response).unwrap();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(payload.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_text_only_response_is_no_output() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I could not edit this image." }] }
            }]
        }))
        .unwrap();
        assert!(matches!(
            extract_first_image(response),
            Err(CleanmarkError::NoOutput)
        ));
    }

    #[test]
    fn test_empty_response_is_no_output() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            extract_first_image(response),
            Err(CleanmarkError::NoOutput)
        ));
    }
}

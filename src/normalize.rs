//! Resolution normalization back to original pixel dimensions
//!
//! The remote model renders at its own native tier (1K or 2K), which rarely
//! matches the source image exactly. This step resamples the returned image
//! to the item's original dimensions so batch output is a drop-in replacement
//! for the input files.

use crate::error::Result;
use crate::types::ImagePayload;
use image::imageops::FilterType;
use std::io::Cursor;
use tracing::{debug, warn};

/// Normalized output is always re-encoded losslessly
const OUTPUT_MEDIA_TYPE: &str = "image/png";

/// Resample a processed payload to exactly `target_width` x `target_height`.
///
/// Resampling uses Catmull-Rom interpolation and the result is re-encoded as
/// lossless PNG. If the processed payload cannot be decoded or re-encoded,
/// it is returned unchanged instead: a dimension mismatch is cosmetically
/// acceptable, losing the item is not.
pub async fn normalize_resolution(
    processed: ImagePayload,
    target_width: u32,
    target_height: u32,
) -> ImagePayload {
    match resample(&processed, target_width, target_height) {
        Ok(normalized) => normalized,
        Err(err) => {
            warn!(
                %err,
                target_width,
                target_height,
                "resolution normalization degraded; keeping service output as-is"
            );
            processed
        },
    }
}

fn resample(processed: &ImagePayload, width: u32, height: u32) -> Result<ImagePayload> {
    let decoded = image::load_from_memory(&processed.bytes)?;
    debug!(
        from_width = decoded.width(),
        from_height = decoded.height(),
        to_width = width,
        to_height = height,
        "normalizing resolution"
    );

    let resized = decoded.resize_exact(width, height, FilterType::CatmullRom);
    let mut buffer = Vec::new();
    resized.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(ImagePayload::new(buffer, OUTPUT_MEDIA_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    fn encoded_image(width: u32, height: u32) -> ImagePayload {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let intensity = ((x + y) % 256) as u8;
            *pixel = image::Rgba([intensity, 128, 255 - intensity, 255]);
        }
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        ImagePayload::new(buffer, "image/png")
    }

    #[tokio::test]
    async fn test_output_matches_target_dimensions_exactly() {
        // Model-native 1K output squeezed back to the original 800x600
        let processed = encoded_image(1024, 1024);
        let normalized = normalize_resolution(processed, 800, 600).await;

        assert_eq!(normalized.media_type, "image/png");
        let decoded = image::load_from_memory(&normalized.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }

    #[tokio::test]
    async fn test_upscale_to_larger_target() {
        let processed = encoded_image(512, 512);
        let normalized = normalize_resolution(processed, 1600, 1200).await;
        let decoded = image::load_from_memory(&normalized.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1600, 1200));
    }

    #[tokio::test]
    async fn test_already_at_target_still_decodes_to_target() {
        let processed = encoded_image(800, 600);
        let normalized = normalize_resolution(processed, 800, 600).await;
        let decoded = image::load_from_memory(&normalized.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }

    #[tokio::test]
    async fn test_undecodable_payload_degrades_to_passthrough() {
        let garbage = ImagePayload::new(vec![0xDE, 0xAD, 0xBE, 0xEF], "image/png");
        let result = normalize_resolution(garbage.clone(), 800, 600).await;
        assert_eq!(result, garbage);
    }
}

//! Ingestion of raw image input into batch items
//!
//! The pipeline core never reads raw files itself; these helpers are the
//! ingestion collaborator that decodes an image once to capture its
//! ground-truth dimensions and media type, then hands over a fully-formed
//! pending [`BatchItem`].

use crate::error::{CleanmarkError, Result};
use crate::types::{BatchItem, ImagePayload};
use std::path::Path;
use tracing::debug;

/// Build a pending batch item from encoded image bytes.
///
/// The bytes are kept verbatim as the source payload; decoding happens only
/// to measure dimensions and identify the format.
///
/// # Errors
/// - Bytes are not a recognizable or decodable image
pub fn ingest_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<BatchItem> {
    let file_name = file_name.into();
    let format = image::guess_format(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format)?;
    let (width, height) = (decoded.width(), decoded.height());
    let media_type = format.to_mime_type();
    debug!(file = %file_name, width, height, media_type, "ingested image");

    Ok(BatchItem::new(
        file_name,
        ImagePayload::new(bytes, media_type),
        width,
        height,
    ))
}

/// Read and ingest an image file from disk
///
/// # Errors
/// - File cannot be read
/// - Contents are not a decodable image
pub async fn ingest_file(path: impl AsRef<Path>) -> Result<BatchItem> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        CleanmarkError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read '{}': {e}", path.display()),
        ))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_owned();
    ingest_bytes(file_name, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemStatus;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_ingest_captures_dimensions_and_media_type() {
        let bytes = encoded_png(640, 480);
        let item = ingest_bytes("photo.png", bytes.clone()).unwrap();

        assert_eq!(item.file_name(), "photo.png");
        assert_eq!((item.width(), item.height()), (640, 480));
        assert_eq!(item.source().media_type, "image/png");
        assert_eq!(item.source().bytes, bytes);
        assert_eq!(item.status(), ItemStatus::Pending);
    }

    #[test]
    fn test_ingest_assigns_unique_ids() {
        let a = ingest_bytes("a.png", encoded_png(8, 8)).unwrap();
        let b = ingest_bytes("b.png", encoded_png(8, 8)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_ingest_rejects_non_image_bytes() {
        let result = ingest_bytes("note.txt", b"definitely not an image".to_vec());
        assert!(matches!(result, Err(CleanmarkError::Image(_))));
    }

    #[tokio::test]
    async fn test_ingest_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        std::fs::write(&path, encoded_png(320, 240)).unwrap();

        let item = ingest_file(&path).await.unwrap();
        assert_eq!(item.file_name(), "sample.png");
        assert_eq!((item.width(), item.height()), (320, 240));
    }

    #[tokio::test]
    async fn test_ingest_file_missing_path_is_io_error() {
        let result = ingest_file("/nonexistent/missing.png").await;
        assert!(matches!(result, Err(CleanmarkError::Io(_))));
    }
}

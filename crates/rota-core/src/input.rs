//! Image input: loading, size limits, and media-type sniffing.
//!
//! The model needs the image as base64 plus a MIME type. The type is taken
//! from the file's magic bytes rather than its extension, since phone cameras
//! and chat apps routinely save files under the wrong suffix.

use base64::Engine;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{OptimizeError, OptimizeResult};

/// Base64-encoded image ready to send to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
    /// Size of the decoded image in bytes
    pub byte_len: usize,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a known MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> OptimizeResult<Self> {
        if bytes.is_empty() {
            return Err(OptimizeError::InvalidInput(
                "image is empty".to_string(),
            ));
        }
        if media_type.trim().is_empty() {
            return Err(OptimizeError::InvalidInput(
                "image media type is missing".to_string(),
            ));
        }

        Ok(Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
            byte_len: bytes.len(),
        })
    }

    /// Create an `ImageInput` from raw bytes, detecting the MIME type.
    pub fn sniff(bytes: &[u8]) -> OptimizeResult<Self> {
        let media_type = sniff_media_type(bytes).ok_or_else(|| {
            OptimizeError::InvalidInput(
                "unrecognized image format (invalid magic bytes)".to_string(),
            )
        })?;
        Self::from_bytes(bytes, media_type)
    }

    /// Read an image file, enforcing the configured size limit.
    pub fn from_path(path: &Path, limits: &LimitsConfig) -> OptimizeResult<Self> {
        if !path.exists() {
            return Err(OptimizeError::InvalidInput(format!(
                "image not found: {}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path).map_err(|e| {
            OptimizeError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?;

        let max_bytes = limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(OptimizeError::InvalidInput(format!(
                "image too large: {} ({}MB > {}MB)",
                path.display(),
                metadata.len() / (1024 * 1024),
                limits.max_file_size_mb
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            OptimizeError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?;

        let input = Self::sniff(&bytes).map_err(|e| match e {
            OptimizeError::InvalidInput(msg) => {
                OptimizeError::InvalidInput(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        tracing::debug!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            input.byte_len,
            input.media_type
        );
        Ok(input)
    }
}

/// Detect an image MIME type from the leading bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png");
    }

    // GIF: GIF8
    if bytes.starts_with(b"GIF8") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if bytes.starts_with(b"RIFF") {
        return (bytes.len() >= 12 && &bytes[8..12] == b"WEBP").then_some("image/webp");
    }

    // BMP: BM
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }

    // TIFF: II (little-endian) or MM (big-endian) followed by version 42
    if bytes.starts_with(&[b'I', b'I', 0x2A, 0x00]) || bytes.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // HEIC/HEIF/AVIF: ftyp box at offset 4, brand at offset 8
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return match &bytes[8..12] {
            b"avif" | b"avis" => Some("image/avif"),
            b"heic" | b"heix" | b"heim" | b"heis" => Some("image/heic"),
            _ => Some("image/heif"),
        };
    }

    None
}

// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use crate::error::{IdentifyError, Result};
use bytes::Bytes;
use serde::Serialize;
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Try to detect format from MIME type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=binary"
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Try to detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes at the start of image data
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }
}

/// Validation limits
pub const MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024; // 5MB

/// An image chosen by the user, held until the next selection.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub data: Bytes,
}

/// What the session exposes about the current selection (never the bytes).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub size_bytes: usize,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read an image from disk. The MIME type comes from the file's magic
    /// bytes, falling back to its extension. Unknown types are kept as
    /// `application/octet-stream` so that validation rejects them.
    ///
    /// Files larger than `max_bytes` are rejected before they are read.
    pub async fn from_path(path: &Path, max_bytes: usize) -> Result<Self> {
        let len = tokio::fs::metadata(path).await?.len();
        validate_image_size(usize::try_from(len).unwrap_or(usize::MAX), max_bytes)?;

        let data = tokio::fs::read(path).await?;

        let format = ImageFormat::sniff(&data).or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        });
        let mime_type = format
            .map(|f| f.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());

        Ok(Self::new(file_name, mime_type, data))
    }

    /// Check the allow-list and the size ceiling.
    pub fn validate(&self, max_bytes: usize) -> Result<ImageFormat> {
        let format = ImageFormat::from_mime_type(&self.mime_type)
            .ok_or_else(|| IdentifyError::UnsupportedImageType(self.mime_type.clone()))?;

        validate_image_size(self.data.len(), max_bytes)?;

        Ok(format)
    }

    pub fn summary(&self) -> SelectedImage {
        SelectedImage {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.data.len(),
        }
    }
}

/// Validate image data size
pub fn validate_image_size(data_len: usize, max_bytes: usize) -> Result<()> {
    if data_len > max_bytes {
        return Err(IdentifyError::ImageTooLarge {
            size: data_len,
            max: max_bytes,
        });
    }
    Ok(())
}

//! Upload policy for workspace images

use crate::error::DomainError;

/// Default upload ceiling: 1 MiB
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Extensions accepted when no explicit list is configured
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "svg"];

/// Size and type limits applied before an image is uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePolicy {
    pub max_bytes: usize,
    /// Lowercase extensions without the leading dot
    pub allowed_extensions: Vec<String>,
}

/// An image that passed the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    pub extension: String,
    pub content_type: &'static str,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

impl ImagePolicy {
    pub fn new(max_bytes: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Check a file name and byte size against the policy
    pub fn check(&self, file_name: &str, size: usize) -> Result<ValidatedImage, DomainError> {
        if size > self.max_bytes {
            return Err(DomainError::ImageTooLarge {
                max: self.max_bytes,
            });
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| DomainError::UnsupportedImageType(file_name.to_string()))?;

        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(DomainError::UnsupportedImageType(extension));
        }

        Ok(ValidatedImage {
            content_type: content_type_for(&extension),
            extension,
        })
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

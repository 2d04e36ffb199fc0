//! Files selected for upload.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::validation::ValidationError;

/// Accepted media family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Image => "image/",
            Self::Video => "video/",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Image => "an image",
            Self::Video => "a video",
        }
    }
}

/// An in-memory file ready for a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = content_type_for(path).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Reject files outside `kind`'s MIME family.
    ///
    /// # Errors
    ///
    /// [`ValidationError::WrongMediaType`] on mismatch.
    pub fn ensure_kind(&self, kind: MediaKind) -> Result<(), ValidationError> {
        if self.content_type.to_ascii_lowercase().starts_with(kind.prefix()) {
            Ok(())
        } else {
            Err(ValidationError::WrongMediaType {
                file: self.file_name.clone(),
                expected: kind.label(),
            })
        }
    }

    /// `data:` URI for a local preview before upload.
    #[must_use]
    pub fn preview_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

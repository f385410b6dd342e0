use bytes::Bytes;
use std::path::Path;

use super::video::TimeWindow;
use crate::error::ClientError;

/// A footage file picked by the operator and waiting to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(file_name_of(path, "video.mp4"), bytes))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// One file of a batch together with the metadata shared by the whole batch.
/// Built when the batch is submitted and never modified afterwards.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub file: SelectedFile,
    pub department: String,
    pub location: String,
    pub time_window: TimeWindow,
}

impl UploadTask {
    pub fn file_name(&self) -> &str {
        &self.file.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.file.size_bytes()
    }

    /// Text fields of the upload form, shared by every file in a batch.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("department", self.department.clone()),
            ("location", self.location.clone()),
            ("time_window", self.time_window.to_string()),
        ]
    }
}

/// Image sent as a search target or attached to a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(file_name_of(path, "photo.jpg"), bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type derived from the file extension.
    pub fn content_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

fn file_name_of(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(fallback)
        .to_string()
}

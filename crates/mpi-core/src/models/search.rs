use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::upload::PhotoFile;
use crate::error::ClientError;

/// Value used for any match field the backend did not send.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    MatchFound,
    NoMatch,
    #[serde(other)]
    Other,
}

/// One row of the backend search history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHistoryEntry {
    pub id: String,
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub video_filename: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub search_date: String,
    pub status: SearchStatus,
}

/// Search against every available video, driven by a photo and clothing colors.
#[derive(Debug, Clone)]
pub struct OpenSearch {
    pub photo: PhotoFile,
    pub shirt_color: String,
    pub pant_color: Option<String>,
}

/// Search for one known missing person in one known video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedSearch {
    pub person_id: String,
    pub video_id: String,
}

#[derive(Debug, Clone)]
pub enum SearchRequest {
    Open(OpenSearch),
    Targeted(TargetedSearch),
}

impl SearchRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            SearchRequest::Open(_) => "open",
            SearchRequest::Targeted(_) => "targeted",
        }
    }
}

/// In-memory image returned by a successful search.
///
/// The handle owns its buffer; dropping the last clone frees it.
#[derive(Clone, PartialEq)]
pub struct ImageHandle {
    bytes: Bytes,
    content_type: String,
}

impl ImageHandle {
    pub fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Suggested file extension for downloads.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "jpg",
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ClientError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Everything known about a positive match. Fields absent from the response hold
/// [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    #[serde(skip)]
    pub image: ImageHandle,
    pub result_id: String,
    pub person_id: String,
    pub person_name: String,
    pub video_id: String,
    pub video_filename: String,
    pub location: String,
    pub department: String,
    pub search_timestamp: String,
    pub video_timestamp: String,
    pub last_seen_location: String,
    pub shirt_color: String,
    pub pant_color: String,
}

/// Outcome of a completed search: exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchResult {
    Match(MatchDetails),
    NoMatch { message: String },
}

impl SearchResult {
    pub fn no_match(message: impl Into<String>) -> Self {
        SearchResult::NoMatch {
            message: message.into(),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SearchResult::Match(_))
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            SearchResult::Match(details) => Some(&details.image),
            SearchResult::NoMatch { .. } => None,
        }
    }
}

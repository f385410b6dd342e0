use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::upload::PhotoFile;

/// Clothing color sent when the pant color is not known.
pub const UNSPECIFIED_COLOR: &str = "none";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersonStatus {
    Pending,
    Found,
    Ready,
    #[serde(other)]
    Unknown,
}

impl Display for PersonStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PersonStatus::Pending => write!(f, "pending"),
            PersonStatus::Found => write!(f, "found"),
            PersonStatus::Ready => write!(f, "ready"),
            PersonStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Missing-person record. Read-only on the client; the backend owns every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissingPersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub last_seen_location: String,
    #[serde(default)]
    pub shirt_color: String,
    #[serde(default)]
    pub pant_color: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub photo_filename: String,
    #[serde(default)]
    pub reported_date: String,
    pub status: PersonStatus,
    #[serde(default)]
    pub search_count: u32,
}

/// Citizen report of a missing person, submitted with a photo.
#[derive(Debug, Clone)]
pub struct MissingPersonReport {
    pub photo: PhotoFile,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub last_seen_location: String,
    pub shirt_color: String,
    /// Falls back to [`UNSPECIFIED_COLOR`] when `None` or blank.
    pub pant_color: Option<String>,
    pub height: String,
    pub additional_notes: String,
    pub contact_info: String,
}

impl MissingPersonReport {
    pub fn new(photo: PhotoFile, name: impl Into<String>, shirt_color: impl Into<String>) -> Self {
        Self {
            photo,
            name: name.into(),
            age: String::new(),
            gender: String::new(),
            last_seen_location: String::new(),
            shirt_color: shirt_color.into(),
            pant_color: None,
            height: String::new(),
            additional_notes: String::new(),
            contact_info: String::new(),
        }
    }

    pub fn effective_pant_color(&self) -> &str {
        self.pant_color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNSPECIFIED_COLOR)
    }

    /// Text fields in the order and under the names the report endpoint expects.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.trim().to_string()),
            ("age", self.age.clone()),
            ("gender", self.gender.clone()),
            ("last_seen_location", self.last_seen_location.clone()),
            ("shirt_color", self.shirt_color.trim().to_string()),
            ("pant_color", self.effective_pant_color().to_string()),
            ("height", self.height.clone()),
            ("additional_notes", self.additional_notes.clone()),
            ("contact_info", self.contact_info.clone()),
        ]
    }
}

/// Backend acknowledgement of a submitted report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub person_id: String,
    #[serde(default)]
    pub message: String,
    pub metadata: Option<MissingPersonRecord>,
}

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Processing,
    Completed,
    Failed,
    /// Stored and searchable; what the backend reports right after upload.
    Ready,
    #[serde(other)]
    Unknown,
}

impl Display for VideoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VideoStatus::Processing => write!(f, "processing"),
            VideoStatus::Completed => write!(f, "completed"),
            VideoStatus::Failed => write!(f, "failed"),
            VideoStatus::Ready => write!(f, "ready"),
            VideoStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Length of the capture window a footage file covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[serde(rename = "1hour")]
    OneHour,
    #[default]
    #[serde(rename = "2hours")]
    TwoHours,
    #[serde(rename = "3hours")]
    ThreeHours,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::OneHour => "1hour",
            TimeWindow::TwoHours => "2hours",
            TimeWindow::ThreeHours => "3hours",
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1hour" | "1h" => Ok(TimeWindow::OneHour),
            "2hours" | "2h" => Ok(TimeWindow::TwoHours),
            "3hours" | "3h" => Ok(TimeWindow::ThreeHours),
            other => Err(format!(
                "invalid time window '{}': expected 1hour, 2hours or 3hours",
                other
            )),
        }
    }
}

/// Footage record as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "time_window", default)]
    pub time_window_raw: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(rename = "upload_date", default)]
    pub upload_timestamp: String,
    pub status: VideoStatus,
    #[serde(default)]
    pub search_count: u32,
}

impl VideoRecord {
    /// Capture window, if the stored value is one this client knows.
    pub fn time_window(&self) -> Option<TimeWindow> {
        self.time_window_raw.parse().ok()
    }

    /// Size in megabytes, for display.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

//! Test fixtures and helper functions for creating test data

use bytes::Bytes;
use mpi_api_client::RawResponse;
use mpi_core::models::{
    MissingPersonRecord, PersonStatus, PhotoFile, SearchHistoryEntry, SearchStatus, SelectedFile,
    VideoRecord, VideoStatus,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

/// Create a test VideoRecord
pub fn video(id: &str, filename: &str) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        filename: filename.to_string(),
        department: "PD1".to_string(),
        location: "Main St".to_string(),
        time_window_raw: "2hours".to_string(),
        size_bytes: 1024 * 1024,
        upload_timestamp: "2024-01-01T10:00:00".to_string(),
        status: VideoStatus::Ready,
        search_count: 0,
    }
}

/// Create a test MissingPersonRecord
pub fn missing_person(id: &str, name: &str) -> MissingPersonRecord {
    MissingPersonRecord {
        id: id.to_string(),
        name: name.to_string(),
        age: "34".to_string(),
        gender: "female".to_string(),
        last_seen_location: "Main St".to_string(),
        shirt_color: "blue".to_string(),
        pant_color: "black".to_string(),
        height: "170".to_string(),
        additional_notes: String::new(),
        contact_info: "555-0100".to_string(),
        photo_filename: format!("{}.jpg", id),
        reported_date: "2024-01-01T09:00:00".to_string(),
        status: PersonStatus::Ready,
        search_count: 0,
    }
}

/// Create a test SearchHistoryEntry
pub fn history_entry(id: &str, person_id: &str, video_id: &str) -> SearchHistoryEntry {
    SearchHistoryEntry {
        id: id.to_string(),
        person_id: person_id.to_string(),
        person_name: "Jane Doe".to_string(),
        video_id: video_id.to_string(),
        video_filename: "a.mp4".to_string(),
        location: "Main St".to_string(),
        department: "PD1".to_string(),
        search_date: "2024-01-01T11:00:00".to_string(),
        status: SearchStatus::MatchFound,
    }
}

pub fn footage(file_name: &str) -> SelectedFile {
    SelectedFile::new(file_name, format!("bytes of {}", file_name).into_bytes())
}

pub fn photo() -> PhotoFile {
    PhotoFile::new("target.jpg", b"\xff\xd8\xff\xe0photo".to_vec())
}

/// Successful search response carrying `headers` and an image body.
pub fn match_response(headers: &[(&str, &str)], body: &'static [u8]) -> RawResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    RawResponse {
        status: StatusCode::OK,
        headers: map,
        body: Bytes::from_static(body),
    }
}

/// Failed search response with a JSON `detail` body.
pub fn detail_response(status: u16, detail: &str) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: Bytes::from(serde_json::json!({ "detail": detail }).to_string()),
    }
}

//! Response decoding shared by every endpoint.
//!
//! A successful search answers with the matched frame as the body and describes the
//! match in `X-*` response headers; a failed one answers with a JSON `{ "detail": .. }`
//! body. [`decode_search_response`] folds both into one [`SearchResult`].

use bytes::Bytes;
use mpi_core::models::{ImageHandle, MatchDetails, SearchResult, UNKNOWN};
use mpi_core::SERVER_UNREACHABLE_MESSAGE;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

pub const HEADER_RESULT_ID: &str = "x-result-id";
pub const HEADER_PERSON_ID: &str = "x-person-id";
pub const HEADER_PERSON_NAME: &str = "x-person-name";
pub const HEADER_VIDEO_ID: &str = "x-video-id";
pub const HEADER_VIDEO_FILENAME: &str = "x-video-filename";
pub const HEADER_LOCATION: &str = "x-location";
pub const HEADER_DEPARTMENT: &str = "x-department";
pub const HEADER_SEARCH_TIMESTAMP: &str = "x-search-timestamp";
pub const HEADER_VIDEO_TIMESTAMP: &str = "x-video-timestamp";
pub const HEADER_LAST_SEEN_LOCATION: &str = "x-last-seen-location";
pub const HEADER_SHIRT_COLOR: &str = "x-shirt-color";
pub const HEADER_PANT_COLOR: &str = "x-pant-color";

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Status, headers and body of a response, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Pull the human-readable `detail` string out of an error body.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Header bytes as text: UTF-8 when valid, otherwise latin-1 (what the backend's
/// HTTP stack writes for non-ASCII values).
fn header_text(value: &HeaderValue) -> String {
    match std::str::from_utf8(value.as_bytes()) {
        Ok(text) => text.to_string(),
        Err(_) => value.as_bytes().iter().map(|&b| b as char).collect(),
    }
}

fn header_or_unknown(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(header_text)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Decode a search response into `Match` or `NoMatch`.
///
/// Missing headers never fail the decode; they read as [`UNKNOWN`].
pub fn decode_search_response(response: RawResponse) -> SearchResult {
    let RawResponse {
        status,
        headers,
        body,
    } = response;

    if !status.is_success() {
        let message =
            extract_detail(&body).unwrap_or_else(|| SERVER_UNREACHABLE_MESSAGE.to_string());
        tracing::debug!(status = status.as_u16(), %message, "search returned no match");
        return SearchResult::NoMatch { message };
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| v.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_TYPE)
        .to_string();

    let details = MatchDetails {
        image: ImageHandle::new(body, content_type),
        result_id: header_or_unknown(&headers, HEADER_RESULT_ID),
        person_id: header_or_unknown(&headers, HEADER_PERSON_ID),
        person_name: header_or_unknown(&headers, HEADER_PERSON_NAME),
        video_id: header_or_unknown(&headers, HEADER_VIDEO_ID),
        video_filename: header_or_unknown(&headers, HEADER_VIDEO_FILENAME),
        location: header_or_unknown(&headers, HEADER_LOCATION),
        department: header_or_unknown(&headers, HEADER_DEPARTMENT),
        search_timestamp: header_or_unknown(&headers, HEADER_SEARCH_TIMESTAMP),
        video_timestamp: header_or_unknown(&headers, HEADER_VIDEO_TIMESTAMP),
        last_seen_location: header_or_unknown(&headers, HEADER_LAST_SEEN_LOCATION),
        shirt_color: header_or_unknown(&headers, HEADER_SHIRT_COLOR),
        pant_color: header_or_unknown(&headers, HEADER_PANT_COLOR),
    };
    tracing::debug!(
        person = %details.person_name,
        video = %details.video_filename,
        bytes = details.image.len(),
        "search returned a match"
    );
    SearchResult::Match(details)
}

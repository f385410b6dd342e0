//! Domain methods for the recognition backend.
//!
//! Record types come from `mpi_core::models`; the JSON envelopes the backend wraps
//! them in are defined here and unwrapped before returning.

use bytes::Bytes;
use mpi_core::models::{
    ImageHandle, MissingPersonRecord, MissingPersonReport, OpenSearch, ReportReceipt,
    SearchHistoryEntry, TargetedSearch, UploadTask, VideoRecord, UNSPECIFIED_COLOR,
};
use mpi_core::ClientError;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::decode::RawResponse;
use crate::ApiClient;

#[derive(Debug, Deserialize)]
struct VideoListEnvelope {
    #[serde(default)]
    videos: Vec<VideoRecord>,
}

#[derive(Debug, Deserialize)]
struct MissingPersonListEnvelope {
    #[serde(default)]
    missing_persons: Vec<MissingPersonRecord>,
}

#[derive(Debug, Deserialize)]
struct MissingPersonEnvelope {
    person: MissingPersonRecord,
}

#[derive(Debug, Deserialize)]
struct SearchHistoryEnvelope {
    #[serde(default)]
    results: Vec<SearchHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    metadata: VideoRecord,
}

/// Search history restricted to one missing person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSearchHistory {
    pub person_id: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub results: Vec<SearchHistoryEntry>,
}

/// Backend liveness report (GET /health).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub uploaded_videos: usize,
    #[serde(default)]
    pub missing_persons: usize,
    #[serde(default)]
    pub search_results: usize,
}

fn file_part(file_name: &str, bytes: &Bytes, mime: Option<&str>) -> Result<Part, ClientError> {
    let part = Part::stream_with_length(bytes.clone(), bytes.len() as u64)
        .file_name(file_name.to_string());
    match mime {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| ClientError::validation(format!("Invalid content type {}: {}", mime, e))),
        None => Ok(part),
    }
}

fn encode_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl ApiClient {
    /// Backend liveness and collection counts.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get("/health").await
    }

    /// All uploaded footage (admin view).
    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        let envelope: VideoListEnvelope = self.get("/admin/videos").await?;
        Ok(envelope.videos)
    }

    /// Footage an open search may run against.
    pub async fn list_available_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        let envelope: VideoListEnvelope = self.get("/search/available-videos").await?;
        Ok(envelope.videos)
    }

    pub async fn list_missing_persons(&self) -> Result<Vec<MissingPersonRecord>, ClientError> {
        let envelope: MissingPersonListEnvelope = self.get("/admin/missing-persons").await?;
        Ok(envelope.missing_persons)
    }

    /// Reported persons as the public reporting view lists them.
    pub async fn list_reported_persons(&self) -> Result<Vec<MissingPersonRecord>, ClientError> {
        let envelope: MissingPersonListEnvelope = self.get("/user/missing-persons").await?;
        Ok(envelope.missing_persons)
    }

    /// One missing-person record. An unknown id is an `Application` error with status 404.
    pub async fn missing_person(&self, person_id: &str) -> Result<MissingPersonRecord, ClientError> {
        let envelope: MissingPersonEnvelope = self
            .get(&format!("/admin/missing-persons/{}", encode_id(person_id)))
            .await?;
        Ok(envelope.person)
    }

    pub async fn list_search_history(&self) -> Result<Vec<SearchHistoryEntry>, ClientError> {
        let envelope: SearchHistoryEnvelope = self.get("/admin/search-history").await?;
        Ok(envelope.results)
    }

    pub async fn person_search_history(
        &self,
        person_id: &str,
    ) -> Result<PersonSearchHistory, ClientError> {
        self.get(&format!("/admin/search-history/{}", encode_id(person_id)))
            .await
    }

    /// Upload one footage file with its batch metadata.
    pub async fn upload_video(&self, task: &UploadTask) -> Result<VideoRecord, ClientError> {
        let video = file_part(task.file_name(), &task.file.bytes, None)?;
        let mut form = Form::new().part("video", video);
        for (name, value) in task.form_fields() {
            form = form.text(name, value);
        }

        let envelope: UploadEnvelope = self.post_multipart("/admin/upload-video", form).await?;
        Ok(envelope.metadata)
    }

    pub async fn delete_video(&self, video_id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/admin/videos/{}", encode_id(video_id)))
            .await
    }

    pub async fn delete_missing_person(&self, person_id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/admin/missing-persons/{}", encode_id(person_id)))
            .await
    }

    /// Photo attached to a missing-person report.
    pub async fn missing_person_photo(&self, person_id: &str) -> Result<ImageHandle, ClientError> {
        let raw = self
            .get_bytes(&format!("/admin/missing-persons/{}/photo", encode_id(person_id)))
            .await?;
        let content_type = raw
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        Ok(ImageHandle::new(raw.body, content_type))
    }

    /// Search one known person in one known video. The response is returned
    /// undecoded whatever its status.
    pub async fn search_person_in_video(
        &self,
        search: &TargetedSearch,
    ) -> Result<RawResponse, ClientError> {
        let form = Form::new()
            .text("person_id", search.person_id.clone())
            .text("video_id", search.video_id.clone());
        self.post_multipart_raw("/admin/search", form).await
    }

    /// Search every available video for the person in `search.photo`.
    pub async fn search_missing_person(
        &self,
        search: &OpenSearch,
    ) -> Result<RawResponse, ClientError> {
        let pant_color = search
            .pant_color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNSPECIFIED_COLOR)
            .to_string();

        let form = Form::new()
            .part(
                "target_photo",
                file_part(
                    &search.photo.file_name,
                    &search.photo.bytes,
                    Some(search.photo.content_type()),
                )?,
            )
            .text("shirt_color", search.shirt_color.trim().to_string())
            .text("pant_color", pant_color);
        self.post_multipart_raw("/search-missing-person", form).await
    }

    pub async fn report_missing_person(
        &self,
        report: &MissingPersonReport,
    ) -> Result<ReportReceipt, ClientError> {
        let mut form = Form::new().part(
            "photo",
            file_part(
                &report.photo.file_name,
                &report.photo.bytes,
                Some(report.photo.content_type()),
            )?,
        );
        for (name, value) in report.form_fields() {
            form = form.text(name, value);
        }
        self.post_multipart("/user/report-missing-person", form)
            .await
    }
}

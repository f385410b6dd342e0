//! Mock RecognitionBackend implementation for testing

use async_trait::async_trait;
use mpi_api_client::{RawResponse, RecognitionBackend};
use mpi_core::models::{
    MissingPersonRecord, MissingPersonReport, OpenSearch, ReportReceipt, SearchHistoryEntry,
    TargetedSearch, UploadTask, VideoRecord, VideoStatus,
};
use mpi_core::ClientError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::fixtures::detail_response;

/// Fields of one upload request as the backend received them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedUpload {
    pub file_name: String,
    pub payload: Vec<u8>,
    pub department: String,
    pub location: String,
    pub time_window: String,
}

#[derive(Default)]
struct MockState {
    videos: Vec<VideoRecord>,
    available_videos: Vec<VideoRecord>,
    missing_persons: Vec<MissingPersonRecord>,
    search_history: Vec<SearchHistoryEntry>,
    failing_lists: HashSet<String>,
    failing_uploads: HashSet<String>,
    failing_deletes: HashSet<String>,
    search_response: Option<RawResponse>,
    search_transport_failure: bool,
    calls: Vec<String>,
    uploads: Vec<ReceivedUpload>,
    reports: Vec<String>,
    uploads_in_flight: usize,
    max_uploads_in_flight: usize,
    next_id: usize,
}

/// In-memory backend that records every call
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    search_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            search_gate: Mutex::new(None),
        }
    }

    pub fn set_videos(&self, videos: Vec<VideoRecord>) {
        self.state.lock().unwrap().videos = videos;
    }

    pub fn set_available_videos(&self, videos: Vec<VideoRecord>) {
        self.state.lock().unwrap().available_videos = videos;
    }

    pub fn set_missing_persons(&self, persons: Vec<MissingPersonRecord>) {
        self.state.lock().unwrap().missing_persons = persons;
    }

    pub fn set_search_history(&self, history: Vec<SearchHistoryEntry>) {
        self.state.lock().unwrap().search_history = history;
    }

    /// Make a list endpoint fail: "videos", "available_videos", "missing_persons"
    /// or "search_history".
    pub fn fail_list(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_lists
            .insert(name.to_string());
    }

    pub fn fail_upload(&self, file_name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_uploads
            .insert(file_name.to_string());
    }

    pub fn fail_delete(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_deletes
            .insert(id.to_string());
    }

    pub fn set_search_response(&self, response: RawResponse) {
        self.state.lock().unwrap().search_response = Some(response);
    }

    pub fn fail_search_transport(&self) {
        self.state.lock().unwrap().search_transport_failure = true;
    }

    /// Hold every search request until the returned handle is notified.
    pub fn gate_searches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.search_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn reports(&self) -> Vec<String> {
        self.state.lock().unwrap().reports.clone()
    }

    pub fn max_uploads_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_uploads_in_flight
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn list<T: Clone>(
        &self,
        name: &str,
        pick: impl Fn(&MockState) -> &Vec<T>,
    ) -> Result<Vec<T>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_{}", name));
        if state.failing_lists.contains(name) {
            return Err(ClientError::Application {
                status: 500,
                detail: format!("Failed to list {}", name),
            });
        }
        Ok(pick(&*state).clone())
    }

    async fn run_search(&self, call: &str) -> Result<RawResponse, ClientError> {
        self.record(call);
        let gate = self.search_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.state.lock().unwrap();
        if state.search_transport_failure {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        Ok(state
            .search_response
            .clone()
            .unwrap_or_else(|| detail_response(404, "No match found")))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecognitionBackend for MockBackend {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        self.list("videos", |s| &s.videos)
    }

    async fn list_available_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        self.list("available_videos", |s| &s.available_videos)
    }

    async fn list_missing_persons(&self) -> Result<Vec<MissingPersonRecord>, ClientError> {
        self.list("missing_persons", |s| &s.missing_persons)
    }

    async fn list_search_history(&self) -> Result<Vec<SearchHistoryEntry>, ClientError> {
        self.list("search_history", |s| &s.search_history)
    }

    async fn upload_video(&self, task: &UploadTask) -> Result<VideoRecord, ClientError> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("upload:start:{}", task.file_name()));
            state.uploads_in_flight += 1;
            state.max_uploads_in_flight = state.max_uploads_in_flight.max(state.uploads_in_flight);
        }

        // Give any concurrently spawned upload a chance to overlap.
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.uploads_in_flight -= 1;
        state.calls.push(format!("upload:end:{}", task.file_name()));
        state.uploads.push(ReceivedUpload {
            file_name: task.file_name().to_string(),
            payload: task.file.bytes.to_vec(),
            department: task.department.clone(),
            location: task.location.clone(),
            time_window: task.time_window.as_str().to_string(),
        });

        if state.failing_uploads.contains(task.file_name()) {
            return Err(ClientError::Application {
                status: 500,
                detail: format!("Upload failed: {} is corrupt", task.file_name()),
            });
        }

        state.next_id += 1;
        let record = VideoRecord {
            id: format!("video_{}", state.next_id),
            filename: task.file_name().to_string(),
            department: task.department.clone(),
            location: task.location.clone(),
            time_window_raw: task.time_window.as_str().to_string(),
            size_bytes: task.size_bytes(),
            upload_timestamp: "2024-01-01T12:00:00".to_string(),
            status: VideoStatus::Ready,
            search_count: 0,
        };
        state.videos.push(record.clone());
        state.available_videos.push(record.clone());
        Ok(record)
    }

    async fn delete_video(&self, video_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete_video:{}", video_id));
        if state.failing_deletes.contains(video_id) {
            return Err(ClientError::Application {
                status: 404,
                detail: "Video not found".to_string(),
            });
        }
        state.videos.retain(|v| v.id != video_id);
        state.available_videos.retain(|v| v.id != video_id);
        Ok(())
    }

    async fn delete_missing_person(&self, person_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete_missing_person:{}", person_id));
        if state.failing_deletes.contains(person_id) {
            return Err(ClientError::Application {
                status: 404,
                detail: "Missing person not found".to_string(),
            });
        }
        state.missing_persons.retain(|p| p.id != person_id);
        Ok(())
    }

    async fn search_person_in_video(
        &self,
        search: &TargetedSearch,
    ) -> Result<RawResponse, ClientError> {
        self.run_search(&format!(
            "search_person_in_video:{}:{}",
            search.person_id, search.video_id
        ))
        .await
    }

    async fn search_missing_person(
        &self,
        search: &OpenSearch,
    ) -> Result<RawResponse, ClientError> {
        let pant = search.pant_color.as_deref().unwrap_or("none");
        self.run_search(&format!(
            "search_missing_person:{}:{}",
            search.shirt_color, pant
        ))
        .await
    }

    async fn report_missing_person(
        &self,
        report: &MissingPersonReport,
    ) -> Result<ReportReceipt, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("report_missing_person".to_string());
        state.reports.push(report.name.clone());
        state.next_id += 1;
        Ok(ReportReceipt {
            person_id: format!("person_{}", state.next_id),
            message: "Missing person report submitted successfully".to_string(),
            metadata: None,
        })
    }
}

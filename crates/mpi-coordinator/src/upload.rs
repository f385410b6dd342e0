//! Footage upload coordination.
//!
//! A batch is submitted one file at a time: the next request only starts once the
//! previous one resolved. A failed file is recorded in the [`UploadReport`] and the
//! batch moves on. When every file has settled the coordinator waits for the settle
//! delay, then clears the pending list and the progress map.

use mpi_api_client::RecognitionBackend;
use mpi_core::models::{SelectedFile, TimeWindow, UploadTask, VideoRecord};
use mpi_core::ClientError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::catalog::Catalog;
use crate::progress::ProgressTracker;
use crate::session::AdminSession;
use crate::BusyGuard;

/// Metadata shared by every file of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub department: String,
    pub location: String,
    pub time_window: TimeWindow,
}

impl UploadForm {
    pub fn new(department: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            location: location.into(),
            time_window: TimeWindow::default(),
        }
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.department.trim().is_empty() {
            return Err(ClientError::validation("Department is required"));
        }
        if self.location.trim().is_empty() {
            return Err(ClientError::validation("Location is required"));
        }
        Ok(())
    }
}

/// Result of one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: Result<VideoRecord, ClientError>,
}

/// Per-file results of a batch, in submission order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub outcomes: Vec<FileOutcome>,
}

impl UploadReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &VideoRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &ClientError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} files uploaded, {} failed",
            self.success_count(),
            self.outcomes.len(),
            self.failure_count()
        )
    }
}

pub struct UploadCoordinator {
    backend: Arc<dyn RecognitionBackend>,
    catalog: Catalog,
    progress: Arc<dyn ProgressTracker>,
    settle_delay: Duration,
    operator: String,
    pending: Mutex<Vec<SelectedFile>>,
    busy: AtomicBool,
}

impl UploadCoordinator {
    pub fn new(
        backend: Arc<dyn RecognitionBackend>,
        catalog: Catalog,
        progress: Arc<dyn ProgressTracker>,
        settle_delay: Duration,
        session: &AdminSession,
    ) -> Self {
        Self {
            backend,
            catalog,
            progress,
            settle_delay,
            operator: session.email().to_string(),
            pending: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn progress(&self) -> &Arc<dyn ProgressTracker> {
        &self.progress
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Add files to the pending set. Rejected while a batch is running.
    pub async fn select_files(&self, files: Vec<SelectedFile>) -> Result<(), ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy("upload"));
        }
        self.pending.lock().await.extend(files);
        Ok(())
    }

    /// Drop a pending file before submission. Removes the first file with that name.
    pub async fn remove_file(&self, file_name: &str) -> Result<bool, ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy("upload"));
        }
        let mut pending = self.pending.lock().await;
        match pending.iter().position(|f| f.file_name == file_name) {
            Some(index) => {
                pending.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn pending_files(&self) -> Vec<SelectedFile> {
        self.pending.lock().await.clone()
    }

    /// Select `files` and submit them as one batch.
    pub async fn upload(
        &self,
        files: Vec<SelectedFile>,
        form: &UploadForm,
    ) -> Result<UploadReport, ClientError> {
        self.select_files(files).await?;
        self.submit(form).await
    }

    /// Submit every pending file with the shared `form` metadata.
    ///
    /// Fails without any network call if the form or the pending set is invalid, or
    /// if another batch is still running. Otherwise always returns a report, even
    /// when every file failed.
    #[tracing::instrument(
        skip(self, form),
        fields(operator = %self.operator, department = %form.department, location = %form.location)
    )]
    pub async fn submit(&self, form: &UploadForm) -> Result<UploadReport, ClientError> {
        let Some(_guard) = BusyGuard::try_acquire(&self.busy) else {
            return Err(ClientError::Busy("upload"));
        };

        form.validate()?;
        let files = self.pending.lock().await.clone();
        if files.is_empty() {
            return Err(ClientError::validation("Select at least one video file"));
        }

        tracing::info!(files = files.len(), "Starting upload batch");
        let mut report = UploadReport::default();

        for file in files {
            let file_name = file.file_name.clone();
            let task = UploadTask {
                file,
                department: form.department.trim().to_string(),
                location: form.location.trim().to_string(),
                time_window: form.time_window,
            };
            let span = tracing::info_span!("upload_file", file = %file_name, size = task.size_bytes());
            let result = self.upload_one(&task).instrument(span).await;
            report.outcomes.push(FileOutcome { file_name, result });
        }

        tracing::info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "Upload batch settled"
        );

        tokio::time::sleep(self.settle_delay).await;
        self.pending.lock().await.clear();
        self.progress.clear().await;

        Ok(report)
    }

    async fn upload_one(&self, task: &UploadTask) -> Result<VideoRecord, ClientError> {
        let key = task.file_name();
        self.progress.start(key).await;

        match self.backend.upload_video(task).await {
            Ok(record) => {
                self.progress.complete(key).await;
                self.catalog.prepend_video(record.clone()).await;
                tracing::info!(video_id = %record.id, "File uploaded");
                Ok(record)
            }
            Err(e) => {
                self.progress.abandon(key).await;
                tracing::warn!(error = %e, "File upload failed");
                Err(e)
            }
        }
    }
}

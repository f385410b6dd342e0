//! Record deletion.
//!
//! The local catalog is only touched after the backend confirmed the delete; a
//! failed call leaves it as it was and returns the server's error.

use mpi_api_client::RecognitionBackend;
use mpi_core::ClientError;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::session::AdminSession;

pub struct RecordDeleter {
    backend: Arc<dyn RecognitionBackend>,
    catalog: Catalog,
    operator: String,
}

impl RecordDeleter {
    pub fn new(backend: Arc<dyn RecognitionBackend>, catalog: Catalog, session: &AdminSession) -> Self {
        Self {
            backend,
            catalog,
            operator: session.email().to_string(),
        }
    }

    #[tracing::instrument(skip(self), fields(operator = %self.operator))]
    pub async fn delete_video(&self, video_id: &str) -> Result<(), ClientError> {
        if video_id.trim().is_empty() {
            return Err(ClientError::validation("Video id is required"));
        }

        if let Err(e) = self.backend.delete_video(video_id).await {
            tracing::warn!(error = %e, "Video delete failed");
            return Err(e);
        }

        if !self.catalog.remove_video(video_id).await {
            tracing::debug!("Deleted video was not in the local catalog");
        }
        tracing::info!("Video deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(operator = %self.operator))]
    pub async fn delete_missing_person(&self, person_id: &str) -> Result<(), ClientError> {
        if person_id.trim().is_empty() {
            return Err(ClientError::validation("Missing person id is required"));
        }

        if let Err(e) = self.backend.delete_missing_person(person_id).await {
            tracing::warn!(error = %e, "Missing person delete failed");
            return Err(e);
        }

        self.catalog.remove_missing_person(person_id).await;
        tracing::info!("Missing person deleted");
        Ok(())
    }
}

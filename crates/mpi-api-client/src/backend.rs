//! Backend abstraction the coordinators are written against.

use async_trait::async_trait;
use mpi_core::models::{
    MissingPersonRecord, MissingPersonReport, OpenSearch, ReportReceipt, SearchHistoryEntry,
    TargetedSearch, UploadTask, VideoRecord,
};
use mpi_core::ClientError;

use crate::decode::RawResponse;
use crate::ApiClient;

/// Operations of the recognition backend used by the coordinators.
///
/// Search methods return the undecoded response so a non-success status is not an
/// error at this level; only transport failures are.
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, ClientError>;

    async fn list_available_videos(&self) -> Result<Vec<VideoRecord>, ClientError>;

    async fn list_missing_persons(&self) -> Result<Vec<MissingPersonRecord>, ClientError>;

    async fn list_search_history(&self) -> Result<Vec<SearchHistoryEntry>, ClientError>;

    async fn upload_video(&self, task: &UploadTask) -> Result<VideoRecord, ClientError>;

    async fn delete_video(&self, video_id: &str) -> Result<(), ClientError>;

    async fn delete_missing_person(&self, person_id: &str) -> Result<(), ClientError>;

    async fn search_person_in_video(
        &self,
        search: &TargetedSearch,
    ) -> Result<RawResponse, ClientError>;

    async fn search_missing_person(&self, search: &OpenSearch)
        -> Result<RawResponse, ClientError>;

    async fn report_missing_person(
        &self,
        report: &MissingPersonReport,
    ) -> Result<ReportReceipt, ClientError>;
}

#[async_trait]
impl RecognitionBackend for ApiClient {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        ApiClient::list_videos(self).await
    }

    async fn list_available_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        ApiClient::list_available_videos(self).await
    }

    async fn list_missing_persons(&self) -> Result<Vec<MissingPersonRecord>, ClientError> {
        ApiClient::list_missing_persons(self).await
    }

    async fn list_search_history(&self) -> Result<Vec<SearchHistoryEntry>, ClientError> {
        ApiClient::list_search_history(self).await
    }

    async fn upload_video(&self, task: &UploadTask) -> Result<VideoRecord, ClientError> {
        ApiClient::upload_video(self, task).await
    }

    async fn delete_video(&self, video_id: &str) -> Result<(), ClientError> {
        ApiClient::delete_video(self, video_id).await
    }

    async fn delete_missing_person(&self, person_id: &str) -> Result<(), ClientError> {
        ApiClient::delete_missing_person(self, person_id).await
    }

    async fn search_person_in_video(
        &self,
        search: &TargetedSearch,
    ) -> Result<RawResponse, ClientError> {
        ApiClient::search_person_in_video(self, search).await
    }

    async fn search_missing_person(
        &self,
        search: &OpenSearch,
    ) -> Result<RawResponse, ClientError> {
        ApiClient::search_missing_person(self, search).await
    }

    async fn report_missing_person(
        &self,
        report: &MissingPersonReport,
    ) -> Result<ReportReceipt, ClientError> {
        ApiClient::report_missing_person(self, report).await
    }
}

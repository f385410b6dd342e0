//! Search coordination.
//!
//! One search runs at a time per coordinator; a call made while another is pending
//! returns `Ok(None)` without touching the backend. The decoded result is kept in a
//! display slot that is emptied when the next search starts or on [`SearchCoordinator::release`],
//! which frees the matched frame.

use mpi_api_client::{decode_search_response, RecognitionBackend};
use mpi_core::models::{OpenSearch, SearchRequest, SearchResult, TargetedSearch};
use mpi_core::{ClientError, SERVER_UNREACHABLE_MESSAGE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::catalog::CatalogSynchronizer;
use crate::session::AdminSession;
use crate::BusyGuard;

pub const NO_FOOTAGE_MESSAGE: &str = "No footage is available to search. Upload videos first.";

pub struct SearchCoordinator {
    backend: Arc<dyn RecognitionBackend>,
    synchronizer: CatalogSynchronizer,
    operator: Option<String>,
    in_flight: AtomicBool,
    displayed: Mutex<Option<SearchResult>>,
}

impl SearchCoordinator {
    pub fn new(backend: Arc<dyn RecognitionBackend>, synchronizer: CatalogSynchronizer) -> Self {
        Self {
            backend,
            synchronizer,
            operator: None,
            in_flight: AtomicBool::new(false),
            displayed: Mutex::new(None),
        }
    }

    /// Enable targeted searches for the given operator.
    pub fn with_admin(mut self, session: &AdminSession) -> Self {
        self.operator = Some(session.email().to_string());
        self
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `request`. `Ok(None)` means another search was already in flight.
    pub async fn search(&self, request: SearchRequest) -> Result<Option<SearchResult>, ClientError> {
        let Some(_guard) = BusyGuard::try_acquire(&self.in_flight) else {
            tracing::debug!(kind = request.kind(), "Search already in flight, ignoring");
            return Ok(None);
        };

        self.release().await;

        let result = match &request {
            SearchRequest::Open(search) => self.run_open(search).await?,
            SearchRequest::Targeted(search) => self.run_targeted(search).await?,
        };

        // Search counts and history change server-side as a side effect. The operator
        // collections are only re-read when an operator session is attached.
        if matches!(request, SearchRequest::Open(_)) {
            if let Err(e) = self.synchronizer.sync_available_videos().await {
                tracing::warn!(error = %e, "Available footage refresh after search failed");
            }
        }
        if self.operator.is_some() {
            if let Err(e) = self.synchronizer.sync().await {
                tracing::warn!(error = %e, "Catalog refresh after search failed");
            }
        }

        *self.displayed.lock().await = Some(result.clone());
        Ok(Some(result))
    }

    pub async fn search_open(&self, search: OpenSearch) -> Result<Option<SearchResult>, ClientError> {
        self.search(SearchRequest::Open(search)).await
    }

    pub async fn search_targeted(
        &self,
        search: TargetedSearch,
    ) -> Result<Option<SearchResult>, ClientError> {
        self.search(SearchRequest::Targeted(search)).await
    }

    /// Result currently shown, if any.
    pub async fn displayed(&self) -> Option<SearchResult> {
        self.displayed.lock().await.clone()
    }

    /// Stop displaying the current result and free its image.
    pub async fn release(&self) {
        if let Some(previous) = self.displayed.lock().await.take() {
            if let Some(image) = previous.image() {
                tracing::debug!(bytes = image.len(), "Released displayed match image");
            }
        }
    }

    #[tracing::instrument(skip(self, search), fields(shirt = %search.shirt_color))]
    async fn run_open(&self, search: &OpenSearch) -> Result<SearchResult, ClientError> {
        if search.photo.is_empty() {
            return Err(ClientError::validation("A target photo is required"));
        }
        if search.shirt_color.trim().is_empty() {
            return Err(ClientError::validation("Shirt color is required"));
        }

        let catalog = self.synchronizer.catalog();
        if catalog.available_videos().await.is_empty() && catalog.videos().await.is_empty() {
            return Err(ClientError::validation(NO_FOOTAGE_MESSAGE));
        }

        tracing::info!("Running open search");
        let response = self.backend.search_missing_person(search).await;
        Self::decode(response)
    }

    #[tracing::instrument(
        skip(self, search),
        fields(operator = ?self.operator, person_id = %search.person_id, video_id = %search.video_id)
    )]
    async fn run_targeted(&self, search: &TargetedSearch) -> Result<SearchResult, ClientError> {
        if self.operator.is_none() {
            return Err(ClientError::Unauthorized(
                "Targeted search requires an operator session".to_string(),
            ));
        }
        if search.person_id.trim().is_empty() || search.video_id.trim().is_empty() {
            return Err(ClientError::validation(
                "Select both a missing person and a video",
            ));
        }

        let catalog = self.synchronizer.catalog();
        if !catalog.has_missing_person(&search.person_id).await {
            return Err(ClientError::validation(format!(
                "Unknown missing person: {}",
                search.person_id
            )));
        }
        if !catalog.has_video(&search.video_id).await {
            return Err(ClientError::validation(format!(
                "Unknown video: {}",
                search.video_id
            )));
        }

        tracing::info!("Running targeted search");
        let response = self.backend.search_person_in_video(search).await;
        Self::decode(response)
    }

    fn decode(
        response: Result<mpi_api_client::RawResponse, ClientError>,
    ) -> Result<SearchResult, ClientError> {
        match response {
            Ok(raw) => Ok(decode_search_response(raw)),
            Err(ClientError::Transport(e)) => {
                tracing::warn!(error = %e, "Search request did not reach the server");
                Ok(SearchResult::no_match(SERVER_UNREACHABLE_MESSAGE))
            }
            Err(e) => Err(e),
        }
    }
}

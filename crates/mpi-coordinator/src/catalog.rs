//! Session-local catalog of server-side collections and its synchronizer.

use chrono::{DateTime, Utc};
use mpi_api_client::RecognitionBackend;
use mpi_core::models::{MissingPersonRecord, SearchHistoryEntry, VideoRecord};
use mpi_core::ClientError;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Local copy of the backend collections.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub videos: Vec<VideoRecord>,
    /// Footage the open search can run against.
    pub available_videos: Vec<VideoRecord>,
    pub missing_persons: Vec<MissingPersonRecord>,
    pub search_history: Vec<SearchHistoryEntry>,
    pub last_synced: Option<DateTime<Utc>>,
}

/// Shared handle to the catalog.
///
/// Only [`CatalogSynchronizer`] replaces collections wholesale; upload and delete
/// apply their own narrow edits through the crate-private mutators.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogState>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.inner.read().await.clone()
    }

    pub async fn videos(&self) -> Vec<VideoRecord> {
        self.inner.read().await.videos.clone()
    }

    pub async fn available_videos(&self) -> Vec<VideoRecord> {
        self.inner.read().await.available_videos.clone()
    }

    pub async fn missing_persons(&self) -> Vec<MissingPersonRecord> {
        self.inner.read().await.missing_persons.clone()
    }

    pub async fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.inner.read().await.search_history.clone()
    }

    pub async fn has_video(&self, video_id: &str) -> bool {
        self.inner.read().await.videos.iter().any(|v| v.id == video_id)
    }

    pub async fn has_missing_person(&self, person_id: &str) -> bool {
        self.inner
            .read()
            .await
            .missing_persons
            .iter()
            .any(|p| p.id == person_id)
    }

    pub(crate) async fn replace_collections(
        &self,
        videos: Vec<VideoRecord>,
        missing_persons: Vec<MissingPersonRecord>,
        search_history: Vec<SearchHistoryEntry>,
    ) {
        let mut state = self.inner.write().await;
        state.videos = videos;
        state.missing_persons = missing_persons;
        state.search_history = search_history;
        state.last_synced = Some(Utc::now());
    }

    pub(crate) async fn replace_available_videos(&self, videos: Vec<VideoRecord>) {
        self.inner.write().await.available_videos = videos;
    }

    /// Put a freshly uploaded record at the front, replacing any record with the same id.
    pub(crate) async fn prepend_video(&self, video: VideoRecord) {
        let mut state = self.inner.write().await;
        state.videos.retain(|v| v.id != video.id);
        state.videos.insert(0, video);
    }

    /// Remove the first video with `video_id`. Returns whether one was found.
    pub(crate) async fn remove_video(&self, video_id: &str) -> bool {
        let mut state = self.inner.write().await;
        let removed = match state.videos.iter().position(|v| v.id == video_id) {
            Some(index) => {
                state.videos.remove(index);
                true
            }
            None => false,
        };
        if let Some(index) = state.available_videos.iter().position(|v| v.id == video_id) {
            state.available_videos.remove(index);
        }
        removed
    }

    pub(crate) async fn remove_missing_person(&self, person_id: &str) -> bool {
        let mut state = self.inner.write().await;
        match state.missing_persons.iter().position(|p| p.id == person_id) {
            Some(index) => {
                state.missing_persons.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Refreshes the [`Catalog`] from the backend.
#[derive(Clone)]
pub struct CatalogSynchronizer {
    backend: Arc<dyn RecognitionBackend>,
    catalog: Catalog,
}

impl CatalogSynchronizer {
    pub fn new(backend: Arc<dyn RecognitionBackend>, catalog: Catalog) -> Self {
        Self { backend, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetch videos, missing persons and search history concurrently and replace all
    /// three together. If any read fails nothing is written and that single error is
    /// returned.
    pub async fn sync(&self) -> Result<(), ClientError> {
        let fetched = tokio::try_join!(
            self.backend.list_videos(),
            self.backend.list_missing_persons(),
            self.backend.list_search_history(),
        );

        let (videos, missing_persons, search_history) = match fetched {
            Ok(collections) => collections,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog refresh failed, keeping previous state");
                return Err(e);
            }
        };

        tracing::debug!(
            videos = videos.len(),
            missing_persons = missing_persons.len(),
            search_history = search_history.len(),
            "Catalog refreshed"
        );
        self.catalog
            .replace_collections(videos, missing_persons, search_history)
            .await;
        Ok(())
    }

    /// Refresh the footage list used by the open search.
    pub async fn sync_available_videos(&self) -> Result<(), ClientError> {
        match self.backend.list_available_videos().await {
            Ok(videos) => {
                tracing::debug!(videos = videos.len(), "Available footage refreshed");
                self.catalog.replace_available_videos(videos).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Available footage refresh failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{history_entry, missing_person, video, MockBackend};

    fn synchronizer(backend: &Arc<MockBackend>) -> CatalogSynchronizer {
        CatalogSynchronizer::new(backend.clone(), Catalog::new())
    }

    #[tokio::test]
    async fn test_sync_replaces_all_collections() {
        let backend = Arc::new(MockBackend::new());
        backend.set_videos(vec![video("v1", "a.mp4"), video("v2", "b.mp4")]);
        backend.set_missing_persons(vec![missing_person("p1", "Jane Doe")]);
        backend.set_search_history(vec![history_entry("r1", "p1", "v1")]);

        let sync = synchronizer(&backend);
        sync.sync().await.unwrap();

        let state = sync.catalog().snapshot().await;
        assert_eq!(state.videos.len(), 2);
        assert_eq!(state.missing_persons.len(), 1);
        assert_eq!(state.search_history.len(), 1);
        assert!(state.last_synced.is_some());
    }

    #[tokio::test]
    async fn test_partial_failure_mutates_nothing() {
        let backend = Arc::new(MockBackend::new());
        backend.set_videos(vec![video("v1", "a.mp4")]);
        backend.set_missing_persons(vec![missing_person("p1", "Jane Doe")]);
        let sync = synchronizer(&backend);
        sync.sync().await.unwrap();
        let before = sync.catalog().snapshot().await;

        backend.set_videos(vec![video("v9", "new.mp4")]);
        backend.set_missing_persons(vec![]);
        backend.fail_list("search_history");

        let err = sync.sync().await.unwrap_err();
        assert!(matches!(err, ClientError::Application { .. }));

        let after = sync.catalog().snapshot().await;
        assert_eq!(after.videos, before.videos);
        assert_eq!(after.missing_persons, before.missing_persons);
        assert_eq!(after.search_history, before.search_history);
        assert_eq!(after.last_synced, before.last_synced);
    }

    #[tokio::test]
    async fn test_reads_are_issued_for_all_three_collections() {
        let backend = Arc::new(MockBackend::new());
        synchronizer(&backend).sync().await.unwrap();

        let calls = backend.calls();
        for name in ["list_videos", "list_missing_persons", "list_search_history"] {
            assert!(calls.iter().any(|c| c == name), "missing call {}", name);
        }
    }

    #[tokio::test]
    async fn test_sync_available_videos() {
        let backend = Arc::new(MockBackend::new());
        backend.set_available_videos(vec![video("v1", "a.mp4")]);
        let sync = synchronizer(&backend);

        sync.sync_available_videos().await.unwrap();
        assert_eq!(sync.catalog().available_videos().await.len(), 1);
        assert!(sync.catalog().videos().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_video_removes_first_match_only() {
        let catalog = Catalog::new();
        catalog
            .replace_collections(
                vec![video("v1", "a.mp4"), video("v2", "b.mp4"), video("v1", "c.mp4")],
                vec![],
                vec![],
            )
            .await;

        assert!(catalog.remove_video("v1").await);
        let videos = catalog.videos().await;
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id, "v2");
        assert_eq!(videos[1].filename, "c.mp4");

        assert!(!catalog.remove_video("missing").await);
        assert_eq!(catalog.videos().await.len(), 2);
    }

    #[tokio::test]
    async fn test_prepend_video_replaces_same_id() {
        let catalog = Catalog::new();
        catalog.prepend_video(video("v1", "a.mp4")).await;
        catalog.prepend_video(video("v2", "b.mp4")).await;
        catalog.prepend_video(video("v1", "a2.mp4")).await;

        let videos = catalog.videos().await;
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].filename, "a2.mp4");
        assert_eq!(videos[1].id, "v2");
    }
}

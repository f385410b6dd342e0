//! Orchestration core of the missing-person intelligence client.
//!
//! Turns operator input into correctly sequenced backend calls and normalises what
//! comes back:
//!
//! - [`UploadCoordinator`] submits a batch of footage files one after another, each
//!   with its own simulated progress entry.
//! - [`SearchCoordinator`] runs one search at a time and decodes the result into
//!   [`SearchResult`](mpi_core::models::SearchResult).
//! - [`CatalogSynchronizer`] refreshes the local [`Catalog`] all-or-nothing.
//! - [`RecordDeleter`] and [`ReportSubmitter`] cover the remaining mutations.
//!
//! Admin-only operations require an [`AdminSession`].

pub mod catalog;
pub mod delete;
pub mod progress;
pub mod report;
pub mod search;
pub mod session;
pub mod upload;

#[cfg(test)]
pub mod test_helpers;

pub use catalog::{Catalog, CatalogState, CatalogSynchronizer};
pub use delete::RecordDeleter;
pub use progress::{ProgressTracker, SimulatedProgress};
pub use report::ReportSubmitter;
pub use search::SearchCoordinator;
pub use session::{AdminSession, StaticCredentials};
pub use upload::{FileOutcome, UploadCoordinator, UploadForm, UploadReport};

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds an in-flight flag for as long as it lives.
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    /// `None` if the flag is already held.
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

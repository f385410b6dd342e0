//! Missing-person report submission.

use mpi_api_client::RecognitionBackend;
use mpi_core::models::{MissingPersonReport, ReportReceipt};
use mpi_core::ClientError;
use std::sync::Arc;

use crate::catalog::CatalogSynchronizer;

/// Submits citizen reports. No operator session is needed.
pub struct ReportSubmitter {
    backend: Arc<dyn RecognitionBackend>,
    synchronizer: Option<CatalogSynchronizer>,
}

impl ReportSubmitter {
    pub fn new(backend: Arc<dyn RecognitionBackend>) -> Self {
        Self {
            backend,
            synchronizer: None,
        }
    }

    /// Refresh the catalog after each accepted report.
    pub fn with_synchronizer(mut self, synchronizer: CatalogSynchronizer) -> Self {
        self.synchronizer = Some(synchronizer);
        self
    }

    pub async fn submit(&self, report: &MissingPersonReport) -> Result<ReportReceipt, ClientError> {
        validate(report)?;

        let receipt = self.backend.report_missing_person(report).await?;
        tracing::info!(person_id = %receipt.person_id, "Missing person report accepted");

        if let Some(synchronizer) = &self.synchronizer {
            if let Err(e) = synchronizer.sync().await {
                tracing::warn!(error = %e, "Catalog refresh after report failed");
            }
        }
        Ok(receipt)
    }
}

fn validate(report: &MissingPersonReport) -> Result<(), ClientError> {
    if report.photo.is_empty() {
        return Err(ClientError::validation("A photo of the missing person is required"));
    }
    if report.name.trim().is_empty() {
        return Err(ClientError::validation("Name is required"));
    }
    if report.shirt_color.trim().is_empty() {
        return Err(ClientError::validation("Shirt color is required"));
    }
    Ok(())
}

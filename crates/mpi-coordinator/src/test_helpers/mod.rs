//! Test helpers for coordinator unit tests
//!
//! This module provides an in-memory [`RecognitionBackend`](mpi_api_client::RecognitionBackend)
//! and fixtures, so coordinators can be tested without a server.

pub mod fixtures;
pub mod mock_backend;

pub use fixtures::*;
pub use mock_backend::*;

use crate::session::{AdminSession, StaticCredentials};
use mpi_core::AdminCredentials;

/// Open an operator session against a throwaway credential store.
pub fn admin_session() -> AdminSession {
    StaticCredentials::new(Some(AdminCredentials {
        email: "officer@example.gov".to_string(),
        password: "secret".to_string(),
    }))
    .authenticate("officer@example.gov", "secret")
    .unwrap()
}

//! MPI Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the API client, the upload/search coordinators and the command-line front end.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AdminCredentials, ClientConfig, ProgressSettings};
pub use error::{ClientError, ErrorMetadata, LogLevel, SERVER_UNREACHABLE_MESSAGE};

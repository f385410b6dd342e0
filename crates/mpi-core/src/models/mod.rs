//! Data models for the client
//!
//! Records mirror what the recognition backend returns; request types describe what
//! the coordinators send. Each sub-module represents a specific feature area.

mod person;
mod search;
mod upload;
mod video;

// Re-export all models for convenient imports
pub use person::*;
pub use search::*;
pub use upload::*;
pub use video::*;

//! Depot API Library
//!
//! HTTP surface, upload orchestration and application setup.

mod api_doc;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{StoredFile, UploadService};

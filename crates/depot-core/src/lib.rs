//! Depot Core Library
//!
//! This crate provides the domain model, error types and configuration
//! shared across all Depot components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileRecord, FileResponse, FileStatus, PreviewResponse};

//! Upload orchestration
//!
//! `UploadService` is the single entry point for storing, reading and
//! previewing files. Every operation runs on the upload worker pool.

mod service;

pub use service::{StoredFile, UploadService};

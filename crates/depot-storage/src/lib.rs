//! Depot Storage Library
//!
//! This crate provides the storage abstraction and the local filesystem
//! backend that persists upload bytes.
//!
//! # Storage path format
//!
//! Every stored object lives directly under the storage root as
//! `{id}_{sanitized name}`. Paths must not contain `..`, a leading `/` or
//! any separator. Path generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{sanitize_filename, storage_path_for};
pub use local::LocalStorage;
pub use traits::{collect_stream, ByteStream, Storage, StorageError, StorageResult};

//! Metadata store for file records
//!
//! The upload pipeline only depends on [`FileRecordRepository`]. Two backends
//! implement it: an in-memory map used by default and in tests, and a
//! PostgreSQL repository used when `DATABASE_URL` is configured.

pub mod file_record;
pub mod memory;
pub mod pool;

pub use file_record::{FileRecordRepository, FileRecordRow, PgFileRecordRepository};
pub use memory::InMemoryFileRecordRepository;
pub use pool::setup_database;

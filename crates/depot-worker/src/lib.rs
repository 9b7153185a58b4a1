//! Depot Worker Library
//!
//! A bounded pool that runs upload jobs off the request path. Callers get a
//! [`JobHandle`] back immediately and await it for the job's result.

pub mod pool;

pub use pool::{JobHandle, WorkerError, WorkerPool};

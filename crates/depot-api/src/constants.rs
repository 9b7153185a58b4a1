/// Prefix for all file routes.
pub const API_PREFIX: &str = "/api/v0";

/// Requests served concurrently before new ones queue.
pub const HTTP_CONCURRENCY_LIMIT: usize = 256;

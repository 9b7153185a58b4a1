//! Test helpers: build AppState and router for integration tests.
//!
//! Metadata lives in memory and files under a temporary directory, so no
//! external services are needed.

pub mod fixtures;

use axum_test::TestServer;
use depot_api::setup::{self, routes};
use depot_api::state::AppState;
use depot_core::Config;
use depot_db::{FileRecordRepository, InMemoryFileRecordRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0/files`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", depot_api::constants::API_PREFIX, path)
}

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of objects currently in the storage root.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.storage_root)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test app after applying `customize` to the default config.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage_root = temp_dir.path().join("uploadedFiles");

    let mut config = Config {
        storage_root: storage_root.to_string_lossy().into_owned(),
        ..Config::default()
    };
    customize(&mut config);

    let storage = setup::storage::setup_storage(&config)
        .await
        .expect("Failed to create storage");
    let repository: Arc<dyn FileRecordRepository> = Arc::new(InMemoryFileRecordRepository::new());

    let state = setup::build_state(config.clone(), repository, storage);
    let app = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        storage_root,
        _temp_dir: temp_dir,
    }
}

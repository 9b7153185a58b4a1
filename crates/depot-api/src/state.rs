//! Application state shared by all handlers.

use depot_core::Config;

use crate::services::upload::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upload: UploadService,
}

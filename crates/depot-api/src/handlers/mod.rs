pub mod file_download;
pub mod file_get;
pub mod file_preview;
pub mod file_upload;
pub mod health;

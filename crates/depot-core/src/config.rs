//! Configuration module
//!
//! `Config` is loaded once from the environment at startup. Components never
//! read the environment themselves: they receive an [`UploadConfig`] or a
//! storage root when they are constructed.

use std::env;

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_PREVIEW_JPEG_QUALITY, DEFAULT_PREVIEW_SCALE,
    DEFAULT_STORAGE_ROOT,
};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const UPLOAD_MAX_WORKERS: usize = 4;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;

/// Upload policy handed to the validator, the preview generator and the
/// upload orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadConfig {
    /// Content types accepted for upload, matched exactly.
    pub allowed_content_types: Vec<String>,
    /// Scale applied to image uploads when deriving their preview, `0 < scale < 1`.
    pub preview_scale: f64,
    /// JPEG quality of generated previews (1..=100).
    pub preview_jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preview_scale: DEFAULT_PREVIEW_SCALE,
            preview_jpeg_quality: DEFAULT_PREVIEW_JPEG_QUALITY,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub storage_root: String,
    pub max_upload_size_bytes: usize,
    pub upload_max_workers: usize,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub upload: UploadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            storage_root: DEFAULT_STORAGE_ROOT.to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            upload_max_workers: UPLOAD_MAX_WORKERS,
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            db_timeout_seconds: DB_TIMEOUT_SECS,
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let allowed_content_types = match env::var("ALLOWED_CONTENT_TYPES") {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => UploadConfig::default().allowed_content_types,
        };

        let preview_scale = match env::var("PREVIEW_SCALE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("PREVIEW_SCALE must be a number, got {:?}", raw))?,
            Err(_) => DEFAULT_PREVIEW_SCALE,
        };

        let preview_jpeg_quality = env::var("PREVIEW_JPEG_QUALITY")
            .unwrap_or_else(|_| DEFAULT_PREVIEW_JPEG_QUALITY.to_string())
            .parse::<u8>()
            .unwrap_or(DEFAULT_PREVIEW_JPEG_QUALITY)
            .clamp(1, 100);

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            storage_root: env::var("STORAGE_ROOT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            upload_max_workers: env::var("UPLOAD_MAX_WORKERS")
                .unwrap_or_else(|_| UPLOAD_MAX_WORKERS.to_string())
                .parse()
                .unwrap_or(UPLOAD_MAX_WORKERS),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DB_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DB_MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DB_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DB_TIMEOUT_SECS),
            upload: UploadConfig {
                allowed_content_types,
                preview_scale,
                preview_jpeg_quality,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let scale = self.upload.preview_scale;
        if !(scale > 0.0 && scale < 1.0) {
            return Err(anyhow::anyhow!(
                "PREVIEW_SCALE must be strictly between 0 and 1, got {}",
                scale
            ));
        }

        if self.upload.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        if self.upload_max_workers == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_WORKERS must be at least 1"));
        }

        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload
    }
}

//! Depot Processing Library
//!
//! Upload validation and preview generation. Everything here is
//! storage-agnostic: bytes come from and go to a [`depot_storage::Storage`],
//! records from and to a [`depot_db::FileRecordRepository`].

pub mod image;
pub mod preview;
pub mod validator;

pub use self::image::PreviewImage;
pub use preview::PreviewGenerator;
pub use validator::{MediaValidator, ValidationError};

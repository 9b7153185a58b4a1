//! Image processing module
//!
//! Raster work behind preview generation: resampling filter choice
//! (resize) and decode, flatten, scale and JPEG encode (preview).
//! All functions here are synchronous and CPU bound; callers run them on
//! the blocking thread pool.

pub mod preview;
pub mod resize;

pub use preview::{PreviewImage, RenderedPreview};
pub use resize::ImageResize;

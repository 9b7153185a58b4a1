//! Fixed values shared by the upload pipeline.

/// Content types accepted by default when `ALLOWED_CONTENT_TYPES` is not set.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/tiff",
    // Documents
    "application/pdf",
    "application/msword",
    "text/plain",
    "text/csv",
    "application/rtf",
];

/// Prefix that marks a content type as an image eligible for a preview.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// Scale applied to image uploads when deriving their preview.
pub const DEFAULT_PREVIEW_SCALE: f64 = 0.5;

/// JPEG quality used for previews (matches the "normal" compression preset).
pub const DEFAULT_PREVIEW_JPEG_QUALITY: u8 = 75;

/// Content type of every generated preview.
pub const PREVIEW_CONTENT_TYPE: &str = "image/jpeg";

/// Suffix appended to the original name to build the preview's name.
pub const PREVIEW_NAME_SUFFIX: &str = "_preview.jpg";

/// Default storage root, relative to the working directory.
pub const DEFAULT_STORAGE_ROOT: &str = "uploadedFiles";

use std::io::Cursor;

use depot_core::AppError;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageReader, Rgba, RgbaImage};

use super::resize::ImageResize;

/// Encoded preview plus its pixel size.
#[derive(Debug, Clone)]
pub struct RenderedPreview {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Preview renderer
pub struct PreviewImage;

impl PreviewImage {
    /// Decode `data`, scale it by `scale` and encode the result as JPEG.
    ///
    /// Transparency is flattened onto white before resampling.
    pub fn render(data: &[u8], scale: f64, quality: u8) -> Result<RenderedPreview, AppError> {
        Self::validate_scale(scale)?;

        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| AppError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| AppError::Decode(e.to_string()))?;

        let (src_w, src_h) = (img.width(), img.height());
        let (width, height) = ImageResize::scaled_dimensions(src_w, src_h, scale);
        if width == 0 || height == 0 {
            return Err(AppError::InvalidScale(format!(
                "scale {} reduces {}x{} to {}x{}",
                scale, src_w, src_h, width, height
            )));
        }

        let flattened = Self::flatten(&img);
        let filter = ImageResize::select_filter(src_w, src_h, width, height);
        let resized = imageops::resize(&flattened, width, height, filter);

        let mut buffer = Vec::with_capacity((width * height) as usize);
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .encode_image(&resized)
            .map_err(|e| AppError::Encode(e.to_string()))?;

        Ok(RenderedPreview {
            data: buffer,
            width,
            height,
        })
    }

    /// Reject scales outside the open interval `(0, 1)`.
    pub fn validate_scale(scale: f64) -> Result<(), AppError> {
        if scale.is_finite() && scale > 0.0 && scale < 1.0 {
            Ok(())
        } else {
            Err(AppError::InvalidScale(format!(
                "scale must be strictly between 0 and 1, got {}",
                scale
            )))
        }
    }

    /// Composite the image over an opaque white canvas.
    fn flatten(img: &DynamicImage) -> image::RgbImage {
        let mut canvas = RgbaImage::from_pixel(img.width(), img.height(), Rgba([255, 255, 255, 255]));
        imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
        DynamicImage::ImageRgba8(canvas).to_rgb8()
    }
}

use image::imageops::FilterType;

/// Resampling helpers
pub struct ImageResize;

impl ImageResize {
    /// Target size for a uniform scale: `floor(w * scale) x floor(h * scale)`.
    pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
        let w = (width as f64 * scale).floor() as u32;
        let h = (height as f64 * scale).floor() as u32;
        (w, h)
    }

    /// Pick a smooth downsampling filter for the given reduction.
    ///
    /// Large reductions use Triangle (cheap, no ringing at high ratios);
    /// moderate ones CatmullRom; anything smaller gets Lanczos3.
    pub fn select_filter(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> FilterType {
        let ratio_w = src_w as f32 / dst_w.max(1) as f32;
        let ratio_h = src_h as f32 / dst_h.max(1) as f32;
        let max_ratio = ratio_w.max(ratio_h);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_dimensions_floor() {
        assert_eq!(ImageResize::scaled_dimensions(101, 51, 0.5), (50, 25));
        assert_eq!(ImageResize::scaled_dimensions(1, 1, 0.5), (0, 0));
        assert_eq!(ImageResize::scaled_dimensions(300, 200, 0.25), (75, 50));
    }

    #[test]
    fn test_select_filter_by_ratio() {
        assert_eq!(ImageResize::select_filter(1000, 1000, 100, 100), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(200, 200, 100, 100), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(120, 120, 100, 100), FilterType::Lanczos3);
    }
}

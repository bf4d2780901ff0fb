//! Image preprocessing for OCR.

use std::path::Path;

use image::{imageops, DynamicImage, GenericImageView, GrayImage, ImageError, Luma};
use tracing::debug;

/// Turns an invoice scan into the single-channel image handed to OCR.
pub struct ImagePreprocessor {
    /// Maximum image dimension; 0 keeps the original size.
    max_size: u32,
    /// Apply adaptive thresholding after the grayscale conversion.
    binarize: bool,
}

impl ImagePreprocessor {
    /// Create a new preprocessor that only converts to grayscale.
    pub fn new() -> Self {
        Self {
            max_size: 0,
            binarize: false,
        }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Enable or disable adaptive thresholding.
    pub fn with_binarize(mut self, binarize: bool) -> Self {
        self.binarize = binarize;
        self
    }

    /// Load an image from disk and prepare it.
    pub fn load(&self, path: &Path) -> Result<GrayImage, ImageError> {
        let image = image::open(path)?;
        Ok(self.prepare(&image))
    }

    /// Convert to a single intensity channel, then resize and threshold as configured.
    pub fn prepare(&self, image: &DynamicImage) -> GrayImage {
        let (width, height) = image.dimensions();
        debug!("Original image size: {}x{}", width, height);

        let mut gray = image.to_luma8();

        if self.max_size > 0 {
            let (new_width, new_height) = self.calculate_resize_dimensions(width, height, self.max_size);
            if (new_width, new_height) != (width, height) {
                debug!("Resizing to {}x{}", new_width, new_height);
                gray = imageops::resize(&gray, new_width, new_height, imageops::FilterType::Lanczos3);
            }
        }

        if self.binarize {
            gray = self.adaptive_threshold(&gray, 15, 5);
        }

        gray
    }

    fn calculate_resize_dimensions(
        &self,
        width: u32,
        height: u32,
        target_size: u32,
    ) -> (u32, u32) {
        let max_dim = width.max(height);

        if max_dim <= target_size {
            return (width, height);
        }

        let scale = target_size as f32 / max_dim as f32;
        let new_width = (width as f32 * scale) as u32;
        let new_height = (height as f32 * scale) as u32;

        (new_width.max(1), new_height.max(1))
    }

    fn adaptive_threshold(&self, image: &GrayImage, block_size: u32, c: i32) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut result = GrayImage::new(width, height);

        let half_block = block_size / 2;

        for y in 0..height {
            for x in 0..width {
                // Local mean over the block around (x, y)
                let mut sum = 0u32;
                let mut count = 0u32;

                let y_start = y.saturating_sub(half_block);
                let y_end = (y + half_block + 1).min(height);
                let x_start = x.saturating_sub(half_block);
                let x_end = (x + half_block + 1).min(width);

                for ly in y_start..y_end {
                    for lx in x_start..x_end {
                        sum += image.get_pixel(lx, ly)[0] as u32;
                        count += 1;
                    }
                }

                let threshold = (sum / count) as i32 - c;
                let pixel_value = image.get_pixel(x, y)[0] as i32;

                let output = if pixel_value > threshold { 255 } else { 0 };
                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

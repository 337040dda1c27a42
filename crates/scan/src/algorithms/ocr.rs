use image::{imageops::{self, FilterType}, GrayImage, Luma, RgbaImage};
use tracing::debug;
use crate::{
    config::OcrPrepConfig,
    error::{ensure_dimensions, Result},
};

/// Maximum-contrast step: gray levels above 127 go white, the rest black
pub fn snap_contrast(image: &GrayImage) -> GrayImage {
    imageproc::contrast::threshold(image, 127)
}

/// Stretch gray levels to the full 0..=255 range. Flat images are returned unchanged.
pub fn normalize(image: &GrayImage) -> GrayImage {
    let (min, max) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(min, max), pixel| (min.min(pixel[0]), max.max(pixel[0])));

    if max <= min {
        return image.clone();
    }

    let range = u32::from(max - min);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = u32::from(image.get_pixel(x, y)[0] - min);
        Luma([(value * 255 / range) as u8])
    })
}

/// Resize, grayscale, snap contrast, normalize, blur and binarize an image so an OCR
/// engine sees dark glyphs on a white page.
#[derive(Debug, Clone, Default)]
pub struct OcrPreprocessor {
    pub config: OcrPrepConfig,
}

impl OcrPreprocessor {
    pub fn new(config: OcrPrepConfig) -> Self {
        Self { config }
    }

    fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let target_width = self.config.target_width;
        let scaled = f64::from(height) * f64::from(target_width) / f64::from(width);
        (target_width, (scaled.round() as u32).max(1))
    }

    pub fn prepare(&self, image: &RgbaImage) -> Result<GrayImage> {
        ensure_dimensions(image.width(), image.height())?;
        let (target_width, target_height) = self.target_size(image.width(), image.height());
        ensure_dimensions(target_width, target_height)?;

        let resized = imageops::resize(image, target_width, target_height, FilterType::Triangle);
        let gray = imageops::grayscale(&resized);
        let normalized = normalize(&snap_contrast(&gray));

        let blurred = if self.config.blur_sigma > 0.0 {
            imageproc::filter::gaussian_blur_f32(&normalized, self.config.blur_sigma)
        } else {
            normalized
        };

        // Values below the threshold go black
        let binary = match self.config.threshold.checked_sub(1) {
            Some(cutoff) => imageproc::contrast::threshold(&blurred, cutoff),
            None => GrayImage::from_pixel(blurred.width(), blurred.height(), Luma([255])),
        };

        debug!(
            from_width = image.width(),
            from_height = image.height(),
            width = target_width,
            height = target_height,
            "prepared image for OCR"
        );

        Ok(binary)
    }
}

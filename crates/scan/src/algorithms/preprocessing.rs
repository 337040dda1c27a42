use image::{GrayImage, Luma, Rgba, RgbaImage};
use tracing::debug;
use crate::{
    error::{ensure_dimensions, Result},
    traits::EdgePreprocessor,
    types::EdgeMask,
};

/// Luminance weights for R, G and B
pub const LUMA_WEIGHTS: [f32; 3] = [0.2989, 0.5870, 0.1140];

/// Gray levels strictly above this become white
pub const BINARY_THRESHOLD: f32 = 128.0;

/// Gradient magnitudes strictly above this are edges
pub const EDGE_THRESHOLD: f32 = 50.0;

/// Weighted luminance of a pixel, alpha ignored
pub fn luminance(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    LUMA_WEIGHTS[0] * f32::from(r) + LUMA_WEIGHTS[1] * f32::from(g) + LUMA_WEIGHTS[2] * f32::from(b)
}

/// Global fixed-threshold binarization to 0 / 255
pub fn binarize(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let gray = luminance(image.get_pixel(x, y));
        Luma([if gray > BINARY_THRESHOLD { 255 } else { 0 }])
    })
}

/// Central-difference gradient magnitude at an interior pixel
fn gradient_magnitude(binary: &GrayImage, x: u32, y: u32) -> f32 {
    let at = |x: u32, y: u32| f32::from(binary.get_pixel(x, y)[0]);
    let gx = at(x + 1, y) - at(x - 1, y);
    let gy = at(x, y + 1) - at(x, y - 1);
    (gx * gx + gy * gy).sqrt()
}

/// Edge classification of a binarized image. The outermost 1-pixel
/// border is never an edge.
pub fn gradient_edges(binary: &GrayImage) -> EdgeMask {
    let (width, height) = binary.dimensions();
    let mut mask = EdgeMask::new(width, height);

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            if gradient_magnitude(binary, x, y) > EDGE_THRESHOLD {
                mask.set(x, y, true);
            }
        }
    }

    mask
}

/// Grayscale, threshold and gradient edge detector
#[derive(Debug, Clone, Default)]
pub struct GradientEdgePreprocessor;

impl EdgePreprocessor for GradientEdgePreprocessor {
    fn edge_mask(&self, image: &RgbaImage) -> Result<EdgeMask> {
        ensure_dimensions(image.width(), image.height())?;

        let binary = binarize(image);
        let mask = gradient_edges(&binary);

        debug!(
            width = image.width(),
            height = image.height(),
            edge_pixels = mask.edge_count(),
            "computed edge mask"
        );

        Ok(mask)
    }
}

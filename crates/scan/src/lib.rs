//! # Image Scan Library
//!
//! Counts edge-bounded objects in raster images and provides the small
//! helpers around it: dominant-color sampling and OCR preparation.
//!
//! ## Core Features
//!
//! - **Edge Detection**: luminance, fixed threshold and central-difference gradient
//! - **Region Growing**: explicit-stack 4-connected flood fill, deterministic scan order
//! - **Filtering**: minimum area and greedy duplicate suppression
//! - **Trait-based Architecture**: swap any stage through the pipeline builder
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scan::Pipeline;
//!
//! let pipeline = Pipeline::builder().build();
//!
//! let image = image::open("photo.png")?.to_rgba8();
//! let result = pipeline.process(&image)?;
//!
//! println!("{}", result.summary());
//! result.save_json("regions.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Thresholds
//!
//! ```rust,no_run
//! use scan::{Pipeline, AreaOverlapFilter};
//!
//! let pipeline = Pipeline::builder()
//!     .set_filter(AreaOverlapFilter { min_area: 250, area_tolerance: 100 })
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod manager;

#[cfg(test)]
mod test_utils;

// Re-exports for convenience
pub use error::{ScanError, Result};
pub use types::{AnswerKind, DominantColor, EdgeMask, MathAnswer, Region, RegionSet};
pub use config::{ColorConfig, DetectorConfig, OcrPrepConfig};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::*;
pub use manager::{ScanCommand, ScanManager, ScanOutput};
pub use scan_common::{BoundingBox, Rgb};

use image::RgbaImage;

/// Counter wired with the stock edge, flood fill and filter stages
pub type DefaultObjectCounter = StandardObjectCounter<
    GradientEdgePreprocessor,
    FloodFillGrower,
    AreaOverlapFilter,
>;

impl Default for DefaultObjectCounter {
    fn default() -> Self {
        Self::new(
            GradientEdgePreprocessor,
            FloodFillGrower,
            AreaOverlapFilter::default(),
        )
    }
}

/// Accepted regions of an image with the default thresholds
pub fn detect_regions(image: &RgbaImage) -> Result<RegionSet> {
    DefaultObjectCounter::default().detect(image)
}

/// Number of objects in an image with the default thresholds
pub fn count_objects(image: &RgbaImage) -> Result<usize> {
    DefaultObjectCounter::default().count(image)
}

/// Validate a raw RGBA buffer against its dimensions and detect regions
pub fn detect_regions_raw(width: u32, height: u32, rgba: &[u8]) -> Result<RegionSet> {
    error::ensure_dimensions(width, height)?;

    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(ScanError::BufferSizeMismatch { expected, actual: rgba.len() });
    }

    let image = RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or(ScanError::BufferSizeMismatch { expected, actual: rgba.len() })?;
    detect_regions(&image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{blank_image, squares_image, BLACK, WHITE};

    #[test]
    fn test_blank_images_have_no_objects() {
        for color in [BLACK, WHITE] {
            let result = detect_regions(&blank_image(120, 90, color)).expect("Should process");
            assert!(result.is_empty());
            assert_eq!(result.image_width, 120);
            assert_eq!(result.image_height, 90);
        }
    }

    #[test]
    fn test_single_square() {
        // Edge band of an 80x80 square: 8 * 80 - 4 = 636 pixels
        let image = squares_image(200, 200, &[(40, 50, 80)]);
        let result = detect_regions(&image).expect("Should process");

        assert_eq!(result.count(), 1);
        let region = result.regions[0];
        assert_eq!(region.area, 636);
        // Square spans 40..=119 x 50..=129; the band reaches one pixel outside
        assert_eq!(region.bounding_box, BoundingBox::new(39, 120, 49, 130));
    }

    #[test]
    fn test_two_separated_squares() {
        let image = squares_image(300, 160, &[(20, 30, 70), (180, 40, 90)]);
        let result = detect_regions(&image).expect("Should process");

        assert_eq!(result.count(), 2);
        assert!(!result.regions[0].overlaps(&result.regions[1]));
    }

    #[test]
    fn test_small_squares_suppressed() {
        // 40x40 and 23x23 squares have bands of 316 and 180 pixels
        let image = squares_image(200, 100, &[(10, 10, 40), (100, 20, 23)]);
        assert_eq!(count_objects(&image).expect("Should process"), 0);
    }

    #[test]
    fn test_nested_squares_are_separate_regions() {
        // A hollow frame and a solid square inside it with very different areas
        let mut image = squares_image(240, 240, &[(20, 20, 200)]);
        crate::test_utils::draw_square(&mut image, 40, 40, 160, BLACK);
        crate::test_utils::draw_square(&mut image, 90, 90, 64, WHITE);

        let result = detect_regions(&image).expect("Should process");
        // Outer boundary, inner boundary of the frame, the solid square
        assert_eq!(result.count(), 3);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let image = squares_image(256, 256, &[(10, 10, 70), (120, 30, 100), (30, 150, 90)]);
        let first = detect_regions(&image).expect("Should process");
        let second = detect_regions(&image).expect("Should process");
        assert_eq!(first, second);
    }

    #[test]
    fn test_pipeline_matches_static_counter() {
        let image = squares_image(256, 256, &[(10, 10, 70), (120, 30, 100)]);
        let dynamic = Pipeline::default().process(&image).expect("Should process");
        let fixed = DefaultObjectCounter::default().detect(&image).expect("Should process");
        assert_eq!(dynamic, fixed);
    }

    #[test]
    fn test_builder_thresholds() {
        let image = squares_image(100, 100, &[(30, 30, 40)]);
        let pipeline = Pipeline::builder().with_min_area(300).build();
        assert_eq!(pipeline.count(&image).expect("Should process"), 1);

        let config = DetectorConfig { min_area: 316, area_tolerance: 200 };
        let pipeline = PipelineBuilder::build_with_config(&config);
        assert_eq!(pipeline.count(&image).expect("Should process"), 0);
    }

    #[test]
    fn test_square_touching_border() {
        // Only the right and bottom bands lie in the interior: 2 * 2 * 129 - 1 pixels
        let image = squares_image(200, 200, &[(0, 0, 130)]);
        let result = detect_regions(&image).expect("Should process");

        assert_eq!(result.count(), 1);
        assert_eq!(result.regions[0].area, 515);
        assert_eq!(result.regions[0].bounding_box, BoundingBox::new(1, 130, 1, 130));
    }

    #[test]
    fn test_raw_buffer() {
        let image = squares_image(160, 160, &[(40, 40, 80)]);
        let result = detect_regions_raw(160, 160, image.as_raw()).expect("Should process");
        assert_eq!(result.count(), 1);
    }

    #[test]
    fn test_raw_buffer_errors() {
        assert!(matches!(
            detect_regions_raw(0, 10, &[]),
            Err(ScanError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(matches!(
            detect_regions_raw(4, 4, &[0u8; 63]),
            Err(ScanError::BufferSizeMismatch { expected: 64, actual: 63 })
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let result = detect_regions(&RgbaImage::new(10, 0));
        assert!(matches!(result, Err(ScanError::InvalidDimensions { .. })));
    }
}

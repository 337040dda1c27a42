pub mod builder;

use image::RgbaImage;
use tracing::debug_span;
use crate::{
    error::Result,
    types::RegionSet,
    traits::{EdgePreprocessor, RegionGrower, RegionFilter, ObjectCounter},
};

/// Edge detection, region growing and filtering behind trait objects
pub struct Pipeline {
    preprocessor: Box<dyn EdgePreprocessor>,
    grower: Box<dyn RegionGrower>,
    filter: Box<dyn RegionFilter>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessor: Box<dyn EdgePreprocessor>,
        grower: Box<dyn RegionGrower>,
        filter: Box<dyn RegionFilter>,
    ) -> Self {
        Self {
            preprocessor,
            grower,
            filter,
        }
    }

    /// Process an image through the entire pipeline
    pub fn process(&self, image: &RgbaImage) -> Result<RegionSet> {
        let _span = debug_span!("detect", width = image.width(), height = image.height()).entered();

        // Step 1: Classify edge pixels (rejects empty images)
        let mask = self.preprocessor.edge_mask(image)?;

        // Step 2: Grow connected regions in scan order
        let regions = self.grower.grow_regions(&mask);

        // Step 3: Drop small and duplicate regions
        let regions = self.filter.filter_regions(regions);

        Ok(RegionSet {
            regions,
            image_width: image.width(),
            image_height: image.height(),
        })
    }
}

impl ObjectCounter for Pipeline {
    fn detect(&self, image: &RgbaImage) -> Result<RegionSet> {
        self.process(image)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}

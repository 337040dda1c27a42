use image::RgbaImage;
use crate::{error::Result, types::{EdgeMask, Region, RegionSet}};

/// Trait for turning pixels into an edge mask
pub trait EdgePreprocessor: Send + Sync {
    /// Classify every pixel of the image as edge or not
    fn edge_mask(&self, image: &RgbaImage) -> Result<EdgeMask>;
}

/// Trait for connected-region extraction
pub trait RegionGrower: Send + Sync {
    /// Grow regions over the mask, returned in discovery order
    fn grow_regions(&self, mask: &EdgeMask) -> Vec<Region>;
}

/// Trait for region acceptance policies
pub trait RegionFilter: Send + Sync {
    /// Reduce raw regions to the accepted ones, preserving order
    fn filter_regions(&self, regions: Vec<Region>) -> Vec<Region>;
}

/// Main trait for object counting
pub trait ObjectCounter: Send + Sync {
    /// Detect the accepted regions of an RGBA image
    fn detect(&self, image: &RgbaImage) -> Result<RegionSet>;

    /// Number of detected objects
    fn count(&self, image: &RgbaImage) -> Result<usize> {
        Ok(self.detect(image)?.count())
    }
}

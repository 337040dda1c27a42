pub mod preprocessing;
pub mod growing;
pub mod filtering;
pub mod color;
pub mod ocr;
pub mod question;

pub use preprocessing::*;
pub use growing::*;
pub use filtering::*;
pub use color::*;
pub use ocr::*;
pub use question::*;

use image::RgbaImage;
use crate::{
    error::Result,
    types::RegionSet,
    traits::{EdgePreprocessor, RegionGrower, RegionFilter, ObjectCounter},
};

/// Statically composed object counter
#[derive(Debug)]
pub struct StandardObjectCounter<P, G, F>
where
    P: EdgePreprocessor,
    G: RegionGrower,
    F: RegionFilter,
{
    pub preprocessor: P,
    pub grower: G,
    pub filter: F,
}

impl<P, G, F> StandardObjectCounter<P, G, F>
where
    P: EdgePreprocessor,
    G: RegionGrower,
    F: RegionFilter,
{
    pub fn new(preprocessor: P, grower: G, filter: F) -> Self {
        Self {
            preprocessor,
            grower,
            filter,
        }
    }
}

impl<P, G, F> ObjectCounter for StandardObjectCounter<P, G, F>
where
    P: EdgePreprocessor,
    G: RegionGrower,
    F: RegionFilter,
{
    fn detect(&self, image: &RgbaImage) -> Result<RegionSet> {
        let mask = self.preprocessor.edge_mask(image)?;
        let regions = self.grower.grow_regions(&mask);

        Ok(RegionSet {
            regions: self.filter.filter_regions(regions),
            image_width: image.width(),
            image_height: image.height(),
        })
    }
}

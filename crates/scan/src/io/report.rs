use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use scan_common::BoundingBox;
use serde::{Deserialize, Serialize};
use crate::{error::Result, types::{DominantColor, Region, RegionSet}};

/// Overlay stroke color
pub const OVERLAY_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Per-region entry of a detection report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub id: usize,
    pub area: u32,
    pub bounding_box: BoundingBox,
    pub width: u32,
    pub height: u32,
}

/// Serializable summary of one detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub image_width: u32,
    pub image_height: u32,
    pub count: usize,
    pub total_area: u64,
    pub regions: Vec<RegionReport>,
}

impl RegionReport {
    fn new(id: usize, region: &Region) -> Self {
        Self {
            id,
            area: region.area,
            bounding_box: region.bounding_box,
            width: region.bounding_box.width(),
            height: region.bounding_box.height(),
        }
    }
}

impl RegionSet {
    pub fn to_report(&self) -> DetectionReport {
        DetectionReport {
            image_width: self.image_width,
            image_height: self.image_height,
            count: self.count(),
            total_area: self.total_area(),
            regions: self
                .regions
                .iter()
                .enumerate()
                .map(|(id, region)| RegionReport::new(id, region))
                .collect(),
        }
    }

    /// Pretty-printed JSON report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_report())?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Copy of `image` with every accepted bounding box outlined
    pub fn render_overlay(&self, image: &RgbaImage) -> RgbaImage {
        let mut canvas = image.clone();
        for region in &self.regions {
            let bbox = region.bounding_box;
            let rect = Rect::at(bbox.min_x as i32, bbox.min_y as i32).of_size(bbox.width(), bbox.height());
            draw_hollow_rect_mut(&mut canvas, rect, OVERLAY_COLOR);
        }
        canvas
    }

    /// Write the overlay; the format follows the path's extension
    pub fn save_overlay<P: AsRef<Path>>(&self, image: &RgbaImage, path: P) -> Result<()> {
        self.render_overlay(image).save(path)?;
        Ok(())
    }
}

impl DominantColor {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

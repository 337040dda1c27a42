use image::{GrayImage, Luma};
use scan_common::{BoundingBox, Rgb};
use serde::{Deserialize, Serialize};

/// Boolean grid marking edge pixels, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl EdgeMask {
    /// All-false mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, f(x, y));
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Panics if `(x, y)` is out of bounds, like `ImageBuffer::get_pixel`
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let index = self.index(x, y);
        self.data[index] = value;
    }

    /// Number of edge pixels
    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&edge| edge).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&edge| edge)
    }

    /// Render as a grayscale image (255 = edge) for inspection
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }
}

/// A maximal 4-connected set of edge pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Pixel count
    pub area: u32,
    pub bounding_box: BoundingBox,
}

impl Region {
    /// Region consisting of the single seed pixel
    pub fn seed(x: u32, y: u32) -> Self {
        Self {
            area: 1,
            bounding_box: BoundingBox::at(x, y),
        }
    }

    /// Absolute difference in pixel count
    pub fn area_difference(&self, other: &Region) -> u32 {
        self.area.abs_diff(other.area)
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.bounding_box.overlaps(&other.bounding_box)
    }
}

/// Accepted regions of one detection call, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl RegionSet {
    /// Number of detected objects
    pub fn count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sum of accepted region areas
    pub fn total_area(&self) -> u64 {
        self.regions.iter().map(|region| u64::from(region.area)).sum()
    }

    /// One-line human-readable result
    pub fn summary(&self) -> String {
        match self.count() {
            1 => "1 object detected".to_string(),
            n => format!("{} objects detected", n),
        }
    }
}

/// Most frequent sampled color of an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantColor {
    pub color: Rgb,
    /// Lowercase `#rrggbb`
    pub hex: String,
    /// How many samples had this color
    pub occurrences: u32,
    /// Total samples taken
    pub samples: u32,
    /// Sampling stride in pixels
    pub step: u32,
}

impl DominantColor {
    /// Share of samples with the dominant color, in `0.0..=1.0`
    pub fn coverage(&self) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        self.occurrences as f32 / self.samples as f32
    }

    pub fn summary(&self) -> String {
        format!("Dominant color: {} RGB {}", self.hex, self.color)
    }
}

/// Which rule produced a [`MathAnswer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// The question was a bare `a op b` expression
    Expression,
    /// "quanto é" / "qual é" with an expression inside the question
    Question,
    /// "texto" / "imagem": the expression came from the extracted text
    ExtractedText,
    Empty,
    NotUnderstood,
    Error,
}

/// Reply to a math question, ready to show to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathAnswer {
    pub kind: AnswerKind,
    /// Whitespace-free expression that was evaluated
    pub expression: Option<String>,
    pub value: Option<f64>,
    pub message: String,
}

impl MathAnswer {
    pub fn summary(&self) -> String {
        self.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_mask_from_fn() {
        let mask = EdgeMask::from_fn(4, 3, |x, y| x == y);
        assert_eq!(mask.dimensions(), (4, 3));
        assert_eq!(mask.edge_count(), 3);
        assert!(mask.get(2, 2));
        assert!(!mask.get(3, 2));

        let rendered = mask.to_image();
        assert_eq!(rendered.get_pixel(1, 1)[0], 255);
        assert_eq!(rendered.get_pixel(0, 1)[0], 0);
    }

    #[test]
    fn test_region_relations() {
        let a = Region { area: 600, bounding_box: BoundingBox::new(0, 50, 0, 50) };
        let b = Region { area: 750, bounding_box: BoundingBox::new(40, 90, 40, 90) };
        assert_eq!(a.area_difference(&b), 150);
        assert_eq!(b.area_difference(&a), 150);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_summary() {
        let mut set = RegionSet { regions: vec![], image_width: 10, image_height: 10 };
        assert_eq!(set.summary(), "0 objects detected");
        set.regions.push(Region::seed(1, 1));
        assert_eq!(set.summary(), "1 object detected");
        assert_eq!(set.total_area(), 1);
    }
}

//! # Scan Common - Shared Types and Utilities
//!
//! Value types shared by the imagescan crates: pixel bounding boxes,
//! RGB colors and a handful of file helpers.
//!
//! ## Example
//!
//! ```rust
//! use scan_common::{BoundingBox, Rgb};
//!
//! let a = BoundingBox::new(10, 40, 10, 40);
//! let b = BoundingBox::new(30, 60, 35, 80);
//! assert!(a.overlaps(&b));
//!
//! let red = Rgb::new(255, 0, 0);
//! assert_eq!(red.to_hex(), "#ff0000");
//! ```

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use thiserror::Error;

/// Result type for shared helpers
pub type Result<T> = std::result::Result<T, CommonError>;

/// Error type for shared helpers
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Axis-aligned pixel rectangle with inclusive bounds on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Create a box from inclusive bounds, `min <= max` on both axes
    pub fn new(min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// Degenerate box covering a single pixel
    pub fn at(x: u32, y: u32) -> Self {
        Self::new(x, x, y, y)
    }

    /// Grow the box so it contains `(x, y)`
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// True when both the X and the Y intervals intersect.
    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Utility functions for file handling
pub mod utils {
    use super::*;

    /// Check if a file extension indicates a raster image the decoder handles
    pub fn is_image_file(filename: &str) -> bool {
        matches!(
            get_file_extension(filename).as_deref(),
            Some("png" | "jpg" | "jpeg" | "tif" | "tiff")
        )
    }

    /// Get file extension from filename
    pub fn get_file_extension(filename: &str) -> Option<String> {
        std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Ensure output directory exists
    pub fn ensure_output_dir(path: &str) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }
}

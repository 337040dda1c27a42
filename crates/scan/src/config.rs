use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Region acceptance policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectorConfig {
    /// Regions with this many pixels or fewer are dropped
    pub min_area: u32,
    /// Overlapping regions whose areas differ by less than this are duplicates
    pub area_tolerance: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_area: 500,
            area_tolerance: 200,
        }
    }
}

/// Dominant color sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColorConfig {
    /// Sampling stride is `min(width, height) / target_samples_per_axis`, at least 1
    pub target_samples_per_axis: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { target_samples_per_axis: 100 }
    }
}

/// Preparation of an image for an external OCR engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OcrPrepConfig {
    /// Output width; height follows the aspect ratio
    pub target_width: u32,
    /// Gaussian blur sigma, skipped when not positive
    pub blur_sigma: f32,
    /// Pixels darker than this become black, the rest white
    pub threshold: u8,
}

impl Default for OcrPrepConfig {
    fn default() -> Self {
        Self {
            target_width: 1200,
            blur_sigma: 0.3,
            threshold: 70,
        }
    }
}

use std::collections::HashMap;

use image::RgbaImage;
use scan_common::Rgb;
use tracing::debug;
use crate::{
    config::ColorConfig,
    error::{ensure_dimensions, Result, ScanError},
    types::DominantColor,
};

/// Sampling stride for an image: `min(width, height) / per_axis`, at least 1
pub fn sampling_step(width: u32, height: u32, per_axis: u32) -> u32 {
    (width.min(height) / per_axis.max(1)).max(1)
}

/// Grid sampler reporting the most frequent RGB value
#[derive(Debug, Clone, Default)]
pub struct DominantColorSampler {
    pub config: ColorConfig,
}

impl DominantColorSampler {
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    /// Sample columns outer, rows inner. Ties go to the color whose first
    /// sample came last.
    pub fn sample(&self, image: &RgbaImage) -> Result<DominantColor> {
        let (width, height) = image.dimensions();
        ensure_dimensions(width, height)?;

        let step = sampling_step(width, height, self.config.target_samples_per_axis);

        // color -> (occurrences, first seen)
        let mut tally: HashMap<Rgb, (u32, u32)> = HashMap::new();
        let mut samples = 0u32;

        for x in (0..width).step_by(step as usize) {
            for y in (0..height).step_by(step as usize) {
                let [r, g, b, _] = image.get_pixel(x, y).0;
                let entry = tally.entry(Rgb::new(r, g, b)).or_insert((0, samples));
                entry.0 += 1;
                samples += 1;
            }
        }

        let (color, (occurrences, _)) = tally
            .into_iter()
            .max_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
                count_a.cmp(count_b).then(seen_a.cmp(seen_b))
            })
            .ok_or(ScanError::InvalidDimensions { width, height })?;

        debug!(step, samples, color = %color.to_hex(), occurrences, "sampled dominant color");

        Ok(DominantColor {
            color,
            hex: color.to_hex(),
            occurrences,
            samples,
            step,
        })
    }
}

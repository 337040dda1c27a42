use tracing::{debug, trace};
use crate::{config::DetectorConfig, traits::RegionFilter, types::Region};

/// Drops small regions, then greedily drops any region that overlaps an
/// already accepted one with a similar area.
///
/// Acceptance is order dependent: each candidate is compared only against
/// regions accepted before it, and an accepted region is never replaced by a
/// later, larger one.
#[derive(Debug, Clone)]
pub struct AreaOverlapFilter {
    pub min_area: u32,
    pub area_tolerance: u32,
}

impl Default for AreaOverlapFilter {
    fn default() -> Self {
        Self::from(&DetectorConfig::default())
    }
}

impl From<&DetectorConfig> for AreaOverlapFilter {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            min_area: config.min_area,
            area_tolerance: config.area_tolerance,
        }
    }
}

impl AreaOverlapFilter {
    fn is_duplicate(&self, candidate: &Region, accepted: &Region) -> bool {
        candidate.overlaps(accepted) && candidate.area_difference(accepted) < self.area_tolerance
    }
}

impl RegionFilter for AreaOverlapFilter {
    fn filter_regions(&self, regions: Vec<Region>) -> Vec<Region> {
        let raw = regions.len();
        let mut accepted: Vec<Region> = Vec::new();

        for candidate in regions {
            if candidate.area <= self.min_area {
                continue;
            }

            if let Some(original) = accepted.iter().find(|kept| self.is_duplicate(&candidate, kept)) {
                trace!(?candidate, ?original, "dropping duplicate region");
                continue;
            }

            accepted.push(candidate);
        }

        debug!(raw, accepted = accepted.len(), "filtered regions");
        accepted
    }
}

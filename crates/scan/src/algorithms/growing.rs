use scan_common::BoundingBox;
use tracing::debug;
use crate::{traits::RegionGrower, types::{EdgeMask, Region}};

/// Pixels already claimed by a region during one grow pass
struct VisitedGrid {
    width: u32,
    cells: Vec<bool>,
}

impl VisitedGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    fn mark(&mut self, x: u32, y: u32) {
        let index = self.index(x, y);
        self.cells[index] = true;
    }
}

/// In-bounds 4-connected neighbors (up, down, left, right)
fn four_neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    [
        (x, y.wrapping_sub(1)),
        (x, y + 1),
        (x.wrapping_sub(1), y),
        (x + 1, y),
    ]
    .into_iter()
    .filter(move |&(nx, ny)| nx < width && ny < height)
}

/// Grow one region from an unvisited edge seed using an explicit stack.
/// Every pixel is marked when pushed, so it is counted exactly once.
fn flood_fill(
    mask: &EdgeMask,
    visited: &mut VisitedGrid,
    stack: &mut Vec<(u32, u32)>,
    seed_x: u32,
    seed_y: u32,
) -> Region {
    let (width, height) = mask.dimensions();
    let mut area = 0u32;
    let mut bounding_box = BoundingBox::at(seed_x, seed_y);

    visited.mark(seed_x, seed_y);
    stack.push((seed_x, seed_y));

    while let Some((x, y)) = stack.pop() {
        area += 1;
        bounding_box.include(x, y);

        for (nx, ny) in four_neighbors(x, y, width, height) {
            if mask.get(nx, ny) && !visited.contains(nx, ny) {
                visited.mark(nx, ny);
                stack.push((nx, ny));
            }
        }
    }

    Region { area, bounding_box }
}

/// Row-major scan over the mask, flood filling from each unclaimed edge pixel.
/// Regions come out in discovery order.
pub fn grow_regions(mask: &EdgeMask) -> Vec<Region> {
    let (width, height) = mask.dimensions();
    let mut visited = VisitedGrid::new(width, height);
    let mut stack = Vec::new();
    let mut regions = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) && !visited.contains(x, y) {
                regions.push(flood_fill(mask, &mut visited, &mut stack, x, y));
            }
        }
    }

    regions
}

/// Stack-based 4-connected flood fill grower
#[derive(Debug, Clone, Default)]
pub struct FloodFillGrower;

impl RegionGrower for FloodFillGrower {
    fn grow_regions(&self, mask: &EdgeMask) -> Vec<Region> {
        let regions = grow_regions(mask);
        debug!(regions = regions.len(), "grew edge regions");
        regions
    }
}

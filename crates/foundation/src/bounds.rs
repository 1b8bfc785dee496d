use crate::coords::{REGION_BLOCKS, TileCoords};

/// Inclusive axis-aligned bounds in tile coordinates
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl TileBounds {
    pub fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Self {
        TileBounds {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn contains(&self, coords: TileCoords) -> bool {
        (self.min_x..=self.max_x).contains(&coords.x) && (self.min_z..=self.max_z).contains(&coords.z)
    }

    /// Block-space extent as `[[south, west], [north, east]]` in widget lat/lng.
    ///
    /// Latitude is negated Z, so the southern edge is the far side of `max_z`.
    pub fn lat_lng_extent(&self) -> [[f64; 2]; 2] {
        let size = REGION_BLOCKS as f64;
        [
            [-size * (self.max_z as f64 + 1.0), size * self.min_x as f64],
            [-size * self.min_z as f64, size * (self.max_x as f64 + 1.0)],
        ]
    }
}

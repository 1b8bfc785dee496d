use std::fmt;

/// Edge length of one tile in blocks; every tile is one region file.
pub const REGION_BLOCKS: i32 = 512;

/// Coordinate pair of a generated tile
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoords {
    pub x: i32,
    pub z: i32,
}

impl TileCoords {
    pub fn new(x: i32, z: i32) -> Self {
        TileCoords { x, z }
    }
}

impl fmt::Debug for TileCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Position on the widget's flat CRS.
///
/// The widget's latitude axis points north while world Z points south, so
/// `lat = -z` and `lng = x`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn from_world(x: f64, z: f64) -> Self {
        LatLng { lat: -z, lng: x }
    }

    /// Center of the block at integer world coordinates.
    pub fn block_center(x: i32, z: i32) -> Self {
        LatLng {
            lat: -(z as f64) - 0.5,
            lng: x as f64 + 0.5,
        }
    }

    pub fn world_x(&self) -> f64 {
        self.lng
    }

    pub fn world_z(&self) -> f64 {
        -self.lat
    }

    /// Rounded world block coordinates `(x, z)`.
    pub fn block(&self) -> (f64, f64) {
        (round_half_up(self.world_x()), round_half_up(self.world_z()))
    }
}

/// Rounds halves towards positive infinity and never yields negative zero.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor() + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_axes_flip_z() {
        let p = LatLng::from_world(10.0, 20.0);
        assert_eq!(p, LatLng::new(-20.0, 10.0));
        assert_eq!(p.world_x(), 10.0);
        assert_eq!(p.world_z(), 20.0);
    }

    #[test]
    fn block_center_is_offset_by_half() {
        assert_eq!(LatLng::block_center(3, -4), LatLng::new(3.5, 3.5));
    }

    #[test]
    fn rounding_matches_browser_semantics() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.3).to_string(), "0");
        assert_eq!(LatLng::new(-7.6, 4.4).block(), (4.0, 8.0));
    }
}

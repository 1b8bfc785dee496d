use std::fmt;

use foundation::TileCoords;

/// Tile image set a layer is drawn from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Block colors.
    Map,
    /// Illumination overlay.
    Light,
}

impl TileKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            TileKind::Map => "map",
            TileKind::Light => "light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "map" => Some(TileKind::Map),
            "light" | "lightmap" => Some(TileKind::Light),
            _ => None,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Tile image filename, e.g. `r.-1.3.png`.
pub fn tile_file_name(coords: TileCoords) -> String {
    format!("r.{}.{}.png", coords.x, coords.z)
}

/// Tile image path relative to the data directory, `/`-separated.
pub fn tile_relative_path(kind: TileKind, level: usize, coords: TileCoords) -> String {
    format!("{}/{}/{}", kind.dir_name(), level, tile_file_name(coords))
}

/// Parses a tile filename back into coordinates.
pub fn parse_tile_file_name(name: &str) -> Option<TileCoords> {
    let rest = name.strip_prefix("r.")?.strip_suffix(".png")?;
    let (x, z) = rest.split_once('.')?;
    Some(TileCoords::new(x.parse().ok()?, z.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_generator_layout() {
        assert_eq!(
            tile_relative_path(TileKind::Light, 2, TileCoords::new(-1, 3)),
            "light/2/r.-1.3.png"
        );
        assert_eq!(
            tile_relative_path(TileKind::Map, 0, TileCoords::new(0, 0)),
            "map/0/r.0.0.png"
        );
    }

    #[test]
    fn file_names_parse_back() {
        assert_eq!(
            parse_tile_file_name("r.-12.7.png"),
            Some(TileCoords::new(-12, 7))
        );
        assert_eq!(parse_tile_file_name("r.1.png"), None);
        assert_eq!(parse_tile_file_name("x.1.2.png"), None);
        assert_eq!(parse_tile_file_name("r.a.2.png"), None);
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(TileKind::from_str("MAP"), Some(TileKind::Map));
        assert_eq!(TileKind::from_str("light"), Some(TileKind::Light));
        assert_eq!(TileKind::from_str("terrain"), None);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use foundation::TileBounds;

pub const INFO_FILE_NAME: &str = "info.json";

/// Viewer metadata written by the tile generator (`info.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerInfo {
    /// One entry per mip level, level 0 first.
    pub mipmaps: Vec<Mipmap>,
    pub spawn: Spawn,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mipmap {
    pub bounds: MipmapBounds,
    /// Present tile X coordinates, keyed by tile Z.
    ///
    /// The generator writes rows in ascending order; JSON object keys are
    /// stringified integers.
    #[serde(default)]
    pub regions: BTreeMap<i32, Vec<i32>>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MipmapBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl From<MipmapBounds> for TileBounds {
    fn from(b: MipmapBounds) -> Self {
        TileBounds::new(b.min_x, b.max_x, b.min_z, b.max_z)
    }
}

/// World spawn point in block coordinates.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Spawn {
    pub x: i32,
    pub z: i32,
}

impl ViewerInfo {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn level_count(&self) -> usize {
        self.mipmaps.len()
    }

    pub fn region_count(&self, level: usize) -> usize {
        self.mipmaps
            .get(level)
            .map(|m| m.regions.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mipmaps": [
            {"bounds": {"minX": -1, "maxX": 2, "minZ": -3, "maxZ": 0},
             "regions": {"-3": [-1, 0], "0": [2]}},
            {"bounds": {"minX": -1, "maxX": 1, "minZ": -2, "maxZ": 0},
             "regions": {"-2": [-1]}}
        ],
        "spawn": {"x": 12, "z": -40}
    }"#;

    #[test]
    fn parses_generator_output() {
        let info = ViewerInfo::from_json(SAMPLE).expect("parse info");
        assert_eq!(info.level_count(), 2);
        assert_eq!(info.spawn, Spawn { x: 12, z: -40 });
        assert_eq!(
            info.mipmaps[0].bounds,
            MipmapBounds {
                min_x: -1,
                max_x: 2,
                min_z: -3,
                max_z: 0
            }
        );
        assert_eq!(info.mipmaps[0].regions.get(&-3), Some(&vec![-1, 0]));
        assert_eq!(info.region_count(0), 3);
        assert_eq!(info.region_count(1), 1);
        assert_eq!(info.region_count(7), 0);
    }

    #[test]
    fn serializes_bounds_in_camel_case() {
        let info = ViewerInfo::from_json(SAMPLE).expect("parse info");
        let json = serde_json::to_string(&info).expect("serialize info");
        assert!(json.contains("\"minX\":-1"));
        assert!(json.contains("\"-3\":[-1,0]"));
    }

    #[test]
    fn rejects_non_numeric_row_keys() {
        let bad = r#"{"mipmaps": [{"bounds": {"minX": 0, "maxX": 0, "minZ": 0, "maxZ": 0},
            "regions": {"north": [0]}}], "spawn": {"x": 0, "z": 0}}"#;
        assert!(ViewerInfo::from_json(bad).is_err());
    }
}

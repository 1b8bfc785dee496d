//! Offline checks over a generated `data/` directory.

use std::fmt;

use formats::{DataDir, TileKind};
use foundation::{TileBounds, TileCoords};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A row's X list is not strictly ascending, which breaks binary search.
    UnsortedRow { level: usize, z: i32 },
    /// A listed tile lies outside its level's bounds.
    OutOfBounds { level: usize, coords: TileCoords },
    /// A listed tile has no image on disk.
    MissingTile {
        kind: TileKind,
        level: usize,
        coords: TileCoords,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::UnsortedRow { level, z } => {
                write!(f, "level {level}: row z={z} is not strictly ascending")
            }
            Problem::OutOfBounds { level, coords } => {
                write!(f, "level {level}: tile {coords:?} lies outside the level bounds")
            }
            Problem::MissingTile {
                kind,
                level,
                coords,
            } => write!(f, "level {level}: missing {kind} tile {coords:?}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub levels: usize,
    pub tiles: usize,
    pub problems: Vec<Problem>,
    /// Listed tiles without an illumination image; the viewer shows them unlit.
    pub missing_light: Vec<(usize, TileCoords)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Verifies that the manifest is well-formed and every listed tile exists.
pub fn check_data_dir(dir: &DataDir) -> CheckReport {
    let mut report = CheckReport {
        levels: dir.info().level_count(),
        ..CheckReport::default()
    };

    for (level, mipmap) in dir.info().mipmaps.iter().enumerate() {
        let bounds = TileBounds::from(mipmap.bounds);
        for (&z, xs) in &mipmap.regions {
            if xs.windows(2).any(|w| w[0] >= w[1]) {
                report.problems.push(Problem::UnsortedRow { level, z });
            }

            for &x in xs {
                let coords = TileCoords::new(x, z);
                report.tiles += 1;
                if !bounds.contains(coords) {
                    report.problems.push(Problem::OutOfBounds { level, coords });
                }
                if !dir.tile_path(TileKind::Map, level, coords).is_file() {
                    report.problems.push(Problem::MissingTile {
                        kind: TileKind::Map,
                        level,
                        coords,
                    });
                }
                if !dir.tile_path(TileKind::Light, level, coords).is_file() {
                    report.missing_light.push((level, coords));
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn write_tile(root: &Path, kind: TileKind, level: usize, x: i32, z: i32) {
        let path = root.join(formats::tile_relative_path(kind, level, TileCoords::new(x, z)));
        fs::create_dir_all(path.parent().expect("tile dir")).expect("create tile dir");
        fs::write(path, b"png").expect("write tile");
    }

    fn write_info(root: &Path, info: &str) {
        fs::write(root.join(formats::INFO_FILE_NAME), info).expect("write info");
    }

    #[test]
    fn complete_directory_passes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_info(
            tmp.path(),
            r#"{"mipmaps": [{"bounds": {"minX": 0, "maxX": 1, "minZ": 0, "maxZ": 0},
                "regions": {"0": [0, 1]}}], "spawn": {"x": 0, "z": 0}}"#,
        );
        for x in 0..2 {
            write_tile(tmp.path(), TileKind::Map, 0, x, 0);
            write_tile(tmp.path(), TileKind::Light, 0, x, 0);
        }

        let dir = DataDir::load(tmp.path()).expect("load");
        let report = check_data_dir(&dir);
        assert!(report.is_ok());
        assert_eq!(report.levels, 1);
        assert_eq!(report.tiles, 2);
        assert!(report.missing_light.is_empty());
    }

    #[test]
    fn reports_each_kind_of_problem() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_info(
            tmp.path(),
            r#"{"mipmaps": [{"bounds": {"minX": 0, "maxX": 1, "minZ": 0, "maxZ": 0},
                "regions": {"0": [1, 0, 5]}}], "spawn": {"x": 0, "z": 0}}"#,
        );
        write_tile(tmp.path(), TileKind::Map, 0, 0, 0);
        write_tile(tmp.path(), TileKind::Map, 0, 5, 0);
        write_tile(tmp.path(), TileKind::Light, 0, 0, 0);

        let dir = DataDir::load(tmp.path()).expect("load");
        let report = check_data_dir(&dir);
        assert!(!report.is_ok());
        assert_eq!(
            report.problems,
            vec![
                Problem::UnsortedRow { level: 0, z: 0 },
                Problem::MissingTile {
                    kind: TileKind::Map,
                    level: 0,
                    coords: TileCoords::new(1, 0)
                },
                Problem::OutOfBounds {
                    level: 0,
                    coords: TileCoords::new(5, 0)
                },
            ]
        );
        assert_eq!(
            report.missing_light,
            vec![(0, TileCoords::new(1, 0)), (0, TileCoords::new(5, 0))]
        );
        assert_eq!(
            report.problems[0].to_string(),
            "level 0: row z=0 is not strictly ascending"
        );
    }
}

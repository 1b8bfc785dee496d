use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::TileCoords;

use crate::entities::{ENTITIES_FILE_NAME, ViewerEntities};
use crate::layout::{TileKind, tile_relative_path};
use crate::manifest::{INFO_FILE_NAME, ViewerInfo};

/// A generated `data/` directory on disk.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    info: ViewerInfo,
}

#[derive(Debug)]
pub enum FormatError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            FormatError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io { source, .. } => Some(source),
            FormatError::Parse { source, .. } => Some(source),
        }
    }
}

impl DataDir {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, FormatError> {
        let root = root.as_ref().to_path_buf();
        let info_path = root.join(INFO_FILE_NAME);
        let payload = read(&info_path)?;
        let info = ViewerInfo::from_json(&payload).map_err(|source| FormatError::Parse {
            path: info_path,
            source,
        })?;
        Ok(Self { root, info })
    }

    /// Loads `entities.json`; a missing file means no entities.
    pub fn load_entities(&self) -> Result<ViewerEntities, FormatError> {
        let path = self.root.join(ENTITIES_FILE_NAME);
        if !path.exists() {
            return Ok(ViewerEntities::default());
        }
        let payload = read(&path)?;
        ViewerEntities::from_json(&payload).map_err(|source| FormatError::Parse { path, source })
    }

    pub fn info(&self) -> &ViewerInfo {
        &self.info
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tile_path(&self, kind: TileKind, level: usize, coords: TileCoords) -> PathBuf {
        self.root.join(tile_relative_path(kind, level, coords))
    }
}

fn read(path: &Path) -> Result<String, FormatError> {
    fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = format!("minedmap_data_dir_{label}_{}", std::process::id());
        dir.push(id);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    const INFO: &str = r#"{"mipmaps": [{"bounds": {"minX": 0, "maxX": 1, "minZ": 0, "maxZ": 0},
        "regions": {"0": [0, 1]}}], "spawn": {"x": 3, "z": 4}}"#;

    #[test]
    fn loads_info_and_entities() {
        let root = temp_dir("load");
        fs::write(root.join(INFO_FILE_NAME), INFO).expect("write info");
        fs::write(
            root.join(ENTITIES_FILE_NAME),
            r#"{"signs": [{"x": 0, "y": 0, "z": 0}]}"#,
        )
        .expect("write entities");

        let dir = DataDir::load(&root).expect("load data dir");
        assert_eq!(dir.root(), root.as_path());
        assert_eq!(dir.info().spawn.x, 3);
        assert_eq!(dir.load_entities().expect("entities").signs.len(), 1);
        assert_eq!(
            dir.tile_path(TileKind::Map, 0, TileCoords::new(1, 0)),
            root.join("map/0/r.1.0.png")
        );
    }

    #[test]
    fn missing_entities_are_empty() {
        let root = temp_dir("no_entities");
        fs::write(root.join(INFO_FILE_NAME), INFO).expect("write info");
        let dir = DataDir::load(&root).expect("load data dir");
        assert!(dir.load_entities().expect("entities").signs.is_empty());
    }

    #[test]
    fn reports_missing_and_malformed_info() {
        let root = temp_dir("errors");
        match DataDir::load(&root).expect_err("missing info") {
            FormatError::Io { path, .. } => assert!(path.ends_with(INFO_FILE_NAME)),
            other => panic!("unexpected error: {other}"),
        }

        fs::write(root.join(INFO_FILE_NAME), "{").expect("write info");
        let err = DataDir::load(&root).expect_err("malformed info");
        assert!(matches!(err, FormatError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse"));
    }
}

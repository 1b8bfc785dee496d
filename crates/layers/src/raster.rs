use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::{REGION_BLOCKS, TileBounds, TileCoords};
use formats::{Mipmap, TileKind, ViewerInfo, tile_relative_path};

/// Transparent 1x1 GIF served for tiles that do not exist.
pub const EMPTY_TILE_URL: &str =
    "data:image/gif;base64,R0lGODlhAQABAAD/ACwAAAAAAQABAAACADs=";

pub const DEFAULT_DATA_URL: &str = "data/";

/// Widget zoom is capped here even though tiles stop at native zoom 0.
pub const MAX_VIEW_ZOOM: i32 = 3;

pub const ATTRIBUTION: &str =
    "Generated by <a href=\"https://github.com/neocturne/MinedMap\">MinedMap</a>";

/// Whether `elem` occurs in the ascending slice `sorted`.
pub fn contains(sorted: &[i32], elem: i32) -> bool {
    sorted.binary_search(&elem).is_ok()
}

/// Present tiles of one mip level.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    bounds: TileBounds,
    rows: BTreeMap<i32, Vec<i32>>,
}

impl MipLevel {
    pub fn new(bounds: TileBounds, rows: BTreeMap<i32, Vec<i32>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(z, mut xs)| {
                xs.sort_unstable();
                xs.dedup();
                (z, xs)
            })
            .collect();
        Self { bounds, rows }
    }

    pub fn from_mipmap(mipmap: &Mipmap) -> Self {
        Self::new(mipmap.bounds.into(), mipmap.regions.clone())
    }

    pub fn bounds(&self) -> TileBounds {
        self.bounds
    }

    pub fn row(&self, z: i32) -> &[i32] {
        self.rows.get(&z).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_tile(&self, coords: TileCoords) -> bool {
        self.bounds.contains(coords) && contains(self.row(coords.z), coords.x)
    }
}

/// Sparse index of generated tiles across all mip levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    levels: Vec<MipLevel>,
}

impl RegionIndex {
    pub fn new(levels: Vec<MipLevel>) -> Self {
        Self { levels }
    }

    pub fn from_info(info: &ViewerInfo) -> Self {
        Self::new(info.mipmaps.iter().map(MipLevel::from_mipmap).collect())
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> Option<&MipLevel> {
        self.levels.get(level)
    }

    /// Mip level for a tile zoom; zoom is inverted, so `-zoom` selects
    /// coarser levels and anything past native detail maps to level 0.
    pub fn mip_level(zoom: i32, zoom_offset: i32) -> usize {
        zoom_offset.saturating_sub(zoom).max(0) as usize
    }

    pub fn has_tile(&self, level: usize, coords: TileCoords) -> bool {
        self.level(level).is_some_and(|l| l.has_tile(coords))
    }

    /// Lowest widget zoom at which the coarsest level is displayed.
    pub fn min_zoom(&self) -> i32 {
        -(self.levels.len().saturating_sub(1) as i32)
    }

    /// Widget lat/lng extent of level 0, used to clamp panning.
    pub fn max_bounds(&self) -> Option<[[f64; 2]; 2]> {
        self.levels.first().map(|l| l.bounds.lat_lng_extent())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileUrl {
    Image(String),
    Placeholder,
}

impl TileUrl {
    pub fn as_str(&self) -> &str {
        match self {
            TileUrl::Image(url) => url,
            TileUrl::Placeholder => EMPTY_TILE_URL,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TileUrl::Placeholder)
    }
}

/// URL resolution for one tile layer.
#[derive(Debug, Clone)]
pub struct TileSource {
    index: Rc<RegionIndex>,
    kind: TileKind,
    base_url: String,
}

impl TileSource {
    pub fn new(index: Rc<RegionIndex>, kind: TileKind, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            index,
            kind,
            base_url,
        }
    }

    pub fn resolve(&self, zoom: i32, zoom_offset: i32, x: i32, z: i32) -> TileUrl {
        let level = RegionIndex::mip_level(zoom, zoom_offset);
        let coords = TileCoords::new(x, z);
        if !self.index.has_tile(level, coords) {
            return TileUrl::Placeholder;
        }
        TileUrl::Image(format!(
            "{}{}",
            self.base_url,
            tile_relative_path(self.kind, level, coords)
        ))
    }

    /// Tiles requested beyond native detail are upscaled level-0 images.
    pub fn is_overzoomed(zoom: i32, zoom_offset: i32) -> bool {
        zoom.saturating_sub(zoom_offset) >= 0
    }

    pub fn options(&self) -> TileLayerOptions {
        TileLayerOptions::for_index(&self.index)
    }
}

/// Options handed to the widget's tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub detect_retina: bool,
    pub zoom_reverse: bool,
    pub min_zoom: i32,
    pub max_native_zoom: i32,
    pub attribution: &'static str,
}

impl TileLayerOptions {
    pub fn for_index(index: &RegionIndex) -> Self {
        Self {
            tile_size: REGION_BLOCKS as u32,
            detect_retina: true,
            zoom_reverse: true,
            min_zoom: index.min_zoom(),
            max_native_zoom: 0,
            attribution: ATTRIBUTION,
        }
    }
}

/// Options handed to the widget's map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub min_zoom: i32,
    pub max_zoom: i32,
    pub max_bounds: Option<[[f64; 2]; 2]>,
}

impl MapOptions {
    pub fn for_index(index: &RegionIndex) -> Self {
        Self {
            min_zoom: index.min_zoom(),
            max_zoom: MAX_VIEW_ZOOM,
            max_bounds: index.max_bounds(),
        }
    }
}

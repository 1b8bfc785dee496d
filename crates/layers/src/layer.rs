use foundation::ViewState;
use formats::TileKind;

/// Layers the viewer puts on the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// Base terrain tiles, always shown.
    Map,
    /// Illumination tiles, toggleable.
    Light,
    /// Sign markers, toggleable.
    Signs,
}

impl LayerId {
    /// Toggleable layers, in layers-control order.
    pub const OVERLAYS: [LayerId; 2] = [LayerId::Light, LayerId::Signs];

    /// Label in the layers control; the base layer is not listed.
    pub fn label(self) -> Option<&'static str> {
        match self {
            LayerId::Map => None,
            LayerId::Light => Some("Illumination"),
            LayerId::Signs => Some("Signs"),
        }
    }

    pub fn tile_kind(self) -> Option<TileKind> {
        match self {
            LayerId::Map => Some(TileKind::Map),
            LayerId::Light => Some(TileKind::Light),
            LayerId::Signs => None,
        }
    }

    pub fn visible_in(self, view: &ViewState) -> bool {
        match self {
            LayerId::Map => true,
            LayerId::Light => view.light,
            LayerId::Signs => view.signs,
        }
    }

    /// Records the layer's visibility in `view`; the base layer is fixed.
    pub fn set_visible(self, view: &mut ViewState, visible: bool) {
        match self {
            LayerId::Map => {}
            LayerId::Light => view.light = visible,
            LayerId::Signs => view.signs = visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_visibility_tracks_view_flags() {
        let mut view = ViewState::at_spawn(0.0, 0.0);
        assert!(LayerId::Map.visible_in(&view));
        assert!(!LayerId::Light.visible_in(&view));
        assert!(LayerId::Signs.visible_in(&view));

        LayerId::Light.set_visible(&mut view, true);
        LayerId::Signs.set_visible(&mut view, false);
        LayerId::Map.set_visible(&mut view, false);
        assert!(view.light);
        assert!(!view.signs);
        assert!(LayerId::Map.visible_in(&view));
    }

    #[test]
    fn only_tile_layers_have_tile_kinds() {
        assert_eq!(LayerId::Map.tile_kind(), Some(TileKind::Map));
        assert_eq!(LayerId::Light.tile_kind(), Some(TileKind::Light));
        assert_eq!(LayerId::Signs.tile_kind(), None);
    }

    #[test]
    fn only_overlays_are_labelled() {
        let labels: Vec<_> = LayerId::OVERLAYS.iter().filter_map(|l| l.label()).collect();
        assert_eq!(labels, ["Illumination", "Signs"]);
        assert_eq!(LayerId::Map.label(), None);
    }
}

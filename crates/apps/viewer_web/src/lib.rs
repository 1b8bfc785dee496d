use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

use formats::{ViewerEntities, ViewerInfo};
use foundation::{FragmentSync, LatLng, ViewState};
use layers::LayerId;
use layers::raster::{DEFAULT_DATA_URL, MapOptions, RegionIndex, TileSource};
use layers::signs::group_signs;

mod leaflet;
use leaflet::{Layer, Map, MapEvent};

mod popup;
use popup::render_popup;

/// Where the viewer finds its data and which element hosts the map.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub data_url: String,
    pub element_id: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            element_id: "map".to_string(),
        }
    }
}

impl ViewerConfig {
    fn data_file(&self, name: &str) -> String {
        let base = self.data_url.trim_end_matches('/');
        if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}/{name}")
        }
    }
}

/// Widget handles created once the manifest has arrived.
#[derive(Debug)]
struct MapHandles {
    map: Map,
    light_layer: Layer,
    coord_control: HtmlElement,
}

#[derive(Debug, Default)]
struct ViewerState {
    config: ViewerConfig,
    spawn: (f64, f64),
    sync: FragmentSync,
    sign_layer: Option<Layer>,
    handles: Option<MapHandles>,
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

/// Runs `f` against the viewer state; yields `R::default()` once the thread is tearing down.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<ViewerState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Entry point called by the hosting page.
#[wasm_bindgen(js_name = createMap)]
pub fn create_map() {
    create_map_with_config(DEFAULT_DATA_URL.to_string(), "map".to_string());
}

#[wasm_bindgen(js_name = createMapWithConfig)]
pub fn create_map_with_config(data_url: String, element_id: String) {
    let config = ViewerConfig {
        data_url,
        element_id,
    };

    // Markers can arrive before the map exists, so their group is created up front.
    let sign_layer = match Layer::group() {
        Ok(layer) => layer,
        Err(err) => {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "sign layer init error: {:?}",
                err
            )));
            return;
        }
    };

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.config = config.clone();
        s.sign_layer = Some(sign_layer.clone());
    });

    let info_url = config.data_file(formats::INFO_FILE_NAME);
    spawn_local(async move {
        let info = match fetch_json(&info_url, ViewerInfo::from_json).await {
            Ok(info) => info,
            Err(err) => {
                let msg = format!("Failed to fetch {info_url}: {:?}", err);
                web_sys::console::log_1(&JsValue::from_str(&msg));
                return;
            }
        };
        if let Err(err) = init_map(info) {
            web_sys::console::error_1(&JsValue::from_str(&format!("map init error: {:?}", err)));
        }
    });

    let entities_url = config.data_file(formats::ENTITIES_FILE_NAME);
    spawn_local(async move {
        let entities = match fetch_json(&entities_url, ViewerEntities::from_json).await {
            Ok(entities) => entities,
            Err(err) => {
                let msg = format!("Failed to fetch {entities_url}: {:?}", err);
                web_sys::console::log_1(&JsValue::from_str(&msg));
                return;
            }
        };
        if let Err(err) = load_signs(&sign_layer, &entities) {
            web_sys::console::error_1(&JsValue::from_str(&format!("sign load error: {:?}", err)));
        }
    });
}

async fn fetch_json<T>(
    url: &str,
    parse: fn(&str) -> Result<T, serde_json::Error>,
) -> Result<T, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    parse(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn load_signs(sign_layer: &Layer, entities: &ViewerEntities) -> Result<(), JsValue> {
    let document = document()?;
    for group in group_signs(&entities.signs) {
        let el = render_popup(&document, &group.popup())?;
        sign_layer.add_marker(group.marker_position(), &el)?;
    }
    Ok(())
}

fn init_map(info: ViewerInfo) -> Result<(), JsValue> {
    let spawn = (info.spawn.x as f64, info.spawn.z as f64);
    let (config, sign_layer) = with_state(|state| {
        let s = state.borrow();
        (s.config.clone(), s.sign_layer.clone())
    });
    let sign_layer = sign_layer.ok_or_else(|| JsValue::from_str("sign layer missing"))?;

    let view = ViewState::from_fragment(&current_fragment()?, spawn.0, spawn.1);

    let index = Rc::new(RegionIndex::from_info(&info));
    let map = Map::create(
        &config.element_id,
        LatLng::from_world(view.x, view.z),
        view.zoom,
        &MapOptions::for_index(&index),
    )?;

    let map_layer = tile_layer(&index, LayerId::Map, &config.data_url)?;
    let light_layer = tile_layer(&index, LayerId::Light, &config.data_url)?;
    map_layer.add_to(&map);

    let overlays: Vec<(LayerId, &Layer)> = LayerId::OVERLAYS
        .iter()
        .map(|&id| match id {
            LayerId::Signs => (id, &sign_layer),
            _ => (id, &light_layer),
        })
        .collect();
    for (id, layer) in &overlays {
        if id.visible_in(&view) {
            map.add_layer(layer);
        }
    }
    let labelled: Vec<(&str, &Layer)> = overlays
        .iter()
        .filter_map(|&(id, layer)| Some((id.label()?, layer)))
        .collect();
    map.add_layers_control(&labelled)?;
    let coord_control = map.add_coord_control()?;

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.spawn = spawn;
        s.handles = Some(MapHandles {
            map: map.clone(),
            light_layer,
            coord_control,
        });
    });

    write_fragment(view)?;

    let on_mouse_move = Closure::<dyn FnMut(MapEvent)>::new(|ev: MapEvent| {
        update_coords(LatLng::from(&ev.latlng()));
    });
    map.on("mousemove", on_mouse_move.as_ref().unchecked_ref());
    on_mouse_move.forget();

    let on_view_change = Closure::<dyn FnMut(MapEvent)>::new(|ev: MapEvent| {
        if let Err(err) = refresh_fragment(&ev) {
            web_sys::console::error_1(&err);
        }
    });
    for event in ["moveend", "zoomend", "layeradd", "layerremove"] {
        map.on(event, on_view_change.as_ref().unchecked_ref());
    }
    on_view_change.forget();

    let on_hash_change = Closure::<dyn FnMut()>::new(|| {
        if let Err(err) = apply_external_fragment() {
            web_sys::console::error_1(&err);
        }
    });
    window()?.set_onhashchange(Some(on_hash_change.as_ref().unchecked_ref()));
    on_hash_change.forget();

    Ok(())
}

/// Builds the widget layer for a tiled `LayerId`; the callbacks live as long as the page.
fn tile_layer(index: &Rc<RegionIndex>, id: LayerId, data_url: &str) -> Result<Layer, JsValue> {
    let kind = id
        .tile_kind()
        .ok_or_else(|| JsValue::from_str("layer has no tiles"))?;
    let source = TileSource::new(index.clone(), kind, data_url);
    let options = source.options();
    let resolve_url =
        Closure::<dyn Fn(i32, i32, i32, i32) -> String>::new(move |zoom: i32, offset: i32, x: i32, z: i32| {
            source.resolve(zoom, offset, x, z).as_str().to_string()
        });
    let is_overzoomed = Closure::<dyn Fn(i32, i32) -> bool>::new(TileSource::is_overzoomed);

    let layer = Layer::tile_layer(
        &options,
        resolve_url.as_ref().unchecked_ref(),
        is_overzoomed.as_ref().unchecked_ref(),
    )?;
    resolve_url.forget();
    is_overzoomed.forget();
    Ok(layer)
}

fn update_coords(pos: LatLng) {
    let (x, z) = pos.block();
    with_state(|state| {
        if let Some(handles) = &state.borrow().handles {
            handles
                .coord_control
                .set_inner_html(&format!("X: {x}&nbsp;&nbsp;&nbsp;Z: {z}"));
        }
    });
}

/// Re-derives the view from the widget after a move, zoom or overlay toggle.
fn refresh_fragment(ev: &MapEvent) -> Result<(), JsValue> {
    let Some((map, light_layer, sign_layer)) = map_handles() else {
        return Ok(());
    };

    let event_type = ev.event_type();
    if event_type == "layeradd" || event_type == "layerremove" {
        let layer = ev.layer();
        if !light_layer.is(&layer) && !sign_layer.is(&layer) {
            return Ok(());
        }
    }

    let (x, z) = map.center().block();
    let view = ViewState {
        x,
        z,
        zoom: map.get_zoom().round() as i32,
        light: map.has_layer(&light_layer),
        signs: map.has_layer(&sign_layer),
    };
    write_fragment(view)
}

/// Applies a fragment edited outside the viewer (typing, back/forward).
fn apply_external_fragment() -> Result<(), JsValue> {
    let fragment = current_fragment()?;
    let (external, spawn) = with_state(|state| {
        let s = state.borrow();
        (s.sync.is_external(&fragment), s.spawn)
    });
    if !external {
        return Ok(());
    }
    let Some((map, light_layer, sign_layer)) = map_handles() else {
        return Ok(());
    };

    let mut view = ViewState::from_fragment(&fragment, spawn.0, spawn.1);

    // These calls fire widget events synchronously, so no state borrow may be held.
    map.set_view(LatLng::from_world(view.x, view.z), view.zoom);
    map.set_layer_visible(&light_layer, LayerId::Light.visible_in(&view));
    map.set_layer_visible(&sign_layer, LayerId::Signs.visible_in(&view));

    LayerId::Light.set_visible(&mut view, map.has_layer(&light_layer));
    LayerId::Signs.set_visible(&mut view, map.has_layer(&sign_layer));
    write_fragment(view)
}

fn map_handles() -> Option<(Map, Layer, Layer)> {
    with_state(|state| {
        let s = state.borrow();
        let handles = s.handles.as_ref()?;
        let sign_layer = s.sign_layer.clone()?;
        Some((handles.map.clone(), handles.light_layer.clone(), sign_layer))
    })
}

fn write_fragment(view: ViewState) -> Result<(), JsValue> {
    let fragment = with_state(|state| state.borrow_mut().sync.write(&view));
    window()?.location().set_hash(&fragment)
}

fn current_fragment() -> Result<String, JsValue> {
    window()?.location().hash()
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<web_sys::Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

//! Bindings to the Leaflet global (`L`) provided by the host page.
//!
//! The JS shim only adapts Leaflet's extension hooks to plain callbacks;
//! tile URLs and overzoom tagging are decided on the Rust side.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use foundation::LatLng;
use layers::raster::{MapOptions, TileLayerOptions};

#[wasm_bindgen(inline_js = "
export function minedmap_create_map(elementId, options) {
    options.crs = L.CRS.Simple;
    return L.map(elementId, options);
}

export function minedmap_create_tile_layer(options, resolveUrl, isOverzoomed) {
    const TileLayer = L.TileLayer.extend({
        createTile: function (coords, done) {
            const tile = L.TileLayer.prototype.createTile.call(this, coords, done);
            if (isOverzoomed(coords.z, this.options.zoomOffset))
                L.DomUtil.addClass(tile, 'overzoomed');
            return tile;
        },

        getTileUrl: function (coords) {
            return resolveUrl(coords.z, this.options.zoomOffset, coords.x, coords.y);
        },
    });

    const layer = new TileLayer('', options);
    // Native tiles stop at maxZoom; deeper zoom levels upscale them.
    layer.options.maxNativeZoom = layer.options.maxZoom;
    layer.options.maxZoom = undefined;
    return layer;
}

export function minedmap_layer_group() {
    return L.layerGroup();
}

export function minedmap_add_marker(group, lat, lng, popup) {
    L.marker([lat, lng]).addTo(group).bindPopup(popup);
}

export function minedmap_add_layers_control(map, overlays) {
    L.control.layers({}, overlays).addTo(map);
}

export function minedmap_add_coord_control(map) {
    const CoordControl = L.Control.extend({
        options: { position: 'bottomleft' },

        onAdd: function () {
            return L.DomUtil.create('div', 'leaflet-control-attribution');
        },
    });

    const control = new CoordControl();
    control.addTo(map);
    return control.getContainer();
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn minedmap_create_map(element_id: &str, options: &Object) -> Result<Map, JsValue>;

    #[wasm_bindgen(catch)]
    fn minedmap_create_tile_layer(
        options: &Object,
        resolve_url: &Function,
        is_overzoomed: &Function,
    ) -> Result<Layer, JsValue>;

    #[wasm_bindgen(catch)]
    fn minedmap_layer_group() -> Result<Layer, JsValue>;

    #[wasm_bindgen(catch)]
    fn minedmap_add_marker(group: &Layer, lat: f64, lng: f64, popup: &JsValue)
    -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn minedmap_add_layers_control(map: &Map, overlays: &Object) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn minedmap_add_coord_control(map: &Map) -> Result<HtmlElement, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Function);

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &Map) -> JsLatLng;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view_raw(this: &Map, center: &Array, zoom: f64);

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &Layer);

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &Map, layer: &Layer);

    #[wasm_bindgen(method, js_name = hasLayer)]
    pub fn has_layer(this: &Map, layer: &Layer) -> bool;

    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &Map);

    #[derive(Debug, Clone)]
    pub type JsLatLng;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &JsLatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &JsLatLng) -> f64;

    /// Leaflet event object; which fields exist depends on the event type.
    #[derive(Debug, Clone)]
    pub type MapEvent;

    #[wasm_bindgen(method, getter, js_name = "type")]
    pub fn event_type(this: &MapEvent) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn layer(this: &MapEvent) -> JsValue;

    #[wasm_bindgen(method, getter)]
    pub fn latlng(this: &MapEvent) -> JsLatLng;
}

impl From<&JsLatLng> for LatLng {
    fn from(p: &JsLatLng) -> Self {
        LatLng::new(p.lat(), p.lng())
    }
}

impl Map {
    pub fn create(
        element_id: &str,
        center: LatLng,
        zoom: i32,
        options: &MapOptions,
    ) -> Result<Map, JsValue> {
        let obj = Object::new();
        set(&obj, "center", &lat_lng_array(center))?;
        set(&obj, "zoom", &JsValue::from(zoom))?;
        set(&obj, "minZoom", &JsValue::from(options.min_zoom))?;
        set(&obj, "maxZoom", &JsValue::from(options.max_zoom))?;
        if let Some([south_west, north_east]) = options.max_bounds {
            let bounds = Array::of2(&pair(south_west), &pair(north_east));
            set(&obj, "maxBounds", &bounds)?;
        }
        minedmap_create_map(element_id, &obj)
    }

    pub fn set_view(&self, center: LatLng, zoom: i32) {
        self.set_view_raw(&lat_lng_array(center), zoom as f64);
    }

    pub fn center(&self) -> LatLng {
        LatLng::from(&self.get_center())
    }

    pub fn set_layer_visible(&self, layer: &Layer, visible: bool) {
        if visible {
            self.add_layer(layer);
        } else {
            self.remove_layer(layer);
        }
    }

    pub fn add_layers_control(&self, overlays: &[(&str, &Layer)]) -> Result<(), JsValue> {
        let obj = Object::new();
        for (label, layer) in overlays {
            set(&obj, label, layer)?;
        }
        minedmap_add_layers_control(self, &obj)
    }

    /// Adds the bottom-left coordinate readout and returns its container.
    pub fn add_coord_control(&self) -> Result<HtmlElement, JsValue> {
        minedmap_add_coord_control(self)
    }
}

impl Layer {
    pub fn tile_layer(
        options: &TileLayerOptions,
        resolve_url: &Function,
        is_overzoomed: &Function,
    ) -> Result<Layer, JsValue> {
        let obj = Object::new();
        set(&obj, "detectRetina", &JsValue::from(options.detect_retina))?;
        set(&obj, "tileSize", &JsValue::from(options.tile_size))?;
        set(&obj, "zoomReverse", &JsValue::from(options.zoom_reverse))?;
        set(&obj, "minZoom", &JsValue::from(options.min_zoom))?;
        set(&obj, "maxZoom", &JsValue::from(options.max_native_zoom))?;
        set(&obj, "attribution", &JsValue::from_str(options.attribution))?;
        minedmap_create_tile_layer(&obj, resolve_url, is_overzoomed)
    }

    pub fn group() -> Result<Layer, JsValue> {
        minedmap_layer_group()
    }

    pub fn add_marker(&self, position: LatLng, popup: &JsValue) -> Result<(), JsValue> {
        minedmap_add_marker(self, position.lat, position.lng, popup)
    }

    /// Identity comparison, as Leaflet hands back the same layer objects.
    pub fn is(&self, other: &JsValue) -> bool {
        let this: &JsValue = self.as_ref();
        Object::is(this, other)
    }
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

fn pair(v: [f64; 2]) -> JsValue {
    Array::of2(&JsValue::from(v[0]), &JsValue::from(v[1])).into()
}

fn lat_lng_array(p: LatLng) -> Array {
    Array::of2(&JsValue::from(p.lat), &JsValue::from(p.lng))
}

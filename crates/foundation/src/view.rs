use crate::fragment::{self, FragmentArgs, parse_float_prefix, parse_int_prefix};

/// Camera position, zoom and overlay visibility of the map view.
///
/// This is the state mirrored into the URL fragment. `x`/`z` are world block
/// coordinates of the view center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub x: f64,
    pub z: f64,
    pub zoom: i32,
    pub light: bool,
    pub signs: bool,
}

impl ViewState {
    /// State used when the fragment carries nothing: spawn point, zoom 0,
    /// illumination hidden, signs shown.
    pub fn at_spawn(spawn_x: f64, spawn_z: f64) -> Self {
        Self {
            x: spawn_x,
            z: spawn_z,
            zoom: 0,
            light: false,
            signs: true,
        }
    }

    pub fn from_fragment(fragment: &str, spawn_x: f64, spawn_z: f64) -> Self {
        Self::from_args(&fragment::parse(fragment), spawn_x, spawn_z)
    }

    /// Applies parsed fragment arguments over the defaults.
    ///
    /// Unparseable numbers fall back silently. `light` and `signs` are
    /// integer flags; a present but unparseable flag counts as off.
    pub fn from_args(args: &FragmentArgs, spawn_x: f64, spawn_z: f64) -> Self {
        let defaults = Self::at_spawn(spawn_x, spawn_z);
        let flag = |key: &str, absent: bool| match args.get(key) {
            Some(raw) => parse_int_prefix(raw).is_some_and(|v| v != 0),
            None => absent,
        };

        Self {
            x: arg(args, "x")
                .and_then(parse_float_prefix)
                .unwrap_or(defaults.x),
            z: arg(args, "z")
                .and_then(parse_float_prefix)
                .unwrap_or(defaults.z),
            zoom: arg(args, "zoom")
                .and_then(parse_int_prefix)
                .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
                .unwrap_or(defaults.zoom),
            light: flag("light", defaults.light),
            signs: flag("signs", defaults.signs),
        }
    }

    /// Canonical fragment, omitting fields at their default value.
    pub fn to_fragment(&self) -> String {
        let mut out = format!("#x={}&z={}", self.x, self.z);
        if self.zoom != 0 {
            out.push_str(&format!("&zoom={}", self.zoom));
        }
        if self.light {
            out.push_str("&light=1");
        }
        if !self.signs {
            out.push_str("&signs=0");
        }
        out
    }
}

fn arg<'a>(args: &'a FragmentArgs, key: &str) -> Option<&'a str> {
    args.get(key).map(String::as_str)
}

/// Tracks the last fragment written so our own writes are not mistaken for
/// navigation when the browser echoes them back as change events.
#[derive(Debug, Default, Clone)]
pub struct FragmentSync {
    last_written: Option<String>,
}

impl FragmentSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` as written and returns the fragment to store.
    pub fn write(&mut self, state: &ViewState) -> String {
        let fragment = state.to_fragment();
        self.last_written = Some(fragment.clone());
        fragment
    }

    /// Whether an incoming fragment is foreign, i.e. not our own last write.
    pub fn is_external(&self, incoming: &str) -> bool {
        let incoming = normalize(incoming);
        match &self.last_written {
            Some(last) => normalize(last) != incoming,
            None => true,
        }
    }

    pub fn last_written(&self) -> Option<&str> {
        self.last_written.as_deref()
    }
}

fn normalize(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

//! Sign markers and their popup contents.
//!
//! Signs stacked in one block column share a marker. The popup is built as a
//! flat list of items so the DOM side only has to map items to elements.

use std::collections::BTreeMap;

use foundation::LatLng;
use formats::{Sign, SignLine, TextSpan};

use crate::symbology::resolve_color;

/// All signs in one (x, z) column, keyed by height.
#[derive(Debug, Clone, PartialEq)]
pub struct SignGroup {
    pub x: i32,
    pub z: i32,
    signs: BTreeMap<i32, Sign>,
}

impl SignGroup {
    pub fn new(x: i32, z: i32) -> Self {
        Self {
            x,
            z,
            signs: BTreeMap::new(),
        }
    }

    /// Adds a sign; a later sign at the same height replaces the earlier one.
    pub fn insert(&mut self, sign: Sign) {
        self.signs.insert(sign.y, sign);
    }

    /// Signs ordered by ascending y.
    pub fn signs(&self) -> impl Iterator<Item = &Sign> {
        self.signs.values()
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    pub fn marker_position(&self) -> LatLng {
        LatLng::block_center(self.x, self.z)
    }

    pub fn popup(&self) -> SignPopup {
        SignPopup::for_group(self)
    }
}

/// Groups signs by column, ordered by (x, z).
pub fn group_signs<'a>(signs: impl IntoIterator<Item = &'a Sign>) -> Vec<SignGroup> {
    let mut groups: BTreeMap<(i32, i32), SignGroup> = BTreeMap::new();
    for sign in signs {
        groups
            .entry((sign.x, sign.z))
            .or_insert_with(|| SignGroup::new(sign.x, sign.z))
            .insert(sign.clone());
    }
    groups.into_values().collect()
}

/// A text span with its presentation resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub color: &'static str,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl StyledSpan {
    pub fn from_span(span: &TextSpan) -> Self {
        Self {
            text: span.text.clone(),
            color: resolve_color(span.color.as_deref()),
            bold: span.bold,
            italic: span.italic,
            underlined: span.underlined,
            strikethrough: span.strikethrough,
            obfuscated: span.obfuscated,
        }
    }

    pub fn font_weight(&self) -> Option<&'static str> {
        self.bold.then_some("bold")
    }

    pub fn font_style(&self) -> Option<&'static str> {
        self.italic.then_some("italic")
    }

    /// CSS `text-decoration`; underline and strikethrough combine.
    pub fn text_decoration(&self) -> String {
        let mut parts = Vec::new();
        if self.underlined {
            parts.push("underline");
        }
        if self.strikethrough {
            parts.push("line-through");
        }
        parts.join(" ")
    }

    /// Obfuscated text is hidden behind a block of its own color.
    pub fn background_color(&self) -> Option<&'static str> {
        self.obfuscated.then_some(self.color)
    }

    pub fn class_name(&self) -> Option<&'static str> {
        self.obfuscated.then_some("obfuscated")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupItem {
    Line(Vec<StyledSpan>),
    LineBreak,
    /// Separator between sign sides.
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignPopup {
    pub items: Vec<PopupItem>,
}

impl SignPopup {
    pub fn for_group(group: &SignGroup) -> Self {
        let mut items = Vec::new();
        for sign in group.signs() {
            for side in [&sign.front_text, &sign.back_text].into_iter().flatten() {
                push_side(&mut items, side);
            }
        }
        items.pop();
        Self { items }
    }

    pub fn line_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, PopupItem::Line(_)))
            .count()
    }

    pub fn rule_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, PopupItem::Rule))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn push_side(items: &mut Vec<PopupItem>, lines: &[SignLine]) {
    for line in lines {
        items.push(PopupItem::Line(line.iter().map(StyledSpan::from_span).collect()));
        items.push(PopupItem::LineBreak);
    }
    items.push(PopupItem::Rule);
}

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use layers::signs::{PopupItem, SignPopup, StyledSpan};

/// Builds the popup element for one sign marker.
pub fn render_popup(document: &Document, popup: &SignPopup) -> Result<Element, JsValue> {
    let root = document.create_element("span")?;
    for item in &popup.items {
        let child = match item {
            PopupItem::Line(spans) => render_line(document, spans)?,
            PopupItem::LineBreak => document.create_element("br")?,
            PopupItem::Rule => document.create_element("hr")?,
        };
        root.append_child(&child)?;
    }
    Ok(root)
}

fn render_line(document: &Document, spans: &[StyledSpan]) -> Result<Element, JsValue> {
    let line = create_html(document, "span")?;
    let style = line.style();
    style.set_property("white-space", "pre")?;
    style.set_property("font-family", "sans")?;

    for span in spans {
        let child = render_span(document, span)?;
        line.append_child(&child)?;
    }
    Ok(line.into())
}

fn render_span(document: &Document, span: &StyledSpan) -> Result<HtmlElement, JsValue> {
    let el = create_html(document, "span")?;
    el.set_text_content(Some(&span.text));

    let style = el.style();
    if let Some(weight) = span.font_weight() {
        style.set_property("font-weight", weight)?;
    }
    if let Some(font_style) = span.font_style() {
        style.set_property("font-style", font_style)?;
    }
    let decoration = span.text_decoration();
    if !decoration.is_empty() {
        style.set_property("text-decoration", &decoration)?;
    }
    style.set_property("color", span.color)?;
    if let Some(background) = span.background_color() {
        style.set_property("background-color", background)?;
    }
    if let Some(class) = span.class_name() {
        el.set_class_name(class);
    }
    Ok(el)
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlDocument, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

pub fn html_document(document: &Document) -> Result<HtmlDocument, JsValue> {
    document
        .clone()
        .dyn_into::<HtmlDocument>()
        .map_err(|_| JsValue::from_str("not an HTML document"))
}

pub fn root_element(document: &Document) -> Result<Element, JsValue> {
    document
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))
}

/// Cookie header of the document; empty when unreadable.
pub fn cookie_header(document: &Document) -> String {
    html_document(document)
        .and_then(|doc| doc.cookie())
        .unwrap_or_default()
}

/// Set or clear a class; the class list is left alone when it already matches.
pub fn set_class(element: &Element, class: &str, present: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, present) {
        tracing::warn!(class, error = ?err, "could not update class list");
    }
}

/// Property lookup that never throws for missing members.
pub fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

#![cfg(target_arch = "wasm32")]
//! Theme propagation into embedded frames.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::theme::{accept_frame_message, LIGHT_CLASS};
use folio_core::{resolve_frame_theme, ThemeCoordinator, ThemeHost, ThemeMessage, ThemePreference};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, HtmlIFrameElement, MessageEvent, MutationObserver,
    MutationObserverInit, MutationRecord, Node,
};

use crate::dom;

/// All `<iframe>` elements under `node`, `node` included.
fn frames_in(node: &Node) -> Vec<HtmlIFrameElement> {
    if let Some(frame) = node.dyn_ref::<HtmlIFrameElement>() {
        return vec![frame.clone()];
    }
    let Some(element) = node.dyn_ref::<web_sys::Element>() else {
        return Vec::new();
    };
    let Ok(list) = element.query_selector_all("iframe") else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlIFrameElement>().ok())
        .collect()
}

pub fn document_frames(document: &Document) -> Vec<HtmlIFrameElement> {
    document
        .document_element()
        .map(|root| frames_in(&root))
        .unwrap_or_default()
}

/// Set the theme class inside a same-origin frame. Cross-origin frames
/// expose no document and are skipped.
pub fn apply_to_frame(frame: &HtmlIFrameElement, theme: ThemePreference) {
    match frame.content_document().and_then(|doc| doc.document_element()) {
        Some(root) => dom::set_class(&root, LIGHT_CLASS, theme.is_light()),
        None => tracing::debug!("frame document not accessible, skipping"),
    }
}

/// Apply the coordinator's theme now if the frame is loaded, else on its first `load`.
fn initialize_frame<H: ThemeHost + 'static>(
    frame: HtmlIFrameElement,
    coordinator: &Rc<RefCell<ThemeCoordinator<H>>>,
) {
    let loaded = frame
        .content_document()
        .map(|doc| doc.ready_state() == "complete")
        .unwrap_or(false);

    if loaded {
        apply_to_frame(&frame, coordinator.borrow().current());
        return;
    }

    let coordinator = Rc::clone(coordinator);
    let target = frame.clone();
    let on_load = Closure::once_into_js(move || {
        apply_to_frame(&target, coordinator.borrow().current());
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    if let Err(err) = frame.add_event_listener_with_callback_and_add_event_listener_options(
        "load",
        on_load.unchecked_ref(),
        &options,
    ) {
        tracing::debug!(error = ?err, "could not watch frame load");
    }
}

/// Theme every current frame and every frame inserted later.
pub fn watch_frames<H: ThemeHost + 'static>(
    document: &Document,
    coordinator: &Rc<RefCell<ThemeCoordinator<H>>>,
) -> Result<(), JsValue> {
    for frame in document_frames(document) {
        initialize_frame(frame, coordinator);
    }

    let Some(body) = document.body() else {
        return Ok(());
    };

    let coordinator = Rc::clone(coordinator);
    let on_mutation = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            for record in records.iter() {
                let record: MutationRecord = record.unchecked_into();
                let added = record.added_nodes();
                for node in (0..added.length()).filter_map(|i| added.get(i)) {
                    for frame in frames_in(&node) {
                        initialize_frame(frame, &coordinator);
                    }
                }
            }
        },
    );

    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&body, &init)?;
    on_mutation.forget();
    Ok(())
}

/// Post `message` to every child frame, restricted to our own origin.
pub fn broadcast(document: &Document, target_origin: &str, message: &ThemeMessage) {
    let payload = match message.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %err, "could not encode theme message");
            return;
        }
    };

    for frame in document_frames(document) {
        let Some(window) = frame.content_window() else {
            continue;
        };
        if let Err(err) = window.post_message(&payload, target_origin) {
            tracing::debug!(error = ?err, "frame refused theme message");
        }
    }
}

/// Entry point for pages loaded inside a frame.
///
/// Applies the theme from the shared cookie, then follows `toggleTheme`
/// messages from the parent. Frames never persist the preference.
#[wasm_bindgen]
pub fn start_frame_theme_listener() -> Result<(), JsValue> {
    crate::init();

    let window = dom::window()?;
    let document = dom::document()?;
    let root = dom::root_element(&document)?;

    let theme = resolve_frame_theme(&dom::cookie_header(&document));
    dom::set_class(&root, LIGHT_CLASS, theme.is_light());
    tracing::debug!(%theme, "frame theme applied");

    let own_origin = window.location().origin()?;
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let Ok(payload) = serde_wasm_bindgen::from_value::<serde_json::Value>(event.data()) else {
            return;
        };
        if let Some(theme) = accept_frame_message(&own_origin, &event.origin(), &payload) {
            dom::set_class(&root, LIGHT_CLASS, theme.is_light());
        }
    });
    window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;
    on_message.forget();
    Ok(())
}

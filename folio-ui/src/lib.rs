//! Browser side of the portfolio page: theme toggle synchronized with
//! embedded frames, and the vertical timeline view with group hover.

pub mod host_config;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frames;
#[cfg(target_arch = "wasm32")]
mod hover;
#[cfg(target_arch = "wasm32")]
mod styles;
#[cfg(target_arch = "wasm32")]
mod theme;
#[cfg(target_arch = "wasm32")]
mod timeline;

#[cfg(target_arch = "wasm32")]
pub use frames::start_frame_theme_listener;
#[cfg(target_arch = "wasm32")]
pub use theme::start_theme_coordinator;
#[cfg(target_arch = "wasm32")]
pub use timeline::mount_timeline;

/// Panic hook and console logging; safe to call from every entry point.
#[cfg(target_arch = "wasm32")]
fn init() {
    console_error_panic_hook::set_once();
    let _ = tracing_wasm::try_set_as_global_default();
}

#[cfg(not(target_arch = "wasm32"))]
const WASM_ONLY: &str = "folio-ui only supports the wasm32 target";

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline(_: &str) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(WASM_ONLY))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn start_theme_coordinator(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(WASM_ONLY))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn start_frame_theme_listener() -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(WASM_ONLY))
}

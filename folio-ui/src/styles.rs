#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-folio-ui]";

/// Structural rules the renderer relies on; colors and fonts belong to the site.
pub const BASE_STYLES: &str = r#"
::view-transition-old(root),
::view-transition-new(root) {
  animation: none;
  mix-blend-mode: normal;
}

.timeline-canvas {
  position: relative;
}

.timeline-axis {
  position: absolute;
  inset: 0 auto auto 0;
  width: 100%;
  pointer-events: none;
}

.minor-line,
.major-line,
.major-line-text {
  position: absolute;
  left: 0;
}

.timeline-items {
  position: absolute;
  inset: 0;
}

.timeline-point,
.timeline-range {
  position: absolute;
  background: var(--clr);
}

.timeline-label {
  position: absolute;
  top: var(--y);
  transform: translateY(-50%);
  color: var(--clr);
}

.timeline-label.left {
  right: calc(50% + (var(--lane) + 1) * 16px);
  text-align: right;
}

.timeline-label.right {
  left: calc(50% + (var(--lane) + 1) * 16px);
}

.timeline-label.with-description > span {
  font-weight: 600;
}

.timeline-canvas.element-hovered .timeline-point:not(.i-hovered),
.timeline-canvas.element-hovered .timeline-range:not(.i-hovered),
.timeline-canvas.element-hovered .timeline-label:not(.i-hovered) {
  opacity: 0.35;
}

.timeline-defect {
  color: #b42318;
  font-family: monospace;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-folio-ui", "v1")?;
    style_el.set_text_content(Some(BASE_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}

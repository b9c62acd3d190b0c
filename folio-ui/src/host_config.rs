//! Layout parameters read from attributes on the timeline host element.

use folio_core::{LaneMode, LayoutConfig};

pub const PIXELS_PER_DAY_ATTR: &str = "experience-per-day";
pub const MIN_PX_MINOR_ATTR: &str = "data-min-px-minor";
pub const MIN_PX_MAJOR_ATTR: &str = "data-min-px-major";
pub const VISUAL_STEP_ATTR: &str = "data-visual-step";
/// `side` for side-signed lanes, `signed` for lanes carrying their own sign.
pub const LANE_MODE_ATTR: &str = "data-lane-mode";
/// Id of the `<script type="application/json">` holding the events.
pub const DATA_SOURCE_ATTR: &str = "data-source";
pub const DEFAULT_DATA_ID: &str = "timeline-data";

/// Build a config from an attribute lookup; unusable values fall back to defaults.
pub fn layout_config_from_attributes(attr: impl Fn(&str) -> Option<String>) -> LayoutConfig {
    let base = LayoutConfig::default();
    let number = |name: &str, fallback: f64| match attr(name) {
        None => fallback,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => {
                tracing::warn!(attribute = name, value = %raw, fallback, "ignoring layout attribute");
                fallback
            }
        },
    };

    let lane_mode = match attr(LANE_MODE_ATTR).as_deref().map(str::trim) {
        Some("side") => LaneMode::SideSigned,
        Some("signed") | None => base.lane_mode,
        Some(other) => {
            tracing::warn!(value = other, "unknown lane mode");
            base.lane_mode
        }
    };

    LayoutConfig {
        pixels_per_day: number(PIXELS_PER_DAY_ATTR, base.pixels_per_day),
        visual_step_px: number(VISUAL_STEP_ATTR, base.visual_step_px),
        lane_mode,
        min_px_minor: number(MIN_PX_MINOR_ATTR, base.min_px_minor),
        min_px_major: number(MIN_PX_MAJOR_ATTR, base.min_px_major),
        ..base
    }
}

//! Framework-neutral WASM <-> JavaScript bridge over `folio-core`.

use folio_core::{parse_date, LaneMode, LayoutConfig, ThemeError, TimelineError, TimelineEvent};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Layout overrides accepted from JS; absent fields keep the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsLayoutConfig {
    #[serde(default)]
    pixels_per_day: Option<f64>,
    #[serde(default)]
    visual_step_px: Option<f64>,
    #[serde(default)]
    signed_lanes: Option<bool>,
    #[serde(default)]
    min_range_height_px: Option<f64>,
    #[serde(default)]
    bounds_margin_px: Option<f64>,
    #[serde(default)]
    min_px_minor: Option<f64>,
    #[serde(default)]
    min_px_major: Option<f64>,
}

impl From<JsLayoutConfig> for LayoutConfig {
    fn from(cfg: JsLayoutConfig) -> Self {
        let base = LayoutConfig::default();
        Self {
            pixels_per_day: cfg.pixels_per_day.unwrap_or(base.pixels_per_day),
            visual_step_px: cfg.visual_step_px.unwrap_or(base.visual_step_px),
            lane_mode: match cfg.signed_lanes {
                Some(true) => LaneMode::Signed,
                Some(false) => LaneMode::SideSigned,
                None => base.lane_mode,
            },
            min_range_height_px: cfg.min_range_height_px.unwrap_or(base.min_range_height_px),
            bounds_margin_px: cfg.bounds_margin_px.unwrap_or(base.bounds_margin_px),
            min_px_minor: cfg.min_px_minor.unwrap_or(base.min_px_minor),
            min_px_major: cfg.min_px_major.unwrap_or(base.min_px_major),
        }
    }
}

fn read_inputs(
    events: JsValue,
    config: Option<JsValue>,
) -> Result<(Vec<TimelineEvent>, LayoutConfig), JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let events: Vec<TimelineEvent> = from_value(events)
        .map_err(|err| JsValue::from_str(&format!("could not read timeline events: {err}")))?;

    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsLayoutConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read config: {err}")))?;
            LayoutConfig::from(cfg)
        }
        _ => LayoutConfig::default(),
    };

    Ok((events, cfg))
}

/// Place every event; returns the serialized `TimelineLayout`.
#[wasm_bindgen]
pub fn layout_timeline(events: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let (events, cfg) = read_inputs(events, config)?;
    let layout = folio_core::layout_timeline(&events, &cfg)
        .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;
    to_value(&layout).map_err(|err| JsValue::from_str(&format!("could not serialize layout: {err}")))
}

/// Axis ticks for the events' full date span.
#[wasm_bindgen]
pub fn generate_axis_ticks(events: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let (events, cfg) = read_inputs(events, config)?;
    let ticks = folio_core::generate_axis_ticks(&events, &cfg)
        .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;
    to_value(&ticks).map_err(|err| JsValue::from_str(&format!("could not serialize ticks: {err}")))
}

/// `"light"` or `"dark"` from a cookie header and a `location.search` string.
#[wasm_bindgen]
pub fn resolve_initial_theme(cookie_header: &str, search: &str) -> String {
    folio_core::resolve_initial_theme(cookie_header, search).to_string()
}

/// Reformat a `D.M.Y` date the way axis labels show it.
#[wasm_bindgen]
pub fn format_axis_date(date: &str) -> Result<String, JsValue> {
    parse_date(date)
        .map(folio_core::format_axis_date)
        .map_err(|err| JsValue::from_str(&format_timeline_error(err)))
}

/// Validate a theme name coming from JS.
#[wasm_bindgen]
pub fn toggled_theme(theme: &str) -> Result<String, JsValue> {
    theme
        .parse::<folio_core::ThemePreference>()
        .map(|theme| theme.toggled().to_string())
        .map_err(|err| JsValue::from_str(&format_theme_error(err)))
}

fn format_timeline_error(err: TimelineError) -> String {
    tracing::error!(error = %err, "timeline request failed");
    format!("Timeline error: {err}")
}

fn format_theme_error(err: ThemeError) -> String {
    format!("Theme error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_config_overlays_defaults() {
        let cfg: JsLayoutConfig =
            serde_json::from_str(r#"{"pixelsPerDay": 2.0, "signedLanes": false}"#).unwrap();
        let cfg = LayoutConfig::from(cfg);
        assert_eq!(cfg.pixels_per_day, 2.0);
        assert_eq!(cfg.lane_mode, LaneMode::SideSigned);
        assert_eq!(cfg.min_px_minor, LayoutConfig::default().min_px_minor);
    }

    #[test]
    fn empty_js_config_is_default() {
        assert_eq!(
            LayoutConfig::from(JsLayoutConfig::default()),
            LayoutConfig::default()
        );
    }

    #[test]
    fn theme_helpers() {
        assert_eq!(resolve_initial_theme("theme=light", "?theme=dark"), "light");
        assert_eq!(toggled_theme("dark").unwrap(), "light");
        assert_eq!(
            format_theme_error(ThemeError::TransitionInProgress),
            "Theme error: a theme transition is already running"
        );
    }

    #[test]
    fn axis_label_format() {
        assert_eq!(format_axis_date("5.3.2021").unwrap(), "5.03.2021");
        assert_eq!(format_axis_date("12.11.2019").unwrap(), "12.11.2019");
    }
}

//! Tunables for the timeline layout and the theme coordinator.

use serde::{Deserialize, Serialize};

use crate::event::TimelineEvent;
use crate::TimelineError;

/// How an event's lane turns into a horizontal offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaneMode {
    /// Lane counts away from the axis; `side` supplies the sign.
    SideSigned,
    /// Lane already carries its sign (negative = left of the axis).
    #[default]
    Signed,
}

/// Timeline geometry, mostly read from host attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical density (`experience-per-day`).
    pub pixels_per_day: f64,
    /// Horizontal distance between neighbouring lanes.
    pub visual_step_px: f64,
    pub lane_mode: LaneMode,
    /// Ranges never render shorter than this.
    pub min_range_height_px: f64,
    /// Padding around the hover bounds.
    pub bounds_margin_px: f64,
    /// Smallest gap between two minor axis ticks (`data-min-px-minor`).
    pub min_px_minor: f64,
    /// Smallest gap between two labelled ticks (`data-min-px-major`).
    pub min_px_major: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_day: 0.8,
            visual_step_px: 16.0,
            lane_mode: LaneMode::Signed,
            min_range_height_px: 6.0,
            bounds_margin_px: 15.0,
            min_px_minor: 20.0,
            min_px_major: 100.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), TimelineError> {
        let positive = [
            ("pixels_per_day", self.pixels_per_day),
            ("visual_step_px", self.visual_step_px),
            ("min_px_minor", self.min_px_minor),
            ("min_px_major", self.min_px_major),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("min_range_height_px", self.min_range_height_px),
            ("bounds_margin_px", self.bounds_margin_px),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Horizontal offset of an event's marker relative to the axis.
    pub fn lane_offset(&self, event: &TimelineEvent) -> f64 {
        let lane = match self.lane_mode {
            LaneMode::SideSigned => event.side.sign() * event.lane,
            LaneMode::Signed => event.lane,
        };
        lane as f64 * self.visual_step_px
    }
}

/// When the new theme is written to the cookie and URL during an animated toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistTiming {
    /// As soon as the transition is ready to animate.
    #[default]
    OnReady,
    /// After the transition has fully finished.
    OnFinished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub persist_timing: PersistTiming,
    pub reveal_duration_ms: f64,
    pub reveal_easing: String,
    /// Id of the checkbox that drives the toggle.
    pub toggle_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            persist_timing: PersistTiming::OnReady,
            reveal_duration_ms: 500.0,
            reveal_easing: "ease-in-out".to_string(),
            toggle_id: "theme-toggle".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Side, TimelineSpan};

    fn event(side: Side, lane: i64) -> TimelineEvent {
        TimelineEvent {
            title: "e".into(),
            color: "#fff".into(),
            side,
            lane,
            description: None,
            label_shift: None,
            span: TimelineSpan::Point {
                point: "1.1.2020".into(),
            },
        }
    }

    #[test]
    fn signed_lanes_keep_their_own_sign() {
        let config = LayoutConfig::default();
        assert_eq!(config.lane_offset(&event(Side::Left, 2)), 32.0);
        assert_eq!(config.lane_offset(&event(Side::Right, -1)), -16.0);
    }

    #[test]
    fn side_signed_lanes_follow_side() {
        let config = LayoutConfig {
            lane_mode: LaneMode::SideSigned,
            visual_step_px: 12.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.lane_offset(&event(Side::Left, 2)), -24.0);
        assert_eq!(config.lane_offset(&event(Side::Right, 2)), 24.0);
    }

    #[test]
    fn rejects_non_positive_density() {
        let config = LayoutConfig {
            pixels_per_day: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(TimelineError::InvalidConfig(_))));

        let config = LayoutConfig {
            min_px_minor: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_config_overlays_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"pixels_per_day": 1.0, "lane_mode": "side_signed"}"#)
                .unwrap();
        assert_eq!(config.pixels_per_day, 1.0);
        assert_eq!(config.lane_mode, LaneMode::SideSigned);
        assert_eq!(config.min_px_major, 100.0);
    }
}

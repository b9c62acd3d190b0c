//! Core logic for the portfolio page: timeline layout, axis ticks, hover
//! groups and the light/dark theme state machine.

pub mod config;
pub mod date;
pub mod event;
pub mod hover;
pub mod layout;
pub mod theme;
pub mod ticks;

pub use config::{LaneMode, LayoutConfig, PersistTiming, ThemeConfig};
pub use date::{format_axis_date, parse_date};
pub use event::{parse_events, Side, TimelineEvent, TimelineSpan};
pub use hover::{HoverChange, HoverGroupId, HoverState, HoverTarget};
pub use layout::{
    layout_timeline, Bounds, LabelPlacement, Marker, PlacedEvent, TimeAxis, TimelineLayout,
};
pub use theme::{
    resolve_frame_theme, resolve_initial_theme, ThemeCapabilities, ThemeCoordinator, ThemeHost,
    ThemeMessage, ThemePreference, TransitionMode,
};
pub use ticks::{generate_axis_ticks, AxisTicks, TickMark, TickPlan};

/// Errors while reading or laying out timeline data.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("invalid date {0:?}, expected D.M.Y")]
    InvalidDate(String),
    #[error("event #{index} ({title:?}): {reason}")]
    InvalidEvent {
        index: usize,
        title: String,
        reason: String,
    },
    #[error("no valid dates found in the timeline data")]
    EmptyTimeline,
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error("could not read timeline data: {0}")]
    Parse(String),
}

/// Errors raised by the theme coordinator.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
    #[error("a theme transition is already running")]
    TransitionInProgress,
    #[error("document unavailable: {0}")]
    Host(String),
}

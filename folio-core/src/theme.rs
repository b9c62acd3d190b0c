//! Light/dark preference shared by a page and its embedded frames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{PersistTiming, ThemeConfig};
use crate::ThemeError;

pub const THEME_COOKIE: &str = "theme";
pub const THEME_QUERY_PARAM: &str = "theme";
/// Root class present iff the light theme is active.
pub const LIGHT_CLASS: &str = "light";
/// One year.
pub const COOKIE_MAX_AGE_SECS: u32 = 31_536_000;
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_light(self) -> bool {
        self == ThemePreference::Light
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }
}

/// Theme stored in a `document.cookie` style header, if any.
pub fn theme_from_cookie_header(header: &str) -> Option<ThemePreference> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == THEME_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

/// Theme named by the `theme` query parameter of a `location.search` string.
pub fn theme_from_query(search: &str) -> Option<ThemePreference> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == THEME_QUERY_PARAM)
        .and_then(|(_, value)| value.parse().ok())
}

/// Cookie first, then the URL, then dark.
pub fn resolve_initial_theme(cookie_header: &str, search: &str) -> ThemePreference {
    theme_from_cookie_header(cookie_header)
        .or_else(|| theme_from_query(search))
        .unwrap_or_default()
}

/// Embedded frames only trust the shared cookie.
pub fn resolve_frame_theme(cookie_header: &str) -> ThemePreference {
    theme_from_cookie_header(cookie_header).unwrap_or_default()
}

/// Value assigned to `document.cookie` when persisting.
pub fn cookie_assignment(theme: ThemePreference) -> String {
    format!("{THEME_COOKIE}={theme}; path=/; max-age={COOKIE_MAX_AGE_SECS}")
}

/// Message posted from the page to its frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum ThemeMessage {
    #[serde(rename = "toggleTheme")]
    ToggleTheme { theme: ThemePreference },
}

impl ThemeMessage {
    pub fn theme(&self) -> ThemePreference {
        match self {
            ThemeMessage::ToggleTheme { theme } => *theme,
        }
    }
}

/// Viewport rectangle of the toggle control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Circular clip-path reveal played on the new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimation {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub duration_ms: f64,
    pub easing: String,
}

impl RevealAnimation {
    /// Reveal from the control's center out to the farthest viewport corner.
    pub fn from_control(
        rect: ControlRect,
        viewport_width: f64,
        viewport_height: f64,
        config: &ThemeConfig,
    ) -> Self {
        let center_x = rect.left + rect.width / 2.0;
        let center_y = rect.top + rect.height / 2.0;
        let dx = center_x.max(viewport_width - center_x);
        let dy = center_y.max(viewport_height - center_y);
        Self {
            center_x,
            center_y,
            radius: dx.hypot(dy),
            duration_ms: config.reveal_duration_ms,
            easing: config.reveal_easing.clone(),
        }
    }

    pub fn clip_path_keyframes(&self) -> [String; 2] {
        let (x, y) = (self.center_x, self.center_y);
        [
            format!("circle(0px at {x}px {y}px)"),
            format!("circle({}px at {x}px {y}px)", self.radius),
        ]
    }
}

/// What the platform offers for an animated switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeCapabilities {
    pub view_transition: bool,
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    Immediate,
    Animated,
}

impl ThemeCapabilities {
    pub fn transition_mode(&self) -> TransitionMode {
        if self.view_transition && !self.reduced_motion {
            TransitionMode::Animated
        } else {
            TransitionMode::Immediate
        }
    }
}

/// Side effects the coordinator needs from the document.
pub trait ThemeHost {
    /// Toggle [`LIGHT_CLASS`] on the root element.
    fn set_root_light(&mut self, light: bool);
    fn write_cookie(&mut self, assignment: &str);
    /// Replace the `theme` query parameter without adding a history entry.
    fn replace_query_theme(&mut self, theme: ThemePreference);
    /// Deliver to every live child frame; per-frame failures are swallowed.
    fn broadcast(&mut self, message: &ThemeMessage);
}

/// A toggle that has been reserved but whose transition has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingToggle {
    theme: ThemePreference,
    published: bool,
}

/// Owns the current preference and the toggle in flight, if any.
///
/// An animated toggle follows the host's view transition:
/// [`begin_toggle`](Self::begin_toggle) reserves it,
/// [`commit`](Self::commit) runs inside the transition callback,
/// [`transition_ready`](Self::transition_ready) and
/// [`transition_finished`](Self::transition_finished) follow the two
/// transition signals. Persisting and broadcasting happen once, at the
/// configured [`PersistTiming`], and at the latest on finish.
#[derive(Debug)]
pub struct ThemeCoordinator<H> {
    host: H,
    current: ThemePreference,
    pending: Option<PendingToggle>,
    config: ThemeConfig,
}

impl<H: ThemeHost> ThemeCoordinator<H> {
    pub fn new(host: H, initial: ThemePreference, config: ThemeConfig) -> Self {
        Self {
            host,
            current: initial,
            pending: None,
            config,
        }
    }

    /// Apply the resolved theme and mirror it into the cookie and URL.
    pub fn initialize(&mut self) {
        let theme = self.current;
        self.apply(theme);
        self.persist(theme);
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_transition_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn apply(&mut self, theme: ThemePreference) {
        self.host.set_root_light(theme.is_light());
    }

    pub fn persist(&mut self, theme: ThemePreference) {
        self.host.write_cookie(&cookie_assignment(theme));
        self.host.replace_query_theme(theme);
    }

    /// Reserve a toggle; fails while a previous one is still animating.
    pub fn begin_toggle(&mut self) -> Result<ThemePreference, ThemeError> {
        if self.pending.is_some() {
            return Err(ThemeError::TransitionInProgress);
        }
        let theme = self.current.toggled();
        self.pending = Some(PendingToggle {
            theme,
            published: false,
        });
        Ok(theme)
    }

    /// Switch the document to `theme`.
    pub fn commit(&mut self, theme: ThemePreference) {
        self.current = theme;
        self.apply(theme);
    }

    /// The transition's `ready` signal fired.
    pub fn transition_ready(&mut self) {
        if self.config.persist_timing == PersistTiming::OnReady {
            self.publish_pending();
        }
    }

    /// The transition settled, cleanly or not. Lands on the reserved theme
    /// even if the update callback never ran, and releases the guard.
    pub fn transition_finished(&mut self) {
        let Some(pending) = self.pending else {
            return;
        };
        if self.current != pending.theme {
            tracing::debug!(theme = %pending.theme, "committing theme after transition");
            self.commit(pending.theme);
        }
        self.publish_pending();
        self.pending = None;
        tracing::info!(theme = %pending.theme, "theme toggled");
    }

    /// Toggle without animation.
    pub fn toggle(&mut self) -> Result<ThemePreference, ThemeError> {
        let next = self.begin_toggle()?;
        self.commit(next);
        self.transition_finished();
        Ok(next)
    }

    /// Persist the reserved theme and tell the frames, at most once per toggle.
    fn publish_pending(&mut self) {
        let Some(pending) = self.pending.as_mut().filter(|p| !p.published) else {
            return;
        };
        pending.published = true;
        let theme = pending.theme;
        self.persist(theme);
        self.host.broadcast(&ThemeMessage::ToggleTheme { theme });
    }
}

/// Decide what an embedded frame should do with an incoming message.
///
/// Returns the theme to apply when the origin matches and the payload is a
/// well-formed envelope.
pub fn accept_frame_message(
    own_origin: &str,
    event_origin: &str,
    payload: &serde_json::Value,
) -> Option<ThemePreference> {
    if own_origin != event_origin {
        tracing::debug!(event_origin, "ignoring theme message from foreign origin");
        return None;
    }
    match ThemeMessage::deserialize(payload) {
        Ok(message) => Some(message.theme()),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed theme message");
            None
        }
    }
}

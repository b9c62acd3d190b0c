//! Places timeline events on the vertical axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::date::days_between;
use crate::event::{Side, TimelineEvent, TimelineSpan};
use crate::TimelineError;

/// Affine day -> pixel mapping anchored at the earliest start date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    origin: NaiveDate,
    pixels_per_day: f64,
}

impl TimeAxis {
    pub fn new(origin: NaiveDate, pixels_per_day: f64) -> Self {
        Self {
            origin,
            pixels_per_day,
        }
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn y(&self, date: NaiveDate) -> f64 {
        days_between(self.origin, date) * self.pixels_per_day
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marker {
    Point { y: f64 },
    Range { top: f64, height: f64, now: bool },
}

impl Marker {
    /// Lowest pixel covered by the marker.
    pub fn bottom(&self) -> f64 {
        match self {
            Marker::Point { y } => *y,
            Marker::Range { top, height, .. } => top + height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelPlacement {
    /// Lane column reserved for labels on this side (`--lane`).
    pub lane_column: i64,
    /// Vertical center of the label (`--y`), shift included.
    pub center_y: f64,
    /// A description block renders under the title.
    pub has_description: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedEvent {
    /// Position after sorting; used for element ids and hover groups.
    pub index: usize,
    /// Position in the input document.
    pub source_index: usize,
    pub title: String,
    pub color: String,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub offset_x: f64,
    pub marker: Marker,
    pub label: LabelPlacement,
}

impl PlacedEvent {
    pub fn marker_id(&self) -> String {
        match self.marker {
            Marker::Point { .. } => format!("event-{}-point", self.index),
            Marker::Range { .. } => format!("event-{}-range", self.index),
        }
    }

    pub fn label_id(&self) -> String {
        format!("event-{}-label", self.index)
    }
}

/// Invisible box covering all placed content, used as the hover canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Shift of the box center away from the axis.
    pub center_offset_x: f64,
}

impl Bounds {
    pub fn around(min_x: f64, max_x: f64, max_y: f64, margin: f64) -> Self {
        Self {
            top: -margin,
            width: (max_x - min_x) + margin * 2.0,
            height: max_y + margin * 2.0,
            center_offset_x: (min_x + max_x) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineLayout {
    pub origin: NaiveDate,
    pub events: Vec<PlacedEvent>,
    pub min_lane: i64,
    pub max_lane: i64,
    pub min_x: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub bounds: Bounds,
    /// Top of the trailing footer anchor.
    pub footer_top: f64,
}

/// Compute positions for every event.
///
/// Events are stably sorted by start date; ties keep their document order.
/// Any malformed date fails the whole layout so the defect is visible.
pub fn layout_timeline(
    events: &[TimelineEvent],
    config: &LayoutConfig,
) -> Result<TimelineLayout, TimelineError> {
    config.validate()?;

    let mut dated = events
        .iter()
        .enumerate()
        .map(|(source_index, event)| {
            let (start, end) = event.dates().map_err(|err| TimelineError::InvalidEvent {
                index: source_index,
                title: event.title.clone(),
                reason: err.to_string(),
            })?;
            Ok((source_index, event, start, end))
        })
        .collect::<Result<Vec<_>, TimelineError>>()?;

    let origin = dated
        .iter()
        .map(|(_, _, start, _)| *start)
        .min()
        .ok_or(TimelineError::EmptyTimeline)?;
    let axis = TimeAxis::new(origin, config.pixels_per_day);

    dated.sort_by_key(|(_, _, start, _)| *start);

    let min_lane = dated.iter().map(|(_, e, ..)| e.lane).min().unwrap_or(0);
    let max_lane = dated.iter().map(|(_, e, ..)| e.lane).max().unwrap_or(0);

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut placed = Vec::with_capacity(dated.len());

    for (index, (source_index, event, start, end)) in dated.into_iter().enumerate() {
        let y1 = axis.y(start);
        let y2 = axis.y(end);
        let offset_x = config.lane_offset(event);

        let (marker, center_y) = match &event.span {
            TimelineSpan::Point { .. } => (Marker::Point { y: y1 }, y1),
            TimelineSpan::Range { now, .. } => (
                Marker::Range {
                    top: y1,
                    height: (y2 - y1).max(config.min_range_height_px),
                    now: *now,
                },
                (y1 + y2) / 2.0,
            ),
        };

        min_x = min_x.min(offset_x);
        max_x = max_x.max(offset_x);
        max_y = max_y.max(marker.bottom());

        let lane_column = match event.side {
            Side::Left => min_lane.abs(),
            Side::Right => max_lane.abs(),
        };

        placed.push(PlacedEvent {
            index,
            source_index,
            title: event.title.clone(),
            color: event.color.clone(),
            side: event.side,
            description: event.description.clone(),
            offset_x,
            marker,
            label: LabelPlacement {
                lane_column,
                center_y: center_y + event.label_shift.unwrap_or(0.0),
                has_description: event.description.is_some(),
            },
        });
    }

    tracing::debug!(
        events = placed.len(),
        min_x,
        max_x,
        max_y,
        "timeline layout computed"
    );

    Ok(TimelineLayout {
        origin,
        events: placed,
        min_lane,
        max_lane,
        min_x,
        max_x,
        max_y,
        bounds: Bounds::around(min_x, max_x, max_y, config.bounds_margin_px),
        footer_top: max_y,
    })
}

//! Declarative timeline entries as embedded in the page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::parse_date;
use crate::TimelineError;

/// Which side of the axis the label sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> i64 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Either a single day or an interval between two days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TimelineSpan {
    Point {
        point: String,
    },
    Range {
        from: String,
        to: String,
        /// Ongoing interval; affects presentation only.
        #[serde(default)]
        now: bool,
    },
}

impl TimelineSpan {
    pub fn is_point(&self) -> bool {
        matches!(self, TimelineSpan::Point { .. })
    }

    /// Start and end day. A point starts and ends on the same day.
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), TimelineError> {
        match self {
            TimelineSpan::Point { point } => {
                let day = parse_date(point)?;
                Ok((day, day))
            }
            TimelineSpan::Range { from, to, .. } => Ok((parse_date(from)?, parse_date(to)?)),
        }
    }
}

/// One entry of the `timeline-data` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub title: String,
    pub color: String,
    pub side: Side,
    pub lane: i64,
    /// Trusted author markup shown under the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Manual vertical nudge of the label, in pixels.
    #[serde(default, rename = "labelShift", skip_serializing_if = "Option::is_none")]
    pub label_shift: Option<f64>,
    #[serde(rename = "timeline")]
    pub span: TimelineSpan,
}

impl TimelineEvent {
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), TimelineError> {
        self.span.dates()
    }

    pub fn start(&self) -> Result<NaiveDate, TimelineError> {
        self.dates().map(|(start, _)| start)
    }
}

/// Decode the embedded JSON array of events.
pub fn parse_events(json: &str) -> Result<Vec<TimelineEvent>, TimelineError> {
    serde_json::from_str(json).map_err(|err| TimelineError::Parse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"[
        {"title": "A", "color": "#f00", "side": "left", "lane": 1,
         "timeline": {"point": "01.01.2020"}},
        {"title": "B", "color": "#0f0", "side": "right", "lane": 2,
         "description": "<b>x</b>", "labelShift": -4,
         "timeline": {"from": "01.01.2020", "to": "10.01.2020", "now": true}}
    ]"##;

    #[test]
    fn decodes_points_and_ranges() {
        let events = parse_events(SAMPLE).unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].side, Side::Left);
        assert!(events[0].span.is_point());
        assert_eq!(events[0].description, None);

        assert_eq!(events[1].label_shift, Some(-4.0));
        assert_eq!(
            events[1].span,
            TimelineSpan::Range {
                from: "01.01.2020".into(),
                to: "10.01.2020".into(),
                now: true,
            }
        );
    }

    #[test]
    fn point_starts_and_ends_on_same_day() {
        let events = parse_events(SAMPLE).unwrap();
        let (start, end) = events[0].dates().unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn range_without_now_defaults_to_false() {
        let span: TimelineSpan =
            serde_json::from_str(r#"{"from": "1.1.2020", "to": "2.1.2020"}"#).unwrap();
        assert!(matches!(span, TimelineSpan::Range { now: false, .. }));
    }

    #[test]
    fn reports_unparseable_documents() {
        let err = parse_events(r#"[{"title": "no span"}]"#).unwrap_err();
        assert!(matches!(err, TimelineError::Parse(_)));
    }

    #[test]
    fn malformed_dates_surface_on_access() {
        let span = TimelineSpan::Point {
            point: "2020/01/01".into(),
        };
        assert!(matches!(span.dates(), Err(TimelineError::InvalidDate(_))));
    }
}

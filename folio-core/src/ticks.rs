//! Axis tick marks: evenly spaced minor ticks, a subset of labelled majors.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::date::{days_between, format_axis_date};
use crate::event::TimelineEvent;
use crate::TimelineError;

/// Upper bound on minor intervals; anything denser is a configuration error.
pub const MAX_TICK_INTERVALS: usize = 100_000;

/// Tick indices before any dates are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlan {
    /// Number of minor intervals; indices run `0..=intervals`.
    pub intervals: usize,
    pub minor_spacing_px: f64,
    /// Ascending, always ends with `intervals`.
    pub major_indices: Vec<usize>,
}

impl TickPlan {
    pub fn compute(
        height: f64,
        min_px_minor: f64,
        min_px_major: f64,
    ) -> Result<Self, TimelineError> {
        let ratio = (height / min_px_minor).floor();
        if !ratio.is_finite() || ratio > MAX_TICK_INTERVALS as f64 {
            return Err(TimelineError::InvalidConfig(format!(
                "{height}px at min_px_minor {min_px_minor} exceeds {MAX_TICK_INTERVALS} tick intervals"
            )));
        }
        let intervals = (ratio as usize).max(1);
        let minor_spacing_px = height / intervals as f64;

        let major_intervals = (height / min_px_major).floor() as usize;
        let major_spacing_px = if major_intervals > 0 {
            height / major_intervals as f64
        } else {
            height
        };
        let step = if minor_spacing_px > 0.0 {
            ((major_spacing_px / minor_spacing_px).round() as usize).max(1)
        } else {
            1
        };

        let mut major_indices: Vec<usize> = (0..intervals).step_by(step).collect();
        major_indices.push(intervals);

        // Keep the closing label from crowding the one before it.
        if major_indices.len() > 2 {
            let last = major_indices[major_indices.len() - 1];
            let penultimate = major_indices[major_indices.len() - 2];
            if (last - penultimate) as f64 * minor_spacing_px < min_px_major {
                major_indices.remove(major_indices.len() - 2);
            }
        }

        Ok(Self {
            intervals,
            minor_spacing_px,
            major_indices,
        })
    }

    pub fn is_major(&self, index: usize) -> bool {
        self.major_indices.binary_search(&index).is_ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickMark {
    pub index: usize,
    pub offset_px: f64,
    pub date: NaiveDate,
    /// Present on major ticks only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TickMark {
    pub fn is_major(&self) -> bool {
        self.label.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisTicks {
    pub origin: NaiveDate,
    pub height: f64,
    pub total_days: f64,
    pub minor_spacing_px: f64,
    pub ticks: Vec<TickMark>,
}

impl AxisTicks {
    /// Ticks for a date span already resolved to `origin..origin + total_days`.
    pub fn for_span(
        origin: NaiveDate,
        total_days: f64,
        pixels_per_day: f64,
        min_px_minor: f64,
        min_px_major: f64,
    ) -> Result<Self, TimelineError> {
        let height = total_days * pixels_per_day;
        let plan = TickPlan::compute(height, min_px_minor, min_px_major)?;
        let intervals = plan.intervals as f64;

        let ticks = (0..=plan.intervals)
            .map(|index| {
                // Interpolate by index so rounding does not accumulate.
                let days = (index as f64 * total_days / intervals + 1e-9).floor();
                let date = origin + Duration::days(days as i64);
                TickMark {
                    index,
                    offset_px: index as f64 * plan.minor_spacing_px,
                    date,
                    label: plan.is_major(index).then(|| format_axis_date(date)),
                }
            })
            .collect();

        Ok(Self {
            origin,
            height,
            total_days,
            minor_spacing_px: plan.minor_spacing_px,
            ticks,
        })
    }

    pub fn majors(&self) -> impl Iterator<Item = &TickMark> {
        self.ticks.iter().filter(|tick| tick.is_major())
    }
}

/// Ticks spanning every valid date in `events`.
///
/// Events whose dates do not parse are skipped with a warning; if nothing
/// usable remains the timeline is reported as empty.
pub fn generate_axis_ticks(
    events: &[TimelineEvent],
    config: &LayoutConfig,
) -> Result<AxisTicks, TimelineError> {
    config.validate()?;

    let mut span: Option<(NaiveDate, NaiveDate)> = None;
    for (index, event) in events.iter().enumerate() {
        match event.dates() {
            Ok((start, end)) => {
                span = Some(match span {
                    Some((min, max)) => (min.min(start), max.max(end)),
                    None => (start, end),
                });
            }
            Err(err) => {
                tracing::warn!(index, title = %event.title, error = %err, "skipping event on axis");
            }
        }
    }

    let Some((min, max)) = span else {
        tracing::error!("no valid dates found in timeline data");
        return Err(TimelineError::EmptyTimeline);
    };

    AxisTicks::for_span(
        min,
        days_between(min, max),
        config.pixels_per_day,
        config.min_px_minor,
        config.min_px_major,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use crate::event::{Side, TimelineSpan};

    #[test]
    fn last_major_is_the_boundary() {
        for height in [0.0, 5.0, 99.0, 100.0, 250.0, 731.0, 1000.0, 2921.6] {
            let plan = TickPlan::compute(height, 20.0, 100.0).unwrap();
            assert_eq!(plan.major_indices.last(), Some(&plan.intervals), "height {height}");
            assert_eq!(plan.major_indices.first(), Some(&0));
        }
    }

    #[test]
    fn majors_are_unique_and_ascending() {
        for height in [40.0, 333.0, 980.0, 1234.5] {
            let plan = TickPlan::compute(height, 20.0, 100.0).unwrap();
            assert!(plan.major_indices.windows(2).all(|w| w[0] < w[1]), "height {height}");
        }
    }

    #[test]
    fn crowded_penultimate_major_is_dropped() {
        // 26 intervals, majors every 5: 0..25 then 26, and 25 sits one interval from the end.
        let plan = TickPlan::compute(530.0, 20.0, 100.0).unwrap();
        assert_eq!(plan.intervals, 26);
        assert_eq!(plan.major_indices, vec![0, 5, 10, 15, 20, 26]);
    }

    #[test]
    fn roomy_penultimate_major_is_kept() {
        let plan = TickPlan::compute(300.0, 20.0, 100.0).unwrap();
        assert_eq!(plan.intervals, 15);
        assert_eq!(plan.major_indices, vec![0, 5, 10, 15]);
    }

    #[test]
    fn zero_height_still_yields_one_interval() {
        let plan = TickPlan::compute(0.0, 20.0, 100.0).unwrap();
        assert_eq!(plan.intervals, 1);
        assert_eq!(plan.minor_spacing_px, 0.0);
        assert_eq!(plan.major_indices, vec![0, 1]);
    }

    #[test]
    fn every_index_gets_a_tick_and_majors_get_labels() {
        let origin = parse_date("1.1.2020").unwrap();
        let axis = AxisTicks::for_span(origin, 300.0, 1.0, 20.0, 100.0).unwrap();

        assert_eq!(axis.ticks.len(), 16);
        assert_eq!(axis.height, 300.0);
        let majors: Vec<_> = axis.majors().map(|t| t.index).collect();
        assert_eq!(majors, [0, 5, 10, 15]);
        assert_eq!(axis.ticks[0].label.as_deref(), Some("1.01.2020"));
        assert_eq!(axis.ticks[1].label, None);
        assert_eq!(axis.ticks[15].date, origin + Duration::days(300));
        assert_eq!(axis.ticks[5].offset_px, 100.0);
    }

    #[test]
    fn tick_dates_interpolate_by_index() {
        let origin = parse_date("1.1.2020").unwrap();
        // 7 days over 2 intervals: 3.5 days per step.
        let axis = AxisTicks::for_span(origin, 7.0, 10.0, 35.0, 100.0).unwrap();
        assert_eq!(axis.ticks.len(), 3);
        let dates: Vec<_> = axis.ticks.iter().map(|t| format_axis_date(t.date)).collect();
        assert_eq!(dates, ["1.01.2020", "4.01.2020", "8.01.2020"]);
    }

    #[test]
    fn vanishing_minor_spacing_is_rejected() {
        assert!(matches!(
            TickPlan::compute(500.0, 1e-300, 100.0),
            Err(TimelineError::InvalidConfig(_))
        ));
        let config = LayoutConfig {
            min_px_minor: 1e-300,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            generate_axis_ticks(&[dated("1.1.2020", "1.1.2021")], &config),
            Err(TimelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn interval_cap_is_inclusive() {
        let plan = TickPlan::compute(MAX_TICK_INTERVALS as f64, 1.0, 100.0).unwrap();
        assert_eq!(plan.intervals, MAX_TICK_INTERVALS);
        assert!(TickPlan::compute(MAX_TICK_INTERVALS as f64 + 1.0, 1.0, 100.0).is_err());
    }

    fn dated(from: &str, to: &str) -> TimelineEvent {
        TimelineEvent {
            title: "t".into(),
            color: "#000".into(),
            side: Side::Left,
            lane: 1,
            description: None,
            label_shift: None,
            span: TimelineSpan::Range {
                from: from.into(),
                to: to.into(),
                now: false,
            },
        }
    }

    #[test]
    fn span_covers_earliest_start_to_latest_end() {
        let events = vec![dated("10.1.2020", "20.1.2020"), dated("1.1.2020", "5.1.2020")];
        let config = LayoutConfig {
            pixels_per_day: 1.0,
            ..LayoutConfig::default()
        };
        let axis = generate_axis_ticks(&events, &config).unwrap();
        assert_eq!(axis.origin, parse_date("1.1.2020").unwrap());
        assert_eq!(axis.total_days, 19.0);
        assert_eq!(axis.height, 19.0);
    }

    #[test]
    fn no_valid_dates_renders_nothing() {
        let config = LayoutConfig::default();
        assert!(matches!(
            generate_axis_ticks(&[], &config),
            Err(TimelineError::EmptyTimeline)
        ));
        assert!(matches!(
            generate_axis_ticks(&[dated("nope", "1.1.2020")], &config),
            Err(TimelineError::EmptyTimeline)
        ));
    }

    #[test]
    fn malformed_events_are_skipped() {
        let events = vec![dated("bad", "x"), dated("1.1.2020", "11.1.2020")];
        let config = LayoutConfig {
            pixels_per_day: 1.0,
            ..LayoutConfig::default()
        };
        let axis = generate_axis_ticks(&events, &config).unwrap();
        assert_eq!(axis.total_days, 10.0);
    }
}

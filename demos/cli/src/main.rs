use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use folio_core::{
    format_axis_date, generate_axis_ticks, layout_timeline, parse_events, LaneMode, LayoutConfig,
    Marker,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "folio-cli",
    about = "Lay out portfolio timeline data and print the result."
)]
struct Args {
    /// Path to the timeline JSON (same document the page embeds).
    #[arg(short, long)]
    input: PathBuf,

    /// Vertical density in pixels per day.
    #[arg(long)]
    pixels_per_day: Option<f64>,

    /// Minimum spacing between minor axis ticks.
    #[arg(long)]
    min_px_minor: Option<f64>,

    /// Minimum spacing between labelled axis ticks.
    #[arg(long)]
    min_px_major: Option<f64>,

    /// Take the lane sign from the lane value (`true`) or from each event's side (`false`).
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    signed_lanes: bool,

    /// Print layout and ticks as JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn layout_config(&self) -> LayoutConfig {
        let base = LayoutConfig::default();
        LayoutConfig {
            pixels_per_day: self.pixels_per_day.unwrap_or(base.pixels_per_day),
            min_px_minor: self.min_px_minor.unwrap_or(base.min_px_minor),
            min_px_major: self.min_px_major.unwrap_or(base.min_px_major),
            lane_mode: if self.signed_lanes {
                LaneMode::Signed
            } else {
                LaneMode::SideSigned
            },
            ..base
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read {:?}", args.input))?;

    let config = args.layout_config();
    let events = parse_events(&data)?;
    let layout = layout_timeline(&events, &config).context("timeline layout failed")?;
    let ticks = generate_axis_ticks(&events, &config).context("axis ticks failed")?;
    tracing::info!(events = layout.events.len(), ticks = ticks.ticks.len(), "laid out timeline");

    if args.json {
        let output = serde_json::json!({ "layout": layout, "ticks": ticks });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Origin: {}\nEvents: {}\nLanes: {}..{}\nHeight: {}px\nBounds: {:?}",
        format_axis_date(layout.origin),
        layout.events.len(),
        layout.min_lane,
        layout.max_lane,
        layout.max_y,
        layout.bounds
    );
    for event in &layout.events {
        let span = match &event.marker {
            Marker::Point { y } => format!("point y={y}"),
            Marker::Range { top, height, now } => {
                format!("range y={top} h={height}{}", if *now { " (now)" } else { "" })
            }
        };
        println!(
            "  #{:<3} {:<32} x={:<6} {span}",
            event.index, event.title, event.offset_x
        );
    }
    let labels: Vec<_> = ticks.majors().filter_map(|tick| tick.label.as_deref()).collect();
    println!("Axis labels: {}", labels.join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_lanes_is_the_default() {
        let args = Args::try_parse_from(["folio-cli", "--input", "events.json"]).unwrap();
        assert_eq!(args.layout_config().lane_mode, LaneMode::Signed);
    }

    #[test]
    fn signed_lanes_false_switches_to_side_signs() {
        let args = Args::try_parse_from([
            "folio-cli",
            "--input",
            "events.json",
            "--signed-lanes",
            "false",
            "--min-px-minor",
            "25",
        ])
        .unwrap();
        let config = args.layout_config();
        assert_eq!(config.lane_mode, LaneMode::SideSigned);
        assert_eq!(config.min_px_minor, 25.0);
        assert_eq!(config.pixels_per_day, LayoutConfig::default().pixels_per_day);
    }

    #[test]
    fn old_side_signed_flag_is_rejected() {
        assert!(Args::try_parse_from([
            "folio-cli",
            "--input",
            "events.json",
            "--side-signed-lanes",
        ])
        .is_err());
    }
}

use std::fs;

use folio_core::{
    format_axis_date, generate_axis_ticks, layout_timeline, parse_events, LayoutConfig,
    TimelineLayout,
};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn half_px_per_day() -> LayoutConfig {
    LayoutConfig {
        pixels_per_day: 0.5,
        ..LayoutConfig::default()
    }
}

#[test]
fn career_layout_matches_golden() {
    let data = fs::read_to_string(fixture_path("career_events.json"))
        .expect("could not read sample events");
    let events = parse_events(&data).expect("sample events should decode");

    let actual = layout_timeline(&events, &half_px_per_day()).expect("layout failed");

    let expected = fs::read_to_string(fixture_path("career_layout.json"))
        .expect("could not read golden layout");
    let expected: TimelineLayout = serde_json::from_str(&expected).expect("golden is not valid");

    assert_eq!(actual, expected);

    let described: Vec<_> = actual
        .events
        .iter()
        .filter(|event| event.label.has_description)
        .map(|event| event.title.as_str())
        .collect();
    assert_eq!(described, ["First job"]);
}

#[test]
fn career_axis_spans_whole_history() {
    let data = fs::read_to_string(fixture_path("career_events.json"))
        .expect("could not read sample events");
    let events = parse_events(&data).expect("sample events should decode");

    let axis = generate_axis_ticks(&events, &half_px_per_day()).expect("ticks failed");

    assert_eq!(axis.total_days, 170.0);
    assert_eq!(axis.height, 85.0);
    assert_eq!(axis.ticks.len(), 5);

    let dates: Vec<_> = axis.ticks.iter().map(|t| format_axis_date(t.date)).collect();
    assert_eq!(
        dates,
        ["15.03.2020", "26.04.2020", "8.06.2020", "20.07.2020", "1.09.2020"]
    );

    let labels: Vec<_> = axis.majors().filter_map(|t| t.label.as_deref()).collect();
    assert_eq!(labels, ["15.03.2020", "1.09.2020"]);
}

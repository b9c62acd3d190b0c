#![cfg(target_arch = "wasm32")]

use folio_core::hover::CONTAINER_HOVERED_CLASS;
use folio_core::{
    generate_axis_ticks, layout_timeline, parse_events, AxisTicks, HoverTarget, LayoutConfig,
    Marker, PlacedEvent, TimelineEvent, TimelineLayout,
};
use wasm_bindgen::prelude::*;
use web_sys::{console, Document, Element};
use yew::prelude::*;

use crate::dom;
use crate::host_config::{layout_config_from_attributes, DATA_SOURCE_ATTR, DEFAULT_DATA_ID};
use crate::hover::{HoverLinker, HoverModel};
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct TimelineViewProps {
    pub events: Vec<TimelineEvent>,
    pub config: LayoutConfig,
}

#[function_component(TimelineView)]
fn timeline_view(props: &TimelineViewProps) -> Html {
    use_effect_with((), |_| {
        if let Ok(document) = dom::document() {
            if let Err(err) = styles::ensure_styles(&document) {
                console::error_1(&err);
            }
        }
        || ()
    });

    let computed = use_memo(
        (props.events.clone(), props.config.clone()),
        |(events, config)| layout_timeline(events, config),
    );
    let ticks = use_memo(
        (props.events.clone(), props.config.clone()),
        |(events, config)| generate_axis_ticks(events, config).ok(),
    );

    let hover = use_reducer_eq(HoverModel::default);
    let linker = HoverLinker::new(&hover);

    let layout = match &*computed {
        Ok(layout) => layout,
        Err(err) => {
            tracing::error!(error = %err, "timeline not rendered");
            return html! {
                <div class="timeline-defect" role="alert">{ err.to_string() }</div>
            };
        }
    };

    html! {
        <div class={classes!("timeline-canvas", hover.container_hovered().then_some(CONTAINER_HOVERED_CLASS))}>
            { (*ticks).as_ref().map(render_axis).unwrap_or_default() }
            <div id="timeline-items" class="timeline-items">
                { render_bounds(layout, &linker) }
                { for layout.events.iter().map(|event| render_marker(event, &linker)) }
            </div>
            <div id="timeline-body" class="timeline-body">
                { for layout.events.iter().map(|event| render_label(event, &linker)) }
            </div>
            <div id="space-footer" style={format!("top: {}px", layout.footer_top)}></div>
        </div>
    }
}

fn render_axis(axis: &AxisTicks) -> Html {
    html! {
        <div class="timeline-axis" style={format!("height: {}px", axis.height)}>
            {
                for axis.ticks.iter().map(|tick| {
                    let top = format!("top: {}px", tick.offset_px);
                    html! {
                        <>
                            <div class="minor-line" style={top.clone()}></div>
                            {
                                tick.label.as_ref().map(|label| html! {
                                    <>
                                        <div class="major-line" style={top.clone()}></div>
                                        <div class="major-line-text" style={top.clone()}>{ label.clone() }</div>
                                    </>
                                }).unwrap_or_default()
                            }
                        </>
                    }
                })
            }
        </div>
    }
}

fn render_bounds(layout: &TimelineLayout, linker: &HoverLinker) -> Html {
    let bounds = layout.bounds;
    let attrs = linker.register_hover_target(HoverTarget::bounds());
    let style = format!(
        "position: absolute; transform: translateX(-50%); top: {}px; width: {}px; height: {}px; left: calc(50% + {}px);",
        bounds.top, bounds.width, bounds.height, bounds.center_offset_x
    );
    html! {
        <div
            class={classes!("bounds-timeline", attrs.classes)}
            style={style}
            data-hover-group={attrs.group}
            onmouseenter={attrs.onmouseenter}
            onmouseleave={attrs.onmouseleave}
        ></div>
    }
}

fn render_marker(event: &PlacedEvent, linker: &HoverLinker) -> Html {
    let attrs = linker.register_hover_target(HoverTarget::marker(event.index));
    let (class, style) = match &event.marker {
        Marker::Point { y } => (
            classes!("timeline-point"),
            format!(
                "left: calc(50% + {}px); top: {y}px; transform: translate(-50%, -50%); --clr: {};",
                event.offset_x, event.color
            ),
        ),
        Marker::Range { top, height, now } => (
            classes!("timeline-range", now.then_some("now")),
            format!(
                "left: calc(50% + {}px); top: {top}px; height: {height}px; transform: translate(-50%, 0); --clr: {};",
                event.offset_x, event.color
            ),
        ),
    };

    html! {
        <div
            id={event.marker_id()}
            class={classes!(class, attrs.classes)}
            style={style}
            data-hover-group={attrs.group}
            onmouseenter={attrs.onmouseenter}
            onmouseleave={attrs.onmouseleave}
        ></div>
    }
}

fn render_label(event: &PlacedEvent, linker: &HoverLinker) -> Html {
    let attrs = linker.register_hover_target(HoverTarget::label(event.index));
    let style = format!(
        "--lane: {}; --clr: {}; --y: {}px;",
        event.label.lane_column, event.color, event.label.center_y
    );

    html! {
        <div
            id={event.label_id()}
            class={classes!(
                "timeline-label",
                event.side.as_str(),
                event.label.has_description.then_some("with-description"),
                attrs.classes
            )}
            style={style}
            data-hover-group={attrs.group}
            onmouseenter={attrs.onmouseenter}
            onmouseleave={attrs.onmouseleave}
        >
            <span>{ event.title.clone() }</span>
            {
                event.description.as_ref().map(|markup| html! {
                    <div class="description">
                        { Html::from_html_unchecked(AttrValue::from(markup.clone())) }
                    </div>
                }).unwrap_or_default()
            }
        </div>
    }
}

fn read_events(document: &Document, host: &Element) -> Result<Vec<TimelineEvent>, JsValue> {
    let source_id = host
        .get_attribute(DATA_SOURCE_ATTR)
        .unwrap_or_else(|| DEFAULT_DATA_ID.to_string());
    let raw = document
        .get_element_by_id(&source_id)
        .and_then(|el| el.text_content())
        .ok_or_else(|| JsValue::from_str(&format!("no timeline data in #{source_id}")))?;
    parse_events(&raw).map_err(|err| JsValue::from_str(&format!("Timeline error: {err}")))
}

/// Render the timeline into the element matched by `selector`.
///
/// Layout parameters come from the element's attributes and the events from
/// the JSON script it names (`#timeline-data` by default).
#[wasm_bindgen]
pub fn mount_timeline(selector: &str) -> Result<(), JsValue> {
    crate::init();

    let document = dom::document()?;
    let host: Element = document
        .query_selector(selector)
        .map_err(|err| JsValue::from_str(&format!("bad selector: {err:?}")))?
        .ok_or_else(|| JsValue::from_str("no element matches the selector"))?;

    let config = layout_config_from_attributes(|name| host.get_attribute(name));
    let events = read_events(&document, &host)?;
    tracing::info!(events = events.len(), "mounting timeline");

    yew::Renderer::<TimelineView>::with_root_and_props(host, TimelineViewProps { events, config })
        .render();
    Ok(())
}

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::theme::{
    ControlRect, RevealAnimation, LIGHT_CLASS, REDUCED_MOTION_QUERY, THEME_QUERY_PARAM,
};
use folio_core::{
    resolve_initial_theme, ThemeCapabilities, ThemeConfig, ThemeCoordinator, ThemeError,
    ThemeHost, ThemeMessage, ThemePreference, TransitionMode,
};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlInputElement, Url, Window};

use crate::{dom, frames};

type SharedCoordinator = Rc<RefCell<ThemeCoordinator<WebThemeHost>>>;

/// Document side effects of the theme coordinator.
pub struct WebThemeHost {
    window: Window,
    document: Document,
    root: Element,
    origin: String,
}

impl WebThemeHost {
    pub fn new(window: Window, document: Document) -> Result<Self, JsValue> {
        let root = dom::root_element(&document)?;
        let origin = window.location().origin()?;
        Ok(Self {
            window,
            document,
            root,
            origin,
        })
    }

    fn replace_url(&self, theme: ThemePreference) -> Result<(), JsValue> {
        let url = Url::new(&self.window.location().href()?)?;
        url.search_params().set(THEME_QUERY_PARAM, theme.as_str());
        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url.href()))
    }
}

impl ThemeHost for WebThemeHost {
    fn set_root_light(&mut self, light: bool) {
        dom::set_class(&self.root, LIGHT_CLASS, light);
    }

    fn write_cookie(&mut self, assignment: &str) {
        let written = dom::html_document(&self.document).and_then(|doc| doc.set_cookie(assignment));
        if let Err(err) = written {
            tracing::warn!(error = ?err, "could not write theme cookie");
        }
    }

    fn replace_query_theme(&mut self, theme: ThemePreference) {
        if let Err(err) = self.replace_url(theme) {
            tracing::warn!(error = ?err, "could not update theme in URL");
        }
    }

    fn broadcast(&mut self, message: &ThemeMessage) {
        frames::broadcast(&self.document, &self.origin, message);
    }
}

fn capabilities(window: &Window, document: &Document) -> ThemeCapabilities {
    let view_transition = dom::property(document, "startViewTransition")
        .map(|value| value.is_function())
        .unwrap_or(false);
    let reduced_motion = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);
    ThemeCapabilities {
        view_transition,
        reduced_motion,
    }
}

fn promise(target: &JsValue, name: &str) -> Result<Promise, JsValue> {
    dom::property(target, name)
        .ok_or_else(|| JsValue::from_str(&format!("view transition has no {name}")))?
        .dyn_into::<Promise>()
}

fn play_reveal(root: &Element, reveal: &RevealAnimation) -> Result<(), JsValue> {
    let [from, to] = reveal.clip_path_keyframes();
    let keyframes = Object::new();
    Reflect::set(
        &keyframes,
        &"clipPath".into(),
        &Array::of2(&from.into(), &to.into()),
    )?;

    let options = Object::new();
    Reflect::set(&options, &"duration".into(), &reveal.duration_ms.into())?;
    Reflect::set(&options, &"easing".into(), &reveal.easing.as_str().into())?;
    Reflect::set(
        &options,
        &"pseudoElement".into(),
        &"::view-transition-new(root)".into(),
    )?;

    let animate: Function = Reflect::get(root, &"animate".into())?.dyn_into()?;
    animate.call2(root, &keyframes, &options)?;
    Ok(())
}

fn reveal_for(
    coordinator: &SharedCoordinator,
    window: &Window,
    control: &HtmlInputElement,
) -> Result<RevealAnimation, JsValue> {
    let rect = control.get_bounding_client_rect();
    let rect = ControlRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };
    let viewport_width = window.inner_width()?.as_f64().unwrap_or_default();
    let viewport_height = window.inner_height()?.as_f64().unwrap_or_default();
    let reveal = RevealAnimation::from_control(
        rect,
        viewport_width,
        viewport_height,
        coordinator.borrow().config(),
    );
    Ok(reveal)
}

/// Run the view transition and report its signals to the coordinator.
///
/// Returns once the transition has finished, or as soon as it is clear
/// there is nothing left to wait for.
async fn run_transition(
    coordinator: &SharedCoordinator,
    control: &HtmlInputElement,
    next: ThemePreference,
) -> Result<(), JsValue> {
    let window = dom::window()?;
    let document = dom::document()?;
    let root = dom::root_element(&document)?;
    let reveal = reveal_for(coordinator, &window, control)?;

    let update_target = Rc::clone(coordinator);
    let update = Closure::once_into_js(move || update_target.borrow_mut().commit(next));
    let start: Function = dom::property(&document, "startViewTransition")
        .ok_or_else(|| JsValue::from_str("view transitions unsupported"))?
        .dyn_into()?;
    let transition = start.call1(&document, &update)?;
    let finished = promise(&transition, "finished");

    match promise(&transition, "ready") {
        Ok(ready) => match JsFuture::from(ready).await {
            Ok(_) => {
                if let Err(err) = play_reveal(&root, &reveal) {
                    tracing::warn!(error = ?err, "could not play theme reveal");
                }
                coordinator.borrow_mut().transition_ready();
            }
            Err(err) => tracing::debug!(error = ?err, "view transition skipped"),
        },
        Err(err) => tracing::warn!(error = ?err, "view transition has no ready signal"),
    }

    if let Err(err) = JsFuture::from(finished?).await {
        tracing::debug!(error = ?err, "view transition did not finish cleanly");
    }
    Ok(())
}

async fn animate_toggle(
    coordinator: SharedCoordinator,
    control: HtmlInputElement,
    next: ThemePreference,
) {
    if let Err(err) = run_transition(&coordinator, &control, next).await {
        tracing::warn!(error = ?err, "animated theme switch failed");
    }
    coordinator.borrow_mut().transition_finished();
}

fn reject_toggle(coordinator: &SharedCoordinator, control: &HtmlInputElement, err: ThemeError) {
    tracing::warn!(error = %err, "theme toggle ignored");
    control.set_checked(coordinator.borrow().current().is_light());
}

fn on_toggle(coordinator: &SharedCoordinator, control: &HtmlInputElement) {
    let (window, document) = match (dom::window(), dom::document()) {
        (Ok(window), Ok(document)) => (window, document),
        _ => return,
    };

    match capabilities(&window, &document).transition_mode() {
        TransitionMode::Immediate => {
            let toggled = coordinator.borrow_mut().toggle();
            match toggled {
                Ok(next) => control.set_checked(next.is_light()),
                Err(err) => reject_toggle(coordinator, control, err),
            }
        }
        TransitionMode::Animated => {
            let begun = coordinator.borrow_mut().begin_toggle();
            match begun {
                Ok(next) => {
                    control.set_checked(next.is_light());
                    spawn_local(animate_toggle(Rc::clone(coordinator), control.clone(), next));
                }
                Err(err) => reject_toggle(coordinator, control, err),
            }
        }
    }
}

/// Hook the toggle control and frames up once the DOM is parsed.
fn wire_page(coordinator: &SharedCoordinator, document: &Document) -> Result<(), JsValue> {
    frames::watch_frames(document, coordinator)?;

    let toggle_id = coordinator.borrow().config().toggle_id.clone();
    let Some(control) = document
        .get_element_by_id(&toggle_id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        tracing::warn!(toggle_id = %toggle_id, "theme toggle control not found");
        return Ok(());
    };
    control.set_checked(coordinator.borrow().current().is_light());

    let handler_state = Rc::clone(coordinator);
    let handler_control = control.clone();
    let on_change = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        on_toggle(&handler_state, &handler_control);
    });
    control.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

/// Resolve and apply the theme for the top-level page, then wire the
/// toggle control and embedded frames.
///
/// Call as early as possible to avoid a flash of the wrong theme. `config`
/// may override fields of `ThemeConfig`.
#[wasm_bindgen]
pub fn start_theme_coordinator(config: Option<JsValue>) -> Result<(), JsValue> {
    crate::init();

    let config = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            serde_wasm_bindgen::from_value::<ThemeConfig>(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read theme config: {err}")))?
        }
        _ => ThemeConfig::default(),
    };

    let window = dom::window()?;
    let document = dom::document()?;
    let search = window.location().search().unwrap_or_default();
    let initial = resolve_initial_theme(&dom::cookie_header(&document), &search);
    tracing::debug!(theme = %initial, "initial theme resolved");

    let host = WebThemeHost::new(window, document.clone())?;
    let coordinator: SharedCoordinator =
        Rc::new(RefCell::new(ThemeCoordinator::new(host, initial, config)));
    coordinator.borrow_mut().initialize();

    if document.ready_state() != "loading" {
        return wire_page(&coordinator, &document);
    }

    let ready_document = document.clone();
    let on_ready = Closure::once_into_js(move || {
        if let Err(err) = wire_page(&coordinator, &ready_document) {
            tracing::error!(error = ?err, "could not wire theme toggle");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    Ok(())
}

use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use formats::{LoadError, MapAssetError, ViewerConfig, parse_projects};
use foundation::ids::RegionId;
use foundation::time::Time;
use layers::presenter::DisplayGroup;
use layers::session::MapSession;
use scene::region::RegionRegistry;

mod dom;
use dom::{DomRegion, REGION_CSS, SVG_NS};

const MAP_CONTAINER_ID: &str = "map-container";
const PROJECTS_LIST_ID: &str = "projects-list";
const SELECT_ALL_ID: &str = "select-all-btn";
const DESELECT_ALL_ID: &str = "deselect-all-btn";

pub struct ViewerState {
    pub config: ViewerConfig,
    pub session: MapSession,
    /// Live shape elements, keyed by region id.
    pub elements: Vec<(RegionId, Element)>,
}

impl ViewerState {
    fn new(config: ViewerConfig) -> Self {
        let session = MapSession::new(&config);
        Self {
            config,
            session,
            elements: Vec::new(),
        }
    }

    fn element(&self, id: &RegionId) -> Option<Element> {
        self.elements
            .iter()
            .find(|(eid, _)| eid == id)
            .map(|(_, el)| el.clone())
    }

    /// `(element, fill, selected)` for every region in draw order.
    fn region_view(&self) -> Vec<(Element, String, bool)> {
        self.session
            .regions()
            .iter()
            .filter_map(|r| {
                let el = self.element(&r.id)?;
                let fill = self.session.fill_for(&r.id, false)?.to_string();
                Some((el, fill, r.selected))
            })
            .collect()
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::new(ViewerConfig::default()));
}

fn now() -> Time {
    Time(js_sys::Date::now())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Replaces the viewer configuration. Call before `mount`.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config =
        ViewerConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| {
        *state.borrow_mut() = ViewerState::new(config);
    });
    Ok(())
}

/// Wires the page controls and starts both loads.
///
/// The loads are independent; the map becomes interactive as soon as its
/// asset arrives, whether or not project data has.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    let document = dom::document()?;

    if let Some(btn) = document.get_element_by_id(SELECT_ALL_ID) {
        on_click(&btn, || update(|s| s.select_all()))?;
    }
    if let Some(btn) = document.get_element_by_id(DESELECT_ALL_ID) {
        on_click(&btn, || update(|s| s.deselect_all()))?;
    }

    let (toggles, projects_url, map_url) = STATE.with(|state| {
        let s = state.borrow();
        (
            s.config.funding_toggles.clone(),
            s.config.projects_url.clone(),
            s.config.map_url.clone(),
        )
    });

    for toggle in toggles {
        let Some(input) = document.get_element_by_id(&toggle.id) else {
            continue;
        };
        let label = toggle.label;
        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let checked = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .is_some_and(|i| i.checked());
            update(|s| s.set_funding_line(&label, checked));
        });
        input.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    spawn_local(async move {
        let result = fetch_text(&projects_url)
            .await
            .and_then(|text| parse_projects(&text).map_err(LoadError::from));
        if let Err(err) = &result {
            dom::log(&format!("project data error: {err}"));
        }
        let shown = STATE.with(|state| state.borrow_mut().session.on_projects_loaded(result));
        if let Some(groups) = shown {
            show_groups(&groups);
        }
    });

    spawn_local(async move {
        let result = match fetch_text(&map_url).await {
            Ok(markup) => install_map(&markup),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            dom::log(&format!("map error: {err}"));
            let text = STATE.with(|state| state.borrow_mut().session.on_map_failed(&err));
            if let Err(e) = show_map_error(&text) {
                dom::log(&format!("map error display failed: {e:?}"));
            }
        }
    });

    Ok(())
}

#[wasm_bindgen]
pub fn select_all() {
    update(|s| s.select_all());
}

#[wasm_bindgen]
pub fn deselect_all() {
    update(|s| s.deselect_all());
}

#[wasm_bindgen]
pub fn toggle_funding_line(label: &str) {
    update(|s| s.toggle_funding_line(label));
}

/// Runs one session operation, then syncs regions and the list to the page.
fn update(op: impl FnOnce(&mut MapSession) -> Vec<DisplayGroup>) {
    let (groups, view) = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let groups = op(&mut s.session);
        (groups, s.region_view())
    });
    apply_region_view(&view);
    show_groups(&groups);
}

fn click_region(id: RegionId) {
    let at = now();
    let (groups, view, element, duration_ms) = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let groups = s.session.click_region(&id, at);
        (groups, s.region_view(), s.element(&id), s.session.animation_ms())
    });

    if let Some(el) = element {
        let _ = el.class_list().add_1("animating");
    }
    apply_region_view(&view);
    show_groups(&groups);

    // Clears are never cancelled; the session ignores ones with nothing left to do.
    let due = at.after_ms(duration_ms);
    Timeout::new(duration_ms, move || {
        let cleared = STATE.with(|state| {
            let mut s = state.borrow_mut();
            s.session
                .advance(due)
                .into_iter()
                .filter_map(|id| s.element(&id))
                .collect::<Vec<_>>()
        });
        for el in cleared {
            let _ = el.class_list().remove_1("animating");
        }
    })
    .forget();
}

fn hover_region(id: &RegionId, hovered: bool) {
    let target = STATE.with(|state| {
        let s = state.borrow();
        let fill = s.session.fill_for(id, hovered)?.to_string();
        Some((s.element(id)?, fill))
    });
    if let Some((el, fill)) = target {
        let _ = el.set_attribute("fill", &fill);
    }
}

/// Applies fills and selection classes, then re-appends shapes in draw order
/// so selected regions paint on top.
fn apply_region_view(view: &[(Element, String, bool)]) {
    for (el, fill, selected) in view {
        let _ = el.set_attribute("fill", fill);
        let _ = el.class_list().toggle_with_force("selected", *selected);
        if let Some(parent) = el.parent_node() {
            let _ = parent.append_child(el);
        }
    }
}

fn show_groups(groups: &[DisplayGroup]) {
    let result = dom::document().and_then(|document| {
        let Some(list) = document.get_element_by_id(PROJECTS_LIST_ID) else {
            return Ok(());
        };
        dom::render_groups(&document, &list, groups)
    });
    if let Err(e) = result {
        dom::log(&format!("project list render failed: {e:?}"));
    }
}

fn show_map_error(text: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    if let Some(container) = document.get_element_by_id(MAP_CONTAINER_ID) {
        dom::show_map_error(&document, &container, text)?;
    }
    Ok(())
}

fn install_map(markup: &str) -> Result<(), LoadError> {
    let js_err = |e: JsValue| LoadError::Page(format!("{e:?}"));
    let document = dom::document().map_err(js_err)?;
    let container = document
        .get_element_by_id(MAP_CONTAINER_ID)
        .ok_or_else(|| LoadError::Page(format!("#{MAP_CONTAINER_ID} not found")))?;
    container.set_inner_html(markup);

    let svg = container
        .query_selector("svg")
        .map_err(js_err)?
        .ok_or(LoadError::Map(MapAssetError::MissingSvgRoot))?;

    let (svg_id, tags, palette) = STATE.with(|state| {
        let s = state.borrow();
        (
            s.config.map_svg_id.clone(),
            s.config.region_tags.clone(),
            s.config.palette.clone(),
        )
    });

    svg.set_attribute("width", "100%").map_err(js_err)?;
    svg.set_id(&svg_id);
    let style = document
        .create_element_ns(Some(SVG_NS), "style")
        .map_err(js_err)?;
    style.set_text_content(Some(REGION_CSS));
    svg.append_child(&style).map_err(js_err)?;

    let mut regions = dom::collect_regions(&svg, &tags).map_err(js_err)?;
    dom::log(&format!("Trovate {} regioni nell'SVG.", regions.len()));

    let registry = RegionRegistry::setup(&mut regions);
    let mut elements = Vec::with_capacity(regions.len());
    for (descriptor, DomRegion { element }) in registry.regions().iter().zip(regions) {
        element.set_attribute("fill", &palette.fill).map_err(js_err)?;
        element.set_attribute("stroke", &palette.stroke).map_err(js_err)?;
        element
            .set_attribute("stroke-width", &palette.stroke_width)
            .map_err(js_err)?;
        let _ = element.class_list().add_1("region");
        bind_region(&element, &descriptor.id).map_err(js_err)?;
        elements.push((descriptor.id.clone(), element));
    }

    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.session.attach_regions(registry);
        s.elements = elements;
    });
    Ok(())
}

fn bind_region(element: &Element, id: &RegionId) -> Result<(), JsValue> {
    let over_id = id.clone();
    on_event(element, "mouseover", move || hover_region(&over_id, true))?;
    let out_id = id.clone();
    on_event(element, "mouseout", move || hover_region(&out_id, false))?;
    let click_id = id.clone();
    on_event(element, "click", move || click_region(click_id.clone()))
}

fn on_click(element: &Element, f: impl FnMut() + 'static) -> Result<(), JsValue> {
    on_event(element, "click", f)
}

fn on_event(element: &Element, kind: &str, f: impl FnMut() + 'static) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut()>::new(f);
    element.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;
    if !resp.ok() {
        return Err(LoadError::Http {
            status: resp.status(),
        });
    }
    resp.text()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))
}

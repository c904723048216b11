use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use layers::presenter::{DisplayGroup, DisplayItem, ProjectItem};
use scene::region::RegionElement;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Injected into the map so hover/selection/animation work without an
/// external stylesheet.
pub const REGION_CSS: &str = r#"
.region {
    transition: fill 0.2s ease-in-out, stroke-width 0.2s ease-in-out;
    cursor: pointer;
}
.region:hover {
    stroke-width: 2px;
}
.region.selected {
    stroke: #222;
    stroke-width: 2px;
}
.region.animating {
    animation: gentlePulse 0.3s ease-in-out;
}
@keyframes gentlePulse {
    0%   { transform: scale(1); }
    50%  { transform: scale(1.03); }
    100% { transform: scale(1); }
}
"#;

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// A region shape inside the live page.
#[derive(Debug, Clone)]
pub struct DomRegion {
    pub element: Element,
}

impl DomRegion {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl RegionElement for DomRegion {
    fn name_attr(&self) -> Option<String> {
        self.element.get_attribute("data-name")
    }

    fn set_name_attr(&mut self, name: &str) {
        let _ = self.element.set_attribute("data-name", name);
    }

    fn title_text(&self) -> Option<String> {
        self.element
            .query_selector("title")
            .ok()
            .flatten()
            .and_then(|t| t.text_content())
    }

    fn element_id(&self) -> Option<String> {
        let id = self.element.id();
        (!id.is_empty()).then_some(id)
    }

    fn set_element_id(&mut self, id: &str) {
        self.element.set_id(id);
    }
}

/// Region shapes under `svg`, in document order, skipping `<defs>` content.
pub fn collect_regions(svg: &Element, tags: &[String]) -> Result<Vec<DomRegion>, JsValue> {
    let selector = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let nodes = svg.query_selector_all(&selector)?;

    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(node) = nodes.get(i) else {
            continue;
        };
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        if element.closest("defs")?.is_some() {
            continue;
        }
        out.push(DomRegion::new(element));
    }
    Ok(out)
}

/// Replaces the content of `list` with `groups`.
pub fn render_groups(
    document: &Document,
    list: &Element,
    groups: &[DisplayGroup],
) -> Result<(), JsValue> {
    list.set_inner_html("");

    for group in groups {
        let Some(header) = &group.header else {
            for item in &group.items {
                let li = item_element(document, item)?;
                list.append_child(&li)?;
            }
            continue;
        };

        let h3 = document.create_element("h3")?;
        h3.set_text_content(Some(header));
        list.append_child(&h3)?;

        let ul = document.create_element("ul")?;
        for item in &group.items {
            let li = item_element(document, item)?;
            ul.append_child(&li)?;
        }
        list.append_child(&ul)?;
    }
    Ok(())
}

fn item_element(document: &Document, item: &DisplayItem) -> Result<Element, JsValue> {
    let li = document.create_element("li")?;
    match item {
        DisplayItem::Placeholder(text) => li.set_text_content(Some(text)),
        DisplayItem::Project(p) => fill_project_item(document, &li, p)?,
    }
    Ok(li)
}

fn fill_project_item(document: &Document, li: &Element, p: &ProjectItem) -> Result<(), JsValue> {
    let badge = document.create_element("span")?;
    badge.set_class_name(&p.badge.css_class());
    badge.set_text_content(Some(&p.funding_line));
    li.append_child(&badge)?;
    li.append_with_str_1(" ")?;

    let code = document.create_element("strong")?;
    code.set_text_content(Some(&p.code));
    li.append_child(&code)?;
    li.append_with_str_1(&format!(": {} — Agevolazione: ", p.name))?;

    let subsidy = document.create_element("strong")?;
    subsidy.set_text_content(Some(&p.subsidy));
    li.append_child(&subsidy)?;
    Ok(())
}

/// Red error box shown in place of the map.
pub fn show_map_error(document: &Document, container: &Element, text: &str) -> Result<(), JsValue> {
    container.set_inner_html("");
    let div = document.create_element("div")?;
    div.set_attribute("style", "color:red;padding:20px;")?;
    div.set_text_content(Some(text));
    container.append_child(&div)?;
    Ok(())
}

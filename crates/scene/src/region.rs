use foundation::ids::RegionId;
use formats::svg_map::{MapAsset, MapShape};

use crate::ordering::reorder_in_place;
use crate::selection::FilterState;

/// Name used when a shape carries no name, title or id.
pub const FALLBACK_REGION_NAME: &str = "Regione";

/// Access to the naming attributes of one region shape.
///
/// Implemented by the parsed map model and by the browser adapter's DOM
/// wrapper, so name resolution runs the same way in both.
pub trait RegionElement {
    /// Cached display name (`data-name`).
    fn name_attr(&self) -> Option<String>;
    fn set_name_attr(&mut self, name: &str);
    /// Text of the nested `<title>`, untrimmed.
    fn title_text(&self) -> Option<String>;
    fn element_id(&self) -> Option<String>;
    fn set_element_id(&mut self, id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    pub id: RegionId,
    pub display_name: String,
    pub selected: bool,
}

impl RegionDescriptor {
    pub fn new(id: impl Into<RegionId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            selected: false,
        }
    }
}

/// Resolves the display name of `element` and caches it on the element.
///
/// Precedence, first non-blank wins: cached name attribute, trimmed title
/// text, element id, [`FALLBACK_REGION_NAME`].
pub fn resolve_name<E: RegionElement + ?Sized>(element: &mut E) -> String {
    if let Some(cached) = non_blank(element.name_attr()) {
        return cached;
    }

    let name = non_blank(element.title_text().map(|t| t.trim().to_string()))
        .or_else(|| non_blank(element.element_id()))
        .unwrap_or_else(|| FALLBACK_REGION_NAME.to_string());
    element.set_name_attr(&name);
    name
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Descriptors for every interactive shape, kept in current draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: Vec<RegionDescriptor>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns missing ids, resolves names and builds one unselected
    /// descriptor per element, in document order.
    pub fn setup<E: RegionElement>(elements: &mut [E]) -> Self {
        let mut regions = Vec::with_capacity(elements.len());
        for (position, element) in elements.iter_mut().enumerate() {
            let id = match non_blank(element.element_id()) {
                Some(id) => RegionId::new(id),
                None => {
                    let id = RegionId::generated(position);
                    element.set_element_id(id.as_str());
                    id
                }
            };
            let display_name = resolve_name(element);
            regions.push(RegionDescriptor::new(id, display_name));
        }
        Self { regions }
    }

    pub fn from_map_asset(asset: &mut MapAsset) -> Self {
        Self::setup(&mut asset.shapes)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Descriptors in current draw order.
    pub fn regions(&self) -> &[RegionDescriptor] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&RegionDescriptor> {
        self.regions.iter().find(|r| &r.id == id)
    }

    /// Distinct display names, first occurrence in draw order.
    pub fn names(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for r in &self.regions {
            if !out.contains(&r.display_name) {
                out.push(r.display_name.clone());
            }
        }
        out
    }

    /// Mirrors `filters` membership onto every descriptor.
    ///
    /// Shapes sharing a display name (islands drawn as separate paths) always
    /// share the selection state.
    pub fn sync_selection(&mut self, filters: &FilterState) {
        for r in &mut self.regions {
            r.selected = filters.is_region_selected(&r.display_name);
        }
    }

    /// Moves selected regions after unselected ones, keeping relative order.
    pub fn reorder(&mut self) {
        reorder_in_place(&mut self.regions);
    }
}

impl RegionElement for MapShape {
    fn name_attr(&self) -> Option<String> {
        self.data_name.clone()
    }

    fn set_name_attr(&mut self, name: &str) {
        self.data_name = Some(name.to_string());
    }

    fn title_text(&self) -> Option<String> {
        self.title.clone()
    }

    fn element_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn set_element_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }
}

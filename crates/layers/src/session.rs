use foundation::ids::RegionId;
use foundation::time::Time;
use formats::config::{RegionPalette, ViewerConfig};
use formats::loader::LoadError;
use formats::projects::ProjectRecord;
use runtime::event_bus::{Event, EventBus};
use scene::animation::AnimationTracker;
use scene::region::{RegionDescriptor, RegionRegistry};
use scene::selection::FilterState;
use tracing::{debug, warn};

use crate::presenter::{self, DisplayGroup};
use crate::query::{ProjectIndex, ViewModel};
use crate::symbology::region_fill;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataStatus {
    Pending,
    Ready,
    Failed,
}

/// All state of one map page, from load to unload.
///
/// Every user event maps to one method; methods that change what the list
/// shows return the freshly rendered groups. Map and project data load
/// independently and may arrive in either order.
#[derive(Debug)]
pub struct MapSession {
    palette: RegionPalette,
    registry: RegionRegistry,
    filters: FilterState,
    index: ProjectIndex,
    data: DataStatus,
    animations: AnimationTracker,
    bus: EventBus,
}

impl MapSession {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            registry: RegionRegistry::new(),
            filters: FilterState::new(),
            index: ProjectIndex::empty(),
            data: DataStatus::Pending,
            animations: AnimationTracker::new(config.animation_ms),
            bus: EventBus::new(),
        }
    }

    /// Installs the regions found in the map asset.
    pub fn attach_regions(&mut self, registry: RegionRegistry) {
        self.bus
            .emit("map.loaded", format!("{} regions", registry.len()));
        self.registry = registry;
        self.refresh_regions();
    }

    /// Records a map load failure and returns the placeholder text.
    pub fn on_map_failed(&mut self, err: &LoadError) -> String {
        warn!(error = %err, "map asset failed to load");
        self.bus.emit("map.failed", err.to_string());
        presenter::map_load_error_text(&err.to_string())
    }

    /// Installs project data and returns what the list should show now.
    ///
    /// On success that is the refreshed list when regions were selected
    /// while the data was loading, otherwise nothing changes. On failure the
    /// index stays empty and the error placeholder is returned.
    pub fn on_projects_loaded(
        &mut self,
        result: Result<Vec<ProjectRecord>, LoadError>,
    ) -> Option<Vec<DisplayGroup>> {
        match result {
            Ok(records) => {
                self.bus
                    .emit("data.loaded", format!("{} projects", records.len()));
                self.index = ProjectIndex::new(records);
                self.data = DataStatus::Ready;
                self.filters.has_selection().then(|| self.render())
            }
            Err(err) => {
                warn!(error = %err, "project data failed to load");
                self.bus.emit("data.failed", err.to_string());
                self.index = ProjectIndex::empty();
                self.data = DataStatus::Failed;
                Some(presenter::projects_load_error())
            }
        }
    }

    /// Toggles the region drawn by shape `id` and starts its click animation.
    ///
    /// Unknown ids leave the state untouched.
    pub fn click_region(&mut self, id: &RegionId, now: Time) -> Vec<DisplayGroup> {
        let Some(name) = self.registry.get(id).map(|r| r.display_name.clone()) else {
            debug!(%id, "click on unknown region");
            return self.render();
        };

        let selected = self.filters.toggle_region(&name);
        debug!(%id, region = %name, selected, "region toggled");
        self.bus
            .emit("region.toggle", format!("{name} selected={selected}"));
        self.animations.start(id, now);
        self.refresh_regions();
        self.render()
    }

    /// Toggles a region by display name, without animation.
    pub fn toggle_region_by_name(&mut self, name: &str) -> Vec<DisplayGroup> {
        let selected = self.filters.toggle_region(name);
        self.bus
            .emit("region.toggle", format!("{name} selected={selected}"));
        self.refresh_regions();
        self.render()
    }

    pub fn select_all(&mut self) -> Vec<DisplayGroup> {
        let names = self.registry.names();
        self.bus.emit("selection.all", format!("{} regions", names.len()));
        self.filters.select_all_regions(names);
        self.refresh_regions();
        self.render()
    }

    pub fn deselect_all(&mut self) -> Vec<DisplayGroup> {
        self.bus.emit("selection.clear", "");
        self.filters.clear_all_regions();
        self.refresh_regions();
        self.render()
    }

    /// Flips a funding-line filter. Region selection is untouched.
    pub fn toggle_funding_line(&mut self, label: &str) -> Vec<DisplayGroup> {
        let active = self.filters.toggle_funding_line(label);
        self.bus
            .emit("filter.toggle", format!("{label} active={active}"));
        self.render()
    }

    /// Sets a funding-line filter from a checkbox state.
    pub fn set_funding_line(&mut self, label: &str, active: bool) -> Vec<DisplayGroup> {
        if self.filters.set_funding_line(label, active) {
            self.bus
                .emit("filter.toggle", format!("{label} active={active}"));
        }
        self.render()
    }

    pub fn view_model(&self) -> ViewModel<'_> {
        self.index.query_filters(&self.filters)
    }

    pub fn render(&self) -> Vec<DisplayGroup> {
        presenter::render(&self.view_model())
    }

    /// Descriptors in current draw order.
    pub fn regions(&self) -> &[RegionDescriptor] {
        self.registry.regions()
    }

    pub fn region(&self, id: &RegionId) -> Option<&RegionDescriptor> {
        self.registry.get(id)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn index(&self) -> &ProjectIndex {
        &self.index
    }

    pub fn data_status(&self) -> DataStatus {
        self.data
    }

    pub fn palette(&self) -> &RegionPalette {
        &self.palette
    }

    pub fn fill_for(&self, id: &RegionId, hovered: bool) -> Option<&str> {
        let region = self.registry.get(id)?;
        Some(region_fill(&self.palette, region.selected, hovered))
    }

    pub fn is_animating(&self, id: &RegionId) -> bool {
        self.animations.is_animating(id)
    }

    pub fn animation_ms(&self) -> u32 {
        self.animations.duration_ms()
    }

    /// Fires due animation clears; returns the regions that went idle.
    pub fn advance(&mut self, now: Time) -> Vec<RegionId> {
        self.animations.advance(now)
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    fn refresh_regions(&mut self) {
        self.registry.sync_selection(&self.filters);
        self.registry.reorder();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{
        DisplayItem, NO_MATCH_TEXT, NO_SELECTION_TEXT, PROJECTS_LOAD_ERROR_TEXT,
    };
    use formats::projects::ProjectDataError;
    use formats::svg_map::MapShape;
    use pretty_assertions::assert_eq;
    use scene::ordering::is_draw_ordered;

    fn registry() -> RegionRegistry {
        let mut shapes = vec![
            MapShape::new("path").with_id("IT-62").with_title("Lazio"),
            MapShape::new("path").with_id("IT-55").with_title("Umbria"),
            MapShape::new("path").with_id("IT-52").with_title("Toscana"),
            MapShape::new("path").with_title("Sicilia"),
            MapShape::new("path").with_title("Sicilia"),
        ];
        RegionRegistry::setup(&mut shapes)
    }

    fn records() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("Lazio", "P1", "Uno").with_funding_line("Centri Nazionali"),
            ProjectRecord::new("Lazio", "P2", "Due").with_funding_line("Partenariati Estesi"),
            ProjectRecord::new("Toscana", "T1", "Tre")
                .with_funding_line("Ecosistemi d'Innovazione"),
        ]
    }

    fn ready_session() -> MapSession {
        let mut s = MapSession::new(&ViewerConfig::default());
        s.attach_regions(registry());
        assert!(s.on_projects_loaded(Ok(records())).is_none());
        s
    }

    fn headers(groups: &[DisplayGroup]) -> Vec<String> {
        groups.iter().filter_map(|g| g.header.clone()).collect()
    }

    fn placeholder_text(groups: &[DisplayGroup]) -> Option<&str> {
        match groups {
            [g] => match g.items.as_slice() {
                [DisplayItem::Placeholder(text)] => Some(text.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    fn order(s: &MapSession) -> Vec<&str> {
        s.regions().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn click_selects_reorders_and_renders() {
        let mut s = ready_session();
        let lazio = RegionId::new("IT-62");

        let groups = s.click_region(&lazio, Time(0.0));
        assert_eq!(headers(&groups), vec!["Lazio"]);
        assert_eq!(groups[0].items.len(), 2);
        assert!(s.region(&lazio).is_some_and(|r| r.selected));
        assert_eq!(
            order(&s),
            vec!["IT-55", "IT-52", "region-4", "region-5", "IT-62"]
        );
        assert_eq!(s.fill_for(&lazio, true), Some("#ff3333"));
        assert!(s.is_animating(&lazio));

        let groups = s.click_region(&lazio, Time(100.0));
        assert_eq!(placeholder_text(&groups), Some(NO_SELECTION_TEXT));
        assert!(s.region(&lazio).is_some_and(|r| !r.selected));
        assert_eq!(s.fill_for(&lazio, false), Some("#7cb4e3"));
        assert!(is_draw_ordered(s.regions()));
    }

    #[test]
    fn animation_clears_after_configured_duration() {
        let mut s = ready_session();
        let lazio = RegionId::new("IT-62");
        s.click_region(&lazio, Time(1_000.0));

        assert!(s.advance(Time(1_200.0)).is_empty());
        assert_eq!(s.advance(Time(1_300.0)), vec![lazio.clone()]);
        assert!(!s.is_animating(&lazio));
        assert_eq!(s.animation_ms(), 300);
    }

    #[test]
    fn funding_filters_keep_selection() {
        let mut s = ready_session();
        s.click_region(&RegionId::new("IT-62"), Time(0.0));
        s.click_region(&RegionId::new("IT-52"), Time(0.0));

        let groups = s.toggle_funding_line("Centri Nazionali");
        assert_eq!(headers(&groups), vec!["Lazio"]);
        assert_eq!(groups[0].items.len(), 1);

        let groups = s.set_funding_line("Ecosistemi d'Innovazione", true);
        assert_eq!(headers(&groups), vec!["Lazio", "Toscana"]);

        s.set_funding_line("Centri Nazionali", false);
        let groups = s.set_funding_line("Ecosistemi d'Innovazione", false);
        assert_eq!(headers(&groups), vec!["Lazio", "Toscana"]);
        assert_eq!(s.filters().selected_regions().len(), 2);
    }

    #[test]
    fn select_all_and_deselect_all() {
        let mut s = ready_session();
        let groups = s.select_all();
        assert_eq!(headers(&groups), vec!["Lazio", "Toscana"]);
        assert!(s.regions().iter().all(|r| r.selected));
        assert_eq!(s.filters().selected_regions().len(), 4);

        let groups = s.deselect_all();
        assert_eq!(placeholder_text(&groups), Some(NO_SELECTION_TEXT));
        assert!(s.regions().iter().all(|r| !r.selected));
        assert!(!s.is_animating(&RegionId::new("IT-62")));
    }

    #[test]
    fn shared_name_shapes_toggle_together() {
        let mut s = ready_session();
        let groups = s.click_region(&RegionId::new("region-5"), Time(0.0));
        assert_eq!(placeholder_text(&groups), Some(NO_MATCH_TEXT));
        assert!(s.region(&RegionId::new("region-4")).is_some_and(|r| r.selected));
        assert!(s.is_animating(&RegionId::new("region-5")));
        assert!(!s.is_animating(&RegionId::new("region-4")));
    }

    #[test]
    fn interactions_before_data_arrive_show_no_match() {
        let mut s = MapSession::new(&ViewerConfig::default());
        s.attach_regions(registry());
        assert_eq!(s.data_status(), DataStatus::Pending);

        let groups = s.click_region(&RegionId::new("IT-62"), Time(0.0));
        assert_eq!(placeholder_text(&groups), Some(NO_MATCH_TEXT));

        // Data arriving later refreshes the list right away.
        let shown = s.on_projects_loaded(Ok(records()));
        assert_eq!(shown.as_deref().map(headers), Some(vec!["Lazio".to_string()]));
        assert_eq!(headers(&s.render()), vec!["Lazio"]);
    }

    #[test]
    fn interactions_before_map_arrives_are_harmless() {
        let mut s = MapSession::new(&ViewerConfig::default());
        s.on_projects_loaded(Ok(records()));
        let groups = s.click_region(&RegionId::new("IT-62"), Time(0.0));
        assert_eq!(placeholder_text(&groups), Some(NO_SELECTION_TEXT));
        let groups = s.select_all();
        assert_eq!(placeholder_text(&groups), Some(NO_SELECTION_TEXT));
    }

    #[test]
    fn failed_project_load_leaves_empty_index() {
        let mut s = MapSession::new(&ViewerConfig::default());
        s.attach_regions(registry());

        let shown = s.on_projects_loaded(Err(LoadError::Projects(ProjectDataError::NotAList)));
        assert_eq!(
            shown.as_deref().and_then(placeholder_text),
            Some(PROJECTS_LOAD_ERROR_TEXT)
        );
        assert_eq!(s.data_status(), DataStatus::Failed);
        assert!(s.index().is_empty());

        let groups = s.toggle_region_by_name("Lazio");
        assert_eq!(placeholder_text(&groups), Some(NO_MATCH_TEXT));
    }

    #[test]
    fn map_failure_yields_placeholder_text() {
        let mut s = MapSession::new(&ViewerConfig::default());
        let text = s.on_map_failed(&LoadError::Http { status: 404 });
        assert_eq!(text, "Errore nel caricamento della mappa: HTTP 404");
        assert!(s.regions().is_empty());
    }

    #[test]
    fn events_trace_interactions() {
        let mut s = ready_session();
        s.click_region(&RegionId::new("IT-62"), Time(0.0));
        s.toggle_funding_line("Centri Nazionali");
        s.deselect_all();

        let kinds: Vec<&str> = s.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                "map.loaded",
                "data.loaded",
                "region.toggle",
                "filter.toggle",
                "selection.clear"
            ]
        );
        assert_eq!(s.drain_events().len(), 5);
        assert!(s.events().is_empty());
    }
}

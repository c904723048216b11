use std::collections::{BTreeMap, BTreeSet};

use formats::projects::ProjectRecord;
use scene::selection::FilterState;

/// Projects for one selected region, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup<'a> {
    pub region: String,
    pub projects: Vec<&'a ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel<'a> {
    /// No region is selected.
    NoSelection,
    /// Regions are selected but nothing passes the filters.
    NoMatch,
    /// Non-empty groups sorted by region name, no duplicates.
    Groups(Vec<RegionGroup<'a>>),
}

impl ViewModel<'_> {
    pub fn groups(&self) -> &[RegionGroup<'_>] {
        match self {
            ViewModel::Groups(groups) => groups,
            _ => &[],
        }
    }
}

/// The loaded project list. Static for the session; every query rescans it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectIndex {
    records: Vec<ProjectRecord>,
}

impl ProjectIndex {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Projects of the selected regions that pass the funding-line filter.
    ///
    /// Ordering contract:
    /// - Groups are sorted by region name (ordinal byte comparison).
    /// - Projects inside a group keep their load order.
    pub fn query(
        &self,
        selected_regions: &BTreeSet<String>,
        active_funding_lines: &BTreeSet<String>,
    ) -> ViewModel<'_> {
        if selected_regions.is_empty() {
            return ViewModel::NoSelection;
        }

        let mut by_region: BTreeMap<&str, Vec<&ProjectRecord>> = BTreeMap::new();
        for region in selected_regions {
            let projects: Vec<&ProjectRecord> = self
                .records
                .iter()
                .filter(|r| &r.region == region)
                .filter(|r| funding_allows(r, active_funding_lines))
                .collect();
            if !projects.is_empty() {
                by_region.insert(region.as_str(), projects);
            }
        }

        if by_region.is_empty() {
            return ViewModel::NoMatch;
        }

        ViewModel::Groups(
            by_region
                .into_iter()
                .map(|(region, projects)| RegionGroup {
                    region: region.to_string(),
                    projects,
                })
                .collect(),
        )
    }

    pub fn query_filters(&self, filters: &FilterState) -> ViewModel<'_> {
        self.query(filters.selected_regions(), filters.active_funding_lines())
    }
}

fn funding_allows(record: &ProjectRecord, active: &BTreeSet<String>) -> bool {
    if active.is_empty() {
        return true;
    }
    // A record without a funding line never passes a non-empty filter.
    record
        .funding_line()
        .is_some_and(|line| active.contains(line))
}

use std::collections::BTreeSet;

/// Selected regions and active funding-line filters for one session.
///
/// An empty funding-line set means "no filter": every line matches.
///
/// Ordering contract:
/// - Iteration over either set yields names in ascending byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_regions: BTreeSet<String>,
    active_funding_lines: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `name` in the selection.
    ///
    /// Returns the new membership.
    pub fn toggle_region(&mut self, name: &str) -> bool {
        toggle(&mut self.selected_regions, name)
    }

    /// Flips membership of `label` in the active funding lines.
    ///
    /// Returns the new membership.
    pub fn toggle_funding_line(&mut self, label: &str) -> bool {
        toggle(&mut self.active_funding_lines, label)
    }

    /// Sets membership of `label` explicitly.
    ///
    /// Returns `true` if the state changed.
    pub fn set_funding_line(&mut self, label: &str, active: bool) -> bool {
        if active {
            self.active_funding_lines.insert(label.to_string())
        } else {
            self.active_funding_lines.remove(label)
        }
    }

    pub fn clear_all_regions(&mut self) {
        self.selected_regions.clear();
    }

    /// Replaces the selection with exactly `all_names`.
    pub fn select_all_regions<I, S>(&mut self, all_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_regions = all_names.into_iter().map(Into::into).collect();
    }

    pub fn is_region_selected(&self, name: &str) -> bool {
        self.selected_regions.contains(name)
    }

    pub fn selected_regions(&self) -> &BTreeSet<String> {
        &self.selected_regions
    }

    pub fn active_funding_lines(&self) -> &BTreeSet<String> {
        &self.active_funding_lines
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_regions.is_empty()
    }
}

fn toggle(set: &mut BTreeSet<String>, key: &str) -> bool {
    if set.remove(key) {
        false
    } else {
        set.insert(key.to_string());
        true
    }
}

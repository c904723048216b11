use formats::projects::ProjectRecord;

use crate::query::ViewModel;
use crate::symbology::BadgeCategory;

pub const NO_SELECTION_TEXT: &str = "Seleziona almeno una regione per visualizzare i progetti.";
pub const NO_MATCH_TEXT: &str = "Nessun progetto trovato per i filtri selezionati.";
pub const PROJECTS_LOAD_ERROR_TEXT: &str = "Errore nel caricamento dei dati dei progetti.";

/// One project line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub badge: BadgeCategory,
    /// Badge label; empty for records without a funding line.
    pub funding_line: String,
    pub code: String,
    pub name: String,
    pub subsidy: String,
}

impl ProjectItem {
    pub fn from_record(record: &ProjectRecord) -> Self {
        Self {
            badge: BadgeCategory::classify(record.funding_line()),
            funding_line: record.funding_line().unwrap_or_default().to_string(),
            code: record.project_code.clone(),
            name: record.project_name.clone(),
            subsidy: record
                .subsidy
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }

    /// Line text after the badge.
    pub fn text(&self) -> String {
        format!("{}: {} — Agevolazione: {}", self.code, self.name, self.subsidy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    Project(ProjectItem),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroup {
    /// Region name; `None` for placeholder groups.
    pub header: Option<String>,
    pub items: Vec<DisplayItem>,
}

impl DisplayGroup {
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            header: None,
            items: vec![DisplayItem::Placeholder(text.into())],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.header.is_none()
    }
}

/// Turns a view model into display groups. Pure.
pub fn render(view_model: &ViewModel<'_>) -> Vec<DisplayGroup> {
    match view_model {
        ViewModel::NoSelection => vec![DisplayGroup::placeholder(NO_SELECTION_TEXT)],
        ViewModel::NoMatch => vec![DisplayGroup::placeholder(NO_MATCH_TEXT)],
        ViewModel::Groups(groups) => groups
            .iter()
            .map(|g| DisplayGroup {
                header: Some(g.region.clone()),
                items: g
                    .projects
                    .iter()
                    .map(|p| DisplayItem::Project(ProjectItem::from_record(p)))
                    .collect(),
            })
            .collect(),
    }
}

pub fn projects_load_error() -> Vec<DisplayGroup> {
    vec![DisplayGroup::placeholder(PROJECTS_LOAD_ERROR_TEXT)]
}

pub fn map_load_error_text(reason: &str) -> String {
    format!("Errore nel caricamento della mappa: {reason}")
}

/// Plain-text rendering for terminals and logs.
pub fn to_plain_text(groups: &[DisplayGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        if let Some(header) = &group.header {
            out.push_str(header);
            out.push('\n');
        }
        for item in &group.items {
            match item {
                DisplayItem::Project(p) => {
                    let label = if p.funding_line.is_empty() {
                        p.badge.css_suffix()
                    } else {
                        p.funding_line.as_str()
                    };
                    out.push_str(&format!("  [{label}] {}\n", p.text()));
                }
                DisplayItem::Placeholder(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
    }
    out
}

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

/// Subsidy amount as published in the data file.
///
/// Newer files carry preformatted strings (`"€ 1.234.567"`), legacy files
/// carry plain numbers. Numbers keep the digits they were written with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Subsidy {
    Amount(Number),
    Text(String),
}

impl Subsidy {
    /// Any non-null value is accepted; values that are neither numbers nor
    /// strings are shown as their JSON text.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(Subsidy::Amount(n)),
            Value::String(s) => Some(Subsidy::Text(s)),
            other => Some(Subsidy::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Subsidy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsidy::Amount(n) => write!(f, "{n}"),
            Subsidy::Text(s) => f.write_str(s),
        }
    }
}

/// One project row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    #[serde(rename = "Regione")]
    pub region: String,
    #[serde(rename = "Progetto")]
    pub project_code: String,
    #[serde(rename = "Nome_Progetto")]
    pub project_name: String,
    #[serde(
        rename = "Linea_di_Finanziamento",
        skip_serializing_if = "Option::is_none"
    )]
    pub funding_line: Option<String>,
    #[serde(rename = "Agevolazione", skip_serializing_if = "Option::is_none")]
    pub subsidy: Option<Subsidy>,
}

impl ProjectRecord {
    pub fn new(
        region: impl Into<String>,
        project_code: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            project_code: project_code.into(),
            project_name: project_name.into(),
            funding_line: None,
            subsidy: None,
        }
    }

    /// Reads one data-file object. Returns `None` when `Regione` is blank.
    ///
    /// Only the region is required. Current keys win over legacy ones
    /// (`Nome_Progetto` over `name`, `Agevolazione` over `amount`); other
    /// fields default when missing and accept any JSON type.
    pub fn from_object(mut object: Map<String, Value>) -> Option<Self> {
        let region = take_text(&mut object, "Regione").filter(|r| !r.trim().is_empty())?;
        let project_code = take_text(&mut object, "Progetto").unwrap_or_default();
        let project_name = take_text(&mut object, "Nome_Progetto")
            .filter(|n| !n.trim().is_empty())
            .or_else(|| take_text(&mut object, "name"))
            .unwrap_or_default();
        let funding_line = take_text(&mut object, "Linea_di_Finanziamento");
        let subsidy = object
            .remove("Agevolazione")
            .and_then(Subsidy::from_value)
            .or_else(|| object.remove("amount").and_then(Subsidy::from_value));

        Some(Self {
            region,
            project_code,
            project_name,
            funding_line,
            subsidy,
        })
    }

    pub fn with_funding_line(mut self, funding_line: impl Into<String>) -> Self {
        self.funding_line = Some(funding_line.into());
        self
    }

    pub fn with_subsidy(mut self, subsidy: Subsidy) -> Self {
        self.subsidy = Some(subsidy);
        self
    }

    pub fn funding_line(&self) -> Option<&str> {
        self.funding_line.as_deref()
    }
}

#[derive(Debug)]
pub enum ProjectDataError {
    Parse(serde_json::Error),
    NotAList,
}

impl fmt::Display for ProjectDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectDataError::Parse(err) => write!(f, "project data parse error: {err}"),
            ProjectDataError::NotAList => write!(f, "project data must be a JSON array"),
        }
    }
}

impl std::error::Error for ProjectDataError {}

/// Decodes a project data file.
///
/// The root must be a JSON array. Entries that are not objects, or whose
/// `Regione` is blank, are skipped with a warning so one bad row never hides
/// the rest of the file.
pub fn parse_projects(payload: &str) -> Result<Vec<ProjectRecord>, ProjectDataError> {
    let value: Value = serde_json::from_str(payload).map_err(ProjectDataError::Parse)?;
    decode_projects(value)
}

pub fn decode_projects(value: Value) -> Result<Vec<ProjectRecord>, ProjectDataError> {
    let Value::Array(items) = value else {
        return Err(ProjectDataError::NotAList);
    };

    let total = items.len();
    let mut out = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            warn!(index, "skipping project entry that is not an object");
            continue;
        };
        let Some(record) = ProjectRecord::from_object(object) else {
            warn!(index, "skipping project record without region");
            continue;
        };
        out.push(record);
    }

    debug!(loaded = out.len(), total, "decoded project data");
    Ok(out)
}

fn take_text(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    object.remove(key).and_then(value_text)
}

// Codes occasionally arrive as bare numbers; accept any scalar as text.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_current_shape() {
        let payload = r#"[
            {
                "Regione": "Lazio",
                "Progetto": "PE00000001",
                "Nome_Progetto": "RESTART",
                "Agevolazione": "€ 114.600.000",
                "Linea_di_Finanziamento": "Partenariati Estesi"
            }
        ]"#;
        let records = parse_projects(payload).expect("parse");
        assert_eq!(
            records,
            vec![
                ProjectRecord::new("Lazio", "PE00000001", "RESTART")
                    .with_funding_line("Partenariati Estesi")
                    .with_subsidy(Subsidy::Text("€ 114.600.000".into()))
            ]
        );
    }

    #[test]
    fn decodes_legacy_shape_with_numeric_amount() {
        let payload = r#"[{"Regione": "Umbria", "Progetto": 42, "name": "Legacy", "amount": 1500000}]"#;
        let records = parse_projects(payload).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].project_code, "42");
        assert_eq!(records[0].project_name, "Legacy");
        assert_eq!(records[0].funding_line(), None);
        assert_eq!(
            records[0].subsidy.as_ref().map(|s| s.to_string()),
            Some("1500000".to_string())
        );
    }

    #[test]
    fn skips_rows_without_region() {
        let payload = r#"[
            {"Progetto": "P0"},
            {"Regione": "  ", "Progetto": "P1"},
            "not a record",
            {"Regione": "Lazio", "Progetto": "P2"}
        ]"#;
        let records = parse_projects(payload).expect("parse");
        let codes: Vec<&str> = records.iter().map(|r| r.project_code.as_str()).collect();
        assert_eq!(codes, vec!["P2"]);
    }

    #[test]
    fn rejects_non_array_root() {
        let err = parse_projects(r#"{"Regione": "Lazio"}"#).unwrap_err();
        assert!(matches!(err, ProjectDataError::NotAList));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_projects("[{").unwrap_err();
        assert!(matches!(err, ProjectDataError::Parse(_)));
        assert!(err.to_string().starts_with("project data parse error"));
    }

    #[test]
    fn fractional_amounts_keep_their_decimals() {
        let amount = Number::from_f64(12.5).map(Subsidy::Amount);
        assert_eq!(amount.map(|s| s.to_string()), Some("12.5".to_string()));
    }

    #[test]
    fn odd_subsidy_types_keep_the_record() {
        let payload = r#"[
            {"Regione": "Lazio", "Progetto": "P1", "Agevolazione": true,
             "Linea_di_Finanziamento": "Centri Nazionali"},
            {"Regione": "Lazio", "Progetto": "P2", "Agevolazione": {"eur": 5}},
            {"Regione": "Lazio", "Progetto": "P3", "Agevolazione": null}
        ]"#;
        let records = parse_projects(payload).expect("parse");
        let subsidies: Vec<Option<String>> = records
            .iter()
            .map(|r| r.subsidy.as_ref().map(|s| s.to_string()))
            .collect();
        assert_eq!(
            subsidies,
            vec![Some("true".to_string()), Some(r#"{"eur":5}"#.to_string()), None]
        );
        assert_eq!(records[0].funding_line(), Some("Centri Nazionali"));
    }

    #[test]
    fn current_keys_win_over_legacy_keys() {
        let payload = r#"[
            {"Regione": "Lazio", "Progetto": "P1", "Nome_Progetto": "Nuovo", "name": "Vecchio",
             "Agevolazione": "€ 10", "amount": 10},
            {"Regione": "Lazio", "Progetto": "P2", "Nome_Progetto": "", "name": "Vecchio"}
        ]"#;
        let records = parse_projects(payload).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].project_name, "Nuovo");
        assert_eq!(records[0].subsidy, Some(Subsidy::Text("€ 10".to_string())));
        assert_eq!(records[1].project_name, "Vecchio");
    }

    #[test]
    fn large_integer_amounts_print_exactly() {
        let payload = r#"[{"Regione": "Lazio", "amount": 12345678901234567890}]"#;
        let records = parse_projects(payload).expect("parse");
        assert_eq!(
            records[0].subsidy.as_ref().map(|s| s.to_string()),
            Some("12345678901234567890".to_string())
        );
    }
}

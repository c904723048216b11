use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ANIMATION_MS: u32 = 300;

/// A named checkbox that switches one funding-line filter on or off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingToggle {
    /// DOM id of the checkbox.
    pub id: String,
    /// Exact `Linea_di_Finanziamento` value the checkbox filters on.
    pub label: String,
}

impl FundingToggle {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionPalette {
    pub fill: String,
    pub hover: String,
    pub selected: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl Default for RegionPalette {
    fn default() -> Self {
        Self {
            fill: "#7cb4e3".to_string(),
            hover: "#1e62d0".to_string(),
            selected: "#ff3333".to_string(),
            stroke: "#ffffff".to_string(),
            stroke_width: "1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub projects_url: String,
    pub map_url: String,
    pub map_svg_id: String,
    pub region_tags: Vec<String>,
    pub funding_toggles: Vec<FundingToggle>,
    pub animation_ms: u32,
    pub palette: RegionPalette,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            projects_url: "Partenariali.json".to_string(),
            map_url: "assets/italia.svg".to_string(),
            map_svg_id: "italy-map-svg".to_string(),
            region_tags: vec!["path".to_string(), "polygon".to_string()],
            funding_toggles: vec![
                FundingToggle::new("toggle-PE", "Partenariati Estesi"),
                FundingToggle::new("toggle-CN", "Centri Nazionali"),
                FundingToggle::new("toggle-ECS", "Ecosistemi d'Innovazione"),
            ],
            animation_ms: DEFAULT_ANIMATION_MS,
            palette: RegionPalette::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_tags.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "region_tags must name at least one element".to_string(),
            ));
        }
        if let Some(t) = self.funding_toggles.iter().find(|t| t.label.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "funding toggle {} has an empty label",
                t.id
            )));
        }
        Ok(())
    }

    /// Label filtered by the checkbox with DOM id `toggle_id`.
    pub fn funding_label(&self, toggle_id: &str) -> Option<&str> {
        self.funding_toggles
            .iter()
            .find(|t| t.id == toggle_id)
            .map(|t| t.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ViewerConfig::from_json_str(r#"{"animation_ms": 150}"#).expect("config");
        assert_eq!(config.animation_ms, 150);
        assert_eq!(config.projects_url, "Partenariali.json");
        assert_eq!(config.funding_label("toggle-CN"), Some("Centri Nazionali"));
        assert_eq!(config.palette, RegionPalette::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ViewerConfig::from_json_str(r#"{"animation": 150}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_region_tags_are_invalid() {
        let err = ViewerConfig::from_json_str(r#"{"region_tags": [""]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}

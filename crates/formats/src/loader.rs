use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::projects::{ProjectDataError, ProjectRecord, parse_projects};
use crate::svg_map::{MapAsset, MapAssetError, parse_map_svg};

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Network(String),
    /// The host page is missing an element or rejected a DOM call.
    Page(String),
    Http {
        status: u16,
    },
    Projects(ProjectDataError),
    Map(MapAssetError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Network(msg) => write!(f, "network error: {msg}"),
            LoadError::Page(msg) => write!(f, "page error: {msg}"),
            LoadError::Http { status } => write!(f, "HTTP {status}"),
            LoadError::Projects(e) => write!(f, "{e}"),
            LoadError::Map(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<ProjectDataError> for LoadError {
    fn from(e: ProjectDataError) -> Self {
        LoadError::Projects(e)
    }
}

impl From<MapAssetError> for LoadError {
    fn from(e: MapAssetError) -> Self {
        LoadError::Map(e)
    }
}

pub fn load_projects_file(path: impl AsRef<Path>) -> Result<Vec<ProjectRecord>, LoadError> {
    let payload = read_text(path.as_ref())?;
    Ok(parse_projects(&payload)?)
}

pub fn load_map_file<S: AsRef<str>>(
    path: impl AsRef<Path>,
    region_tags: &[S],
) -> Result<MapAsset, LoadError> {
    let markup = read_text(path.as_ref())?;
    Ok(parse_map_svg(&markup, region_tags)?)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{LoadError, load_map_file, load_projects_file};
    use crate::config::ViewerConfig;

    fn assets_dir() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/viewer_web/assets")
    }

    #[test]
    fn loads_bundled_demo_assets() {
        let config = ViewerConfig::default();
        let asset = load_map_file(assets_dir().join("italia.svg"), &config.region_tags)
            .expect("load map");
        let projects =
            load_projects_file(assets_dir().join("Partenariali.json")).expect("load projects");

        // Counts are asserted loosely so the demo files can grow.
        assert!(asset.shapes.len() >= 5);
        assert!(!projects.is_empty());
        assert!(projects.iter().all(|p| !p.region.trim().is_empty()));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_projects_file(assets_dir().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn error_kinds_display_distinctly() {
        let page = LoadError::Page("#map-container not found".to_string());
        assert_eq!(page.to_string(), "page error: #map-container not found");
        assert_eq!(LoadError::Http { status: 404 }.to_string(), "HTTP 404");
        assert_eq!(
            LoadError::Network("offline".to_string()).to_string(),
            "network error: offline"
        );
    }
}

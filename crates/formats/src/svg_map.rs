use std::fmt;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

/// One interactive shape found in the map asset, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapShape {
    pub tag: String,
    pub id: Option<String>,
    pub data_name: Option<String>,
    pub title: Option<String>,
}

impl MapShape {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            data_name: None,
            title: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_data_name(mut self, name: impl Into<String>) -> Self {
        self.data_name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAsset {
    pub view_box: Option<String>,
    pub shapes: Vec<MapShape>,
}

#[derive(Debug)]
pub enum MapAssetError {
    Parse(roxmltree::Error),
    MissingSvgRoot,
}

impl fmt::Display for MapAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapAssetError::Parse(err) => write!(f, "map markup parse error: {err}"),
            MapAssetError::MissingSvgRoot => write!(f, "no <svg> element in map markup"),
        }
    }
}

impl std::error::Error for MapAssetError {}

/// Parses map markup and collects the region shapes.
///
/// Shapes are the elements whose tag is listed in `region_tags` and that sit
/// under the first `<svg>` element, outside any `<defs>`.
pub fn parse_map_svg<S: AsRef<str>>(
    markup: &str,
    region_tags: &[S],
) -> Result<MapAsset, MapAssetError> {
    // Exported map files commonly carry an SVG 1.1 DOCTYPE.
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(markup, opts).map_err(MapAssetError::Parse)?;
    let root = doc
        .descendants()
        .find(|n| n.has_tag_name("svg"))
        .ok_or(MapAssetError::MissingSvgRoot)?;

    let shapes: Vec<MapShape> = root
        .descendants()
        .filter(|n| n.is_element())
        .filter(|n| {
            region_tags
                .iter()
                .any(|t| n.tag_name().name() == t.as_ref())
        })
        .filter(|n| !node_is_inside_defs(*n))
        .map(shape_from_node)
        .collect();

    debug!(shapes = shapes.len(), "parsed map asset");
    Ok(MapAsset {
        view_box: root.attribute("viewBox").map(str::to_string),
        shapes,
    })
}

fn node_is_inside_defs(n: Node<'_, '_>) -> bool {
    n.ancestors()
        .filter(|a| a.is_element())
        .any(|a| a.has_tag_name("defs"))
}

fn shape_from_node(n: Node<'_, '_>) -> MapShape {
    let title = n
        .descendants()
        .find(|c| c.has_tag_name("title"))
        .map(|t| {
            t.descendants()
                .filter(|c| c.is_text())
                .filter_map(|c| c.text())
                .collect::<String>()
        });

    MapShape {
        tag: n.tag_name().name().to_string(),
        id: n.attribute("id").map(str::to_string),
        data_name: n.attribute("data-name").map(str::to_string),
        title,
    }
}

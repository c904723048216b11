use std::fmt;

/// Stable identifier of one interactive region shape.
///
/// Ids come from the map asset when present; otherwise they are generated as
/// `region-{n}` with a 1-based document position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        RegionId(id.into())
    }

    /// Generated id for the shape at 0-based `position` in document order.
    pub fn generated(position: usize) -> Self {
        RegionId(format!("region-{}", position + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        RegionId::new(value)
    }
}

impl From<String> for RegionId {
    fn from(value: String) -> Self {
        RegionId(value)
    }
}

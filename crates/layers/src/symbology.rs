use formats::config::RegionPalette;

/// Visual category of a funding line, used for the coloured badge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    Pe,
    Cn,
    Ecs,
    Other,
}

impl BadgeCategory {
    /// Classifies by substring; the first matching rule wins.
    pub fn classify(funding_line: Option<&str>) -> Self {
        let Some(line) = funding_line else {
            return BadgeCategory::Other;
        };
        if line.contains("Partenariati") {
            BadgeCategory::Pe
        } else if line.contains("Centri") {
            BadgeCategory::Cn
        } else if line.contains("Ecosistemi") {
            BadgeCategory::Ecs
        } else {
            BadgeCategory::Other
        }
    }

    pub const fn css_suffix(self) -> &'static str {
        match self {
            BadgeCategory::Pe => "pe",
            BadgeCategory::Cn => "cn",
            BadgeCategory::Ecs => "ecs",
            BadgeCategory::Other => "other",
        }
    }

    pub fn css_class(self) -> String {
        format!("line-badge line-badge--{}", self.css_suffix())
    }
}

/// Fill colour of a region shape. Hover never repaints a selected region.
pub fn region_fill(palette: &RegionPalette, selected: bool, hovered: bool) -> &str {
    if selected {
        &palette.selected
    } else if hovered {
        &palette.hover
    } else {
        &palette.fill
    }
}

//! Info panel: the technical record of the selected part.

use std::fmt;

use baudetail_core::{
    color::Color,
    diagram::{Diagram, Part, Rating, Severity},
    identifier::Id,
};

use crate::{binder::HighlightPalette, view::ViewState};

/// One section of a part record. Only sections with data are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoSection {
    Material {
        description: Option<String>,
        composition: Option<String>,
        dimensions: Option<String>,
    },
    Function(String),
    Performance {
        acoustic: Option<Rating>,
        fire: Option<Rating>,
    },
    /// Failure modes with the color of their severity.
    FailureModes(Vec<(String, Severity, Color, Option<String>)>),
    Installation(Vec<String>),
    CrossTrade(String),
    /// Category names with their legend colors.
    Categories(Vec<(String, Color)>),
}

/// The technical record of one part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    id: Id,
    name: String,
    short_name: String,
    din: String,
    sections: Vec<InfoSection>,
}

impl PartRecord {
    fn new(diagram: &Diagram, part: &Part, palette: &HighlightPalette) -> Self {
        let mut sections = Vec::new();

        let material = part.material();
        if !material.is_empty() {
            sections.push(InfoSection::Material {
                description: material.description().map(str::to_string),
                composition: material.composition().map(str::to_string),
                dimensions: material.dimensions().map(str::to_string),
            });
        }

        if let Some(function) = part.function() {
            sections.push(InfoSection::Function(function.to_string()));
        }

        let present = |rating: &Rating| (!rating.is_empty()).then(|| rating.clone());
        let acoustic = present(part.acoustic());
        let fire = present(part.fire());
        if acoustic.is_some() || fire.is_some() {
            sections.push(InfoSection::Performance { acoustic, fire });
        }

        if !part.failure_modes().is_empty() {
            sections.push(InfoSection::FailureModes(
                part.failure_modes()
                    .iter()
                    .map(|mode| {
                        (
                            mode.kind().to_string(),
                            mode.severity(),
                            palette.color_for(mode.severity()),
                            mode.description().map(str::to_string),
                        )
                    })
                    .collect(),
            ));
        }

        if !part.installation().is_empty() {
            sections.push(InfoSection::Installation(part.installation().to_vec()));
        }

        if let Some(note) = part.cross_trade() {
            sections.push(InfoSection::CrossTrade(note.to_string()));
        }

        if !part.categories().is_empty() {
            sections.push(InfoSection::Categories(
                part.categories()
                    .iter()
                    .map(|id| match diagram.category(*id) {
                        Some(category) => (category.name().to_string(), category.color()),
                        None => (id.as_string(), Color::neutral()),
                    })
                    .collect(),
            ));
        }

        Self {
            id: part.id(),
            name: part.name().to_string(),
            short_name: part.short_name().to_string(),
            din: part.din().to_string(),
            sections,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn din(&self) -> &str {
        &self.din
    }

    pub fn sections(&self) -> &[InfoSection] {
        &self.sections
    }
}

/// View model of the info panel.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoPanel {
    Hidden,
    /// Nothing selected; prompts the user to pick a part.
    Placeholder,
    Record(PartRecord),
}

impl InfoPanel {
    pub fn new(diagram: &Diagram, state: &ViewState, palette: &HighlightPalette) -> Self {
        if !state.info_panel_visible() {
            return Self::Hidden;
        }
        match state.selected().and_then(|id| diagram.part(id)) {
            Some(part) => Self::Record(PartRecord::new(diagram, part, palette)),
            None => Self::Placeholder,
        }
    }

    pub fn record(&self) -> Option<&PartRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

fn write_rating(f: &mut fmt::Formatter<'_>, label: &str, rating: &Rating) -> fmt::Result {
    write!(f, "  {label}: {}", rating.value().unwrap_or("-"))?;
    if let Some(notes) = rating.notes() {
        write!(f, " ({notes})")?;
    }
    writeln!(f)
}

impl fmt::Display for InfoSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material {
                description,
                composition,
                dimensions,
            } => {
                writeln!(f, "Material")?;
                for (label, value) in [
                    ("Description", description),
                    ("Composition", composition),
                    ("Dimensions", dimensions),
                ] {
                    if let Some(value) = value {
                        writeln!(f, "  {label}: {value}")?;
                    }
                }
                Ok(())
            }
            Self::Function(function) => writeln!(f, "Function\n  {function}"),
            Self::Performance { acoustic, fire } => {
                writeln!(f, "Performance")?;
                if let Some(acoustic) = acoustic {
                    write_rating(f, "Acoustic", acoustic)?;
                }
                if let Some(fire) = fire {
                    write_rating(f, "Fire", fire)?;
                }
                Ok(())
            }
            Self::FailureModes(modes) => {
                writeln!(f, "Failure modes")?;
                for (kind, severity, color, description) in modes {
                    write!(f, "  <{severity} {}> {kind}", color.to_hex())?;
                    if let Some(description) = description {
                        write!(f, ": {description}")?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Self::Installation(steps) => {
                writeln!(f, "Installation")?;
                for (number, step) in steps.iter().enumerate() {
                    writeln!(f, "  {}. {step}", number + 1)?;
                }
                Ok(())
            }
            Self::CrossTrade(note) => writeln!(f, "Cross-trade\n  {note}"),
            Self::Categories(categories) => {
                let names: Vec<&str> = categories.iter().map(|(name, _)| name.as_str()).collect();
                writeln!(f, "Categories\n  {}", names.join(", "))
            }
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => writeln!(f, "Details (hidden)"),
            Self::Placeholder => writeln!(f, "Select a part to see its details."),
            Self::Record(record) => {
                write!(f, "{}", record.name)?;
                if !record.short_name.is_empty() {
                    write!(f, " [{}]", record.short_name)?;
                }
                if !record.din.is_empty() {
                    write!(f, " {}", record.din)?;
                }
                writeln!(f)?;
                for section in &record.sections {
                    write!(f, "{section}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use baudetail_core::{
        diagram::{Category, FailureMode, Material},
        geometry::Size,
    };

    use super::*;

    fn diagram() -> Diagram {
        let full = Part::new(Id::new("board"), "Gipskartonplatte")
            .with_short_name("GKF")
            .with_din("DIN 18180")
            .with_categories([Id::new("fire-protection"), Id::new("custom")])
            .with_material(Material::new(
                Some("Feuerschutzplatte".into()),
                None,
                Some("12,5 mm".into()),
            ))
            .with_function(Some("Beplankung".into()))
            .with_fire(Rating::new(Some("F30".into()), None))
            .with_failure_modes(vec![FailureMode::new(
                "Rissbildung",
                Severity::Critical,
                Some("Fugen ohne Bewehrungsstreifen".into()),
            )])
            .with_installation(vec!["Platten versetzt".into(), "Fugen spachteln".into()]);
        let bare = Part::new(Id::new("screw"), "Schraube");
        Diagram::new(
            [full, bare],
            Category::defaults(),
            Vec::new(),
            "<svg/>",
            Size::new(500.0, 400.0),
        )
    }

    #[test]
    fn test_placeholder_and_hidden() {
        let diagram = diagram();
        let palette = HighlightPalette::default();
        let mut state = ViewState::default();
        assert_eq!(InfoPanel::new(&diagram, &state, &palette), InfoPanel::Placeholder);

        state.toggle_info_panel();
        assert_eq!(InfoPanel::new(&diagram, &state, &palette), InfoPanel::Hidden);
    }

    #[test]
    fn test_only_present_sections_are_rendered() {
        let diagram = diagram();
        let palette = HighlightPalette::default();
        let mut state = ViewState::default();

        state.select(Id::new("screw"));
        let panel = InfoPanel::new(&diagram, &state, &palette);
        assert!(panel.record().unwrap().sections().is_empty());

        state.select(Id::new("board"));
        let panel = InfoPanel::new(&diagram, &state, &palette);
        let sections = panel.record().unwrap().sections();
        assert_eq!(sections.len(), 6);
        assert!(matches!(
            &sections[2],
            InfoSection::Performance { acoustic: None, fire: Some(_) }
        ));
        assert!(!sections.iter().any(|s| matches!(s, InfoSection::CrossTrade(_))));
    }

    #[test]
    fn test_display() {
        let diagram = diagram();
        let mut state = ViewState::default();
        state.select(Id::new("board"));
        let text = InfoPanel::new(&diagram, &state, &HighlightPalette::default()).to_string();

        assert!(text.starts_with("Gipskartonplatte [GKF] DIN 18180\n"));
        assert!(text.contains("  Dimensions: 12,5 mm"));
        assert!(!text.contains("Composition"));
        assert!(text.contains("  Fire: F30"));
        assert!(text.contains("  <critical #dc2626> Rissbildung: Fugen ohne Bewehrungsstreifen"));
        assert!(text.contains("  2. Fugen spachteln"));
        assert!(text.contains("Categories\n  Brandschutz, custom"));
    }
}

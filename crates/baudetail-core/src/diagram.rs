//! The immutable diagram model.
//!
//! A [`Diagram`] is built once from a generated payload and never mutated. It
//! holds the named [`Part`]s of a construction detail, the [`Category`] tags
//! used for filtering, the [`FailureScenario`]s used for highlighting and the
//! raw SVG markup the parts are bound to.
//!
//! # Example
//!
//! ```
//! # use baudetail_core::diagram::{Category, Diagram, Part};
//! # use baudetail_core::geometry::Size;
//! # use baudetail_core::identifier::Id;
//! let stud = Part::new(Id::new("wallStud"), "Ständer CW 50")
//!     .with_categories([Id::new("load-bearing")]);
//!
//! let diagram = Diagram::new(
//!     [stud],
//!     Category::defaults(),
//!     Vec::new(),
//!     "<svg><g id=\"wallStud\"/></svg>",
//!     Size::new(500.0, 400.0),
//! );
//!
//! assert!(diagram.part(Id::new("wallStud")).is_some());
//! assert!(diagram.part(Id::new("missing")).is_none());
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::{color::Color, geometry::Size, identifier::Id};

/// Identifier of the reserved category meaning "no filtering".
pub const ALL_CATEGORY: &str = "all";

/// Severity of a failure mode or failure scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Returns the lowercase payload name of the severity.
    pub fn name(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!(
                "invalid severity `{s}`, valid values: critical, high, medium, low"
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A performance rating such as an acoustic or fire classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rating {
    value: Option<String>,
    notes: Option<String>,
}

impl Rating {
    pub fn new(value: Option<String>, notes: Option<String>) -> Self {
        Self { value, notes }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns true if neither a value nor notes are present.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.notes.is_none()
    }
}

/// Material information of a part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Material {
    description: Option<String>,
    composition: Option<String>,
    dimensions: Option<String>,
}

impl Material {
    pub fn new(
        description: Option<String>,
        composition: Option<String>,
        dimensions: Option<String>,
    ) -> Self {
        Self {
            description,
            composition,
            dimensions,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn composition(&self) -> Option<&str> {
        self.composition.as_deref()
    }

    pub fn dimensions(&self) -> Option<&str> {
        self.dimensions.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.composition.is_none() && self.dimensions.is_none()
    }
}

/// A known way a part can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMode {
    kind: String,
    severity: Severity,
    description: Option<String>,
}

impl FailureMode {
    pub fn new(kind: impl Into<String>, severity: Severity, description: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            description,
        }
    }

    /// Short name of the failure type, e.g. "Rissbildung".
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A named, inspectable element of the diagram.
///
/// A part is interactive only if the diagram markup contains a node whose
/// `id` attribute equals the part identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    id: Id,
    name: String,
    short_name: String,
    din: String,
    categories: Vec<Id>,
    material: Material,
    function: Option<String>,
    failure_modes: Vec<FailureMode>,
    installation: Vec<String>,
    cross_trade: Option<String>,
    acoustic: Rating,
    fire: Rating,
}

impl Part {
    /// Creates a part with a display name and no further data.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: String::new(),
            din: String::new(),
            categories: Vec::new(),
            material: Material::default(),
            function: None,
            failure_modes: Vec::new(),
            installation: Vec::new(),
            cross_trade: None,
            acoustic: Rating::default(),
            fire: Rating::default(),
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_din(mut self, din: impl Into<String>) -> Self {
        self.din = din.into();
        self
    }

    /// Sets the category membership. Repeated ids are kept once.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Id>) -> Self {
        self.categories.clear();
        for category in categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_function(mut self, function: Option<String>) -> Self {
        self.function = function;
        self
    }

    pub fn with_failure_modes(mut self, failure_modes: Vec<FailureMode>) -> Self {
        self.failure_modes = failure_modes;
        self
    }

    pub fn with_installation(mut self, installation: Vec<String>) -> Self {
        self.installation = installation;
        self
    }

    pub fn with_cross_trade(mut self, cross_trade: Option<String>) -> Self {
        self.cross_trade = cross_trade;
        self
    }

    pub fn with_acoustic(mut self, acoustic: Rating) -> Self {
        self.acoustic = acoustic;
        self
    }

    pub fn with_fire(mut self, fire: Rating) -> Self {
        self.fire = fire;
        self
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

    /// Reference-standard code, e.g. "DIN 18182".
    pub fn din(&self) -> &str {
        &self.din
    }

    pub fn categories(&self) -> &[Id] {
        &self.categories
    }

    /// Returns true if the part is tagged with the given category.
    pub fn belongs_to(&self, category: Id) -> bool {
        self.categories.contains(&category)
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn failure_modes(&self) -> &[FailureMode] {
        &self.failure_modes
    }

    pub fn installation(&self) -> &[String] {
        &self.installation
    }

    /// Coordination note for neighbouring trades.
    pub fn cross_trade(&self) -> Option<&str> {
        self.cross_trade.as_deref()
    }

    pub fn acoustic(&self) -> &Rating {
        &self.acoustic
    }

    pub fn fire(&self) -> &Rating {
        &self.fire
    }
}

/// A filter tag with a legend color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Id,
    name: String,
    color: Color,
    description: String,
}

impl Category {
    pub fn new(
        id: Id,
        name: impl Into<String>,
        color: Color,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            description: description.into(),
        }
    }

    /// The reserved entry that shows every part.
    pub fn all() -> Self {
        Self::new(
            Id::new(ALL_CATEGORY),
            "Alle",
            Color::neutral(),
            "Alle Bauteile anzeigen",
        )
    }

    /// The standard six-entry category set used when a payload has none.
    pub fn defaults() -> Vec<Self> {
        let rest = [
            ("load-bearing", "Tragwerk", "#1E3A5F", "Tragende Bauteile"),
            ("finishing", "Bekleidung", "#8B7355", "Beplankung und Oberflächen"),
            ("acoustic", "Akustik", "#4A6741", "Schallschutz und Dämmung"),
            ("fire-protection", "Brandschutz", "#B45309", "Feuerwiderstand und Abschottung"),
            ("moisture", "Feuchteschutz", "#2F5F7F", "Dampfbremse und Abdichtung"),
        ]
        .into_iter()
        .map(|(id, name, color, description)| {
            let color = Color::new(color).unwrap_or_else(|_| Color::neutral());
            Self::new(Id::new(id), name, color, description)
        });
        std::iter::once(Self::all()).chain(rest).collect()
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true for the reserved "all" category.
    pub fn is_all(&self) -> bool {
        self.id == ALL_CATEGORY
    }
}

/// A named defect pattern affecting a subset of parts.
///
/// Affected ids that name no part of the diagram are kept but have no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureScenario {
    id: Id,
    name: String,
    description: String,
    severity: Severity,
    affected: Vec<Id>,
    indicator: String,
}

impl FailureScenario {
    pub fn new(id: Id, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            severity,
            affected: Vec::new(),
            indicator: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_affected(mut self, affected: impl IntoIterator<Item = Id>) -> Self {
        self.affected = affected.into_iter().collect();
        self
    }

    /// Sets the text describing how the failure shows up visually.
    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = indicator.into();
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn affected(&self) -> &[Id] {
        &self.affected
    }

    pub fn affects(&self, part: Id) -> bool {
        self.affected.contains(&part)
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }
}

/// Presentation metadata from the generation envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramMetadata {
    title: Option<String>,
    summary: Option<String>,
    bullet_points: Vec<String>,
}

impl DiagramMetadata {
    pub fn new(title: Option<String>, summary: Option<String>, bullet_points: Vec<String>) -> Self {
        Self {
            title,
            summary,
            bullet_points,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn bullet_points(&self) -> &[String] {
        &self.bullet_points
    }
}

/// A loaded, immutable construction-detail diagram.
#[derive(Debug, Clone)]
pub struct Diagram {
    parts: IndexMap<Id, Part>,
    categories: Vec<Category>,
    scenarios: Vec<FailureScenario>,
    markup: String,
    size: Size,
    metadata: DiagramMetadata,
}

impl Diagram {
    /// Creates a diagram. Parts keep the given order; a repeated part id
    /// replaces the earlier entry in place.
    pub fn new(
        parts: impl IntoIterator<Item = Part>,
        categories: Vec<Category>,
        scenarios: Vec<FailureScenario>,
        markup: impl Into<String>,
        size: Size,
    ) -> Self {
        Self {
            parts: parts.into_iter().map(|part| (part.id(), part)).collect(),
            categories,
            scenarios,
            markup: markup.into(),
            size,
            metadata: DiagramMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: DiagramMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn part(&self, id: Id) -> Option<&Part> {
        self.parts.get(&id)
    }

    pub fn contains_part(&self, id: Id) -> bool {
        self.parts.contains_key(&id)
    }

    /// Iterates parts in payload order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: Id) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    pub fn scenarios(&self) -> &[FailureScenario] {
        &self.scenarios
    }

    pub fn scenario(&self, id: Id) -> Option<&FailureScenario> {
        self.scenarios.iter().find(|scenario| scenario.id() == id)
    }

    /// The raw SVG markup. Treated as an opaque, read-only artifact.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Nominal width and height of the drawing.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn metadata(&self) -> &DiagramMetadata {
        &self.metadata
    }
}

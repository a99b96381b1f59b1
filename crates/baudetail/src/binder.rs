//! Overlay binder: turns view state into per-part presentation.
//!
//! Binding happens in two steps. [`reconcile`] is a pure function from the
//! diagram, its markup index, the current [`ViewState`] and the highlight
//! palette to a [`Reconciliation`]: one [`PartPresentation`] per bound part
//! plus the root transform. [`apply`] then hands those records to a
//! [`MarkupSurface`], which owns the actual markup nodes.
//!
//! Surfaces key everything by part id, so applying the same reconciliation
//! any number of times leaves the surface in the same state. The markup
//! itself is never rewritten; surfaces only layer presentation on top.
//!
//! # Example
//!
//! ```
//! # use baudetail::binder::{self, HighlightPalette};
//! # use baudetail::markup::MarkupIndex;
//! # use baudetail::view::ViewState;
//! # use baudetail_core::diagram::{Category, Diagram, Part};
//! # use baudetail_core::geometry::Size;
//! # use baudetail_core::identifier::Id;
//! let markup = r#"<svg><g id="wallStud"><rect/></g></svg>"#;
//! let diagram = Diagram::new(
//!     [Part::new(Id::new("wallStud"), "Ständer").with_categories([Id::new("load-bearing")])],
//!     Category::defaults(),
//!     Vec::new(),
//!     markup,
//!     Size::new(500.0, 400.0),
//! );
//! let index = MarkupIndex::parse(markup).unwrap();
//!
//! let mut state = ViewState::default();
//! state.set_category(Id::new("acoustic"));
//!
//! let reconciliation = binder::reconcile(&diagram, &index, &state, &HighlightPalette::default());
//! let stud = reconciliation.presentation(Id::new("wallStud")).unwrap();
//! assert_eq!(stud.opacity(), binder::DIMMED_OPACITY);
//! ```

use log::{debug, trace};

use baudetail_core::{
    color::Color,
    diagram::{ALL_CATEGORY, Diagram, FailureScenario, Part, Severity},
    geometry::ViewTransform,
    identifier::Id,
};

use crate::{
    event::ViewerEvent,
    markup::{MarkupIndex, MarkupNode},
    view::ViewState,
};

/// Opacity of parts outside the active category.
pub const DIMMED_OPACITY: f32 = 0.15;
/// Opacity of parts in the active category.
pub const FULL_OPACITY: f32 = 1.0;
/// Outline width of highlighted drawables.
pub const HIGHLIGHT_STROKE_WIDTH: f32 = 3.0;
/// Radius of the glow around highlighted drawables.
pub const HIGHLIGHT_GLOW_RADIUS: f32 = 4.0;

const CURSOR: &str = "pointer";
const TRANSITION: &str = "opacity 0.3s ease, filter 0.3s ease";

/// Highlight colors keyed by scenario severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightPalette {
    critical: Color,
    high: Color,
    medium: Color,
}

impl HighlightPalette {
    pub fn new(critical: Color, high: Color, medium: Color) -> Self {
        Self {
            critical,
            high,
            medium,
        }
    }

    pub fn critical(&self) -> Color {
        self.critical
    }

    pub fn high(&self) -> Color {
        self.high
    }

    pub fn medium(&self) -> Color {
        self.medium
    }

    /// Color for `severity`. Low severities share the medium color.
    pub fn color_for(&self, severity: Severity) -> Color {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium | Severity::Low => self.medium,
        }
    }
}

impl Default for HighlightPalette {
    fn default() -> Self {
        let parse = |hex: &str| Color::new(hex).unwrap_or_default();
        Self::new(parse("#DC2626"), parse("#F87171"), parse("#F59E0B"))
    }
}

/// Outline and glow applied to the drawables of a part in the active scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    severity: Severity,
    color: Color,
}

impl Highlight {
    pub fn new(severity: Severity, color: Color) -> Self {
        Self { severity, color }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        HIGHLIGHT_STROKE_WIDTH
    }

    pub fn glow_radius(&self) -> f32 {
        HIGHLIGHT_GLOW_RADIUS
    }
}

/// Cursor, transition and event handlers attached to a bound part.
#[derive(Debug, Clone, PartialEq)]
pub struct Affordances {
    on_enter: ViewerEvent,
    on_leave: ViewerEvent,
    on_click: ViewerEvent,
}

impl Affordances {
    fn for_part(id: Id) -> Self {
        Self {
            on_enter: ViewerEvent::PartEnter(id),
            on_leave: ViewerEvent::PartLeave(id),
            on_click: ViewerEvent::PartClick(id),
        }
    }

    pub fn cursor(&self) -> &'static str {
        CURSOR
    }

    /// CSS transition for opacity and filter changes.
    pub fn transition(&self) -> &'static str {
        TRANSITION
    }

    pub fn on_enter(&self) -> &ViewerEvent {
        &self.on_enter
    }

    pub fn on_leave(&self) -> &ViewerEvent {
        &self.on_leave
    }

    pub fn on_click(&self) -> &ViewerEvent {
        &self.on_click
    }

    /// Click events on parts must not reach enclosing handlers.
    pub fn stops_click_propagation(&self) -> bool {
        true
    }

    /// All handlers, in enter, leave, click order.
    pub fn handlers(&self) -> [&ViewerEvent; 3] {
        [&self.on_enter, &self.on_leave, &self.on_click]
    }
}

/// Presentation of one bound part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartPresentation {
    id: Id,
    opacity: f32,
    highlight: Option<Highlight>,
    affordances: Affordances,
}

impl PartPresentation {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn affordances(&self) -> &Affordances {
        &self.affordances
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    transform: ViewTransform,
    parts: Vec<PartPresentation>,
    inert: Vec<Id>,
}

impl Reconciliation {
    /// Transform for the markup root.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Presentations of bound parts, in diagram order.
    pub fn parts(&self) -> &[PartPresentation] {
        &self.parts
    }

    pub fn presentation(&self, id: Id) -> Option<&PartPresentation> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// Parts without a matching markup node.
    pub fn inert(&self) -> &[Id] {
        &self.inert
    }
}

/// Opacity of `part` under the active category filter.
pub fn opacity_for(part: &Part, active_category: Id) -> f32 {
    if active_category == ALL_CATEGORY || part.belongs_to(active_category) {
        FULL_OPACITY
    } else {
        DIMMED_OPACITY
    }
}

/// Highlight of `part` under the active scenario, if any.
pub fn highlight_for(
    part: &Part,
    scenario: Option<&FailureScenario>,
    palette: &HighlightPalette,
) -> Option<Highlight> {
    scenario
        .filter(|scenario| scenario.affects(part.id()))
        .map(|scenario| Highlight::new(scenario.severity(), palette.color_for(scenario.severity())))
}

/// Computes the presentation of every part for the current view state.
pub fn reconcile(
    diagram: &Diagram,
    index: &MarkupIndex,
    state: &ViewState,
    palette: &HighlightPalette,
) -> Reconciliation {
    let scenario = state.active_scenario().and_then(|id| {
        let scenario = diagram.scenario(id);
        if scenario.is_none() {
            debug!(scenario:% = id; "Active scenario is not in the diagram");
        }
        scenario
    });

    if let Some(scenario) = scenario {
        for affected in scenario.affected() {
            if !diagram.contains_part(*affected) {
                debug!(scenario:% = scenario.id(), part:% = affected; "Scenario references unknown part");
            }
        }
    }

    let mut parts = Vec::with_capacity(diagram.part_count());
    let mut inert = Vec::new();

    for part in diagram.parts() {
        if !index.contains(part.id()) {
            inert.push(part.id());
            continue;
        }

        parts.push(PartPresentation {
            id: part.id(),
            opacity: opacity_for(part, state.active_category()),
            highlight: highlight_for(part, scenario, palette),
            affordances: Affordances::for_part(part.id()),
        });
    }

    if !inert.is_empty() {
        debug!(count = inert.len(); "Parts without markup nodes are inert");
    }
    trace!(
        bound = parts.len(),
        category:% = state.active_category(),
        zoom = state.zoom();
        "Reconciled overlay"
    );

    Reconciliation {
        transform: state.transform(),
        parts,
        inert,
    }
}

/// A host-side target that owns the markup nodes.
pub trait MarkupSurface {
    /// Sets the combined transform of the markup root.
    fn set_root_transform(&mut self, transform: ViewTransform);

    /// Applies `presentation` to the markup nodes of one part.
    ///
    /// Must replace whatever was applied to the same part before, so that
    /// repeated application never accumulates handlers or styles.
    fn apply_part(&mut self, nodes: &[MarkupNode], presentation: &PartPresentation);
}

/// Applies `reconciliation` to `surface`.
pub fn apply(reconciliation: &Reconciliation, index: &MarkupIndex, surface: &mut dyn MarkupSurface) {
    surface.set_root_transform(reconciliation.transform());
    for presentation in reconciliation.parts() {
        surface.apply_part(index.lookup(presentation.id()), presentation);
    }
}

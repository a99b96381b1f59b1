//! The viewer: one mounted diagram and its exploration session.
//!
//! [`Viewer`] is the controller of the overlay engine. It owns the immutable
//! [`Diagram`], the markup index built once at mount time, the mutable
//! [`ViewState`] and the [`ToneSynthesizer`]. Hosts forward interaction
//! events through [`Viewer::dispatch`] (or call the operations directly),
//! rebind the overlay with [`Viewer::bind`] when told to, and render the
//! panels from the accessor methods.
//!
//! # Example
//!
//! ```
//! # use baudetail::{Viewer, audio::NullBackend, config::AppConfig, surface::SnapshotSurface};
//! # use baudetail_core::identifier::Id;
//! let payload = serde_json::json!({
//!     "components": { "wallStud": { "name": "Ständer CW 50", "category": ["load-bearing"] } },
//!     "svgContent": "<svg viewBox=\"0 0 500 400\"><g id=\"wallStud\"><rect/></g></svg>"
//! });
//!
//! let mut viewer = Viewer::mount(&payload, &AppConfig::default(), Box::new(NullBackend))?;
//! viewer.set_category(Id::new("acoustic"));
//! assert!(viewer.select(Id::new("wallStud")));
//!
//! let mut surface = SnapshotSurface::new();
//! viewer.bind(&mut surface);
//! assert_eq!(surface.opacity(Id::new("wallStud")), Some(0.15));
//! # Ok::<(), baudetail::ViewerError>(())
//! ```

use log::{debug, info};
use serde_json::Value;

use baudetail_core::{
    color::Color,
    diagram::{ALL_CATEGORY, Diagram},
    geometry::{Bounds, Point},
    identifier::Id,
    tone::Cue,
};

use crate::{
    audio::{AudioBackend, ToneSynthesizer},
    binder::{self, HighlightPalette, MarkupSurface, Reconciliation},
    config::AppConfig,
    error::ViewerError,
    event::ViewerEvent,
    markup::MarkupIndex,
    panel::{InfoPanel, LayerAction, LayerPanel, Tooltip},
    surface::SnapshotSurface,
    validate::ContentValidator,
    view::{BUTTON_ZOOM_STEP, ViewState},
};

/// A mounted diagram with its view state and audio feedback.
#[derive(Debug)]
pub struct Viewer {
    diagram: Diagram,
    index: MarkupIndex,
    state: ViewState,
    synth: ToneSynthesizer,
    palette: HighlightPalette,
    background: Option<Color>,
}

impl Viewer {
    /// Creates a viewer for an already validated diagram.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::MalformedDiagram`] if the diagram markup cannot
    /// be indexed, or [`ViewerError::Config`] if a configured color is invalid.
    pub fn new(
        diagram: Diagram,
        config: &AppConfig,
        backend: Box<dyn AudioBackend>,
    ) -> Result<Self, ViewerError> {
        let index = MarkupIndex::parse(diagram.markup()).map_err(|err| {
            ViewerError::malformed(format!("invalid `svgContent`: {err}"), diagram.markup())
        })?;
        let palette = config.style().highlight_palette().map_err(ViewerError::Config)?;
        let background = config.style().background_color().map_err(ViewerError::Config)?;

        info!(
            parts = diagram.part_count(),
            bound_ids = index.id_count();
            "Viewer mounted"
        );

        Ok(Self {
            diagram,
            index,
            state: ViewState::new(config.viewer()),
            synth: ToneSynthesizer::new(backend),
            palette,
            background,
        })
    }

    /// Validates `payload` and mounts the resulting diagram.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::MalformedDiagram`] if the payload is missing
    /// required fields, plus everything [`Viewer::new`] can return.
    pub fn mount(
        payload: &Value,
        config: &AppConfig,
        backend: Box<dyn AudioBackend>,
    ) -> Result<Self, ViewerError> {
        let diagram = ContentValidator::new(config.content()).validate(payload)?;
        Self::new(diagram, config, backend)
    }

    /// Like [`Viewer::mount`], for a payload given as JSON text.
    ///
    /// # Errors
    ///
    /// See [`Viewer::mount`].
    pub fn mount_str(
        payload: &str,
        config: &AppConfig,
        backend: Box<dyn AudioBackend>,
    ) -> Result<Self, ViewerError> {
        let diagram = ContentValidator::new(config.content()).validate_str(payload)?;
        Self::new(diagram, config, backend)
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn index(&self) -> &MarkupIndex {
        &self.index
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn palette(&self) -> &HighlightPalette {
        &self.palette
    }

    /// Configured snapshot background, if any.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    fn cue(&mut self, cue: Cue) {
        if self.state.sound_enabled() {
            self.synth.emit(cue);
        }
    }

    /// Switches the category filter. Unknown categories are ignored.
    ///
    /// Returns true if the overlay must be rebound.
    pub fn set_category(&mut self, category: Id) -> bool {
        if category != ALL_CATEGORY && self.diagram.category(category).is_none() {
            debug!(category:%; "Ignoring unknown category");
            return false;
        }
        self.state.set_category(category)
    }

    /// Toggles a failure scenario; selecting the active one clears it.
    ///
    /// Unknown scenarios are ignored. Returns the scenario active afterwards.
    pub fn set_failure_scenario(&mut self, scenario: Id) -> Option<Id> {
        if self.diagram.scenario(scenario).is_none() {
            debug!(scenario:%; "Ignoring unknown failure scenario");
            return self.state.active_scenario();
        }
        self.state.toggle_scenario(scenario)
    }

    /// Clears the active failure scenario. Returns true if one was active.
    pub fn clear_failure_scenario(&mut self) -> bool {
        self.state.clear_scenario()
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.state.zoom_by(BUTTON_ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.state.zoom_by(-BUTTON_ZOOM_STEP)
    }

    /// Changes the zoom level by `delta`; the result stays within bounds.
    pub fn zoom_by(&mut self, delta: f32) -> f32 {
        self.state.zoom_by(delta)
    }

    /// Applies one wheel notch.
    pub fn wheel(&mut self, delta_y: f32) -> f32 {
        self.state.zoom_by_wheel(delta_y)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.state.pan_by(Point::new(dx, dy));
    }

    pub fn reset_view(&mut self) {
        self.state.reset_view();
    }

    /// Sets the hovered part. Ids that name no part clear the hover.
    ///
    /// The hover cue plays once for every transition onto a different known
    /// part. Returns true if the hovered part changed.
    pub fn hover(&mut self, part: Option<Id>) -> bool {
        let part = part.filter(|id| self.diagram.contains_part(*id));
        let changed = self.state.set_hovered(part);
        if changed && part.is_some() {
            self.cue(Cue::Hover);
        }
        changed
    }

    /// Selects a known part and opens the info panel.
    ///
    /// Unknown ids play the error cue and leave the state untouched.
    pub fn select(&mut self, part: Id) -> bool {
        if !self.diagram.contains_part(part) {
            debug!(part:%; "Cannot select unknown part");
            self.cue(Cue::Error);
            return false;
        }
        self.state.select(part);
        self.cue(Cue::Select);
        true
    }

    /// Selects a part from the layer panel index: click cue, then [`select`](Self::select).
    pub fn select_from_index(&mut self, part: Id) -> bool {
        self.cue(Cue::Click);
        self.select(part)
    }

    /// Clears the selection, leaving zoom, pan and filters as they are.
    pub fn close_info(&mut self) {
        self.state.clear_selection();
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.state.toggle_sound()
    }

    pub fn toggle_layer_panel(&mut self) -> bool {
        self.state.toggle_layer_panel()
    }

    pub fn toggle_info_panel(&mut self) -> bool {
        self.state.toggle_info_panel()
    }

    /// Records the pointer position for the tooltip.
    ///
    /// `position` and `viewport` share one coordinate space; positions
    /// outside the viewport count as leaving it.
    pub fn pointer_move(&mut self, position: Point, viewport: Bounds) {
        if viewport.contains(position) {
            self.state.set_pointer(Some(viewport.to_local(position)));
        } else {
            self.pointer_leave_viewport();
        }
    }

    /// Hides the tooltip and clears the hover.
    pub fn pointer_leave_viewport(&mut self) {
        self.state.set_pointer(None);
        self.hover(None);
    }

    /// Activates a layer panel control. Every control plays the click cue.
    ///
    /// Returns true if the overlay must be rebound.
    pub fn layer_action(&mut self, action: LayerAction) -> bool {
        match action {
            LayerAction::SelectPart(part) => {
                self.select_from_index(part);
                false
            }
            LayerAction::SelectCategory(category) => {
                self.cue(Cue::Click);
                self.set_category(category)
            }
            LayerAction::ToggleScenario(scenario) => {
                self.cue(Cue::Click);
                let before = self.state.active_scenario();
                self.set_failure_scenario(scenario) != before
            }
            LayerAction::ClearScenario => {
                self.cue(Cue::Click);
                self.clear_failure_scenario()
            }
        }
    }

    /// Handles one interaction event.
    ///
    /// Returns true if the overlay inputs changed and [`bind`](Self::bind)
    /// should run again.
    pub fn dispatch(&mut self, event: ViewerEvent) -> bool {
        let zoom = self.state.zoom();
        match event {
            ViewerEvent::PartEnter(part) => {
                self.hover(Some(part));
                false
            }
            ViewerEvent::PartLeave(part) => {
                if self.state.hovered() == Some(part) {
                    self.hover(None);
                }
                false
            }
            ViewerEvent::PartClick(part) => {
                self.select(part);
                false
            }
            ViewerEvent::Wheel { delta_y } => self.wheel(delta_y) != zoom,
            ViewerEvent::PointerMove { position, viewport } => {
                self.pointer_move(position, viewport);
                false
            }
            ViewerEvent::PointerLeaveViewport => {
                self.pointer_leave_viewport();
                false
            }
            ViewerEvent::ZoomIn => self.zoom_in() != zoom,
            ViewerEvent::ZoomOut => self.zoom_out() != zoom,
            ViewerEvent::ResetView => {
                let before = self.state.transform();
                self.reset_view();
                self.state.transform() != before
            }
            ViewerEvent::Pan(offset) => {
                let before = self.state.pan();
                self.pan_by(offset.x(), offset.y());
                self.state.pan() != before
            }
            ViewerEvent::Layer(action) => self.layer_action(action),
            ViewerEvent::CloseInfo => {
                self.close_info();
                false
            }
            ViewerEvent::ToggleSound => {
                self.toggle_sound();
                false
            }
            ViewerEvent::ToggleLayerPanel => {
                self.toggle_layer_panel();
                false
            }
            ViewerEvent::ToggleInfoPanel => {
                self.toggle_info_panel();
                false
            }
        }
    }

    /// Computes the overlay for the current state.
    pub fn reconcile(&self) -> Reconciliation {
        binder::reconcile(&self.diagram, &self.index, &self.state, &self.palette)
    }

    /// Reconciles and applies the overlay to `surface`.
    pub fn bind(&self, surface: &mut dyn MarkupSurface) {
        binder::apply(&self.reconcile(), &self.index, surface);
    }

    /// Renders the bound diagram as a standalone SVG document.
    pub fn snapshot(&self) -> String {
        let mut surface = SnapshotSurface::new();
        self.bind(&mut surface);
        surface.render(&self.diagram, self.background)
    }

    pub fn layer_panel(&self) -> LayerPanel {
        LayerPanel::new(&self.diagram, &self.index, &self.state)
    }

    pub fn info_panel(&self) -> InfoPanel {
        InfoPanel::new(&self.diagram, &self.state, &self.palette)
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        Tooltip::new(&self.diagram, &self.state)
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.synth.release();
    }
}

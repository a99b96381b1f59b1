//! View state of a mounted diagram.
//!
//! [`ViewState`] holds everything that changes while a diagram is explored:
//! zoom, pan, the active category and failure scenario, hover and selection,
//! and the panel/sound flags. It knows nothing about the diagram contents;
//! [`crate::viewer::Viewer`] resolves ids against the diagram before calling in.
//!
//! Hover and selection are independent axes: a part may be hovered while a
//! different part stays selected.

use baudetail_core::{
    diagram::ALL_CATEGORY,
    geometry::{Point, ViewTransform},
    identifier::Id,
};

use crate::config::ViewerConfig;

/// Smallest zoom level.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest zoom level.
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom level after mounting or resetting the view.
pub const DEFAULT_ZOOM: f32 = 1.0;
/// Zoom change per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.1;
/// Zoom change per zoom button press.
pub const BUTTON_ZOOM_STEP: f32 = 0.25;

/// Mutable exploration state of one viewer session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    zoom: f32,
    pan: Point,
    active_category: Id,
    active_scenario: Option<Id>,
    hovered: Option<Id>,
    selected: Option<Id>,
    pointer: Option<Point>,
    sound_enabled: bool,
    layer_panel_visible: bool,
    info_panel_visible: bool,
}

impl ViewState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Point::default(),
            active_category: Id::new(ALL_CATEGORY),
            active_scenario: None,
            hovered: None,
            selected: None,
            pointer: None,
            sound_enabled: config.sound_enabled(),
            layer_panel_visible: config.layer_panel_visible(),
            info_panel_visible: config.info_panel_visible(),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn active_category(&self) -> Id {
        self.active_category
    }

    /// Returns true if no category filter is in effect.
    pub fn shows_all(&self) -> bool {
        self.active_category == ALL_CATEGORY
    }

    pub fn active_scenario(&self) -> Option<Id> {
        self.active_scenario
    }

    pub fn hovered(&self) -> Option<Id> {
        self.hovered
    }

    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    /// Last pointer position relative to the viewer, if the pointer is inside it.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn layer_panel_visible(&self) -> bool {
        self.layer_panel_visible
    }

    pub fn info_panel_visible(&self) -> bool {
        self.info_panel_visible
    }

    /// The transform applied to the markup root.
    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.zoom, self.pan)
    }

    /// Replaces the active category. Returns true if it changed.
    pub fn set_category(&mut self, category: Id) -> bool {
        let changed = self.active_category != category;
        self.active_category = category;
        changed
    }

    /// Activates `scenario`, or clears it if it is already active.
    ///
    /// Returns the scenario that is active afterwards.
    pub fn toggle_scenario(&mut self, scenario: Id) -> Option<Id> {
        self.active_scenario = if self.active_scenario == Some(scenario) {
            None
        } else {
            Some(scenario)
        };
        self.active_scenario
    }

    /// Clears the active scenario. Returns true if one was active.
    pub fn clear_scenario(&mut self) -> bool {
        self.active_scenario.take().is_some()
    }

    /// Changes the zoom level by `delta`, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    ///
    /// Non-finite deltas are ignored. Returns the new zoom level.
    pub fn zoom_by(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    /// Applies one wheel notch: scrolling up (negative delta) zooms in.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) -> f32 {
        if delta_y < 0.0 {
            self.zoom_by(WHEEL_ZOOM_STEP)
        } else if delta_y > 0.0 {
            self.zoom_by(-WHEEL_ZOOM_STEP)
        } else {
            self.zoom
        }
    }

    /// Moves the pan offset. Non-finite offsets are ignored.
    pub fn pan_by(&mut self, offset: Point) {
        if offset.x().is_finite() && offset.y().is_finite() {
            self.pan = self.pan.add_point(offset);
        }
    }

    /// Restores the default zoom and pan.
    pub fn reset_view(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.pan = Point::default();
    }

    /// Sets the hovered part. Returns true if the hovered part changed.
    pub fn set_hovered(&mut self, part: Option<Id>) -> bool {
        let changed = self.hovered != part;
        self.hovered = part;
        changed
    }

    /// Selects a part and opens the info panel.
    pub fn select(&mut self, part: Id) {
        self.selected = Some(part);
        self.info_panel_visible = true;
    }

    /// Clears the selection. Zoom, pan and filters are untouched.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn toggle_layer_panel(&mut self) -> bool {
        self.layer_panel_visible = !self.layer_panel_visible;
        self.layer_panel_visible
    }

    pub fn toggle_info_panel(&mut self) -> bool {
        self.info_panel_visible = !self.info_panel_visible;
        self.info_panel_visible
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

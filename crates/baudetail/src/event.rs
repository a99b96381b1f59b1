//! Interaction events a host forwards to the [`Viewer`](crate::viewer::Viewer).

use baudetail_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::panel::LayerAction;

/// A user interaction with the viewer.
///
/// Part events are produced by the handlers the overlay binder attaches to
/// bound markup nodes; the rest come from the viewer chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Pointer entered a bound part.
    PartEnter(Id),
    /// Pointer left a bound part.
    PartLeave(Id),
    /// A bound part was clicked. The click does not propagate further.
    PartClick(Id),
    /// Wheel scrolled over the viewport; negative `delta_y` is "up".
    Wheel { delta_y: f32 },
    /// Pointer moved, in the same coordinate space as `viewport`.
    PointerMove { position: Point, viewport: Bounds },
    PointerLeaveViewport,
    ZoomIn,
    ZoomOut,
    ResetView,
    /// Drag-to-pan by the given offset.
    Pan(Point),
    /// A control in the layer panel was activated.
    Layer(LayerAction),
    CloseInfo,
    ToggleSound,
    ToggleLayerPanel,
    ToggleInfoPanel,
}

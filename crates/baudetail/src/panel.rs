//! Panels rendered alongside the diagram.
//!
//! Every panel is a plain view model computed from the diagram and the
//! current view state. None of them hold state of their own; hosts rebuild
//! them after each event. The [`Display`](std::fmt::Display) impls give a
//! compact text rendering.

mod error;
mod info;
mod layer;
mod tooltip;

pub use error::ErrorPanel;
pub use info::{InfoPanel, InfoSection, PartRecord};
pub use layer::{CategoryRow, LayerAction, LayerPanel, PartRow, ScenarioRow};
pub use tooltip::Tooltip;

use std::fmt;

use baudetail_core::{diagram::Diagram, geometry::Point, identifier::Id};

use crate::view::ViewState;

/// Floating label shown next to the pointer while a part is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    id: Id,
    name: String,
    din: String,
    position: Point,
}

impl Tooltip {
    /// Returns the tooltip for the hovered part, or `None` when nothing is
    /// hovered or the pointer is outside the viewer.
    pub fn new(diagram: &Diagram, state: &ViewState) -> Option<Self> {
        let part = state.hovered().and_then(|id| diagram.part(id))?;
        let position = state.pointer()?;
        Some(Self {
            id: part.id(),
            name: part.name().to_string(),
            din: part.din().to_string(),
            position,
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn din(&self) -> &str {
        &self.din
    }

    /// Position relative to the top-left corner of the viewer.
    pub fn position(&self) -> Point {
        self.position
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.din.is_empty() {
            write!(f, " ({})", self.din)?;
        }
        write!(f, " @ {},{}", self.position.x(), self.position.y())
    }
}

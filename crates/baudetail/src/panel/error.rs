use std::fmt;

use crate::error::ViewerError;

/// Shown instead of the diagram when the payload is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    reason: String,
    payload: String,
}

impl ErrorPanel {
    /// Builds the panel for a [`ViewerError::MalformedDiagram`]; other errors
    /// are not meant for the user and yield `None`.
    pub fn from_error(err: &ViewerError) -> Option<Self> {
        match err {
            ViewerError::MalformedDiagram { reason, payload } => Some(Self {
                reason: reason.clone(),
                payload: payload.clone(),
            }),
            _ => None,
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The raw payload, for inspection.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The diagram could not be displayed: {}", self.reason)?;
        writeln!(f)?;
        writeln!(f, "Raw data:")?;
        for line in self.payload.lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_malformed_diagrams_are_shown() {
        let err = ViewerError::malformed("missing required field `svgContent`", "{\n  \"components\": {}\n}");
        let panel = ErrorPanel::from_error(&err).unwrap();
        assert_eq!(panel.reason(), "missing required field `svgContent`");
        assert!(panel.to_string().contains("  \"components\": {}"));

        assert!(ErrorPanel::from_error(&ViewerError::Config("bad".into())).is_none());
    }
}

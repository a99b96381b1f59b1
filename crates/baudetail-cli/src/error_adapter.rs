//! Error adapter for converting ViewerError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. A malformed
//! diagram is reported together with its raw payload as the source snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use baudetail::ViewerError;

/// Adapter implementing [`MietteDiagnostic`] for a [`ViewerError`].
pub struct ErrorAdapter<'a>(pub &'a ViewerError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            ViewerError::MalformedDiagram { .. } => "baudetail::malformed_diagram",
            ViewerError::Config(_) => "baudetail::config",
            ViewerError::Io(_) => "baudetail::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            ViewerError::MalformedDiagram { .. } => Some(Box::new(
                "a diagram payload needs a `components` object and an `svgContent` string",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            ViewerError::MalformedDiagram { payload, .. } if !payload.is_empty() => {
                Some(payload as &dyn miette::SourceCode)
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ViewerError::MalformedDiagram { payload, .. } = self.0 else {
            return None;
        };
        if payload.is_empty() {
            return None;
        }
        let span = SourceSpan::from((0, payload.len()));
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("raw payload".to_string()),
            span,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_diagram_shows_payload() {
        let err = ViewerError::malformed("missing required field `svgContent`", "{\"components\":{}}");
        let adapter = ErrorAdapter(&err);

        assert_eq!(
            adapter.code().unwrap().to_string(),
            "baudetail::malformed_diagram"
        );
        assert!(adapter.help().is_some());
        assert!(adapter.source_code().is_some());
        assert_eq!(adapter.labels().unwrap().count(), 1);

        let mut rendered = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut rendered, &adapter)
            .unwrap();
        assert!(rendered.contains("svgContent"));
    }

    #[test]
    fn test_config_error_has_no_source() {
        let err = ViewerError::Config("bad color".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "baudetail::config");
        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
    }
}

//! Snapshot surface: renders a bound diagram as a standalone SVG document.
//!
//! The original markup is embedded verbatim inside a transformed group. Part
//! presentation is expressed as an additive stylesheet with one rule set per
//! part id, so the markup is never touched.

use std::{collections::BTreeMap, fmt::Write};

use svg::{
    Document,
    node::{Blob, element as svg_element},
};

use baudetail_core::{color::Color, diagram::Diagram, geometry::ViewTransform, identifier::Id};

use crate::{
    binder::{Highlight, MarkupSurface, PartPresentation},
    event::ViewerEvent,
    markup::MarkupNode,
};

/// Drawable element names that receive a highlight outline.
const OUTLINE_SELECTORS: [&str; 8] = [
    "rect", "path", "line", "polyline", "polygon", "circle", "ellipse", "text",
];

#[derive(Debug, Clone, PartialEq)]
struct AppliedPart {
    opacity: f32,
    cursor: &'static str,
    transition: &'static str,
    highlight: Option<Highlight>,
    outline_self: bool,
    outline_children: bool,
    handlers: Vec<ViewerEvent>,
}

/// An in-memory [`MarkupSurface`] that can be rendered to SVG.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSurface {
    transform: ViewTransform,
    parts: BTreeMap<String, AppliedPart>,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform currently set on the markup root.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Number of parts with applied presentation.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn opacity(&self, id: Id) -> Option<f32> {
        self.parts.get(&id.as_string()).map(|part| part.opacity)
    }

    pub fn highlight(&self, id: Id) -> Option<&Highlight> {
        self.parts
            .get(&id.as_string())
            .and_then(|part| part.highlight.as_ref())
    }

    /// Handlers registered on a part's nodes.
    pub fn handlers(&self, id: Id) -> &[ViewerEvent] {
        self.parts
            .get(&id.as_string())
            .map(|part| part.handlers.as_slice())
            .unwrap_or_default()
    }

    /// Builds the additive stylesheet for all applied parts.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for (id, part) in &self.parts {
            let selector = format!("#{}", css_escape(id));
            // Writing to a String cannot fail.
            let _ = writeln!(
                css,
                "{selector} {{ opacity: {}; cursor: {}; transition: {}; }}",
                part.opacity, part.cursor, part.transition
            );

            let Some(highlight) = part.highlight else {
                continue;
            };
            let mut targets = Vec::new();
            if part.outline_self {
                targets.push(selector.clone());
            }
            if part.outline_children {
                targets.extend(
                    OUTLINE_SELECTORS
                        .iter()
                        .map(|tag| format!("{selector} {tag}")),
                );
            }
            if targets.is_empty() {
                continue;
            }
            let color = highlight.color().to_hex();
            let _ = writeln!(
                css,
                "{} {{ stroke: {color}; stroke-width: {}; filter: drop-shadow(0 0 {}px {color}); }}",
                targets.join(", "),
                highlight.stroke_width(),
                highlight.glow_radius()
            );
        }
        css
    }

    /// Renders the diagram with the applied presentation as an SVG document.
    pub fn render(&self, diagram: &Diagram, background: Option<Color>) -> String {
        let size = diagram.size();
        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", size.width(), size.height()),
            )
            .set("width", size.width())
            .set("height", size.height());

        if let Some(background) = background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", background),
            );
        }

        doc = doc.add(svg_element::Style::new(self.stylesheet()));

        let root = svg_element::Group::new()
            .set("transform", self.transform.to_svg_value())
            .add(Blob::new(strip_prolog(diagram.markup())));

        doc.add(root).to_string()
    }
}

impl MarkupSurface for SnapshotSurface {
    fn set_root_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    fn apply_part(&mut self, nodes: &[MarkupNode], presentation: &PartPresentation) {
        let affordances = presentation.affordances();
        let applied = AppliedPart {
            opacity: presentation.opacity(),
            cursor: affordances.cursor(),
            transition: affordances.transition(),
            highlight: presentation.highlight().copied(),
            outline_self: nodes.iter().any(MarkupNode::is_drawable),
            outline_children: nodes.iter().any(|node| node.drawable_descendants() > 0),
            handlers: affordances.handlers().into_iter().cloned().collect(),
        };
        self.parts.insert(presentation.id().as_string(), applied);
    }
}

/// Drops an XML declaration or doctype so the markup can be nested.
fn strip_prolog(markup: &str) -> &str {
    let mut rest = markup.trim_start();
    while rest.starts_with("<?") || rest.starts_with("<!DOCTYPE") {
        match rest.find('>') {
            Some(end) => rest = rest[end + 1..].trim_start(),
            None => break,
        }
    }
    rest
}

/// Escapes an id for use in a CSS `#id` selector.
fn css_escape(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for (position, ch) in id.chars().enumerate() {
        let plain = ch.is_ascii_alphabetic()
            || ch == '_'
            || ch == '-'
            || !ch.is_ascii()
            || (ch.is_ascii_digit() && position > 0);
        if plain {
            escaped.push(ch);
        } else {
            let _ = write!(escaped, "\\{:x} ", ch as u32);
        }
    }
    escaped
}

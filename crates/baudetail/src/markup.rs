//! Raw diagram markup: sanitizing and node indexing.
//!
//! The markup arrives from a generation service and is embedded verbatim by
//! the host, so it is an untrusted-content boundary. [`sanitize`] strips
//! active content before a diagram is built, and [`MarkupIndex`] records every
//! `id`-bearing element once so the overlay binder can look parts up directly
//! on each reconciliation pass instead of walking the tree.

use std::{borrow::Cow, collections::HashMap, sync::LazyLock};

use log::{debug, trace};
use regex::{Captures, Regex};
use svg::{node::element::tag::Type, parser::Event};
use thiserror::Error;

use baudetail_core::identifier::Id;

/// Element names that produce visible geometry and can carry an outline.
const DRAWABLE_TAGS: [&str; 8] = [
    "rect", "path", "line", "polyline", "polygon", "circle", "ellipse", "text",
];

/// Markup parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("markup is empty")]
    Empty,

    #[error("markup could not be parsed: {0}")]
    Syntax(String),

    #[error("markup has no <svg> root element")]
    MissingRoot,

    #[error("closing tag </{found}> does not match open <{expected}>")]
    Mismatched { expected: String, found: String },

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));
static SCRIPT_EMPTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b[^>]*/>").expect("valid regex"));
static FOREIGN_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<foreignObject\b.*?</foreignObject\s*>").expect("valid regex")
});
static FOREIGN_EMPTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<foreignObject\b[^>]*/>").expect("valid regex"));
/// A start tag; quoted attribute values may contain `>`.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<([A-Za-z][\w:.-]*)((?:\s+[^\s"'=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)(\s*/?)>"#,
    )
    .expect("valid regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([^\s"'=/>]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#).expect("valid regex")
});
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<style\b[^>]*>)(.*?)(</style\s*>)").expect("valid regex")
});
static CHAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);").expect("valid regex")
});
static SCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(javascript|vbscript)\s*:").expect("valid regex"));
static CSS_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expression\s*\(").expect("valid regex"));

/// Removes active content from markup.
///
/// Strips `<script>` and `<foreignObject>` elements, and from every start tag
/// the `on*` event-handler attributes plus any attribute whose value (after
/// character references are decoded) is a `javascript:`/`vbscript:` URL, a
/// `data:` link or a CSS `expression(`. Stylesheets lose script URLs and
/// expressions. Text content is never touched, and markup without any of
/// these is returned borrowed and unchanged.
///
/// ```
/// use baudetail::markup::sanitize;
///
/// let clean = sanitize(r#"<svg><g id="stud" onclick="steal()"><rect/></g></svg>"#);
/// assert_eq!(clean, r#"<svg><g id="stud"><rect/></g></svg>"#);
/// ```
pub fn sanitize(markup: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(markup);
    for pattern in [&*SCRIPT_EMPTY, &*SCRIPT_BLOCK, &*FOREIGN_EMPTY, &*FOREIGN_BLOCK] {
        rewrite(&mut result, pattern, |_| Some(String::new()));
    }
    rewrite(&mut result, &START_TAG, |caps| {
        let Cow::Owned(attributes) = clean_attributes(&caps[2]) else {
            return None;
        };
        Some(format!("<{}{attributes}{}>", &caps[1], &caps[3]))
    });
    rewrite(&mut result, &STYLE_BLOCK, |caps| {
        let css = SCRIPT_URL.replace_all(&caps[2], "");
        let css = CSS_EXPRESSION.replace_all(&css, "").into_owned();
        (css != caps[2]).then(|| format!("{}{css}{}", &caps[1], &caps[3]))
    });

    if let Cow::Owned(ref cleaned) = result {
        debug!(removed_bytes = markup.len() - cleaned.len(); "Sanitized diagram markup");
    }
    result
}

/// Replaces each match of `pattern` for which `replace` returns a rewrite.
///
/// `result` stays borrowed while nothing is rewritten.
fn rewrite(
    result: &mut Cow<'_, str>,
    pattern: &Regex,
    mut replace: impl FnMut(&Captures<'_>) -> Option<String>,
) {
    let mut changed = false;
    let replaced = pattern.replace_all(&**result, |caps: &Captures<'_>| {
        replace(caps).inspect(|_| changed = true).unwrap_or_else(|| caps[0].to_string())
    });
    let replaced = changed.then(|| replaced.into_owned());
    if let Some(replaced) = replaced {
        *result = Cow::Owned(replaced);
    }
}

/// Drops active attributes from a start tag's attribute list.
fn clean_attributes(attributes: &str) -> Cow<'_, str> {
    let mut cleaned = Cow::Borrowed(attributes);
    rewrite(&mut cleaned, &ATTRIBUTE, |caps| {
        let value = caps.get(2).map_or("", |value| unquote(value.as_str()));
        if !is_active_attribute(&caps[1], value) {
            return None;
        }
        trace!(attribute = &caps[1]; "Dropping active attribute");
        Some(String::new())
    });
    cleaned
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|value| value.strip_suffix('\'')))
        .unwrap_or(value)
}

fn is_active_attribute(name: &str, value: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if name.starts_with("on") {
        return true;
    }
    let value: String = decode_char_references(value)
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    let is_link = name == "href" || name == "src" || name.ends_with(":href");
    value.starts_with("javascript:")
        || value.starts_with("vbscript:")
        || (is_link && value.starts_with("data:"))
        || value.contains("expression(")
}

/// Decodes numeric character references and the named ones used to hide URL schemes.
fn decode_char_references(value: &str) -> Cow<'_, str> {
    CHAR_REFERENCE.replace_all(value, |caps: &Captures<'_>| {
        let code = if let Some(hex) = caps.get(1) {
            u32::from_str_radix(hex.as_str(), 16).ok()
        } else if let Some(decimal) = caps.get(2) {
            decimal.as_str().parse().ok()
        } else {
            match caps[3].to_ascii_lowercase().as_str() {
                "colon" => Some(u32::from(':')),
                "tab" => Some(u32::from('\t')),
                _ => Some(u32::from('\n')),
            }
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    })
}

/// An `id`-bearing element found in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    tag: String,
    ordinal: usize,
    drawable: bool,
    drawable_descendants: usize,
}

impl MarkupNode {
    /// Element name, e.g. `g` or `rect`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Position of the element in document order, counting elements only.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns true if the element itself draws geometry.
    pub fn is_drawable(&self) -> bool {
        self.drawable
    }

    /// Number of drawable elements nested inside this element.
    pub fn drawable_descendants(&self) -> usize {
        self.drawable_descendants
    }

    /// Returns true if a highlight outline has anything to land on.
    pub fn can_outline(&self) -> bool {
        self.drawable || self.drawable_descendants > 0
    }
}

/// Index from `id` attribute to the elements carrying it.
///
/// Ids are expected to be unique, but generated markup sometimes repeats
/// them; every match is kept so all of them receive the presentation.
#[derive(Debug, Clone, Default)]
pub struct MarkupIndex {
    nodes: HashMap<Id, Vec<MarkupNode>>,
    element_count: usize,
}

impl MarkupIndex {
    /// Parses markup and indexes its `id`-bearing elements.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] if the markup is empty, is not well formed, or
    /// does not have an `<svg>` root element.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        if markup.trim().is_empty() {
            return Err(MarkupError::Empty);
        }

        let parser = svg::read(markup).map_err(|err| MarkupError::Syntax(err.to_string()))?;

        let mut index = Self::default();
        // Open elements: (tag, index into `flat` for id-bearing elements).
        let mut open: Vec<(String, Option<usize>)> = Vec::new();
        let mut flat: Vec<(Id, MarkupNode)> = Vec::new();
        let mut seen_root = false;

        for event in parser {
            match event {
                Event::Error(err) => return Err(MarkupError::Syntax(err.to_string())),
                Event::Tag(tag, kind, attributes) => {
                    if matches!(kind, Type::End) {
                        match open.pop() {
                            Some((expected, _)) if expected == tag => {}
                            Some((expected, _)) => {
                                return Err(MarkupError::Mismatched {
                                    expected,
                                    found: tag.to_string(),
                                });
                            }
                            None => {
                                return Err(MarkupError::Mismatched {
                                    expected: String::new(),
                                    found: tag.to_string(),
                                });
                            }
                        }
                        continue;
                    }

                    if !seen_root {
                        if tag != "svg" {
                            return Err(MarkupError::MissingRoot);
                        }
                        seen_root = true;
                    }

                    let ordinal = index.element_count;
                    index.element_count += 1;

                    let drawable = DRAWABLE_TAGS.contains(&tag);
                    if drawable {
                        for slot in open.iter().filter_map(|(_, slot)| *slot) {
                            flat[slot].1.drawable_descendants += 1;
                        }
                    }

                    let slot = attributes.get("id").map(|value| {
                        let id = Id::new(value.to_string().trim());
                        flat.push((
                            id,
                            MarkupNode {
                                tag: tag.to_string(),
                                ordinal,
                                drawable,
                                drawable_descendants: 0,
                            },
                        ));
                        flat.len() - 1
                    });

                    if matches!(kind, Type::Start) {
                        open.push((tag.to_string(), slot));
                    }
                }
                _ => {}
            }
        }

        if let Some((tag, _)) = open.pop() {
            return Err(MarkupError::Unclosed(tag));
        }
        if !seen_root {
            return Err(MarkupError::MissingRoot);
        }

        for (id, node) in flat {
            index.nodes.entry(id).or_default().push(node);
        }

        trace!(
            elements = index.element_count,
            ids = index.nodes.len();
            "Indexed diagram markup"
        );
        Ok(index)
    }

    /// Returns the elements whose `id` equals `id`, or an empty slice.
    pub fn lookup(&self, id: Id) -> &[MarkupNode] {
        self.nodes.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of distinct ids in the markup.
    pub fn id_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the markup.
    pub fn element_count(&self) -> usize {
        self.element_count
    }
}

//! Content validation: turns an untyped payload into a [`Diagram`].
//!
//! The validator accepts either the bare diagram data object or the full
//! generation envelope (`{ title, type, summary, bullet_points, data }`), and
//! either a parsed JSON value or its text. It rejects the payload only when
//! `components` or `svgContent` is missing or unusable; everything else is
//! back-filled with defaults.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde_json::Value;

use baudetail_core::{
    color::Color,
    diagram::{
        Category, Diagram, DiagramMetadata, FailureMode, FailureScenario, Material, Part, Rating,
        Severity,
    },
    geometry::Size,
    identifier::Id,
};

use crate::{
    config::ContentConfig,
    error::ViewerError,
    markup::{self, MarkupIndex},
    payload::{
        RawCategory, RawDiagram, RawDimensions, RawEnvelope, RawPart, RawRating, RawScenario,
        non_empty,
    },
};

/// Nominal drawing width used when the payload has no usable dimensions.
pub const DEFAULT_WIDTH: f32 = 500.0;
/// Nominal drawing height used when the payload has no usable dimensions.
pub const DEFAULT_HEIGHT: f32 = 400.0;

/// Validates payloads into diagrams.
///
/// # Examples
///
/// ```
/// use baudetail::{config::ContentConfig, validate::ContentValidator};
///
/// let validator = ContentValidator::new(&ContentConfig::default());
/// let diagram = validator
///     .validate_str(r#"{
///         "components": { "stud": { "name": "Ständer", "category": ["load-bearing"] } },
///         "svgContent": "<svg><g id=\"stud\"><rect/></g></svg>"
///     }"#)
///     .unwrap();
///
/// assert_eq!(diagram.part_count(), 1);
/// assert_eq!(diagram.categories().len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContentValidator {
    config: ContentConfig,
}

impl ContentValidator {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Validates a payload given as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::MalformedDiagram`] if the text is not JSON or
    /// the payload fails [`ContentValidator::validate`].
    pub fn validate_str(&self, payload: &str) -> Result<Diagram, ViewerError> {
        let value: Value = serde_json::from_str(payload).map_err(|err| {
            ViewerError::malformed(format!("payload is not valid JSON: {err}"), payload)
        })?;
        self.validate(&value)
    }

    /// Validates an untyped payload.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::MalformedDiagram`] if `components` is missing or
    /// not an object, or if `svgContent` is missing, empty or not SVG.
    pub fn validate(&self, payload: &Value) -> Result<Diagram, ViewerError> {
        // Stored artifacts keep the data as a JSON string.
        if let Value::String(text) = payload {
            return self.validate_str(text);
        }

        let malformed = |reason: String| ViewerError::malformed(reason, pretty(payload));

        let Value::Object(object) = payload else {
            return Err(malformed("payload is not a JSON object".to_string()));
        };

        let (data, metadata) = match object.get("data") {
            Some(data @ Value::Object(_)) if !object.contains_key("components") => {
                let envelope: RawEnvelope = serde_json::from_value(payload.clone())
                    .map_err(|err| malformed(format!("invalid envelope: {err}")))?;
                let metadata = DiagramMetadata::new(
                    non_empty(envelope.title),
                    non_empty(envelope.summary),
                    envelope.bullet_points.into_vec(),
                );
                (data, metadata)
            }
            _ => (payload, DiagramMetadata::default()),
        };

        for field in ["components", "svgContent"] {
            if data.get(field).is_none_or(Value::is_null) {
                return Err(malformed(format!("missing required field `{field}`")));
            }
        }

        let raw: RawDiagram = serde_json::from_value(data.clone())
            .map_err(|err| malformed(format!("unparsable diagram data: {err}")))?;

        let markup = if self.config.sanitize_markup() {
            markup::sanitize(&raw.svg_content).into_owned()
        } else {
            raw.svg_content
        };
        MarkupIndex::parse(&markup)
            .map_err(|err| malformed(format!("invalid `svgContent`: {err}")))?;

        let parts: Vec<Part> = raw
            .components
            .into_iter()
            .map(|(id, part)| convert_part(&id, part))
            .collect();
        let mut categories = convert_categories(raw.layer_categories);
        if categories.is_empty() {
            debug!("No usable layer categories supplied, using defaults");
            categories = Category::defaults();
        }
        let scenarios = convert_scenarios(raw.failure_scenarios);
        let size = convert_size(raw.dimensions);

        let diagram =
            Diagram::new(parts, categories, scenarios, markup, size).with_metadata(metadata);

        info!(
            parts = diagram.part_count(),
            categories = diagram.categories().len(),
            scenarios = diagram.scenarios().len();
            "Diagram validated"
        );
        Ok(diagram)
    }
}

fn pretty(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

fn parse_severity(value: Option<String>, context: &str) -> Severity {
    let Some(value) = value else {
        return Severity::Medium;
    };
    value.parse().unwrap_or_else(|err: String| {
        warn!(context, err:%; "Unknown severity, using medium");
        Severity::Medium
    })
}

fn convert_rating(rating: Option<RawRating>) -> Rating {
    rating
        .map(|rating| Rating::new(non_empty(rating.rating), non_empty(rating.notes)))
        .unwrap_or_default()
}

fn convert_part(id: &str, raw: RawPart) -> Part {
    let part_id = Id::new(id.trim());
    let name = non_empty(raw.name).unwrap_or_else(|| id.trim().to_string());

    let material = raw
        .material
        .map(|material| {
            Material::new(
                non_empty(material.description),
                non_empty(material.composition),
                non_empty(material.dimensions),
            )
        })
        .unwrap_or_default();

    let failure_modes = raw
        .failure_modes
        .into_iter()
        .map(|mode| {
            FailureMode::new(
                non_empty(mode.kind).unwrap_or_default(),
                parse_severity(mode.severity, id),
                non_empty(mode.description),
            )
        })
        .collect();

    Part::new(part_id, name)
        .with_short_name(non_empty(raw.short_name).unwrap_or_default())
        .with_din(non_empty(raw.din).unwrap_or_default())
        .with_categories(raw.category.into_vec().iter().map(|c| Id::new(c)))
        .with_material(material)
        .with_function(non_empty(raw.function))
        .with_failure_modes(failure_modes)
        .with_installation(raw.installation.into_vec())
        .with_cross_trade(non_empty(raw.cross_trade))
        .with_acoustic(convert_rating(raw.acoustic))
        .with_fire(convert_rating(raw.fire))
}

fn convert_categories(raw: Vec<RawCategory>) -> Vec<Category> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|category| {
            let id = Id::new(category.id.trim());
            if !seen.insert(id) {
                warn!(category = category.id; "Duplicate category dropped");
                return None;
            }
            let color = category
                .color
                .as_deref()
                .map(Color::new)
                .transpose()
                .unwrap_or_else(|err| {
                    warn!(category = category.id, err:%; "Unusable category color");
                    None
                })
                .unwrap_or_else(Color::neutral);
            let name = non_empty(category.name).unwrap_or_else(|| category.id.clone());
            Some(Category::new(
                id,
                name,
                color,
                non_empty(category.description).unwrap_or_default(),
            ))
        })
        .collect()
}

fn convert_scenarios(raw: Vec<RawScenario>) -> Vec<FailureScenario> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|scenario| {
            let id = Id::new(scenario.id.trim());
            if !seen.insert(id) {
                warn!(scenario = scenario.id; "Duplicate failure scenario dropped");
                return None;
            }
            let severity = parse_severity(scenario.severity, &scenario.id);
            let name = non_empty(scenario.name).unwrap_or_else(|| scenario.id.clone());
            Some(
                FailureScenario::new(id, name, severity)
                    .with_description(non_empty(scenario.description).unwrap_or_default())
                    .with_affected(
                        scenario
                            .affected_components
                            .into_vec()
                            .iter()
                            .map(|part| Id::new(part)),
                    )
                    .with_indicator(non_empty(scenario.indicator).unwrap_or_default()),
            )
        })
        .collect()
}

fn convert_size(raw: Option<RawDimensions>) -> Size {
    let raw = raw.unwrap_or_default();
    let size = Size::new(
        raw.width.unwrap_or(f64::from(DEFAULT_WIDTH)) as f32,
        raw.height.unwrap_or(f64::from(DEFAULT_HEIGHT)) as f32,
    );
    if size.is_degenerate() || !size.width().is_finite() || !size.height().is_finite() {
        warn!(width:? = raw.width, height:? = raw.height; "Unusable dimensions, using nominal size");
        return Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    }
    size
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const MARKUP: &str = r#"<svg viewBox="0 0 500 400"><g id="wallStud"><rect/></g><g id="insulation"><path d="M0 0"/></g></svg>"#;

    fn validator() -> ContentValidator {
        ContentValidator::default()
    }

    fn reason(err: ViewerError) -> String {
        match err {
            ViewerError::MalformedDiagram { reason, .. } => reason,
            other => panic!("expected MalformedDiagram, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_svg_content_is_malformed() {
        let payload = json!({ "components": { "wallStud": { "name": "Ständer" } } });
        let err = validator().validate(&payload).unwrap_err();
        assert!(err.payload().unwrap().contains("wallStud"));
        assert!(reason(err).contains("svgContent"));
    }

    #[test]
    fn test_missing_components_is_malformed() {
        let payload = json!({ "svgContent": MARKUP });
        assert!(reason(validator().validate(&payload).unwrap_err()).contains("components"));

        let payload = json!({ "components": null, "svgContent": MARKUP });
        assert!(reason(validator().validate(&payload).unwrap_err()).contains("components"));
    }

    #[test]
    fn test_unparsable_fields_are_malformed() {
        let payload = json!({ "components": ["wallStud"], "svgContent": MARKUP });
        assert!(reason(validator().validate(&payload).unwrap_err()).contains("unparsable"));

        let payload = json!({ "components": {}, "svgContent": "<div>not svg</div>" });
        assert!(reason(validator().validate(&payload).unwrap_err()).contains("svgContent"));

        let err = validator().validate_str("{ not json").unwrap_err();
        assert_eq!(err.payload(), Some("{ not json"));

        assert!(validator().validate(&json!(42)).is_err());
    }

    #[test]
    fn test_defaults_are_back_filled() {
        let payload = json!({ "components": {}, "svgContent": MARKUP });
        let diagram = validator().validate(&payload).unwrap();

        let ids: Vec<String> = diagram
            .categories()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(
            ids,
            [
                "all",
                "load-bearing",
                "finishing",
                "acoustic",
                "fire-protection",
                "moisture"
            ]
        );
        assert!(diagram.scenarios().is_empty());
        assert_eq!(diagram.size(), Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(diagram.metadata(), &DiagramMetadata::default());
    }

    #[test]
    fn test_full_part_conversion() {
        let payload = json!({
            "components": {
                "wallStud": {
                    "name": "Ständerprofil",
                    "shortName": "CW 50",
                    "din": "DIN 18182",
                    "category": ["load-bearing", "load-bearing"],
                    "material": { "description": "Stahlblech", "composition": "", "dimensions": "50 x 0,6 mm" },
                    "function": "Trägt die Beplankung",
                    "failureModes": [
                        { "type": "Verformung", "severity": "HIGH", "description": "Zu große Achsabstände" },
                        { "type": "Korrosion", "severity": "catastrophic" }
                    ],
                    "installation": ["Achsabstand 625 mm", "Anschluss mit Dichtband"],
                    "crossTrade": "Elektro: Durchbrüche vorab abstimmen",
                    "acoustic": { "rating": "Rw 42 dB" },
                    "fire": { "rating": "", "notes": "" }
                }
            },
            "svgContent": MARKUP,
            "dimensions": { "width": 640, "height": 480 }
        });
        let diagram = validator().validate(&payload).unwrap();
        let part = diagram.part(Id::new("wallStud")).unwrap();

        assert_eq!(part.name(), "Ständerprofil");
        assert_eq!(part.short_name(), "CW 50");
        assert_eq!(part.din(), "DIN 18182");
        assert_eq!(part.categories(), [Id::new("load-bearing")]);
        assert_eq!(part.material().description(), Some("Stahlblech"));
        assert_eq!(part.material().composition(), None);
        assert_eq!(part.failure_modes()[0].severity(), Severity::High);
        assert_eq!(part.failure_modes()[1].severity(), Severity::Medium);
        assert_eq!(part.installation().len(), 2);
        assert!(part.cross_trade().is_some());
        assert_eq!(part.acoustic().value(), Some("Rw 42 dB"));
        assert!(part.fire().is_empty());
        assert_eq!(diagram.size(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_categories_and_scenarios() {
        let payload = json!({
            "components": { "vaporBarrier": { "name": "Dampfbremse", "category": "moisture" } },
            "layerCategories": [
                { "id": "all", "name": "Alle", "color": "#6B7280" },
                { "id": "moisture", "name": "Feuchte", "color": "definitely-not-a-color" },
                { "id": "moisture", "name": "Duplicate" }
            ],
            "failureScenarios": [
                {
                    "id": "moisture-ingress",
                    "name": "Feuchteeintrag",
                    "description": "Tauwasser in der Dämmebene",
                    "affectedComponents": ["vaporBarrier", "ghost"],
                    "severity": "high",
                    "indicator": "Stockflecken an der Beplankung"
                }
            ],
            "svgContent": MARKUP,
            "dimensions": { "width": 0, "height": 480 }
        });
        let diagram = validator().validate(&payload).unwrap();

        assert_eq!(diagram.categories().len(), 2);
        assert_eq!(diagram.categories()[1].color(), Color::neutral());
        assert_eq!(
            diagram.part(Id::new("vaporBarrier")).unwrap().categories(),
            [Id::new("moisture")]
        );

        let scenario = diagram.scenario(Id::new("moisture-ingress")).unwrap();
        assert_eq!(scenario.severity(), Severity::High);
        assert_eq!(scenario.affected().len(), 2);
        assert_eq!(scenario.indicator(), "Stockflecken an der Beplankung");
        assert_eq!(diagram.size(), Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_malformed_optional_fields_fall_back() {
        let payload = json!({
            "components": {
                "wallStud": { "name": "Ständer", "failureModes": null },
                "board": {
                    "name": "Gipskarton",
                    "failureModes": [{ "type": "Riss", "severity": 3 }, "Abplatzung"]
                }
            },
            "svgContent": MARKUP,
            "layerCategories": [{ "name": "ohne id" }, { "id": "acoustic", "name": "Akustik" }],
            "failureScenarios": [{ "name": "ohne id" }, { "id": "cracking", "severity": "medium" }],
            "dimensions": { "width": "640", "height": "auto" }
        });
        let diagram = validator().validate(&payload).unwrap();

        assert!(diagram.part(Id::new("wallStud")).unwrap().failure_modes().is_empty());
        let board = diagram.part(Id::new("board")).unwrap();
        assert_eq!(board.failure_modes().len(), 1);
        assert_eq!(board.failure_modes()[0].severity(), Severity::Medium);

        assert_eq!(diagram.categories().len(), 1);
        assert_eq!(diagram.categories()[0].id(), Id::new("acoustic"));
        assert_eq!(diagram.scenarios().len(), 1);
        assert_eq!(diagram.size(), Size::new(640.0, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_unusable_category_list_uses_defaults() {
        for categories in [json!({ "id": "acoustic" }), json!([{ "name": "ohne id" }]), json!("acoustic")] {
            let payload = json!({
                "components": {},
                "svgContent": MARKUP,
                "layerCategories": categories,
                "failureScenarios": "none",
                "dimensions": [500, 400]
            });
            let diagram = validator().validate(&payload).unwrap();
            assert_eq!(diagram.categories().len(), 6);
            assert!(diagram.scenarios().is_empty());
            assert_eq!(diagram.size(), Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        }
    }

    #[test]
    fn test_non_finite_dimensions_use_nominal_size() {
        let payload = json!({
            "components": {},
            "svgContent": MARKUP,
            "dimensions": { "width": 1e300, "height": 400 }
        });
        let diagram = validator().validate(&payload).unwrap();
        assert_eq!(diagram.size(), Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_label_text_survives_sanitizing() {
        let markup = r#"<svg><g id="wallStud"><rect/></g><text x="1">Wellplatte Ondulin = 3 mm</text></svg>"#;
        let payload = json!({ "components": {}, "svgContent": markup });
        let diagram = validator().validate(&payload).unwrap();
        assert_eq!(diagram.markup(), markup);
    }

    #[test]
    fn test_envelope_and_string_payloads() {
        let data = json!({ "components": {}, "svgContent": MARKUP });
        let envelope = json!({
            "title": "Trockenbauwand W112",
            "type": "interactive",
            "summary": "Metallständerwand mit doppelter Beplankung.",
            "bullet_points": "Einzelpunkt",
            "data": data.clone()
        });
        let diagram = validator().validate(&envelope).unwrap();
        assert_eq!(diagram.metadata().title(), Some("Trockenbauwand W112"));
        assert_eq!(diagram.metadata().bullet_points(), ["Einzelpunkt"]);

        let stored = Value::String(data.to_string());
        assert!(validator().validate(&stored).is_ok());
    }

    #[test]
    fn test_markup_is_sanitized_unless_disabled() {
        let dirty = r#"<svg><g id="wallStud" onclick="alert(1)"><rect/></g></svg>"#;
        let payload = json!({ "components": {}, "svgContent": dirty });

        let diagram = validator().validate(&payload).unwrap();
        assert!(!diagram.markup().contains("onclick"));

        let raw = ContentValidator::new(&ContentConfig::new(false));
        let diagram = raw.validate(&payload).unwrap();
        assert_eq!(diagram.markup(), dirty);
    }
}

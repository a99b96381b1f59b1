//! Wire format of the diagram payload produced by the generation service.
//!
//! These types mirror the JSON exactly and are deliberately permissive: the
//! producer is a language model, so optional fields may be absent, empty, of
//! the wrong shape, or given as a single string where a list is expected.
//! Only `components` and `svgContent` are read strictly; a malformed optional
//! field falls back to its default and a malformed list entry is dropped,
//! both with a warning. Turning these types into the strict
//! [`baudetail_core::diagram`] model happens in [`crate::validate`].

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// A list that also accepts a single bare string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub(crate) enum StringList {
    #[default]
    Empty,
    One(String),
    Many(Vec<String>),
}

impl StringList {
    /// Returns the non-blank entries, trimmed.
    pub(crate) fn into_vec(self) -> Vec<String> {
        let items = match self {
            Self::Empty => Vec::new(),
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads an optional field, falling back to its default if it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    let found = kind(&value);
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        warn!(found, err:%; "Ignoring malformed payload field");
        T::default()
    }))
}

/// Reads a list, dropping entries that do not parse.
///
/// A field that is not an array at all reads as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(found = kind(&other); "Expected a list, ignoring payload field");
            return Ok(Vec::new());
        }
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value(entry)
                .inspect_err(|err| warn!(index, err:%; "Dropping malformed list entry"))
                .ok()
        })
        .collect())
}

/// Reads an object whose values must parse individually; bad values are dropped.
///
/// The field itself must be an object.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = IndexMap::<String, Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, entry)| {
            serde_json::from_value(entry)
                .inspect_err(|err| warn!(key, err:%; "Dropping malformed entry"))
                .ok()
                .map(|entry| (key, entry))
        })
        .collect())
}

/// Reads a dimension given as a number or a numeric string.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(number)
}

/// Generation envelope around the diagram data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEnvelope {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub bullet_points: StringList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDiagram {
    #[serde(deserialize_with = "lenient_entries")]
    pub components: IndexMap<String, RawPart>,
    pub svg_content: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub layer_categories: Vec<RawCategory>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub failure_scenarios: Vec<RawScenario>,
    #[serde(default, deserialize_with = "lenient")]
    pub dimensions: Option<RawDimensions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawPart {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub short_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub din: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub category: StringList,
    #[serde(deserialize_with = "lenient")]
    pub material: Option<RawMaterial>,
    #[serde(deserialize_with = "lenient")]
    pub function: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub failure_modes: Vec<RawFailureMode>,
    #[serde(deserialize_with = "lenient")]
    pub installation: StringList,
    #[serde(deserialize_with = "lenient")]
    pub cross_trade: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub acoustic: Option<RawRating>,
    #[serde(deserialize_with = "lenient")]
    pub fire: Option<RawRating>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawMaterial {
    pub description: Option<String>,
    pub composition: Option<String>,
    pub dimensions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRating {
    pub rating: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawFailureMode {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawScenario {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub affected_components: StringList,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub indicator: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDimensions {
    #[serde(deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub height: Option<f64>,
}

/// Treats blank strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_accepts_one_or_many() {
        let one: StringList = serde_json::from_str(r#""acoustic""#).unwrap();
        assert_eq!(one.into_vec(), ["acoustic"]);

        let many: StringList = serde_json::from_str(r#"["a", " ", "b "]"#).unwrap();
        assert_eq!(many.into_vec(), ["a", "b"]);

        assert!(StringList::default().into_vec().is_empty());
    }

    #[test]
    fn test_part_fields_are_optional() {
        let part: RawPart = serde_json::from_str(r#"{ "name": "Gipskarton" }"#).unwrap();
        assert_eq!(part.name.as_deref(), Some("Gipskarton"));
        assert!(part.failure_modes.is_empty());
        assert!(part.category.into_vec().is_empty());
    }

    #[test]
    fn test_wrongly_typed_part_fields_fall_back() {
        let part: RawPart = serde_json::from_value(serde_json::json!({
            "name": 42,
            "material": "Stahl",
            "failureModes": null,
            "installation": ["Achsabstand 625 mm", 3],
        }))
        .unwrap();
        assert_eq!(part.name, None);
        assert!(part.material.is_none());
        assert!(part.failure_modes.is_empty());
        assert!(part.installation.into_vec().is_empty());
    }

    #[test]
    fn test_list_entries_are_dropped_individually() {
        let diagram: RawDiagram = serde_json::from_value(serde_json::json!({
            "components": { "stud": {}, "broken": "not a part" },
            "svgContent": "<svg/>",
            "layerCategories": { "id": "acoustic" },
            "failureScenarios": [{ "name": "no id" }, { "id": "cracking" }],
            "dimensions": { "width": "640", "height": true },
        }))
        .unwrap();
        assert_eq!(diagram.components.keys().collect::<Vec<_>>(), ["stud"]);
        assert!(diagram.layer_categories.is_empty());
        assert_eq!(diagram.failure_scenarios.len(), 1);
        assert_eq!(diagram.failure_scenarios[0].id, "cracking");

        let dimensions = diagram.dimensions.unwrap();
        assert_eq!(dimensions.width, Some(640.0));
        assert_eq!(dimensions.height, None);
    }

    #[test]
    fn test_components_must_be_an_object() {
        let result = serde_json::from_value::<RawDiagram>(serde_json::json!({
            "components": ["stud"],
            "svgContent": "<svg/>",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" F90 ".into())), Some("F90".to_string()));
        assert_eq!(non_empty(None), None);
    }
}

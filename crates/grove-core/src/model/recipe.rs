// ── Recipe document ──

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use tracing::warn;

/// Document id of a recipe (`_id`).
pub type RecipeId = String;

/// A recipe as stored in the document database.
///
/// Only the fields the dashboard reads are typed; everything else (the
/// recipe operations, author metadata, ...) is carried through `extra`
/// untouched so a write never drops data another tool put there. `name`
/// and `description` accept null and scalar values, since other tools write
/// the same database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            name: name.into(),
            description: None,
            extra: Map::new(),
        }
    }

    /// Human label: the name, falling back to the id for unnamed recipes.
    pub fn title(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Parse a recipe from JSON text, minting a v4 UUID `_id` when absent.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut value: Value = serde_json::from_str(text)?;
        if let Value::Object(ref mut fields) = value {
            let has_id = fields
                .get("_id")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.is_empty());
            if !has_id {
                fields.insert(
                    "_id".into(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
            }
        }
        serde_json::from_value(value)
    }
}

/// Decode the documents of a store, skipping any that are not recipes.
pub fn decode_recipes(docs: Vec<Value>) -> Vec<Recipe> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.get("_id").and_then(Value::as_str).unwrap_or("?").to_owned();
            serde_json::from_value(doc)
                .inspect_err(|error| warn!(%id, %error, "skipping unreadable recipe document"))
                .ok()
        })
        .collect()
}

fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    optional_text(d).map(Option::unwrap_or_default)
}

/// Strings as-is, numbers and booleans as their JSON text, null as `None`.
fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        scalar @ (Value::Bool(_) | Value::Number(_)) => Ok(Some(scalar.to_string())),
        Value::Array(_) => Err(de::Error::invalid_type(de::Unexpected::Seq, &"a string")),
        Value::Object(_) => Err(de::Error::invalid_type(de::Unexpected::Map, &"a string")),
    }
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutConfirmation {
    pub id: RecipeId,
    pub rev: String,
}

impl From<grove_api::PutResponse> for PutConfirmation {
    fn from(resp: grove_api::PutResponse) -> Self {
        Self {
            id: resp.id,
            rev: resp.rev,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_round_trip() {
        let raw = json!({
            "_id": "basil",
            "_rev": "2-abc",
            "name": "Basil",
            "operations": [[0, "air_temperature", 24]]
        });
        let recipe: Recipe = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(recipe.extra["operations"], json!([[0, "air_temperature", 24]]));
        assert_eq!(serde_json::to_value(&recipe).unwrap(), raw);
    }

    #[test]
    fn from_json_mints_missing_id() {
        let recipe = Recipe::from_json(r#"{"name": "Kale"}"#).unwrap();
        assert!(uuid::Uuid::parse_str(&recipe.id).is_ok());
        assert_eq!(recipe.name, "Kale");
    }

    #[test]
    fn from_json_keeps_given_id() {
        let recipe = Recipe::from_json(r#"{"_id": "kale-v2", "name": "Kale"}"#).unwrap();
        assert_eq!(recipe.id, "kale-v2");
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(Recipe::from_json("[1, 2, 3]").is_err());
        assert!(Recipe::from_json("{ not json").is_err());
    }

    #[test]
    fn null_name_reads_as_unnamed() {
        let recipe: Recipe =
            serde_json::from_value(json!({ "_id": "a", "name": null, "description": null }))
                .unwrap();
        assert_eq!(recipe.name, "");
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.title(), "a");
    }

    #[test]
    fn scalar_name_is_kept_as_text() {
        let recipe: Recipe =
            serde_json::from_value(json!({ "_id": "a", "name": 42, "description": true }))
                .unwrap();
        assert_eq!(recipe.name, "42");
        assert_eq!(recipe.description.as_deref(), Some("true"));
    }

    #[test]
    fn decode_skips_unreadable_documents() {
        let docs = vec![
            json!({ "_id": "basil", "name": "Basil" }),
            json!({ "_id": "odd", "name": ["not", "a", "name"] }),
            json!({ "name": "no id" }),
            json!({ "_id": "kale", "name": null }),
        ];
        let ids: Vec<_> = decode_recipes(docs).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["basil", "kale"]);
    }

    #[test]
    fn title_falls_back_to_id() {
        let recipe = Recipe::new("r-17", "  ");
        assert_eq!(recipe.title(), "r-17");
    }
}

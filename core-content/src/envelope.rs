//! Response envelope unwrapping
//!
//! The backend wraps lists in several ways depending on the endpoint and its
//! age. Each accepted shape is a variant of [`Envelope`]; anything else is a
//! shape failure.
//!
//! ```text
//! [ ... ]                               Bare
//! { "<key>": [ ... ] }                  Keyed
//! { "success": true, "data": [ ... ] }  Data
//! { "data": { "<key>": [ ... ] } }      DataKeyed
//! ```
//!
//! A body with `"success": false` is rejected with the server's message.

use crate::error::{ContentError, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Bare(Vec<Value>),
    Keyed { key: String, items: Vec<Value> },
    Data(Vec<Value>),
    DataKeyed { key: String, items: Vec<Value> },
}

impl Envelope {
    /// Matches `body` against the accepted shapes.
    ///
    /// `keys` are the collection names this resource may appear under.
    pub fn resolve(body: Value, keys: &[&str], resource: &'static str) -> Result<Self> {
        match body {
            Value::Array(items) => Ok(Envelope::Bare(items)),
            Value::Object(mut object) => {
                reject_if_unsuccessful(&object, resource)?;

                match object.remove("data") {
                    Some(Value::Array(items)) => return Ok(Envelope::Data(items)),
                    Some(Value::Object(mut data)) => {
                        if let Some((key, items)) = take_keyed(&mut data, keys) {
                            return Ok(Envelope::DataKeyed { key, items });
                        }
                    }
                    _ => {}
                }

                take_keyed(&mut object, keys)
                    .map(|(key, items)| Envelope::Keyed { key, items })
                    .ok_or(ContentError::UnrecognizedEnvelope { resource })
            }
            _ => Err(ContentError::UnrecognizedEnvelope { resource }),
        }
    }

    pub fn items(&self) -> &[Value] {
        match self {
            Envelope::Bare(items) | Envelope::Data(items) => items,
            Envelope::Keyed { items, .. } | Envelope::DataKeyed { items, .. } => items,
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            Envelope::Bare(items) | Envelope::Data(items) => items,
            Envelope::Keyed { items, .. } | Envelope::DataKeyed { items, .. } => items,
        }
    }
}

/// Extracts a single record from a detail response.
///
/// Accepts the record itself, `{data: record}` or `{data: {<singular>: record}}`
/// as well as `{<singular>: record}`.
pub fn resolve_single(body: Value, singular_keys: &[&str], resource: &'static str) -> Result<Value> {
    let Value::Object(mut object) = body else {
        return Err(ContentError::UnrecognizedEnvelope { resource });
    };
    reject_if_unsuccessful(&object, resource)?;

    match object.remove("data") {
        Some(Value::Object(mut data)) => {
            for key in singular_keys {
                if let Some(Value::Object(record)) = data.remove(*key) {
                    return Ok(Value::Object(record));
                }
            }
            return Ok(Value::Object(data));
        }
        Some(Value::Null) | None => {}
        Some(_) => return Err(ContentError::UnrecognizedEnvelope { resource }),
    }

    for key in singular_keys {
        if let Some(Value::Object(record)) = object.remove(*key) {
            return Ok(Value::Object(record));
        }
    }

    object.remove("success");
    if object.is_empty() {
        return Err(ContentError::UnrecognizedEnvelope { resource });
    }
    Ok(Value::Object(object))
}

fn take_keyed(object: &mut Map<String, Value>, keys: &[&str]) -> Option<(String, Vec<Value>)> {
    keys.iter().find_map(|key| match object.remove(*key) {
        Some(Value::Array(items)) => Some((key.to_string(), items)),
        _ => None,
    })
}

fn reject_if_unsuccessful(object: &Map<String, Value>, resource: &'static str) -> Result<()> {
    if object.get("success") != Some(&Value::Bool(false)) {
        return Ok(());
    }

    let message = ["error", "message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Failed to fetch {} from API", resource));

    Err(ContentError::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEYS: &[&str] = &["resources", "documents"];

    #[test]
    fn test_bare_array() {
        let envelope = Envelope::resolve(json!([{ "id": 1 }]), KEYS, "documents").unwrap();
        assert!(matches!(envelope, Envelope::Bare(ref items) if items.len() == 1));
    }

    #[test]
    fn test_data_array() {
        let envelope =
            Envelope::resolve(json!({ "success": true, "data": [{}, {}] }), KEYS, "documents")
                .unwrap();
        assert!(matches!(envelope, Envelope::Data(_)));
        assert_eq!(envelope.items().len(), 2);
    }

    #[test]
    fn test_data_keyed() {
        let envelope = Envelope::resolve(
            json!({ "success": true, "data": { "resources": [{ "id": 1 }] } }),
            KEYS,
            "documents",
        )
        .unwrap();
        assert_eq!(
            envelope,
            Envelope::DataKeyed {
                key: "resources".to_string(),
                items: vec![json!({ "id": 1 })]
            }
        );
    }

    #[test]
    fn test_top_level_keyed_uses_any_known_key() {
        let envelope =
            Envelope::resolve(json!({ "documents": [{ "id": 2 }] }), KEYS, "documents").unwrap();
        assert!(matches!(envelope, Envelope::Keyed { ref key, .. } if key == "documents"));
    }

    #[test]
    fn test_empty_data_resolves_to_empty_list() {
        let envelope =
            Envelope::resolve(json!({ "success": true, "data": [] }), KEYS, "documents").unwrap();
        assert!(envelope.into_items().is_empty());
    }

    #[test]
    fn test_unrecognized_shapes() {
        for body in [
            json!({ "videos": [] }),
            json!({ "data": { "items": [] } }),
            json!("text"),
            Value::Null,
        ] {
            assert!(matches!(
                Envelope::resolve(body, KEYS, "documents"),
                Err(ContentError::UnrecognizedEnvelope { .. })
            ));
        }
    }

    #[test]
    fn test_unsuccessful_body_is_rejected() {
        let error = Envelope::resolve(
            json!({ "success": false, "error": "Database offline", "data": [] }),
            KEYS,
            "documents",
        )
        .unwrap_err();
        assert_eq!(error, ContentError::Rejected("Database offline".to_string()));

        let error =
            Envelope::resolve(json!({ "success": false }), KEYS, "documents").unwrap_err();
        assert_eq!(error.to_string(), "Failed to fetch documents from API");
    }

    #[test]
    fn test_resolve_single() {
        let keys = &["project"];

        let record = resolve_single(json!({ "_id": "p1", "title": "T" }), keys, "projects").unwrap();
        assert_eq!(record["_id"], "p1");

        let record =
            resolve_single(json!({ "success": true, "data": { "_id": "p2" } }), keys, "projects")
                .unwrap();
        assert_eq!(record["_id"], "p2");

        let record = resolve_single(
            json!({ "success": true, "data": { "project": { "_id": "p3" } } }),
            keys,
            "projects",
        )
        .unwrap();
        assert_eq!(record["_id"], "p3");

        assert!(resolve_single(json!({ "success": true }), keys, "projects").is_err());
        assert!(resolve_single(json!([1, 2]), keys, "projects").is_err());
    }
}

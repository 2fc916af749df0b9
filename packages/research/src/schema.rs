//! JSON schemas for structured model output.
//!
//! Schemas come from `schemars` and are rewritten into the strict form that
//! OpenAI-style `json_schema` response formats accept:
//! 1. every object has `additionalProperties: false`
//! 2. every property is listed in `required` (nullable ones included)
//! 3. `$ref`s are inlined and `definitions`/`$schema` dropped
//! 4. `default` and `title` annotations are removed

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A type the model can be asked to produce.
///
/// Implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict JSON schema for this type.
    fn strict_schema() -> Value {
        let schema = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        strict(schema)
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// A named schema handed to [`AI::complete_json`](crate::traits::ai::AI::complete_json).
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn of<T: StructuredOutput>() -> Self {
        Self {
            name: T::type_name(),
            schema: T::strict_schema(),
        }
    }
}

/// Rewrite a schemars root schema into strict form.
pub fn strict(mut root: Value) -> Value {
    let definitions = match &mut root {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions")
        }
        _ => None,
    };

    let definitions = definitions.unwrap_or(Value::Object(Map::new()));
    inline(&mut root, &definitions);
    close_objects(&mut root);
    strip_annotations(&mut root);
    root
}

/// Keywords strict mode rejects on any schema node.
const UNSUPPORTED_KEYWORDS: &[&str] = &["default", "title"];

fn strip_annotations(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                map.remove(*keyword);
            }
            for (key, child) in map.iter_mut() {
                match (key.as_str(), child) {
                    // Keys here are field names, not keywords
                    ("properties", Value::Object(properties)) => {
                        properties.values_mut().for_each(strip_annotations);
                    }
                    (_, child) => strip_annotations(child),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_annotations),
        _ => {}
    }
}

fn inline(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut resolved) = target {
                inline(&mut resolved, definitions);
                *value = resolved;
                return;
            }

            for child in map.values_mut() {
                inline(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline(item, definitions);
            }
        }
        _ => {}
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                let required: Vec<Value> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();
                map.insert("required".to_string(), Value::Array(required));
            }

            for child in map.values_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    }
}

//! JSON Schemas of the writable resources and the validator applied to request bodies.
//!
//! The same schema values are embedded in the `schema` field of the mutating
//! hypermedia controls, so clients see exactly what the server enforces.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::AppError;

/// Body accepted by `POST /games/` and `PUT /games/<id>/`.
#[must_use]
pub fn game() -> Value {
    json!({
        "type": "object",
        "required": ["name", "score_type"],
        "properties": {
            "name": {
                "description": "Unique name of the game",
                "type": "string",
                "maxLength": 128
            },
            "score_type": {
                "description": "Kind of score the game records",
                "type": "integer"
            }
        }
    })
}

/// Body accepted by `POST /persons/` and `PUT /persons/<id>/`.
#[must_use]
pub fn person() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {
                "description": "Unique name of the person",
                "type": "string",
                "maxLength": 128
            }
        }
    })
}

/// Body accepted by `POST /matches/` and `PUT /matches/<id>/`.
#[must_use]
pub fn game_match() -> Value {
    json!({
        "type": "object",
        "required": ["game_id", "person_id", "score"],
        "properties": {
            "game_id": {
                "description": "Id of the game played",
                "type": "integer",
                "minimum": 1
            },
            "person_id": {
                "description": "Id of the person who scored",
                "type": "integer",
                "minimum": 1
            },
            "score": {
                "description": "Score reached in the match",
                "type": "number"
            }
        }
    })
}

/// Validate `instance` against `schema`.
///
/// # Errors
///
/// Returns [`AppError::InvalidDocument`] describing the first violation found.
pub fn validate(instance: &Value, schema: &Value) -> Result<(), AppError> {
    match first_violation(instance, schema, "") {
        Some(message) => {
            tracing::debug!(%message, "request body failed schema validation");
            Err(AppError::InvalidDocument(message))
        }
        None => Ok(()),
    }
}

/// Validate `document` and deserialize it into the handler's payload type.
///
/// # Errors
///
/// Returns [`AppError::InvalidDocument`] if the document violates the schema or
/// does not fit the payload type (e.g. an integer out of range).
pub fn conform<T: DeserializeOwned>(mut document: Value, schema: &Value) -> Result<T, AppError> {
    validate(&document, schema)?;
    normalize_integers(&mut document, schema);
    serde_json::from_value(document).map_err(|err| AppError::InvalidDocument(err.to_string()))
}

/// Rewrite whole-number floats (`1.0`) as integers wherever the schema asks for
/// an integer, so they deserialize into integer fields.
fn normalize_integers(instance: &mut Value, schema: &Value) {
    if schema.get("type").and_then(Value::as_str) == Some("integer") {
        if let Some(whole) = whole_float(instance) {
            *instance = Value::from(whole);
        }
        return;
    }

    let (Some(object), Some(properties)) = (
        instance.as_object_mut(),
        schema.get("properties").and_then(Value::as_object),
    ) else {
        return;
    };
    for (name, subschema) in properties {
        if let Some(value) = object.get_mut(name) {
            normalize_integers(value, subschema);
        }
    }
}

/// A float instance with no fractional part that fits an `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_float(instance: &Value) -> Option<i64> {
    if !instance.is_f64() {
        return None;
    }
    let number = instance.as_f64()?;
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then_some(number as i64)
}

fn first_violation(instance: &Value, schema: &Value, path: &str) -> Option<String> {
    let at = |message: String| {
        if path.is_empty() {
            message
        } else {
            format!("{message} (on instance{path})")
        }
    };

    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !has_type(instance, expected) {
            return Some(at(format!("{instance} is not of type '{expected}'")));
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(instance) {
            return Some(at(format!("{instance} is not one of {}", Value::from(allowed.clone()))));
        }
    }

    if let Some(number) = instance.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
            if number < min {
                return Some(at(format!("{instance} is less than the minimum of {min}")));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
            if number > max {
                return Some(at(format!("{instance} is greater than the maximum of {max}")));
            }
        }
    }

    if let Some(text) = instance.as_str() {
        let length = text.chars().count() as u64;
        if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
            if length < min {
                return Some(at(format!("{instance} is too short")));
            }
        }
        if let Some(max) = schema.get("maxLength").and_then(Value::as_u64) {
            if length > max {
                return Some(at(format!("{instance} is too long")));
            }
        }
    }

    let object = instance.as_object()?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(name) {
                return Some(at(format!("'{name}' is a required property")));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);

    if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
        let unexpected: Vec<&str> = object
            .keys()
            .filter(|key| properties.is_none_or(|props| !props.contains_key(*key)))
            .map(String::as_str)
            .collect();
        if !unexpected.is_empty() {
            return Some(at(format!(
                "Additional properties are not allowed ('{}' was unexpected)",
                unexpected.join("', '")
            )));
        }
    }

    properties?.iter().find_map(|(name, subschema)| {
        object
            .get(name)
            .and_then(|value| first_violation(value, subschema, &format!("{path}['{name}']")))
    })
}

fn has_type(instance: &Value, expected: &str) -> bool {
    match expected {
        "object" => instance.is_object(),
        "array" => instance.is_array(),
        "string" => instance.is_string(),
        "integer" => {
            instance.is_i64()
                || instance.is_u64()
                || instance.as_f64().is_some_and(|number| number.fract() == 0.0)
        }
        "number" => instance.is_number(),
        "boolean" => instance.is_boolean(),
        "null" => instance.is_null(),
        _ => true,
    }
}

use std::any::{type_name, TypeId};

use serde_json::Value;

use crate::{
    error::{RecommendError, Result},
    schemas::{validate_structured_payload, CompletionSchema, SchemaHandle},
};

/// Parse the text content of a model answer into JSON.
///
/// Models sometimes wrap JSON in a Markdown code fence even when asked not to,
/// so a surrounding fence is removed first.
pub fn parse_model_content(content: &str) -> Result<Value> {
    let stripped = strip_code_fence(content);
    serde_json::from_str(stripped).map_err(|err| {
        RecommendError::MalformedResponse(format!("model answer is not valid JSON: {err}"))
    })
}

/// Decode a model answer into `T`.
///
/// The payload is validated against the schema of `T` and deserialized. When
/// either step fails, `repair` gets one chance to salvage the payload; if it
/// declines, the original error is returned.
pub fn decode_model_answer<T, F>(content: &str, repair: F) -> Result<T>
where
    T: CompletionSchema,
    F: FnOnce(&Value) -> Option<T>,
{
    let payload = parse_model_content(content)?;
    let schema = T::schema();

    let strict = validate_structured_payload(schema, &payload)
        .and_then(|_| deserialize_structured_response::<T>(&payload, schema));

    match strict {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::debug!(schema = schema.schema_name(), error = %err, "repairing model answer");
            repair(&payload).ok_or(err)
        }
    }
}

pub fn deserialize_structured_response<T>(payload: &Value, schema: &SchemaHandle) -> Result<T>
where
    T: CompletionSchema,
{
    ensure_schema_matches::<T>(schema)?;

    let raw = payload.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        RecommendError::MalformedResponse(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err
        ))
    })?;

    Ok(value)
}

fn ensure_schema_matches<T: 'static>(schema: &SchemaHandle) -> Result<()> {
    let expected = TypeId::of::<T>();
    if schema.type_id() != expected {
        return Err(RecommendError::config(format!(
            "schema `{}` does not match target type `{}`",
            schema.schema_name(),
            type_name::<T>(),
        )));
    }
    Ok(())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

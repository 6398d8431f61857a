use crate::{error::RecommendError, schemas::SchemaHandle};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a structured payload against a schema
pub fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> std::result::Result<(), RecommendError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            RecommendError::config(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx == MAX_SCHEMA_ERRORS {
                truncated = true;
                break;
            }
            let mut path = error.instance_path.to_string();
            if path.is_empty() {
                path = "<root>".to_string();
            }
            details.push(format!("{}: {}", path, error));
        }

        let mut detail_str = if details.is_empty() {
            "payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(RecommendError::MalformedResponse(format!(
            "payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::search::{MatchedIds, ParameterExtraction};
    use crate::CompletionSchema;
    use serde_json::json;

    #[test]
    fn accepts_a_well_formed_extraction() {
        let payload = json!({
            "location": "Rome",
            "check_in": null,
            "budget_max": 150,
            "adults": 2,
            "preferences": ["romantic"]
        });
        assert!(validate_structured_payload(ParameterExtraction::schema(), &payload).is_ok());
    }

    #[test]
    fn reports_the_offending_path() {
        let payload = json!({ "adults": "two" });
        let err = validate_structured_payload(ParameterExtraction::schema(), &payload)
            .unwrap_err()
            .to_string();
        assert!(err.contains("/adults"), "{err}");
    }

    #[test]
    fn matched_ids_must_be_present() {
        let err = validate_structured_payload(MatchedIds::schema(), &json!({})).unwrap_err();
        assert!(matches!(err, RecommendError::MalformedResponse(_)));
    }
}

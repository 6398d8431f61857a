use hotel_recommender::{
    completion_schema,
    schema::validate_structured_payload,
    types::{MatchedIds, ParameterExtraction},
    CompletionSchema, RecommendError,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

/// Nightly rate quoted by a property.
#[derive(Debug, Deserialize, JsonSchema)]
#[completion_schema(name = "quoted_rate")]
#[allow(dead_code)]
struct QuotedRate {
    /// "hotel id as a string"
    hotel_id: String,
    /// number per night
    amount: f64,
    #[serde(default)]
    currency: Option<String>,
}

#[test]
fn test_macro_renders_template_from_field_docs() {
    assert_eq!(
        QuotedRate::response_template(),
        "{\n  \"hotel_id\": \"hotel id as a string\",\n  \"amount\": number per night,\n  \"currency\": value\n}"
    );
}

#[test]
fn test_macro_builds_a_named_schema() {
    let handle = QuotedRate::schema();
    assert_eq!(handle.schema_name(), "quoted_rate");
    assert_eq!(handle.type_name(), "QuotedRate");

    let schema = handle.schema_json();
    assert_eq!(schema["type"], "object");
    assert_eq!(
        schema["properties"]["amount"]["description"],
        "number per night"
    );
    let required = schema["required"].as_array().unwrap();
    assert!(required.contains(&json!("hotel_id")));
    assert!(!required.contains(&json!("currency")));
}

#[test]
fn test_schema_handle_is_cached() {
    assert!(std::ptr::eq(QuotedRate::schema(), QuotedRate::schema()));
}

#[test]
fn test_generated_schema_rejects_wrong_types() {
    let err = validate_structured_payload(
        QuotedRate::schema(),
        &json!({"hotel_id": "mock-rome-01", "amount": "cheap"}),
    )
    .unwrap_err();
    assert!(matches!(err, RecommendError::MalformedResponse(_)));

    validate_structured_payload(
        QuotedRate::schema(),
        &json!({"hotel_id": "mock-rome-01", "amount": 180.0}),
    )
    .unwrap();
}

#[test]
fn test_extraction_schema_accepts_nulls() {
    let payload = json!({
        "location": null,
        "check_in": null,
        "check_out": null,
        "budget_min": null,
        "budget_max": 200,
        "adults": 2,
        "children": null,
        "rooms": null,
        "preferences": ["romantic"]
    });
    validate_structured_payload(ParameterExtraction::schema(), &payload).unwrap();
    assert!(ParameterExtraction::response_template().contains("\"check_in\": \"YYYY-MM-DD or null\""));
}

#[test]
fn test_matched_ids_schema_requires_the_list() {
    assert_eq!(MatchedIds::schema().schema_name(), "matched_hotels");
    assert!(validate_structured_payload(MatchedIds::schema(), &json!({})).is_err());
}

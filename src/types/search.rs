use crate::completion_schema;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Search parameters derived from one user demand.
///
/// Built once per request, either from a model answer or by the rule-based
/// extractor, and read by the inventory and the filterers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    pub location: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub preferences: BTreeSet<String>,
}

impl Default for ExtractedParameters {
    fn default() -> Self {
        Self {
            location: None,
            check_in: None,
            check_out: None,
            budget_min: None,
            budget_max: None,
            adults: 1,
            children: 0,
            rooms: 1,
            preferences: BTreeSet::new(),
        }
    }
}

/// Raw extraction answer as the model returns it, before normalisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[completion_schema(name = "hotel_search_parameters")]
pub struct ParameterExtraction {
    /// "city/country name or null"
    #[serde(default)]
    pub location: Option<String>,
    /// "YYYY-MM-DD or null"
    #[serde(default)]
    pub check_in: Option<String>,
    /// "YYYY-MM-DD or null"
    #[serde(default)]
    pub check_out: Option<String>,
    /// number per night or null
    #[serde(default)]
    pub budget_min: Option<f64>,
    /// number per night or null
    #[serde(default)]
    pub budget_max: Option<f64>,
    /// number (default 1)
    #[serde(default)]
    pub adults: Option<i64>,
    /// number (default 0)
    #[serde(default)]
    pub children: Option<i64>,
    /// number (default 1)
    #[serde(default)]
    pub rooms: Option<i64>,
    /// ["keyword1", "keyword2"] or null
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
}

impl ParameterExtraction {
    /// Field-by-field lenient read of a payload that failed strict decoding.
    /// Anything that still cannot be read is left unset. Returns `None` when
    /// the payload is not an object at all.
    pub fn repair(payload: &Value) -> Option<Self> {
        let object = payload.as_object()?;
        let text = |key: &str| object.get(key).and_then(lenient_text);
        let number = |key: &str| object.get(key).and_then(lenient_number);
        let count = |key: &str| {
            number(key)
                .filter(|n| n.fract() == 0.0)
                .map(|n| n as i64)
        };

        Some(Self {
            location: text("location"),
            check_in: text("check_in"),
            check_out: text("check_out"),
            budget_min: number("budget_min"),
            budget_max: number("budget_max"),
            adults: count("adults"),
            children: count("children"),
            rooms: count("rooms"),
            preferences: object.get("preferences").and_then(lenient_tags),
        })
    }
}

impl From<ParameterExtraction> for ExtractedParameters {
    fn from(raw: ParameterExtraction) -> Self {
        let defaults = ExtractedParameters::default();

        let location = raw
            .location
            .map(|loc| loc.trim().to_string())
            .filter(|loc| !is_placeholder(loc));

        let check_in = raw.check_in.as_deref().and_then(parse_date);
        let check_out = raw
            .check_out
            .as_deref()
            .and_then(parse_date)
            .filter(|out| check_in.map_or(true, |inn| *out > inn));

        let budget_max = raw.budget_max.filter(|b| b.is_finite() && *b >= 0.0);
        let budget_min = raw
            .budget_min
            .filter(|b| b.is_finite() && *b >= 0.0)
            .filter(|min| budget_max.map_or(true, |max| *min <= max));

        let preferences = raw
            .preferences
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        Self {
            location,
            check_in,
            check_out,
            budget_min,
            budget_max,
            adults: clamp_count(raw.adults, 1).unwrap_or(defaults.adults),
            children: clamp_count(raw.children, 0).unwrap_or(defaults.children),
            rooms: clamp_count(raw.rooms, 1).unwrap_or(defaults.rooms),
            preferences,
        }
    }
}

/// Filtering answer: candidate ids ordered by relevance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[completion_schema(name = "matched_hotels")]
pub struct MatchedIds {
    /// ["id1", "id2", ...] ordered by relevance
    pub matched_ids: Vec<String>,
}

impl MatchedIds {
    /// Accepts numeric ids and a bare array of ids. Returns `None` when no
    /// id list can be found.
    pub fn repair(payload: &Value) -> Option<Self> {
        let list = match payload {
            Value::Array(items) => items,
            Value::Object(object) => object.get("matched_ids")?.as_array()?,
            _ => return None,
        };

        let matched_ids = list
            .iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id.trim().to_string()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .filter(|id| !id.is_empty())
            .collect();

        Some(Self { matched_ids })
    }
}

fn is_placeholder(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("none")
        || value.eq_ignore_ascii_case("unknown")
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn clamp_count(value: Option<i64>, minimum: u32) -> Option<u32> {
    value.map(|n| n.clamp(minimum as i64, u32::MAX as i64) as u32)
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

fn lenient_tags(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(lenient_text).collect()),
        Value::String(text) => Some(text.split(',').map(str::to_string).collect()),
        _ => None,
    }
}

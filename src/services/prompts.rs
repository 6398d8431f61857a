use crate::schemas::CompletionSchema;
use crate::types::{HotelProjection, MatchedIds, ParameterExtraction};

/// Demands longer than this are cut before being embedded in a prompt.
pub const MAX_PROMPT_DEMAND_CHARS: usize = 500;

pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "Extract hotel search parameters from the traveller's request. Return JSON only.";

pub const FILTER_SYSTEM_PROMPT: &str =
    "Filter hotels against the traveller's request. Return JSON with a matched_ids array only.";

/// User prompt for the parameter extraction call.
pub fn extraction_prompt(demand: &str) -> String {
    format!(
        "Extract hotel search parameters from: \"{}\"\n\nReturn JSON only:\n{}\n\nNotes: Calculate relative dates. Budget defaults to EUR. Return null if unknown.",
        truncate_demand(demand),
        ParameterExtraction::response_template()
    )
}

/// User prompt for the filtering call. Candidates are embedded as compact JSON.
pub fn filter_prompt(demand: &str, candidates: &[HotelProjection]) -> String {
    let hotels = serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "User request: \"{}\"\n\nHotels:\n{}\n\nReturn JSON with the ids of the hotels that match, ordered by relevance:\n{}",
        truncate_demand(demand),
        hotels,
        MatchedIds::response_template()
    )
}

fn truncate_demand(demand: &str) -> String {
    demand.chars().take(MAX_PROMPT_DEMAND_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prompt_embeds_template() {
        let prompt = extraction_prompt("quiet hotel in Vienna");
        assert!(prompt.contains("\"quiet hotel in Vienna\""));
        assert!(prompt.contains("\"check_out\": YYYY-MM-DD or null"));
    }

    #[test]
    fn long_demands_are_truncated() {
        let demand = "a".repeat(800);
        let prompt = extraction_prompt(&demand);
        assert!(prompt.contains(&"a".repeat(MAX_PROMPT_DEMAND_CHARS)));
        assert!(!prompt.contains(&"a".repeat(MAX_PROMPT_DEMAND_CHARS + 1)));
    }

    #[test]
    fn filter_prompt_lists_candidates() {
        let candidates = vec![HotelProjection {
            id: "h-1".into(),
            name: "Lakeside".into(),
            city: "Como".into(),
            price: Some(150.0),
            rating: Some(4.8),
        }];
        let prompt = filter_prompt("lake view", &candidates);
        assert!(prompt.contains(r#""id":"h-1""#));
        assert!(prompt.contains("matched_ids"));
    }
}

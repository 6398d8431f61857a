use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::types::{hotel::HotelRecord, search::ExtractedParameters};

/// Longest demand accepted from a caller, in characters.
pub const MAX_DEMAND_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_demand: String,
}

/// Check a raw demand before any provider is contacted.
pub fn validate_demand(demand: &str) -> Result<&str> {
    let trimmed = demand.trim();
    if trimmed.is_empty() {
        return Err(RecommendError::validation("user_demand must not be empty"));
    }
    if trimmed.chars().count() > MAX_DEMAND_CHARS {
        return Err(RecommendError::validation(format!(
            "user_demand must be at most {MAX_DEMAND_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_demand: String,
    pub extracted_parameters: ExtractedParameters,
    pub matched_hotels: Vec<HotelRecord>,
    pub total_results: usize,
    pub message: String,
}

/// Which pipeline produced a stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Llm,
    RuleBased,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Llm => write!(f, "llm"),
            Strategy::RuleBased => write!(f, "rule_based"),
        }
    }
}

/// Hotels in recommendation order. Every entry comes from the candidate list
/// it was built from, and no id appears twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResult(Vec<HotelRecord>);

impl RankedResult {
    /// Map ranked ids back onto candidates. Unknown ids are skipped and
    /// repeated ids keep their first position.
    pub fn from_ids<S: AsRef<str>>(candidates: &[HotelRecord], ids: &[S]) -> Self {
        let mut seen = HashSet::new();
        let hotels = ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| seen.insert(*id))
            .filter_map(|id| candidates.iter().find(|hotel| hotel.id == id))
            .cloned()
            .collect();
        Self(hotels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|hotel| hotel.id.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<HotelRecord> {
        self.0
    }
}

/// Outcome of one pipeline run, including how each stage was served.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub user_demand: String,
    pub parameters: ExtractedParameters,
    pub hotels: RankedResult,
    pub extraction: Strategy,
    /// `None` when the inventory had nothing to filter.
    pub filtering: Option<Strategy>,
    pub message: String,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        let total_results = recommendation.hotels.len();
        Self {
            user_demand: recommendation.user_demand,
            extracted_parameters: recommendation.parameters,
            matched_hotels: recommendation.hotels.into_inner(),
            total_results,
            message: recommendation.message,
        }
    }
}

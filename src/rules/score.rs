use crate::types::{ExtractedParameters, HotelRecord};

const WITHIN_BUDGET: f64 = 10.0;
const LOCATION_MATCH: f64 = 5.0;
const PREFERENCE_MATCH: f64 = 3.0;
const RATING_WEIGHT: f64 = 2.0;

/// Rank candidates by keyword score and return their ids, best first.
///
/// Hotels priced above `budget_max` are never returned. Equal scores keep
/// their candidate order.
pub fn rank_hotels(params: &ExtractedParameters, candidates: &[HotelRecord]) -> Vec<String> {
    let mut scored: Vec<(f64, &HotelRecord)> = candidates
        .iter()
        .filter(|hotel| !over_budget(params, hotel))
        .map(|hotel| (score_hotel(params, hotel), hotel))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, hotel)| hotel.id.clone()).collect()
}

fn over_budget(params: &ExtractedParameters, hotel: &HotelRecord) -> bool {
    matches!((params.budget_max, hotel.price), (Some(max), Some(price)) if price > max)
}

pub fn score_hotel(params: &ExtractedParameters, hotel: &HotelRecord) -> f64 {
    let mut score = 0.0;

    match (params.budget_max, hotel.price) {
        (None, _) => score += WITHIN_BUDGET,
        (Some(max), Some(price)) if price <= max => score += WITHIN_BUDGET,
        _ => {}
    }

    if let Some(location) = params.location.as_deref() {
        let location = location.to_lowercase();
        if hotel.city.to_lowercase().contains(&location)
            || hotel.country.to_lowercase().contains(&location)
        {
            score += LOCATION_MATCH;
        }
    }

    let name = hotel.name.to_lowercase();
    let description = hotel.description.to_lowercase();
    let hits = params
        .preferences
        .iter()
        .filter(|tag| name.contains(tag.as_str()) || description.contains(tag.as_str()))
        .count();
    score += PREFERENCE_MATCH * hits as f64;

    if let Some(rating) = hotel.rating {
        score += rating * RATING_WEIGHT;
    }

    score
}

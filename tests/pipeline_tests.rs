use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hotel_recommender::{
    core::recommender::NO_HOTELS_MESSAGE, ExtractedParameters, HotelInventory, HotelRecord,
    LanguageModel, MockInventory, RecommendError, Recommender, Strategy,
};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

const ITALY_DEMAND: &str = "romantic getaway near lakes in Italy under 200€";

fn chat_answer(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn model_for(server: &ServerGuard) -> LanguageModel {
    LanguageModel::new("sk-test".to_string())
        .with_base_url(server.url())
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(0)
}

fn recommender_for(server: &ServerGuard) -> Recommender {
    Recommender::new(Some(model_for(server)), Arc::new(MockInventory::new()))
}

fn extraction_mock(server: &mut ServerGuard, status: usize, body: String) -> Mock {
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Extract hotel search parameters".to_string()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
}

fn filter_mock(server: &mut ServerGuard, status: usize, body: String) -> Mock {
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("matched_ids".to_string()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
}

fn quota_body() -> String {
    json!({
        "error": {
            "message": "You exceeded your current quota, please check your plan and billing details.",
            "type": "insufficient_quota",
            "code": "insufficient_quota"
        }
    })
    .to_string()
}

fn italy_extraction() -> String {
    chat_answer(r#"{"location": "Italy", "budget_max": 200, "adults": 2, "preferences": ["romantic", "lake"]}"#)
}

fn assert_within_budget(hotels: &[HotelRecord], budget: f64) {
    for hotel in hotels {
        assert!(
            hotel.price.map_or(true, |price| price <= budget),
            "{} costs {:?}",
            hotel.id,
            hotel.price
        );
    }
}

#[tokio::test]
async fn test_model_answers_drive_the_result() {
    let mut server = Server::new_async().await;
    let extraction = extraction_mock(&mut server, 200, italy_extraction()).create_async().await;
    let filter = filter_mock(
        &mut server,
        200,
        chat_answer(r#"{"matched_ids": ["mock-como-01", "ghost-hotel", "mock-rome-01", "mock-como-01"]}"#),
    )
    .create_async()
    .await;

    let recommendation = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap();

    extraction.assert_async().await;
    filter.assert_async().await;
    assert_eq!(recommendation.extraction, Strategy::Llm);
    assert_eq!(recommendation.filtering, Some(Strategy::Llm));
    assert_eq!(recommendation.parameters.adults, 2);
    assert_eq!(recommendation.hotels.ids(), vec!["mock-como-01", "mock-rome-01"]);
    assert_eq!(recommendation.message, "Found 2 hotels matching your preferences.");
}

#[tokio::test]
async fn test_quota_at_extraction_falls_back_to_rules() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(&mut server, 429, quota_body()).create_async().await;
    let _filter = filter_mock(
        &mut server,
        200,
        chat_answer(r#"{"matched_ids": ["mock-rome-01"]}"#),
    )
    .create_async()
    .await;

    let recommendation = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap();

    assert_eq!(recommendation.extraction, Strategy::RuleBased);
    assert_eq!(recommendation.filtering, Some(Strategy::Llm));
    assert_eq!(recommendation.parameters.location.as_deref(), Some("Italy"));
    assert_eq!(recommendation.parameters.budget_max, Some(200.0));
    assert!(recommendation.parameters.preferences.contains("romantic"));
    assert_eq!(recommendation.hotels.ids(), vec!["mock-rome-01"]);
}

#[tokio::test]
async fn test_quota_at_filtering_falls_back_to_rules() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(&mut server, 200, italy_extraction()).create_async().await;
    // Some gateways report exhausted credit with a non-429 status.
    let _filter = filter_mock(&mut server, 403, quota_body()).create_async().await;

    let recommendation = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap();

    assert_eq!(recommendation.extraction, Strategy::Llm);
    assert_eq!(recommendation.filtering, Some(Strategy::RuleBased));
    let hotels = recommendation.hotels.clone().into_inner();
    assert!(!hotels.is_empty());
    assert_within_budget(&hotels, 200.0);
}

#[tokio::test]
async fn test_italy_scenario_without_model_quota() {
    let mut server = Server::new_async().await;
    let _any = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(json!({"error": {"code": "rate_limit_exceeded"}}).to_string())
        .expect(2)
        .create_async()
        .await;

    let recommendation = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap();

    assert_eq!(recommendation.extraction, Strategy::RuleBased);
    assert_eq!(recommendation.filtering, Some(Strategy::RuleBased));
    assert_eq!(recommendation.parameters.location.as_deref(), Some("Italy"));
    assert_eq!(recommendation.parameters.budget_max, Some(200.0));

    let hotels = recommendation.hotels.into_inner();
    assert!(!hotels.is_empty());
    assert_eq!(hotels[0].country, "Italy");
    assert_eq!(hotels[0].id, "mock-como-01");
    assert_within_budget(&hotels, 200.0);
}

#[tokio::test]
async fn test_identical_demands_give_identical_order() {
    let mut server = Server::new_async().await;
    let _any = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(quota_body())
        .expect(4)
        .create_async()
        .await;

    let recommender = recommender_for(&server);
    let first = recommender.recommend("family hotel with a pool").await.unwrap();
    let second = recommender.recommend("family hotel with a pool").await.unwrap();

    assert_eq!(first.hotels.ids(), second.hotels.ids());
    assert_eq!(first.hotels.len(), 10);
}

#[tokio::test]
async fn test_blank_demand_makes_no_provider_call() {
    let mut server = Server::new_async().await;
    let untouched = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let err = recommender_for(&server).recommend("   \t ").await.unwrap_err();

    assert!(matches!(err, RecommendError::Validation(_)));
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_non_quota_failures_propagate() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(
        &mut server,
        401,
        json!({"error": {"message": "Incorrect API key provided"}}).to_string(),
    )
    .create_async()
    .await;
    let filter = filter_mock(&mut server, 200, chat_answer(r#"{"matched_ids": []}"#))
        .expect(0)
        .create_async()
        .await;

    let err = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap_err();

    assert!(matches!(err, RecommendError::ProviderUnavailable(_)));
    filter.assert_async().await;
}

#[tokio::test]
async fn test_prose_answer_is_malformed() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(
        &mut server,
        200,
        chat_answer("I think you would love Lake Como!"),
    )
    .create_async()
    .await;

    let err = recommender_for(&server).recommend(ITALY_DEMAND).await.unwrap_err();
    assert!(matches!(err, RecommendError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_loose_answers_are_repaired() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(
        &mut server,
        200,
        chat_answer("```json\n{\"location\": \"Rome\", \"budget_max\": \"150\", \"adults\": \"2\"}\n```"),
    )
    .create_async()
    .await;
    let _filter = filter_mock(&mut server, 200, chat_answer(r#"["mock-rome-01"]"#)).create_async().await;

    let recommendation = recommender_for(&server).recommend("Rome for two, 150 max").await.unwrap();

    assert_eq!(recommendation.parameters.budget_max, Some(150.0));
    assert_eq!(recommendation.parameters.adults, 2);
    assert_eq!(recommendation.hotels.ids(), vec!["mock-rome-01"]);
}

#[tokio::test]
async fn test_missing_model_is_a_configuration_error() {
    let recommender = Recommender::new(None, Arc::new(MockInventory::new()));
    let err = recommender.recommend(ITALY_DEMAND).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

struct EmptyInventory;

#[async_trait]
impl HotelInventory for EmptyInventory {
    fn name(&self) -> &'static str {
        "empty"
    }

    async fn search(&self, _params: &ExtractedParameters) -> hotel_recommender::Result<Vec<HotelRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_empty_inventory_skips_filtering() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(&mut server, 200, italy_extraction()).create_async().await;
    let filter = filter_mock(&mut server, 200, chat_answer(r#"{"matched_ids": []}"#))
        .expect(0)
        .create_async()
        .await;

    let recommender = Recommender::new(Some(model_for(&server)), Arc::new(EmptyInventory));
    let recommendation = recommender.recommend(ITALY_DEMAND).await.unwrap();

    assert!(recommendation.hotels.is_empty());
    assert_eq!(recommendation.filtering, None);
    assert_eq!(recommendation.message, NO_HOTELS_MESSAGE);
    filter.assert_async().await;
}

struct FixedInventory(Vec<HotelRecord>);

#[async_trait]
impl HotelInventory for FixedInventory {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn search(&self, _params: &ExtractedParameters) -> hotel_recommender::Result<Vec<HotelRecord>> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_invented_ids_do_not_crowd_out_real_matches() {
    let mut server = Server::new_async().await;
    let _extraction = extraction_mock(
        &mut server,
        200,
        chat_answer(r#"{"location": "Rome"}"#),
    )
    .create_async()
    .await;
    let _filter = filter_mock(
        &mut server,
        200,
        chat_answer(r#"{"matched_ids": ["ghost-1", "ghost-2", "ghost-3", "rome-b", "rome-a"]}"#),
    )
    .create_async()
    .await;

    let hotels: Vec<HotelRecord> = ["rome-a", "rome-b"]
        .iter()
        .map(|id| serde_json::from_value(json!({ "id": id, "name": format!("Hotel {id}"), "city": "Rome" })).unwrap())
        .collect();
    let recommender = Recommender::new(Some(model_for(&server)), Arc::new(FixedInventory(hotels)));
    let recommendation = recommender.recommend("Rome").await.unwrap();

    assert_eq!(recommendation.filtering, Some(Strategy::Llm));
    assert_eq!(recommendation.hotels.ids(), vec!["rome-b", "rome-a"]);
    assert_eq!(recommendation.message, "Found 2 hotels matching your preferences.");
}

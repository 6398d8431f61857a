use std::time::Duration;

use chrono::NaiveDate;
use hotel_recommender::{BookingClient, ExtractedParameters, HotelInventory, RecommendError};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn client_for(server: &ServerGuard, retries: usize) -> BookingClient {
    BookingClient::new("bk-test", server.url())
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .unwrap()
        .with_max_retries(retries)
}

fn rome_params() -> ExtractedParameters {
    ExtractedParameters {
        location: Some("Rome".to_string()),
        check_in: NaiveDate::from_ymd_opt(2026, 6, 12),
        check_out: NaiveDate::from_ymd_opt(2026, 6, 15),
        budget_max: Some(180.0),
        adults: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_search_sends_parameters_and_maps_hotels() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/hotels")
        .match_header("authorization", "Bearer bk-test")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("location".into(), "Rome".into()),
            Matcher::UrlEncoded("checkin_date".into(), "2026-06-12".into()),
            Matcher::UrlEncoded("checkout_date".into(), "2026-06-15".into()),
            Matcher::UrlEncoded("adults".into(), "2".into()),
            Matcher::UrlEncoded("rooms".into(), "1".into()),
            Matcher::UrlEncoded("price_max".into(), "180".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "result": [
                    {
                        "hotel_id": 4401,
                        "name": "Hotel Forum",
                        "city": "Rome",
                        "country": "Italy",
                        "price": 165.0,
                        "currency": "EUR",
                        "review_score": 8.8,
                        "amenities": ["WiFi", "Rooftop Bar"],
                        "url": "https://www.booking.com/hotel/it/forum.html"
                    },
                    { "name": "Nameless entry without id" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let hotels = client_for(&server, 0).search(&rome_params()).await.unwrap();

    search.assert_async().await;
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0].id, "4401");
    assert_eq!(hotels[0].effective_rating(), Some(8.8));
    assert_eq!(
        hotels[0].booking_url.as_deref(),
        Some("https://www.booking.com/hotel/it/forum.html")
    );
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", "/hotels")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream busy")
        .expect(2)
        .create_async()
        .await;

    let err = client_for(&server, 1)
        .search(&ExtractedParameters::default())
        .await
        .unwrap_err();

    failing.assert_async().await;
    assert!(matches!(err, RecommendError::ProviderUnavailable(_)));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let denied = server
        .mock("GET", "/hotels")
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server, 2)
        .search(&ExtractedParameters::default())
        .await
        .unwrap_err();

    denied.assert_async().await;
    assert_eq!(err.error_code(), "PROVIDER_UNAVAILABLE");
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let mut server = Server::new_async().await;
    let _html = server
        .mock("GET", "/hotels")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server, 0)
        .search(&ExtractedParameters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::MalformedResponse(_)));
}

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::HotelInventory;
use crate::error::{AttemptError, RecommendError, Result};
use crate::types::{ExtractedParameters, HotelRecord};

pub const DEFAULT_BASE_URL: &str = "https://distribution-xml.booking.com/json";
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Hotel search against the Booking distribution API.
#[derive(Debug, Clone)]
pub struct BookingClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_retries: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    result: Vec<Value>,
}

/// Hotel object as the provider sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderHotel {
    hotel_id: Option<Value>,
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price: Option<f64>,
    currency: Option<String>,
    rating: Option<f64>,
    review_score: Option<f64>,
    review_count: Option<u64>,
    amenities: Vec<String>,
    description: Option<String>,
    images: Vec<String>,
    url: Option<String>,
}

impl ProviderHotel {
    fn into_record(self) -> Option<HotelRecord> {
        let id = match self.hotel_id? {
            Value::String(id) if !id.trim().is_empty() => id.trim().to_string(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };

        Some(HotelRecord {
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
            price: self.price,
            currency: self.currency,
            rating: self.rating,
            review_score: self.review_score,
            review_count: self.review_count,
            amenities: self.amenities,
            description: self.description.unwrap_or_default(),
            images: self.images,
            booking_url: self.url,
            id,
        })
    }
}

impl BookingClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let timeout = Duration::from_secs(30);
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout,
            max_retries: 2,
            client: build_client(timeout)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.timeout = timeout;
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn search_url(&self) -> String {
        format!("{}/hotels", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_once(
        &self,
        query: &[(&'static str, String)],
    ) -> std::result::Result<String, AttemptError> {
        let request = self
            .client
            .get(self.search_url())
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(query)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                AttemptError::transient(RecommendError::Timeout(format!(
                    "hotel search exceeded {}s",
                    self.timeout.as_secs()
                )))
            })?
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(AttemptError::from_status(status, status_error(status, &body)));
        }
        Ok(body)
    }
}

#[async_trait]
impl HotelInventory for BookingClient {
    fn name(&self) -> &'static str {
        "booking"
    }

    async fn search(&self, params: &ExtractedParameters) -> Result<Vec<HotelRecord>> {
        let query = search_query(params);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        let body = loop {
            match self.fetch_once(&query).await {
                Ok(body) => break body,
                Err(failure) if failure.retryable && attempt < self.max_retries => {
                    tracing::warn!(attempt = attempt + 1, error = %failure.error, "retrying hotel search");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff *= 2;
                }
                Err(failure) => return Err(failure.error),
            }
        };

        let hotels = parse_search_body(&body)?;
        tracing::info!(count = hotels.len(), "hotels returned by provider");
        Ok(hotels)
    }
}

/// Query parameters for a search. Unset parameters are left out.
pub fn search_query(params: &ExtractedParameters) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();

    if let Some(location) = &params.location {
        query.push(("location", location.clone()));
    }
    if let Some(check_in) = params.check_in {
        query.push(("checkin_date", check_in.format("%Y-%m-%d").to_string()));
    }
    if let Some(check_out) = params.check_out {
        query.push(("checkout_date", check_out.format("%Y-%m-%d").to_string()));
    }
    query.push(("adults", params.adults.to_string()));
    if params.children > 0 {
        query.push(("children", params.children.to_string()));
    }
    query.push(("rooms", params.rooms.to_string()));
    if let Some(min) = params.budget_min {
        query.push(("price_min", min.to_string()));
    }
    if let Some(max) = params.budget_max {
        query.push(("price_max", max.to_string()));
    }

    query
}

/// Decode a search body. Entries without an id, entries that do not decode
/// and repeated ids are skipped.
fn parse_search_body(body: &str) -> Result<Vec<HotelRecord>> {
    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|err| {
        RecommendError::MalformedResponse(format!("hotel search body is not valid: {err}"))
    })?;

    let mut seen = HashSet::new();
    let hotels = envelope
        .result
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ProviderHotel>(entry) {
            Ok(hotel) => hotel.into_record(),
            Err(err) => {
                tracing::warn!(error = %err, "skipping undecodable hotel entry");
                None
            }
        })
        .filter(|hotel| seen.insert(hotel.id.clone()))
        .collect();

    Ok(hotels)
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| RecommendError::config(format!("Failed to build HTTP client: {err}")))
}

fn transport_error(err: reqwest::Error) -> AttemptError {
    AttemptError::transient(if err.is_timeout() {
        RecommendError::Timeout(format!("hotel search timed out: {err}"))
    } else {
        RecommendError::ProviderUnavailable(format!("hotel search failed: {err}"))
    })
}

fn status_error(status: StatusCode, body: &str) -> RecommendError {
    let snippet: String = body.chars().take(200).collect();
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        RecommendError::Timeout(format!("HTTP {status}: {snippet}"))
    } else {
        RecommendError::ProviderUnavailable(format!("HTTP {status}: {snippet}"))
    }
}

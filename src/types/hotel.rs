use serde::{Deserialize, Serialize};

const PROJECTED_NAME_CHARS: usize = 50;

/// A hotel as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub rating: Option<f64>,
    pub review_score: Option<f64>,
    pub review_count: Option<u64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "bookingUrl", alias = "url")]
    pub booking_url: Option<String>,
}

impl HotelRecord {
    /// Rating used for ranking: the provider rating, else the review score.
    pub fn effective_rating(&self) -> Option<f64> {
        self.rating.or(self.review_score)
    }
}

/// Compact view of a candidate sent to the language model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelProjection {
    pub id: String,
    pub name: String,
    pub city: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

impl From<&HotelRecord> for HotelProjection {
    fn from(hotel: &HotelRecord) -> Self {
        Self {
            id: hotel.id.clone(),
            name: hotel.name.chars().take(PROJECTED_NAME_CHARS).collect(),
            city: hotel.city.clone(),
            price: hotel.price,
            rating: hotel.effective_rating(),
        }
    }
}

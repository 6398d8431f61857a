pub mod booking;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::Result;
use crate::types::{ExtractedParameters, HotelRecord};

pub use booking::BookingClient;
pub use mock::MockInventory;

/// Source of candidate hotels for a search.
#[async_trait]
pub trait HotelInventory: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Hotels for the given parameters. An empty list means no matches.
    async fn search(&self, params: &ExtractedParameters) -> Result<Vec<HotelRecord>>;
}

/// Pick the inventory for the given settings: the Booking client when a key
/// is configured, the sample inventory otherwise.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn HotelInventory>> {
    match &settings.booking_api_key {
        Some(api_key) => {
            let client = BookingClient::new(api_key.clone(), settings.booking_api_url.clone())?
                .with_timeout(settings.inventory_timeout)?
                .with_max_retries(settings.max_retries);
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!("BOOKING_API_KEY not configured, serving sample inventory");
            Ok(Arc::new(MockInventory::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_selects_sample_inventory() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(from_settings(&settings).unwrap().name(), "mock");
    }

    #[test]
    fn configured_key_selects_booking() {
        let settings = Settings::from_lookup(|key| {
            (key == "BOOKING_API_KEY").then(|| "bk-test".to_string())
        })
        .unwrap();
        assert_eq!(from_settings(&settings).unwrap().name(), "booking");
    }
}

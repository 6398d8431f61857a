//! hotel-recommender: natural-language hotel search backed by a hosted language model
//!
//! A demand such as "romantic getaway near lakes in Italy under 200€" is turned
//! into search parameters, matched against a hotel inventory and re-ranked.
//! When the model provider reports an exhausted quota, a keyword and pattern
//! based pipeline answers instead.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hotel_recommender::{Recommender, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let recommender = Recommender::from_settings(&settings)?;
//!
//!     let recommendation = recommender
//!         .recommend("family hotel in Barcelona with a pool, 2 adults 2 kids")
//!         .await?;
//!     println!("{}", recommendation.message);
//!     Ok(())
//! }
//! ```

extern crate self as hotel_recommender;

pub mod config;
pub mod core;
pub mod error;
pub mod inventory;
pub mod rules;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use config::{LogFormat, Settings};
pub use core::{LanguageModel, Recommender};
pub use error::{RecommendError, Result};
pub use inventory::{BookingClient, HotelInventory, MockInventory};
pub use recommender_macros::completion_schema;
pub use schemas::{CompletionSchema, SchemaHandle};
pub use types::{
    ExtractedParameters, HotelProjection, HotelRecord, RankedResult, Recommendation,
    RecommendationRequest, RecommendationResponse, Strategy,
};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;

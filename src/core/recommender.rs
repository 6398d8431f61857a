use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::Settings,
    core::language_model::LanguageModel,
    error::{RecommendError, Result},
    inventory::{self, HotelInventory},
    rules,
    types::{
        validate_demand, ExtractedParameters, HotelProjection, HotelRecord, RankedResult,
        Recommendation, Strategy,
    },
};

pub const NO_HOTELS_MESSAGE: &str = "No hotels found matching your criteria.";

/// Runs the extract, search, filter pipeline for one demand.
#[derive(Clone)]
pub struct Recommender {
    model: Option<LanguageModel>,
    inventory: Arc<dyn HotelInventory>,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("model", &self.model)
            .field("inventory", &self.inventory.name())
            .finish()
    }
}

impl Recommender {
    pub fn new(model: Option<LanguageModel>, inventory: Arc<dyn HotelInventory>) -> Self {
        Self { model, inventory }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = settings.openai_api_key.as_ref().map(|api_key| {
            LanguageModel::new(api_key.clone())
                .with_model(&settings.openai_model)
                .with_base_url(&settings.openai_base_url)
                .with_timeout(settings.llm_timeout)
                .with_max_retries(settings.max_retries)
        });
        if model.is_none() {
            warn!("OPENAI_API_KEY not configured, recommendations will fail");
        }

        Ok(Self::new(model, inventory::from_settings(settings)?))
    }

    pub fn inventory_name(&self) -> &'static str {
        self.inventory.name()
    }

    pub async fn recommend(&self, demand: &str) -> Result<Recommendation> {
        let trimmed = validate_demand(demand)?;
        let model = self.model.as_ref().ok_or_else(|| {
            RecommendError::config("OPENAI_API_KEY is not configured")
        })?;

        info!(demand = trimmed, "new recommendation request");

        let (parameters, extraction) = extract_with_fallback(model, trimmed).await?;
        info!(?parameters, strategy = %extraction, "parameters extracted");

        let candidates = self.inventory.search(&parameters).await?;
        info!(
            count = candidates.len(),
            inventory = self.inventory.name(),
            "candidates fetched"
        );

        if candidates.is_empty() {
            return Ok(Recommendation {
                user_demand: demand.to_string(),
                parameters,
                hotels: RankedResult::default(),
                extraction,
                filtering: None,
                message: NO_HOTELS_MESSAGE.to_string(),
            });
        }

        let (ids, filtering) =
            filter_with_fallback(model, trimmed, &parameters, &candidates).await?;
        let hotels = RankedResult::from_ids(&candidates, &ids);
        if hotels.len() < ids.len() {
            warn!(
                returned = ids.len(),
                kept = hotels.len(),
                "dropped ids that were not among the candidates"
            );
        }
        info!(count = hotels.len(), strategy = %filtering, "hotels ranked");

        Ok(Recommendation {
            user_demand: demand.to_string(),
            message: format!("Found {} hotels matching your preferences.", hotels.len()),
            parameters,
            hotels,
            extraction,
            filtering: Some(filtering),
        })
    }
}

async fn extract_with_fallback(
    model: &LanguageModel,
    demand: &str,
) -> Result<(ExtractedParameters, Strategy)> {
    match model.extract_parameters(demand).await {
        Ok(parameters) => Ok((parameters, Strategy::Llm)),
        Err(err) if err.is_quota_exceeded() => {
            warn!(error = %err, "model quota exhausted, extracting parameters with rules");
            Ok((rules::extract_parameters(demand), Strategy::RuleBased))
        }
        Err(err) => Err(err),
    }
}

async fn filter_with_fallback(
    model: &LanguageModel,
    demand: &str,
    parameters: &ExtractedParameters,
    candidates: &[HotelRecord],
) -> Result<(Vec<String>, Strategy)> {
    let projections: Vec<HotelProjection> = candidates.iter().map(HotelProjection::from).collect();

    match model.filter_hotels(demand, &projections).await {
        Ok(ids) => Ok((ids, Strategy::Llm)),
        Err(err) if err.is_quota_exceeded() => {
            warn!(error = %err, "model quota exhausted, ranking hotels with rules");
            Ok((rules::rank_hotels(parameters, candidates), Strategy::RuleBased))
        }
        Err(err) => Err(err),
    }
}

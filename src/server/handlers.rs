use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::{json, Value};

use super::{error::ApiError, AppState};
use crate::error::RecommendError;
use crate::types::{RecommendationRequest, RecommendationResponse};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Hotel Recommendation API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn recommendations_health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "recommendations" }))
}

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|rejection| RecommendError::validation(rejection.body_text()))?;

    let recommendation = state.recommender.recommend(&request.user_demand).await?;
    Ok(Json(recommendation.into()))
}

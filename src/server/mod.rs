pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Settings, core::Recommender};

pub use error::ApiError;

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub recommender: Recommender,
}

pub fn router(state: Arc<AppState>, settings: &Settings) -> Router {
    let recommendations = Router::new()
        .route("/recommend", post(handlers::recommend))
        .route("/health", get(handlers::recommendations_health));

    let prefix = settings.api_prefix.trim_end_matches('/');

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest(&format!("{prefix}/recommendations"), recommendations)
        .with_state(state)
        .layer(cors_layer(&settings.cors_origins))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Bind and serve until the process is stopped.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let recommender = Recommender::from_settings(settings)?;
    let state = Arc::new(AppState { recommender });
    let app = router(state, settings);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Hotel recommendation API listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

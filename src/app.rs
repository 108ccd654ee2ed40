use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::figma::client::{DesignApi, FigmaClient};

/// Shared application state, injected into every handler.
///
/// The token and timeout from [`AppConfig`] live inside the design API client.
#[derive(Clone)]
pub struct AppState {
    pub design_api: Arc<dyn DesignApi>,
}

impl AppState {
    /// Wire the production Figma client from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = FigmaClient::new(
            &config.figma_api_base,
            config.figma_token.clone(),
            config.upstream_timeout(),
        )?;

        Ok(Self {
            design_api: Arc::new(client),
        })
    }
}

/// Build the Axum router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/figma-node",
            get(crate::api::figma_node::figma_node_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

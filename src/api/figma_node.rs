use axum::extract::rejection::QueryRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::figma::client::{extract_document, DesignApi};
use crate::models::share_link::{InvalidLink, Locator};
use crate::rendering::prune::prune;

pub const MISSING_LINK: &str = "Missing figma_link query parameter";
pub const NODE_NOT_FOUND: &str = "Node not found in Figma";

/// Query string of `GET /figma-node`.
#[derive(Debug, Default, Deserialize)]
pub struct FigmaNodeQuery {
    pub figma_link: Option<String>,
    /// Accepted for compatibility; does not change the response.
    pub minified: Option<String>,
}

/// Core lookup logic — separated from the HTTP layer for testability.
///
/// Resolves the share link, fetches the node from the design API and returns
/// its pruned subtree.
pub async fn process_figma_node(
    api: &dyn DesignApi,
    query: FigmaNodeQuery,
) -> Result<Value, AppError> {
    let link = query
        .figma_link
        .filter(|link| !link.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_LINK.into()))?;

    let locator = Locator::from_share_link(&link).map_err(|e| {
        tracing::warn!("Rejected share link '{link}': {e}");
        AppError::BadRequest(e.to_string())
    })?;

    let minified = query.minified.as_deref().unwrap_or("false");
    tracing::info!(
        document_id = %locator.document_id,
        node_id = %locator.node_id,
        minified,
        "Resolved share link"
    );

    let document = api
        .file_nodes(&locator)
        .await?
        .and_then(|body| extract_document(body, &locator.node_id))
        .ok_or_else(|| {
            tracing::warn!(
                "Node '{}' not found in file '{}'",
                locator.node_id,
                locator.document_id
            );
            AppError::NotFound(NODE_NOT_FOUND.into())
        })?;

    Ok(prune(document))
}

/// Axum handler for `GET /figma-node`.
///
/// An unparseable query string (e.g. a repeated `figma_link`) is reported as
/// an invalid link rather than with axum's plain-text rejection.
pub async fn figma_node_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    query: Result<axum::extract::Query<FigmaNodeQuery>, QueryRejection>,
) -> Result<axum::Json<Value>, AppError> {
    let axum::extract::Query(query) = query.map_err(|rejection| {
        tracing::warn!("Rejected query string: {}", rejection.body_text());
        AppError::BadRequest(InvalidLink.to_string())
    })?;

    let pruned = process_figma_node(state.design_api.as_ref(), query).await?;
    Ok(axum::Json(pruned))
}

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::models::share_link::Locator;

/// Header carrying the personal access token on every Figma API request.
pub const TOKEN_HEADER: &str = "X-Figma-Token";

/// Trait for the upstream design API, enabling mock testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DesignApi: Send + Sync {
    /// Fetch the raw `GET /v1/files/{document_id}/nodes?ids={node_id}` body.
    ///
    /// Returns `None` when the upstream reports the file as not found.
    async fn file_nodes(&self, locator: &Locator) -> Result<Option<Value>, AppError>;
}

/// Pull `nodes[node_id].document` out of a file-nodes response.
///
/// A missing path or an explicit `null` both count as absent.
pub fn extract_document(mut body: Value, node_id: &str) -> Option<Value> {
    body.get_mut("nodes")?
        .get_mut(node_id)?
        .get_mut("document")
        .map(Value::take)
        .filter(|document| !document.is_null())
}

/// Figma REST implementation of DesignApi.
pub struct FigmaClient {
    http: reqwest::Client,
    api_base: url::Url,
    token: String,
}

impl FigmaClient {
    /// Create a client against `api_base` (e.g. `https://api.figma.com`).
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(api_base: &str, token: String, timeout: Duration) -> Result<Self, AppError> {
        let api_base = url::Url::parse(api_base)
            .map_err(|e| AppError::Config(format!("Invalid Figma API base '{api_base}': {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// Build the file-nodes URL for a locator.
    fn nodes_url(&self, locator: &Locator) -> Result<url::Url, AppError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!("Figma API base '{}' cannot be a base", self.api_base))
            })?
            .pop_if_empty()
            .extend(["v1", "files", locator.document_id.as_str(), "nodes"]);
        url.query_pairs_mut().append_pair("ids", &locator.node_id);
        Ok(url)
    }
}

#[async_trait]
impl DesignApi for FigmaClient {
    async fn file_nodes(&self, locator: &Locator) -> Result<Option<Value>, AppError> {
        let url = self.nodes_url(locator)?;

        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| {
                AppError::Upstream(format!(
                    "Request for file '{}' failed: {}",
                    locator.document_id, e
                ))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("Figma reported file '{}' as not found", locator.document_id);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Figma responded with {} for file '{}'",
                status, locator.document_id
            )));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            AppError::Upstream(format!(
                "Failed to decode Figma response for file '{}': {}",
                locator.document_id, e
            ))
        })?;

        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locator() -> Locator {
        Locator {
            document_id: "ABC123".to_string(),
            node_id: "1:2".to_string(),
        }
    }

    #[test]
    fn test_extract_document_present() {
        let body = json!({
            "name": "File",
            "nodes": {"1:2": {"document": {"id": "1:2", "name": "Frame"}, "components": {}}}
        });
        assert_eq!(
            extract_document(body, "1:2"),
            Some(json!({"id": "1:2", "name": "Frame"}))
        );
    }

    #[test]
    fn test_extract_document_absent() {
        assert_eq!(extract_document(json!({}), "1:2"), None);
        assert_eq!(extract_document(json!({"nodes": {}}), "1:2"), None);
        assert_eq!(extract_document(json!({"nodes": {"1:2": null}}), "1:2"), None);
        assert_eq!(extract_document(json!({"nodes": {"1:2": {}}}), "1:2"), None);
        assert_eq!(
            extract_document(json!({"nodes": {"1:2": {"document": null}}}), "1:2"),
            None
        );
        assert_eq!(extract_document(json!({"status": 403, "err": "Invalid token"}), "1:2"), None);
    }

    #[test]
    fn test_extract_document_other_node() {
        let body = json!({"nodes": {"9:9": {"document": {"id": "9:9"}}}});
        assert_eq!(extract_document(body, "1:2"), None);
    }

    #[test]
    fn test_nodes_url() {
        let client =
            FigmaClient::new("https://api.figma.com", "t".into(), Duration::from_secs(1)).unwrap();
        let url = client.nodes_url(&locator()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.figma.com/v1/files/ABC123/nodes?ids=1%3A2"
        );
    }

    #[test]
    fn test_nodes_url_with_base_path() {
        let client = FigmaClient::new(
            "http://127.0.0.1:8080/proxy/",
            "t".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        let url = client.nodes_url(&locator()).unwrap();
        assert_eq!(url.path(), "/proxy/v1/files/ABC123/nodes");
        assert_eq!(url.query(), Some("ids=1%3A2"));
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        let result = FigmaClient::new("not a url", "t".into(), Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::Value;

use figma_relay::app::{router, AppState};
use figma_relay::error::AppError;
use figma_relay::figma::client::{DesignApi, FigmaClient};
use figma_relay::models::share_link::Locator;

pub const TEST_TOKEN: &str = "figd_test_token";

/// Canned outcome for a document id.
#[derive(Clone)]
pub enum Canned {
    Body(Value),
    FileMissing,
    Failure,
}

/// In-memory design API keyed by document id. Records every locator it sees.
#[derive(Default)]
pub struct StaticDesignApi {
    files: HashMap<String, Canned>,
    pub calls: Mutex<Vec<Locator>>,
}

impl StaticDesignApi {
    pub fn with_file(mut self, document_id: &str, canned: Canned) -> Self {
        self.files.insert(document_id.to_string(), canned);
        self
    }
}

#[async_trait]
impl DesignApi for StaticDesignApi {
    async fn file_nodes(&self, locator: &Locator) -> Result<Option<Value>, AppError> {
        self.calls.lock().unwrap().push(locator.clone());
        match self.files.get(&locator.document_id) {
            Some(Canned::Body(body)) => Ok(Some(body.clone())),
            Some(Canned::FileMissing) | None => Ok(None),
            Some(Canned::Failure) => Err(AppError::Upstream("simulated outage".into())),
        }
    }
}

/// Build a `TestServer` around the relay router with the given design API.
pub fn server(api: Arc<dyn DesignApi>) -> axum_test::TestServer {
    let app_state = AppState { design_api: api };

    axum_test::TestServer::builder()
        .build(router(app_state))
        .expect("Failed to build TestServer")
}

/// A stand-in for the Figma REST API listening on an ephemeral local port.
pub struct FakeFigma {
    pub base_url: String,
    pub seen_tokens: Arc<Mutex<Vec<String>>>,
    pub seen_ids: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct FakeState {
    files: Arc<HashMap<String, (StatusCode, Value)>>,
    delay: Duration,
    seen_tokens: Arc<Mutex<Vec<String>>>,
    seen_ids: Arc<Mutex<Vec<String>>>,
}

impl FakeFigma {
    /// Serve `GET /v1/files/{file}/nodes` from `files`; unknown files get a 404.
    pub async fn start(files: HashMap<String, (StatusCode, Value)>, delay: Duration) -> Self {
        let seen_tokens = Arc::new(Mutex::new(Vec::new()));
        let seen_ids = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            files: Arc::new(files),
            delay,
            seen_tokens: seen_tokens.clone(),
            seen_ids: seen_ids.clone(),
        };

        let app = Router::new()
            .route("/v1/files/{file}/nodes", get(fake_file_nodes))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Figma listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake Figma crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            seen_tokens,
            seen_ids,
        }
    }

    pub fn client(&self, timeout: Duration) -> FigmaClient {
        FigmaClient::new(&self.base_url, TEST_TOKEN.to_string(), timeout)
            .expect("Failed to build FigmaClient")
    }
}

async fn fake_file_nodes(
    axum::extract::State(state): axum::extract::State<FakeState>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = headers.get("x-figma-token").and_then(|v| v.to_str().ok()) {
        state.seen_tokens.lock().unwrap().push(token.to_string());
    }
    if let Some(ids) = params.get("ids") {
        state.seen_ids.lock().unwrap().push(ids.clone());
    }

    tokio::time::sleep(state.delay).await;

    match state.files.get(&file) {
        Some((status, body)) => (*status, axum::Json(body.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({"status": 404, "err": "Not found"})),
        )
            .into_response(),
    }
}

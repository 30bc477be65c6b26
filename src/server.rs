//! HTTP surface for the reply engine.
//!
//! ## Endpoints
//!
//! - `POST /predict`: `{ "text": ... }` in, [`Reply`] out. Always `200`:
//!   classification failures are reported in the reply's `error` field.
//! - `GET /`: health message.
//! - `GET /test`: runs the fixed probe texts.
//! - `GET /emotions`: taxonomy and dataset summary.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::engine::{ProbeResult, Reply, ReplyEngine};
use crate::error::{MoodError, Result};

/// Message returned by `GET /`.
pub const HEALTH_MESSAGE: &str = "Celebrity emotion reply API is running!";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Free-form user text. Missing text is treated as empty.
    #[serde(default)]
    pub text: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Body of `GET /test`.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestResponse {
    pub test_results: Vec<ProbeResult>,
}

// ---------------------------------------------------------------------------
// MoodServer
// ---------------------------------------------------------------------------

/// A running HTTP server. Aborted on drop.
pub struct MoodServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MoodServer {
    /// Bind `config.host:config.port` and serve `engine` in a background task.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Server`] if the address cannot be bound.
    pub async fn start(engine: Arc<ReplyEngine>, config: &ServerConfig) -> Result<Self> {
        let app = router(engine);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| MoodError::Server(format!("bind {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| MoodError::Server(format!("failed to get local addr: {e}")))?;

        info!("reply server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("reply server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// The bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The bound port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Stop serving.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for MoodServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The application router, without a listener.
pub fn router(engine: Arc<ReplyEngine>) -> Router {
    Router::new()
        .route("/", get(handle_health))
        .route("/predict", post(handle_predict))
        .route("/test", get(handle_self_test))
        .route("/emotions", get(handle_emotions))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_owned(),
    })
}

async fn handle_predict(
    State(engine): State<Arc<ReplyEngine>>,
    Json(request): Json<PredictRequest>,
) -> Json<Reply> {
    Json(engine.reply(&request.text).await)
}

async fn handle_self_test(State(engine): State<Arc<ReplyEngine>>) -> Json<SelfTestResponse> {
    Json(SelfTestResponse {
        test_results: engine.self_test().await,
    })
}

async fn handle_emotions(State(engine): State<Arc<ReplyEngine>>) -> Json<Catalog> {
    Json(engine.catalog().clone())
}

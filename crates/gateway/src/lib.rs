//! HTTP gateway for Askdesk.
//!
//! Endpoints:
//!
//! - `POST /ask`    — answer one question
//! - `GET  /health` — liveness and version
//!
//! Built on Axum. The router holds a single shared [`Responder`]; there is
//! no other per-process state.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Deserializer, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use askdesk_agent::Responder;
use askdesk_core::error::{Error, HistoryError};
use askdesk_core::record::ChatRecord;

/// Largest `/ask` body that is read; anything longer counts as unreadable.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

type SharedResponder = Arc<Responder>;

/// Body of `POST /ask`.
///
/// Anything unusable (missing key, non-string value, a body that is not
/// JSON at all, a body over [`MAX_BODY_BYTES`]) becomes the empty question.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
}

impl AskRequest {
    /// Read at most [`MAX_BODY_BYTES`] of `body` and parse it.
    pub async fn read(body: Body) -> Self {
        match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => Self::from_body(&bytes),
            Err(e) => {
                debug!(error = %e, "Unreadable /ask body, using empty question");
                Self::default()
            }
        }
    }

    /// Parse a raw request body, falling back to the empty question.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Unreadable /ask body, using empty question");
                Self::default()
            }
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned by gateway handlers.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        Self(Error::History(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::History(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record chat history",
            ),
            Error::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Provider unavailable"),
        };
        error!(error = %self.0, status = status.as_u16(), "Request failed");
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the Axum router.
///
/// Layers: permissive CORS, HTTP trace logging.
pub fn build_router(responder: SharedResponder) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .route("/health", get(health_handler))
        .with_state(responder)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start(config: askdesk_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let responder = Arc::new(Responder::from_config(&config)?);
    info!(
        provider = %responder.provider_name(),
        model = %responder.settings().model,
        entries = responder.knowledge().len(),
        history = %config.history.path.display(),
        "Responder ready"
    );

    let app = build_router(responder);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ask_handler(
    State(responder): State<SharedResponder>,
    body: Body,
) -> Result<Json<ChatRecord>, ApiError> {
    let request = AskRequest::read(body).await;
    info!(question_len = request.question.len(), "/ask request");

    let record = responder.respond(&request.question).await?;
    Ok(Json(record))
}

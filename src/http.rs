// src/http.rs
//! HTTP surface for document retrieval.
//!
//! GET /documents/{*reference} — decrypted document bytes
//! GET /health — liveness probe

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::error;

use crate::config::Config;
use crate::consts::DOCUMENT_CACHE_CONTROL;
use crate::core::EncryptedBlobStore;
use crate::error::Result;
use crate::gateway::{DocumentResponse, RetrievalGateway};

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<RetrievalGateway>,
    /// Bearer token required on document routes, if configured
    pub access_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(gateway: RetrievalGateway, access_token: Option<String>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            access_token: access_token.map(Arc::from),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(EncryptedBlobStore::from_config(config)?);
        Ok(Self::new(
            RetrievalGateway::new(store),
            config.server.access_token.clone(),
        ))
    }
}

/// Build the axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let documents = Router::new()
        .route("/documents/{*reference}", get(show_document))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(documents)
        .with_state(state)
}

/// Reject document requests without the configured bearer token.
async fn require_access_token(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(expected) = &state.access_token {
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if !presented.is_some_and(|token| token_matches(token, expected)) {
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }
    next.run(req).await
}

/// Constant-time token comparison; only the length is allowed to leak
fn token_matches(presented: &str, expected: &str) -> bool {
    presented.len() == expected.len()
        && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

/// GET /documents/{*reference}
///
/// 200 with the decrypted bytes, 404 when absent, 500 with a generic message
/// on any internal failure.
async fn show_document(State(state): State<AppState>, Path(reference): Path<String>) -> Response {
    let reference = reference
        .strip_prefix('/')
        .map(str::to_owned)
        .unwrap_or(reference);
    let gateway = state.gateway.clone();

    let result = tokio::task::spawn_blocking(move || gateway.show(&reference)).await;

    match result {
        Ok(DocumentResponse::Found {
            bytes,
            content_type,
        }) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, DOCUMENT_CACHE_CONTROL),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            bytes,
        )
            .into_response(),
        Ok(DocumentResponse::NotFound) => (StatusCode::NOT_FOUND, "File not found").into_response(),
        Ok(DocumentResponse::Failed(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving file").into_response()
        }
        Err(e) => {
            error!("document retrieval task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving file").into_response()
        }
    }
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Patient Document Vault",
    }))
}

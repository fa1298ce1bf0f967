//! HTTP application: router, shared state, and request handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use sitemeta_core::defaults::{MAX_BODY_BYTES, METADATA_TAG};
use sitemeta_core::{render_robots_txt, PageMetadataOverride};

use crate::services::{MetadataService, Revalidator};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically for log
/// correlation when webhook deliveries and manual revalidations overlap.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse allowed CORS origins from `CORS_ALLOWED_ORIGINS` (comma-separated).
///
/// Defaults to the site's public domain plus localhost for development.
fn parse_allowed_origins() -> Vec<axum::http::HeaderValue> {
    let origins = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| {
        format!(
            "{},http://localhost:3000",
            sitemeta_core::defaults::FALLBACK_CANONICAL_URL
        )
    });

    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<axum::http::HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Metadata resolution and synthesis.
    pub metadata: MetadataService,
    /// Tag revalidation through the abstract cache capability.
    pub revalidator: Revalidator,
    /// Shared secret for webhook bearer-token validation (None = open endpoint).
    pub webhook_secret: Option<String>,
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

/// API-level error with a structured JSON body.
pub enum ApiError {
    Unauthorized(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

/// Acknowledgement returned by the webhook endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub timestamp: String,
}

/// Acknowledgement returned by the manual revalidation endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateAck {
    pub revalidated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

/// ISO 8601 timestamp with millisecond precision.
fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/webhooks/sanity", post(sanity_webhook))
        .route("/api/revalidate", post(revalidate_post).get(revalidate_get))
        .route("/api/metadata", get(get_metadata))
        .route("/api/page-metadata", get(get_page_metadata))
        .route("/robots.txt", get(robots_txt))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parse_allowed_origins()))
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// WEBHOOK ENDPOINT
// =============================================================================

/// Validate the webhook bearer token when a shared secret is configured.
///
/// No configured secret means the endpoint is deliberately open (documented
/// permissive default for low-risk deployments).
fn authorize_webhook(secret: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let expected = format!("Bearer {}", secret);
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected.as_str()) {
        warn!(subsystem = "api", op = "webhook", "Invalid webhook signature");
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }
    Ok(())
}

/// Content-change webhook from the Sanity content store.
///
/// States: received → (optionally) authenticated → classified → invalidated
/// → acknowledged, or received → rejected. Any body carrying a `_type`
/// discriminator invalidates the `"metadata"` tag; a body without one is a
/// tolerated no-op. Parse and invalidation failures surface as structured
/// 500 bodies, never raw errors.
async fn sanity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Err(e) = authorize_webhook(state.webhook_secret.as_deref(), &headers) {
        return e.into_response();
    }

    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            error!(subsystem = "api", op = "webhook", error = %e, "Failed to parse webhook body");
            return webhook_internal_error();
        }
    };

    // Presence of `_type` triggers invalidation regardless of its value.
    // Non-string discriminators are echoed in their JSON rendering.
    let content_type = payload.get("_type").map(|v| match v.as_str() {
        Some(s) => s.to_string(),
        None => v.to_string(),
    });

    let Some(content_type) = content_type else {
        return Json(WebhookAck {
            success: false,
            message: "No content type found, nothing revalidated".to_string(),
            content_type: None,
            timestamp: timestamp(),
        })
        .into_response();
    };

    // "metadata" and "settings" are the two known types; any other content
    // change still refreshes the metadata bucket to keep it safe.
    match content_type.as_str() {
        "metadata" => info!(content_type = %content_type, "Metadata updated, revalidating metadata cache"),
        "settings" => info!(content_type = %content_type, "Settings updated, revalidating metadata cache"),
        other => info!(content_type = %other, "Content updated, revalidating metadata cache"),
    }

    let outcome = state.revalidator.revalidate(METADATA_TAG).await;
    if !outcome.success {
        error!(subsystem = "api", op = "webhook", message = %outcome.message, "Webhook invalidation failed");
        return webhook_internal_error();
    }

    Json(WebhookAck {
        success: true,
        message: "Webhook processed successfully".to_string(),
        content_type: Some(content_type),
        timestamp: timestamp(),
    })
    .into_response()
}

fn webhook_internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": "Internal server error",
            "timestamp": timestamp(),
        })),
    )
        .into_response()
}

// =============================================================================
// MANUAL REVALIDATION ENDPOINTS
// =============================================================================

/// Generic revalidation webhook: any body carrying `_type` refreshes the
/// metadata bucket; anything else acknowledges as a no-op.
async fn revalidate_post(State(state): State<AppState>, body: String) -> Response {
    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            error!(subsystem = "api", op = "revalidate", error = %e, "Failed to parse revalidation body");
            return revalidate_internal_error();
        }
    };

    if payload.get("_type").is_none() {
        return Json(RevalidateAck {
            revalidated: false,
            tag: None,
            message: Some("No valid content type found".to_string()),
            timestamp: timestamp(),
        })
        .into_response();
    }

    let outcome = state.revalidator.revalidate(METADATA_TAG).await;
    if !outcome.success {
        return revalidate_internal_error();
    }

    Json(RevalidateAck {
        revalidated: true,
        tag: None,
        message: Some("Metadata cache revalidated".to_string()),
        timestamp: timestamp(),
    })
    .into_response()
}

fn revalidate_internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "revalidated": false,
            "error": "Internal server error",
            "timestamp": timestamp(),
        })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct RevalidateParams {
    tag: Option<String>,
}

/// Manual revalidation by tag name (useful for admin tooling and testing).
async fn revalidate_get(
    State(state): State<AppState>,
    Query(params): Query<RevalidateParams>,
) -> Response {
    match params.tag.as_deref() {
        Some(METADATA_TAG) => {
            let outcome = state.revalidator.revalidate(METADATA_TAG).await;
            if !outcome.success {
                return revalidate_internal_error();
            }
            Json(RevalidateAck {
                revalidated: true,
                tag: Some(METADATA_TAG.to_string()),
                message: None,
                timestamp: timestamp(),
            })
            .into_response()
        }
        _ => Json(RevalidateAck {
            revalidated: false,
            tag: None,
            message: Some("Missing or invalid tag parameter. Use ?tag=metadata".to_string()),
            timestamp: timestamp(),
        })
        .into_response(),
    }
}

// =============================================================================
// METADATA ENDPOINTS
// =============================================================================

/// The normalized site-metadata record (all-null on upstream failure).
async fn get_metadata(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metadata.resolve().await)
}

/// The synthesized page-metadata payload, overrides via query parameters.
async fn get_page_metadata(
    State(state): State<AppState>,
    Query(overrides): Query<PageMetadataOverride>,
) -> impl IntoResponse {
    Json(state.metadata.page_metadata(Some(&overrides)).await)
}

/// robots.txt rendered from the resolved record (default-allow).
async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let site = state.metadata.resolve().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots_txt(&site),
    )
}

// =============================================================================
// TESTS
// =============================================================================

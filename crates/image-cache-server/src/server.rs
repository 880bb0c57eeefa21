//! HTTP server for the image cache
//!
//! Every request path must be `/<digits>`. GET serves from the cache and
//! falls back to the origin on a miss, PUT stores the request body, DELETE
//! removes the entry.

use crate::config::Config;
use crate::types::{CacheMethod, EntryResponse, EntryStatus, ErrorResponse};
use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use cache_key::CacheKey;
use file_image_cache::{CacheError, ImageCache};
use origin_client::{Origin, OriginError};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error, info, warn};

const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: ImageCache,
    pub origin: Arc<dyn Origin>,
}

impl ServerState {
    pub fn new(cache: ImageCache, origin: Arc<dyn Origin>) -> Self {
        Self { cache, origin }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C or SIGTERM
pub async fn start_server(state: SharedState, config: &Config) -> std::io::Result<()> {
    let router = create_router(state.clone(), config.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = state.cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        writes = stats.writes,
        deletes = stats.deletes,
        "Server stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Route a request by key and method
async fn dispatch(State(state): State<SharedState>, request: Request) -> Response {
    let key = match CacheKey::from_path(request.uri().path()) {
        Ok(key) => key,
        Err(e) => {
            debug!(method = %request.method(), error = %e, "Rejected request path");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match CacheMethod::from(request.method()) {
        CacheMethod::Get => get_image(&state, &key).await,
        CacheMethod::Put => {
            let body = match Bytes::from_request(request, &state).await {
                Ok(body) => body,
                Err(rejection) => {
                    warn!(key = %key, error = %rejection, "Failed to read request body");
                    return error_response(rejection.status(), rejection.body_text());
                }
            };
            put_image(&state, &key, &body).await
        }
        CacheMethod::Delete => delete_image(&state, &key).await,
        CacheMethod::Other => method_not_allowed(request.method()),
    }
}

async fn get_image(state: &ServerState, key: &CacheKey) -> Response {
    match fetch_and_cache_image(state, key).await {
        Ok((data, from_cache)) => image_response(data, from_cache),
        Err(e) => {
            warn!(key = %key, error = %e, "Image unavailable");
            error_response(StatusCode::NOT_FOUND, format!("Image {} not found", key))
        }
    }
}

/// Read an image from the cache, falling back to the origin.
///
/// A fetched image is written back to the cache before it is returned. A
/// failed write-back is logged and the image is still served.
async fn fetch_and_cache_image(
    state: &ServerState,
    key: &CacheKey,
) -> Result<(Vec<u8>, bool), OriginError> {
    if let Ok(data) = state.cache.read(key).await {
        return Ok((data, true));
    }

    info!(key = %key, "Cache miss, fetching from origin");
    let data = state.origin.fetch(key).await?;

    if let Err(e) = state.cache.write(key, &data).await {
        warn!(key = %key, error = %e, "Failed to cache image");
    }

    Ok((data, false))
}

async fn put_image(state: &ServerState, key: &CacheKey, body: &[u8]) -> Response {
    match state.cache.write(key, body).await {
        Ok(()) => {
            info!(key = %key, size = body.len(), "Stored image");
            entry_response(StatusCode::CREATED, key, EntryStatus::Created)
        }
        Err(e) => {
            error!(key = %key, error = %e, "Failed to store image");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to store image {}", key),
            )
        }
    }
}

async fn delete_image(state: &ServerState, key: &CacheKey) -> Response {
    match state.cache.delete(key).await {
        Ok(()) => {
            info!(key = %key, "Deleted image");
            entry_response(StatusCode::OK, key, EntryStatus::Deleted)
        }
        Err(CacheError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, format!("Image {} is not cached", key))
        }
        Err(e) => {
            error!(key = %key, error = %e, "Failed to delete image");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to delete image {}", key),
            )
        }
    }
}

fn method_not_allowed(method: &Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("GET, PUT, DELETE"))],
        Json(ErrorResponse {
            error: format!("Method {} not allowed", method),
        }),
    )
        .into_response()
}

fn image_response(data: Vec<u8>, from_cache: bool) -> Response {
    let cache_header = if from_cache { "HIT" } else { "MISS" };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(IMAGE_CONTENT_TYPE)),
            (X_CACHE.clone(), HeaderValue::from_static(cache_header)),
        ],
        Body::from(data),
    )
        .into_response()
}

fn entry_response(status: StatusCode, key: &CacheKey, entry_status: EntryStatus) -> Response {
    (
        status,
        Json(EntryResponse {
            key: key.to_string(),
            status: entry_status,
        }),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Request handler panicked");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

//! HTTP adapters - REST API implementations.

pub mod approval;
pub mod error;

use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use approval::{approval_router, ApprovalAppState};
pub use error::{ApiError, ErrorResponse};

/// Full application router with CORS, a request timeout and tracing.
///
/// An empty origin list allows any origin.
pub fn app_router(
    state: ApprovalAppState,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    approval_router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

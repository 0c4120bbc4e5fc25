pub mod analytics;
pub mod auth;
pub mod goals;
pub mod middleware;
pub mod rest;
pub mod sessions;
pub mod state;

pub use middleware::require_auth;

use axum::http::StatusCode;
use cadence_core::ports::PortError;
use tracing::error;

/// Maps a port failure onto an HTTP response, logging the underlying error.
/// `context` doubles as the client-facing message for unexpected failures.
pub(crate) fn port_error_response(e: PortError, context: &str) -> (StatusCode, String) {
    error!("{}: {:?}", context, e);
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, context.to_string()),
    }
}

//! services/api/src/web/middleware.rs
//!
//! Guard for routes that need someone logged in.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;

/// Middleware that requires an active profile.
///
/// If one is logged in, the `Profile` is inserted into request extensions for
/// handlers to use. Otherwise returns 401 Unauthorized.
pub async fn require_profile(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(profile) = state.profiles.active() else {
        debug!(path = %req.uri().path(), "Rejected request without an active profile");
        return Err(StatusCode::UNAUTHORIZED);
    };

    req.extensions_mut().insert(profile);
    Ok(next.run(req).await)
}

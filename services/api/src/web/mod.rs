pub mod auth;
pub mod middleware;
pub mod narration;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Re-export the handlers the router is built from.
pub use auth::{login_handler, logout_handler, signup_handler};
pub use middleware::require_profile;
pub use rest::{
    complete_story_handler, get_language_handler, get_story_handler, list_stories_handler,
    progress_handler, put_language_handler, translate_handler, ui_strings_handler, ApiDoc,
};
pub use state::AppState;
pub use ws_handler::ws_handler;

/// Requests carry short JSON bodies only.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the complete application: the JSON API, the narration socket,
/// the Swagger UI, and the static app shell as the fallback.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no profile required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/stories", get(list_stories_handler))
        .route("/stories/{id}", get(get_story_handler))
        .route("/translate", post(translate_handler))
        .route("/ui-strings", get(ui_strings_handler))
        .route(
            "/language",
            get(get_language_handler).put(put_language_handler),
        );

    // Protected routes (active profile required)
    let protected_routes = Router::new()
        .route("/stories/{id}/complete", post(complete_story_handler))
        .route("/progress", get(progress_handler))
        .route("/narration", get(ws_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_profile,
        ));

    let mut api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));
    if let Some(cors) = cors_layer(app_state.config.cors_origin.as_deref()) {
        api_router = api_router.layer(cors);
    }
    let api_router = api_router.with_state(app_state.clone());

    // Unknown paths get the app shell so client-side routes survive a reload.
    let static_dir = &app_state.config.static_dir;
    let app_shell =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(app_shell)
}

/// The app is normally served from the same origin; a separate dev server
/// needs its origin allowed explicitly.
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let origin = match origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(e) => {
            warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    )
}

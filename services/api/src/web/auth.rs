//! services/api/src/web/auth.rs
//!
//! Profile endpoints for signup, login, and logout.
//!
//! The device holds a single profile, so "logged in" is a flag on the host
//! rather than a per-client session.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use storyland_core::{Profile, SignupForm};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::core_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    /// A number or a numeric string, as HTML forms send it. Omitted, null,
    /// or anything unreadable counts as a missing field.
    #[serde(default, deserialize_with = "lenient_age")]
    #[schema(value_type = Option<i64>)]
    pub age: Option<i64>,
    pub pin: String,
    pub confirm_pin: String,
}

impl From<SignupRequest> for SignupForm {
    fn from(req: SignupRequest) -> Self {
        Self {
            name: req.name,
            age: req.age,
            pin: req.pin,
            confirm_pin: req.confirm_pin,
        }
    }
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(age)
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub name: String,
    pub pin: String,
}

/// A profile as shown to the client. The PIN never leaves the host.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            age: profile.age,
            created_at: profile.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub profile: ProfileResponse,
    pub total_stars: u32,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create the device profile
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "One or more signup rules were violated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state
        .profiles
        .create_profile(req.into())
        .await
        .map_err(|e| {
            error!("Failed to create profile: {}", e);
            core_error_response(&e)
        })?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

/// POST /auth/login - Log in with name and PIN
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "No profile, or the name or PIN is wrong"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state
        .profiles
        .authenticate(&req.name, &req.pin)
        .await
        .map_err(|e| core_error_response(&e))?;

    let total_stars = state.ledger.total_stars(profile.id).await.map_err(|e| {
        error!("Failed to read progress for {}: {}", profile.id, e);
        core_error_response(&e)
    })?;

    Ok(Json(LoginResponse {
        profile: profile.into(),
        total_stars,
    }))
}

/// POST /auth/logout - Clear the active profile
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; succeeds even if nobody was logged in")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if let Some(profile) = state.profiles.logout() {
        info!(profile_id = %profile.id, "Profile logged out");
    }
    StatusCode::OK
}

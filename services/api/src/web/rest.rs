//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::core_error_response;
use crate::web::auth::{LoginRequest, LoginResponse, ProfileResponse, SignupRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use storyland_core::{CompletionOutcome, Language, Profile, ProgressSummary, Story, StoryId, Tier};
use tracing::{error, info, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        list_stories_handler,
        get_story_handler,
        complete_story_handler,
        progress_handler,
        translate_handler,
        ui_strings_handler,
        get_language_handler,
        put_language_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            ProfileResponse,
            LoginResponse,
            StoryResponse,
            VocabularyItem,
            WordCue,
            CompletionResponse,
            ProgressResponse,
            CompletedStoryItem,
            StoryProgressItem,
            TranslateRequest,
            TranslateResponse,
            LanguageRequest,
            LanguageResponse,
        )
    ),
    tags(
        (name = "StoryLand API", description = "Local endpoints for the bilingual children's story reader.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Selects the content language; the stored preference is used when omitted.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LanguageQuery {
    /// `en` or `ar`.
    pub lang: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct VocabularyItem {
    pub word: String,
    pub definition: String,
}

#[derive(Serialize, ToSchema)]
pub struct WordCue {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    #[schema(value_type = u32)]
    pub id: StoryId,
    pub title: String,
    pub description: String,
    pub content: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub illustration: String,
    pub audio_url: String,
    pub timestamps: Vec<WordCue>,
    /// Stars the logged-in profile earned here. Absent when nobody is
    /// logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl StoryResponse {
    fn with_progress(mut self, progress: Option<&ProgressSummary>) -> Self {
        if let Some(summary) = progress {
            let stars = summary.stars_for(self.id);
            self.completed = Some(stars.is_some());
            self.stars = Some(stars.unwrap_or(0));
        }
        self
    }
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            title: story.title,
            description: story.description,
            content: story.content,
            vocabulary: story
                .vocabulary
                .into_iter()
                .map(|v| VocabularyItem {
                    word: v.word,
                    definition: v.definition,
                })
                .collect(),
            illustration: story.illustration,
            audio_url: story.audio_url,
            timestamps: story
                .timestamps
                .into_iter()
                .map(|t| WordCue {
                    word: t.word,
                    start: t.start,
                    end: t.end,
                })
                .collect(),
            stars: None,
            completed: None,
        }
    }
}

/// The result of finishing a story.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    #[schema(value_type = u32)]
    pub story_id: StoryId,
    pub first_completion: bool,
    pub stars_awarded: u32,
    pub total_stars: u32,
    pub completed_count: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStoryItem {
    #[schema(value_type = u32)]
    pub story_id: StoryId,
    pub stars: u32,
    pub completed_at: DateTime<Utc>,
}

/// One catalog story as seen by the logged-in profile.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryProgressItem {
    #[schema(value_type = u32)]
    pub story_id: StoryId,
    pub completed: bool,
    pub stars: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub total_stars: u32,
    pub completed_count: usize,
    pub total_stories: usize,
    /// `completedCount / totalStories`, rounded to a whole percent.
    pub percent_complete: u32,
    pub completed: Vec<CompletedStoryItem>,
    /// Every catalog story in id order, completed or not.
    pub stories: Vec<StoryProgressItem>,
}

impl ProgressResponse {
    fn new(summary: ProgressSummary, catalog: &[Story]) -> Self {
        let stories = catalog
            .iter()
            .map(|story| {
                let stars = summary.stars_for(story.id);
                StoryProgressItem {
                    story_id: story.id,
                    completed: stars.is_some(),
                    stars: stars.unwrap_or(0),
                }
            })
            .collect();
        Self {
            total_stars: summary.total_stars,
            completed_count: summary.completed_count,
            total_stories: catalog.len(),
            percent_complete: summary.percent_complete(catalog.len()),
            completed: summary
                .completed
                .into_iter()
                .map(|c| CompletedStoryItem {
                    story_id: c.story_id,
                    stars: c.stars,
                    completed_at: c.completed_at,
                })
                .collect(),
            stories,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct TranslateRequest {
    pub text: String,
    /// `en` or `ar`.
    pub target: String,
}

#[derive(Serialize, ToSchema)]
pub struct TranslateResponse {
    pub text: String,
    /// Which cache tier answered: `ui_dictionary`, `durable`, `volatile`,
    /// `remote`, `passthrough` or `fallback`.
    pub source: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LanguageRequest {
    pub language: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub language: String,
    /// Whether stories are available fully translated into `language`.
    pub mirror_ready: bool,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_language(raw: &str) -> Result<Language, (StatusCode, String)> {
    raw.parse::<Language>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

/// The language named in the query, or the stored preference.
async fn requested_language(
    state: &AppState,
    query: &LanguageQuery,
) -> Result<Language, (StatusCode, String)> {
    match query.lang.as_deref() {
        Some(raw) => parse_language(raw),
        None => state.preferences.load_language().await.map_err(|e| {
            error!("Failed to read the language preference: {}", e);
            core_error_response(&e)
        }),
    }
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::UiDictionary => "ui_dictionary",
        Tier::Durable => "durable",
        Tier::Volatile => "volatile",
        Tier::Remote => "remote",
        Tier::Passthrough => "passthrough",
        Tier::Fallback => "fallback",
    }
}

/// The summary of whoever is logged in, used to badge story cards.
async fn active_progress(
    state: &AppState,
) -> Result<Option<ProgressSummary>, (StatusCode, String)> {
    let Some(profile) = state.profiles.active() else {
        return Ok(None);
    };
    state.ledger.summary(profile.id).await.map(Some).map_err(|e| {
        error!("Failed to read progress for {}: {}", profile.id, e);
        core_error_response(&e)
    })
}

fn mirror_ready(state: &AppState, language: Language) -> bool {
    language.is_source() || state.catalog.has_mirror(language)
}

/// Builds and installs the story mirror for `language` if the catalog has
/// none yet. An incomplete translation is not installed, so the next switch
/// retries; until then the catalog keeps serving English.
pub async fn ensure_mirror(
    state: &AppState,
    language: Language,
) -> Result<bool, (StatusCode, String)> {
    if mirror_ready(state, language) {
        return Ok(true);
    }

    let translated = state
        .translator
        .translate_all(state.catalog.english(), language)
        .await;
    if !translated.complete {
        warn!(%language, "Story translation incomplete; serving English for now");
        return Ok(false);
    }

    state
        .catalog
        .install_mirror(language, translated.stories)
        .await
        .map_err(|e| {
            error!("Failed to install the {} story mirror: {}", language, e);
            core_error_response(&e)
        })?;
    Ok(true)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every story in the requested language.
#[utoipa::path(
    get,
    path = "/stories",
    params(LanguageQuery),
    responses(
        (status = 200, description = "All stories, English where no translation exists", body = [StoryResponse]),
        (status = 400, description = "Unknown language code")
    )
)]
pub async fn list_stories_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LanguageQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = requested_language(&state, &query).await?;
    let progress = active_progress(&state).await?;
    let stories: Vec<StoryResponse> = state
        .catalog
        .stories(language)
        .into_iter()
        .map(|story| StoryResponse::from(story).with_progress(progress.as_ref()))
        .collect();
    Ok(Json(stories))
}

/// Fetch one story.
#[utoipa::path(
    get,
    path = "/stories/{id}",
    params(
        ("id" = u32, Path, description = "The story id."),
        LanguageQuery
    ),
    responses(
        (status = 200, description = "The story", body = StoryResponse),
        (status = 400, description = "Unknown language code"),
        (status = 404, description = "No story with this id")
    )
)]
pub async fn get_story_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StoryId>,
    Query(query): Query<LanguageQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = requested_language(&state, &query).await?;
    let story = state
        .catalog
        .find_story(id, language)
        .map_err(|e| core_error_response(&e))?;
    let progress = active_progress(&state).await?;
    Ok(Json(StoryResponse::from(story).with_progress(progress.as_ref())))
}

/// Mark a story as finished by the logged-in profile.
///
/// Stars are awarded on the first completion only; repeating it is harmless.
#[utoipa::path(
    post,
    path = "/stories/{id}/complete",
    params(("id" = u32, Path, description = "The story id.")),
    responses(
        (status = 200, description = "Completion recorded", body = CompletionResponse),
        (status = 401, description = "Nobody is logged in"),
        (status = 404, description = "No story with this id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn complete_story_handler(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(id): Path<StoryId>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .catalog
        .find_story(id, Language::SOURCE)
        .map_err(|e| core_error_response(&e))?;

    let response = record_completion(&state, &profile, id).await?;
    Ok(Json(response))
}

/// Records a completion and reports the resulting totals. Shared with the
/// narration socket.
pub async fn record_completion(
    state: &AppState,
    profile: &Profile,
    story_id: StoryId,
) -> Result<CompletionResponse, (StatusCode, String)> {
    let outcome = state
        .ledger
        .record_completion(profile.id, story_id, state.config.stars_per_story)
        .await
        .map_err(|e| {
            error!("Failed to record completion of story {}: {}", story_id, e);
            core_error_response(&e)
        })?;
    let summary = state.ledger.summary(profile.id).await.map_err(|e| {
        error!("Failed to read progress for {}: {}", profile.id, e);
        core_error_response(&e)
    })?;

    let (first_completion, stars_awarded) = match outcome {
        CompletionOutcome::FirstCompletion { stars } => (true, stars),
        CompletionOutcome::AlreadyCompleted => (false, 0),
    };
    Ok(CompletionResponse {
        story_id,
        first_completion,
        stars_awarded,
        total_stars: summary.total_stars,
        completed_count: summary.completed_count,
    })
}

/// Progress of the logged-in profile.
#[utoipa::path(
    get,
    path = "/progress",
    responses(
        (status = 200, description = "Star total, completion share, and per-story state", body = ProgressResponse),
        (status = 401, description = "Nobody is logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = state.ledger.summary(profile.id).await.map_err(|e| {
        error!("Failed to read progress for {}: {}", profile.id, e);
        core_error_response(&e)
    })?;
    Ok(Json(ProgressResponse::new(summary, state.catalog.english())))
}

/// Translate a single string.
///
/// Never fails on a translation problem: the source text comes back with
/// `source` set to `fallback`.
#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text, or the source text on failure", body = TranslateResponse),
        (status = 400, description = "Unknown language code")
    )
)]
pub async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let target = parse_language(&req.target)?;
    let resolution = state.translator.resolve(&req.text, target).await;
    Ok(Json(TranslateResponse {
        text: resolution.text,
        source: tier_label(resolution.tier).to_string(),
    }))
}

/// The UI string table for a language.
#[utoipa::path(
    get,
    path = "/ui-strings",
    params(LanguageQuery),
    responses(
        (status = 200, description = "UI string id to display text", body = BTreeMap<String, String>),
        (status = 400, description = "Unknown language code")
    )
)]
pub async fn ui_strings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LanguageQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = requested_language(&state, &query).await?;
    Ok(Json(state.translator.translate_ui(language)))
}

/// The stored language preference.
#[utoipa::path(
    get,
    path = "/language",
    responses(
        (status = 200, description = "Current language", body = LanguageResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_language_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = state.preferences.load_language().await.map_err(|e| {
        error!("Failed to read the language preference: {}", e);
        core_error_response(&e)
    })?;
    Ok(Json(LanguageResponse {
        language: language.code().to_string(),
        mirror_ready: mirror_ready(&state, language),
    }))
}

/// Switch the app language.
///
/// Switching to a translated language builds its story mirror the first time.
#[utoipa::path(
    put,
    path = "/language",
    request_body = LanguageRequest,
    responses(
        (status = 200, description = "Preference saved", body = LanguageResponse),
        (status = 400, description = "Unknown language code"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn put_language_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LanguageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = parse_language(&req.language)?;
    state
        .preferences
        .save_language(language)
        .await
        .map_err(|e| {
            error!("Failed to save the language preference: {}", e);
            core_error_response(&e)
        })?;
    info!(%language, "Language switched");

    let mirror_ready = ensure_mirror(&state, language).await?;
    Ok(Json(LanguageResponse {
        language: language.code().to_string(),
        mirror_ready,
    }))
}

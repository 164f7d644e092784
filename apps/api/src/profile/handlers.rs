//! Axum route handlers for the profile workflow.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tera::Context;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileInput, Recommendation, UserProfile, MAX_TEXT_FIELD_CHARS};
use crate::profile::workflow::{
    create_profile, generate_quiz, get_result, recommend_for_profile, submit_quiz,
};
use crate::render::{render_page, PROFILE_PAGE, QUIZ_PAGE, RESULT_PAGE};
use crate::session::{session_cookie, session_id_from_headers};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub success: bool,
    pub pid: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub pid: String,
    /// A request without `answers` records an empty list.
    #[serde(default)]
    pub answers: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub pid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("max_text_chars", &MAX_TEXT_FIELD_CHARS);
    render_page(&state.templates, PROFILE_PAGE, &context)
}

/// POST /profile
///
/// Stores the profile and makes it the active profile of a freshly issued
/// session. Any session id the client presents is ignored.
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> Result<impl IntoResponse, AppError> {
    let pid = create_profile(state.profiles.as_ref(), input).await?;

    let session_id = Uuid::new_v4().to_string();
    state.sessions.set_active_profile(&session_id, pid).await?;
    let cookie = session_cookie(&session_id, state.config.session_ttl_secs)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(CreateProfileResponse { success: true, pid }),
    ))
}

/// GET /quiz
pub async fn handle_quiz_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let profile = session_profile(&state, &headers).await?;
    let questions = generate_quiz(state.llm.as_ref(), &profile).await?;

    let mut context = Context::new();
    context.insert("pid", &profile.id);
    context.insert("questions", &questions);
    render_page(&state.templates, QUIZ_PAGE, &context)
}

/// POST /submit_quiz
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    Json(request): Json<SubmitQuizRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let id = Uuid::parse_str(request.pid.trim())
        .map_err(|_| AppError::NotFound(format!("Profile {} not found", request.pid)))?;

    submit_quiz(
        state.profiles.as_ref(),
        state.llm.as_ref(),
        id,
        request.answers,
    )
    .await?;

    Ok(Json(StatusResponse { status: "ok" }))
}

/// GET /result?pid=...
pub async fn handle_result_page(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Html<String>, AppError> {
    let profile = get_result(state.profiles.as_ref(), query.pid.as_deref().unwrap_or("")).await?;

    let answers: Vec<String> = profile.quiz_answers.iter().map(display_answer).collect();
    let recommendations = profile.recommendations.clone().unwrap_or_default();

    let mut context = Context::new();
    context.insert("user", &profile);
    context.insert("answers", &answers);
    context.insert("recommendations", &recommendations);
    render_page(&state.templates, RESULT_PAGE, &context)
}

/// GET /recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let profile = session_profile(&state, &headers).await?;
    let recommendations = recommend_for_profile(state.llm.as_ref(), &profile).await?;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Resolves the caller's active profile from the store. The session only
/// names the profile; its fields always come from the store.
async fn session_profile(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, AppError> {
    let no_profile = || AppError::Validation("User data not found in session".to_string());

    let session_id = session_id_from_headers(headers).ok_or_else(no_profile)?;
    let id = state
        .sessions
        .active_profile(&session_id)
        .await?
        .ok_or_else(no_profile)?;

    state
        .profiles
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))
}

fn display_answer(answer: &Value) -> String {
    match answer {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

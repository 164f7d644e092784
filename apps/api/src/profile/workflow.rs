//! Profile workflow: create profile → generate quiz → submit quiz → results.
//!
//! Every step reads the authoritative profile from the store. Upstream parse
//! failures are recovered here (fallback quiz, empty recommendation list);
//! upstream call failures propagate as `AppError::Llm`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::parser::{parse_payload, ParseError};
use crate::llm_client::TextGenerator;
use crate::models::profile::{
    strip_nul, strip_nul_in_value, ProfileInput, Recommendation, UserProfile,
    MAX_TEXT_FIELD_CHARS,
};
use crate::profile::prompts::{
    fill_template, QUICK_RECOMMENDATION_PROMPT_TEMPLATE, QUIZ_PROMPT_TEMPLATE,
    RECOMMENDATION_PROMPT_TEMPLATE,
};
use crate::profile::search_link::youtube_search_link;
use crate::profile::store::{NewProfile, ProfileStore};

/// Number of questions a generated quiz must contain.
pub const QUIZ_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
}

/// One `{title, artist}` item as the model returns it.
#[derive(Debug, Clone, Deserialize)]
struct SongSuggestion {
    title: String,
    artist: String,
}

/// Questions shown whenever the generated quiz cannot be used.
pub fn fallback_quiz() -> Vec<QuizQuestion> {
    fn question(id: i64, text: &str, options: [&str; 4]) -> QuizQuestion {
        QuizQuestion {
            id,
            question: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    vec![
        question(
            1,
            "What's your favorite music genre?",
            ["Pop", "Rock", "Hip-Hop", "Electronic"],
        ),
        question(
            2,
            "Who is your favorite artist?",
            ["Artist A", "Artist B", "Artist C", "Artist D"],
        ),
        question(
            3,
            "What's your mood for music right now?",
            ["Happy", "Sad", "Energetic", "Calm"],
        ),
    ]
}

/// Drops NUL characters (Postgres text rejects them), then keeps at most
/// `max` characters.
fn truncate_chars(value: &str, max: usize) -> String {
    strip_nul(value).chars().take(max).collect()
}

/// Stores a new profile and returns its id. Only `name` and `reference` are
/// touched (truncated); everything else is stored as given.
pub async fn create_profile(
    store: &dyn ProfileStore,
    input: ProfileInput,
) -> Result<Uuid, AppError> {
    let profile = NewProfile {
        name: truncate_chars(&input.name, MAX_TEXT_FIELD_CHARS),
        age: input.age,
        gender: input.gender,
        preference: input.preference,
        language: input.language,
        reference: truncate_chars(&input.reference, MAX_TEXT_FIELD_CHARS),
    };

    let id = store.insert(profile).await?;
    info!("Created profile {id}");
    Ok(id)
}

/// Asks the model for a three-question quiz tailored to `profile`.
pub async fn generate_quiz(
    llm: &dyn TextGenerator,
    profile: &UserProfile,
) -> Result<Vec<QuizQuestion>, AppError> {
    let prompt = fill_template(
        QUIZ_PROMPT_TEMPLATE,
        &[
            ("preference", profile.preference.as_str()),
            ("language", profile.language.as_str()),
            ("reference", profile.reference.as_str()),
        ],
    );

    let envelope = llm.generate(&prompt).await?;

    match parse_quiz(&envelope) {
        Ok(questions) => Ok(questions),
        Err(e) => {
            warn!(
                "Quiz generation for profile {} unusable, serving fallback: {e}",
                profile.id
            );
            Ok(fallback_quiz())
        }
    }
}

fn parse_quiz(envelope: &Value) -> Result<Vec<QuizQuestion>, ParseError> {
    let questions: Vec<QuizQuestion> = parse_payload(envelope)?;

    if questions.len() != QUIZ_LENGTH {
        return Err(ParseError::Shape(format!(
            "expected {QUIZ_LENGTH} questions, got {}",
            questions.len()
        )));
    }
    if let Some(q) = questions
        .iter()
        .find(|q| q.question.trim().is_empty() || q.options.is_empty())
    {
        return Err(ParseError::Shape(format!(
            "question {} has empty text or no options",
            q.id
        )));
    }

    Ok(questions)
}

/// Records `answers`, asks the model for songs and stores them on the profile.
///
/// An unusable model reply stores an empty list. If another submission for
/// the same profile lands between the answer write and the recommendation
/// write, this call yields `Conflict` and leaves the newer data in place.
pub async fn submit_quiz(
    store: &dyn ProfileStore,
    llm: &dyn TextGenerator,
    id: Uuid,
    answers: Vec<Value>,
) -> Result<(), AppError> {
    let answers: Vec<Value> = answers.into_iter().map(strip_nul_in_value).collect();

    let profile = store
        .set_quiz_answers(id, &answers)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;

    let prompt = fill_recommendation_prompt(RECOMMENDATION_PROMPT_TEMPLATE, &profile);
    let envelope = llm.generate(&prompt).await?;
    let recommendations = recommendations_or_empty(&envelope, id);

    let applied = store
        .set_recommendations(id, &recommendations, profile.version)
        .await?;
    if !applied {
        return Err(AppError::Conflict(format!(
            "Profile {id} was updated by a newer quiz submission"
        )));
    }

    info!(
        "Stored {} recommendations for profile {id}",
        recommendations.len()
    );
    Ok(())
}

/// Fetches a profile for display. Malformed ids are reported as not found.
pub async fn get_result(store: &dyn ProfileStore, pid: &str) -> Result<UserProfile, AppError> {
    let not_found = || AppError::NotFound(format!("Profile {pid} not found"));

    let id = Uuid::parse_str(pid.trim()).map_err(|_| not_found())?;
    store.find_by_id(id).await?.ok_or_else(not_found)
}

/// On-demand recommendations for `profile`. Not persisted.
pub async fn recommend_for_profile(
    llm: &dyn TextGenerator,
    profile: &UserProfile,
) -> Result<Vec<Recommendation>, AppError> {
    let prompt = fill_recommendation_prompt(QUICK_RECOMMENDATION_PROMPT_TEMPLATE, profile);
    let envelope = llm.generate(&prompt).await?;
    Ok(recommendations_or_empty(&envelope, profile.id))
}

fn fill_recommendation_prompt(template: &str, profile: &UserProfile) -> String {
    let answers = serde_json::to_string(&profile.quiz_answers).unwrap_or_else(|_| "[]".into());

    fill_template(
        template,
        &[
            ("age", profile.age.as_str()),
            ("gender", profile.gender.as_str()),
            ("preference", profile.preference.as_str()),
            ("language", profile.language.as_str()),
            ("answers", answers.as_str()),
        ],
    )
}

fn recommendations_or_empty(envelope: &Value, id: Uuid) -> Vec<Recommendation> {
    match parse_payload::<Vec<SongSuggestion>>(envelope) {
        Ok(songs) => songs
            .into_iter()
            .map(|s| {
                let title = strip_nul(&s.title);
                let artist = strip_nul(&s.artist);
                Recommendation {
                    youtube_search_link: youtube_search_link(&title, &artist),
                    title,
                    artist,
                }
            })
            .collect(),
        Err(e) => {
            warn!("Recommendations for profile {id} unusable, storing none: {e}");
            Vec::new()
        }
    }
}

//! Profile document store — insert, find-by-id and partial updates.
//!
//! `AppState` holds an `Arc<dyn ProfileStore>`; production uses `PgProfileStore`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, Recommendation, UserProfile};

/// Fields of a profile about to be inserted, already truncated.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub preference: String,
    pub language: String,
    pub reference: String,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persists a new profile with empty quiz answers and returns its id.
    async fn insert(&self, profile: NewProfile) -> Result<Uuid, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError>;

    /// Replaces `quiz_answers`, bumps the version and returns the updated
    /// document, or `None` if no profile has this id.
    async fn set_quiz_answers(
        &self,
        id: Uuid,
        answers: &[Value],
    ) -> Result<Option<UserProfile>, AppError>;

    /// Replaces `recommendations` only if the stored version still equals
    /// `expected_version`. Returns whether the write applied.
    async fn set_recommendations(
        &self,
        id: Uuid,
        recommendations: &[Recommendation],
        expected_version: i32,
    ) -> Result<bool, AppError>;
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn insert(&self, profile: NewProfile) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO profiles
                (id, name, age, gender, preference, language, reference, quiz_answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7, '[]'::jsonb)
            "#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.age)
        .bind(&profile.gender)
        .bind(&profile.preference)
        .bind(&profile.language)
        .bind(&profile.reference)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn set_quiz_answers(
        &self,
        id: Uuid,
        answers: &[Value],
    ) -> Result<Option<UserProfile>, AppError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            UPDATE profiles
            SET quiz_answers = $1, version = version + 1, updated_at = now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(Json(answers))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn set_recommendations(
        &self,
        id: Uuid,
        recommendations: &[Recommendation],
        expected_version: i32,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET recommendations = $1, version = version + 1, updated_at = now()
            WHERE id = $2 AND version = $3
            "#,
        )
        .bind(Json(recommendations))
        .bind(id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

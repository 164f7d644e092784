use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum stored length, in characters, of free-text profile fields.
pub const MAX_TEXT_FIELD_CHARS: usize = 100;

/// A single song suggestion with its derived search link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
    pub youtube_search_link: String,
}

/// Raw intake form as posted to `POST /profile`. No field is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    #[serde(deserialize_with = "scalar_as_string")]
    pub name: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub age: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub gender: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub preference: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub language: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub reference: String,
}

/// The stored profile document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub preference: String,
    pub language: String,
    pub reference: String,
    pub quiz_answers: Vec<Value>,
    /// `None` until a quiz has been submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub preference: String,
    pub language: String,
    pub reference: String,
    pub quiz_answers: Json<Vec<Value>>,
    pub recommendations: Option<Json<Vec<Recommendation>>>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: row.id,
            name: row.name,
            age: row.age,
            gender: row.gender,
            preference: row.preference,
            language: row.language,
            reference: row.reference,
            quiz_answers: row.quiz_answers.0,
            recommendations: row.recommendations.map(|r| r.0),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Removes U+0000, which Postgres `TEXT` and `JSONB` both reject.
pub fn strip_nul(value: &str) -> String {
    value.replace('\0', "")
}

/// `strip_nul` applied to every string and object key inside `value`.
pub fn strip_nul_in_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_nul(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nul_in_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (strip_nul(&k), strip_nul_in_value(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Accepts any JSON scalar. Numbers and booleans keep their textual form,
/// `null` becomes the empty string. Arrays and objects are rejected.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(strip_nul(&s)),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, got {other}"
        ))),
    }
}

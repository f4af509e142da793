// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Option key letters in display order. A question's options are stored as
/// one ordered array of four strings; the letter for each option is derived
/// from its position, never stored per-field.
pub const OPTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The question text (non-empty, at most 500 characters).
    pub text: String,

    /// Exactly four option values, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// One of 'A', 'B', 'C', 'D'.
    pub correct_answer: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One keyed option as sent over the wire: `{"key": "A", "value": "Red"}`.
#[derive(Debug, Serialize)]
pub struct QuestionOption {
    pub key: &'static str,
    pub value: String,
}

/// Wire shape of a catalog entry for both listing and creation responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: i64,
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub correct_answer: String,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        let options = q
            .options
            .0
            .into_iter()
            .zip(OPTION_KEYS)
            .map(|(value, key)| QuestionOption { key, value })
            .collect();

        Self {
            id: q.id,
            text: q.text,
            options,
            correct_answer: q.correct_answer,
        }
    }
}

/// DTO for creating a new question. Defaults let the handler report missing
/// fields through its own ordered validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

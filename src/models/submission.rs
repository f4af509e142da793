// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::HashMap;

/// Represents the 'submissions' table in the database. Append-only: one row
/// per test attempt, never mutated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,

    pub user_id: i64,

    /// Email snapshot captured at submit time, not re-joined against users.
    pub email: String,

    pub score: i32,

    /// Grading denominator: catalog size at submission time.
    pub total_questions: i32,

    pub percentage: f64,

    pub passed: bool,

    /// The raw submitted answer map, stored verbatim for audit. Values may
    /// be null or blank; keys may reference questions that no longer exist.
    pub answers: Json<HashMap<String, Option<String>>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a test attempt.
/// Key: question id as a string. Value: selected option key, possibly null.
#[derive(Debug, Deserialize)]
pub struct SubmitTestRequest {
    #[serde(default)]
    pub answers: HashMap<String, Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestResponse {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub passed: bool,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position; ties get consecutive, not equal, ranks.
    pub rank: usize,
    /// Derived from the email snapshot, truncated at the first '@'.
    pub name: String,
    pub email: String,
    pub score: i32,
    pub percentage: f64,
    pub date: String,
}

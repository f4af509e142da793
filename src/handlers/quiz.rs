// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;
use sqlx::types::Json as SqlJson;

use crate::{
    config::PASSING_PERCENTAGE,
    error::AppError,
    models::submission::{LeaderboardEntry, SubmitTestRequest, SubmitTestResponse, Submission},
    utils::jwt::{BearerToken, Claims},
};

/// Helper struct for fetching answer keys from the database.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    correct_answer: String,
}

/// Filters the raw answer map down to the answered set: entries whose value
/// is non-null and non-blank after trimming.
fn answered_set(raw: &HashMap<String, Option<String>>) -> HashMap<String, String> {
    raw.iter()
        .filter_map(|(id, value)| match value {
            Some(v) if !v.trim().is_empty() => Some((id.clone(), v.clone())),
            _ => None,
        })
        .collect()
}

/// Counts matches between submitted values and the answer key. Submitted
/// values are trimmed and uppercased before the comparison; key values are
/// expected pre-normalized. Ids missing from the key are ignored.
fn grade(answered: &HashMap<String, String>, key: &HashMap<String, String>) -> i32 {
    let mut score = 0;

    for (id, value) in answered {
        if let Some(correct) = key.get(id) {
            if value.trim().to_uppercase() == *correct {
                score += 1;
            }
        }
    }

    score
}

fn percentage_of(score: i32, total: i32) -> f64 {
    if total > 0 {
        f64::from(score) / f64::from(total) * 100.0
    } else {
        0.0
    }
}

fn display_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Ranks submissions by percentage descending, ties broken by raw score
/// descending; the stable sort preserves insertion order among full ties.
/// Ranks are consecutive 1-based positions, never shared.
fn build_leaderboard(mut submissions: Vec<Submission>) -> Vec<LeaderboardEntry> {
    submissions.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| b.score.cmp(&a.score))
    });

    submissions
        .into_iter()
        .enumerate()
        .map(|(i, s)| LeaderboardEntry {
            rank: i + 1,
            name: display_name(&s.email).to_string(),
            score: s.score,
            percentage: s.percentage,
            date: s
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            email: s.email,
        })
        .collect()
}

/// Scores a test attempt and records it.
///
/// * Requires a verified token; the account id and email snapshot come from
///   its claims.
/// * Blank answers are dropped; ids that resolve to no stored question are
///   dropped silently.
/// * The grading denominator is the full catalog size at submission time,
///   not the answered count.
/// * Writes exactly one submission row per call; retries write another.
pub async fn submit_test(
    State(pool): State<PgPool>,
    claims: Claims,
    Json(req): Json<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answered = answered_set(&req.answers);

    if answered.is_empty() {
        return Err(AppError::BadRequest("No answers provided".to_string()));
    }

    // Keys that do not parse as ids are treated like ids of questions that
    // no longer exist: skipped, not an error.
    let ids: Vec<i64> = answered.keys().filter_map(|id| id.parse().ok()).collect();

    if ids.is_empty() {
        return Err(AppError::BadRequest("No valid questions found".to_string()));
    }

    let keys: Vec<AnswerKey> =
        sqlx::query_as("SELECT id, correct_answer FROM questions WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if keys.is_empty() {
        return Err(AppError::BadRequest("No valid questions found".to_string()));
    }

    let key_map: HashMap<String, String> = keys
        .into_iter()
        .map(|k| (k.id.to_string(), k.correct_answer.trim().to_uppercase()))
        .collect();

    let catalog_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&pool)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    // The catalog cannot be empty once an id has resolved above; the
    // fallback to the raw map size covers the guard anyway.
    let total_questions = if catalog_total > 0 {
        catalog_total as i32
    } else {
        req.answers.len() as i32
    };

    let score = grade(&answered, &key_map);
    let percentage = percentage_of(score, total_questions);
    let passed = percentage >= PASSING_PERCENTAGE;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO submissions (user_id, email, score, total_questions, percentage, passed, answers)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user_id)
    .bind(&claims.email)
    .bind(score)
    .bind(total_questions)
    .bind(percentage)
    .bind(passed)
    .bind(SqlJson(&req.answers))
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(SubmitTestResponse {
        score,
        total_questions,
        percentage,
        passed,
    }))
}

/// Returns the ranked leaderboard. Requires only bearer-token presence; any
/// authenticated caller may view it.
pub async fn get_leaderboard(
    _token: BearerToken,
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, AppError> {
    let submissions: Vec<Submission> = sqlx::query_as(
        r#"
        SELECT id, user_id, email, score, total_questions, percentage, passed, answers, created_at
        FROM submissions
        ORDER BY id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(build_leaderboard(submissions)))
}

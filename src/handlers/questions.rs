// src/handlers/questions.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;
use sqlx::types::Json as SqlJson;

use crate::{
    error::AppError,
    models::question::{AddQuestionRequest, OPTION_KEYS, Question, QuestionResponse},
    utils::jwt::{AdminClaims, BearerToken},
};

const MAX_TEXT_LENGTH: usize = 500;

/// Shape checks for a new question, applied in order: the first violated
/// constraint is the one reported.
fn validate_question(req: &AddQuestionRequest) -> Result<(), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Question text is required".to_string(),
        ));
    }

    if req.text.trim().chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::BadRequest(
            "Question text must be at most 500 characters".to_string(),
        ));
    }

    if req.options.len() != 4 {
        return Err(AppError::BadRequest(
            "Exactly four options are required".to_string(),
        ));
    }

    if req.options.iter().any(|opt| opt.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "All options must be non-empty strings".to_string(),
        ));
    }

    if !OPTION_KEYS.contains(&req.correct_answer.as_str()) {
        return Err(AppError::BadRequest(
            "Correct answer must be one of A, B, C, or D".to_string(),
        ));
    }

    Ok(())
}

/// Lists the entire catalog in insertion order, correct answers included.
/// Requires only that a bearer token be present; the token is not decoded.
pub async fn list_questions(
    _token: BearerToken,
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<Question> = sqlx::query_as(
        "SELECT id, text, options, correct_answer, created_at FROM questions ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let formatted: Vec<QuestionResponse> = questions.into_iter().map(Into::into).collect();

    Ok(Json(formatted))
}

/// Creates a new question. Admin only.
///
/// Persists the trimmed text and option values and returns the stored record
/// including its generated id.
pub async fn add_question(
    AdminClaims(_claims): AdminClaims,
    State(pool): State<PgPool>,
    Json(payload): Json<AddQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_question(&payload)?;

    let options: Vec<String> = payload
        .options
        .iter()
        .map(|opt| opt.trim().to_string())
        .collect();

    let question: Question = sqlx::query_as(
        r#"
        INSERT INTO questions (text, options, correct_answer)
        VALUES ($1, $2, $3)
        RETURNING id, text, options, correct_answer, created_at
        "#,
    )
    .bind(payload.text.trim())
    .bind(SqlJson(options))
    .bind(&payload.correct_answer)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(QuestionResponse::from(question)))
}

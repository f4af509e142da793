// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AuthUser, LoginRequest, LoginResponse, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new account.
///
/// Hashes the password with Argon2 before storing it. A requested role of
/// "admin" is honored; any other value normalizes to "participant".
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    if payload.validate().is_err() {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let email = payload.email.trim();

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check existing email: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let role = match payload.role.as_deref() {
        Some("admin") => "admin",
        _ => "participant",
    };

    let hashed_password = hash_password(&payload.password)?;

    sqlx::query("INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4)")
        .bind(payload.name.trim())
        .bind(email)
        .bind(&hashed_password)
        .bind(role)
        .execute(&pool)
        .await
        .map_err(|e| {
            // A concurrent registration can race past the lookup above; the
            // unique index reports it here.
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                AppError::BadRequest("Email already registered".to_string())
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })?;

    Ok(Json(json!({
        "message": "Registration successful",
        "role": role,
    })))
}

/// Authenticates an account and returns a signed JWT.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password, role, created_at FROM users WHERE email = $1",
    )
    .bind(payload.email.trim())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let user = user.ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.email,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(LoginResponse {
        token,
        user: AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}

// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// JWT Claims structure. Tokens are HS256-signed and expire; an unsigned or
/// tampered token never verifies.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - stores the account ID (as string).
    pub sub: String,
    /// Email snapshot, copied into submissions at submit time.
    pub email: String,
    /// Account role: 'participant' or 'admin'.
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new JWT for the account.
pub fn sign_jwt(
    id: i64,
    email: &str,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        email: email.to_owned(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_owned)
}

/// Extractor asserting bearer-token *presence* only. The token is not
/// decoded; read-only endpoints accept any token string.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .map(Self)
            .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))
    }
}

/// Extractor for a *verified* token. Missing token is 401 "Unauthorized",
/// an unverifiable one is 401 "Invalid token".
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    Config: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

        let config = Config::from_ref(state);
        verify_jwt(&token, &config.jwt_secret)
    }
}

/// Extractor for admin-only endpoints. Missing token is 401; a token that
/// fails verification or carries a non-admin role is 403.
pub struct AdminClaims(pub Claims);

impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
    Config: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

        let config = Config::from_ref(state);
        let claims = verify_jwt(&token, &config.jwt_secret)
            .map_err(|_| AppError::Forbidden("Forbidden: Admin access required".to_string()))?;

        if claims.role != "admin" {
            return Err(AppError::Forbidden(
                "Forbidden: Admin access required".to_string(),
            ));
        }

        Ok(AdminClaims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let token = sign_jwt(42, "alice@x.com", "participant", "secret", 600).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, "participant");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign_jwt(42, "alice@x.com", "admin", "secret", 600).unwrap();
        assert!(verify_jwt(&token, "other_secret").is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(verify_jwt("not-a-jwt", "secret").is_err());
    }
}

//! Token issuance endpoint: POST /api-token-auth/

use axum::response::Json;
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::shapes::TokenResponse;
use crate::auth;
use crate::database::{queries, DatabaseManager};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validate credentials and return the caller's opaque token, minting one on
/// first request. Bad credentials get the same answer whether the username
/// or the password was wrong.
pub async fn obtain(Json(payload): Json<TokenRequest>) -> Result<Json<TokenResponse>, ApiError> {
    let mut field_errors = HashMap::new();
    if payload.username.as_deref().map_or(true, |v| v.is_empty()) {
        field_errors.insert("username".to_string(), "This field is required.".to_string());
    }
    if payload.password.as_deref().map_or(true, |v| v.is_empty()) {
        field_errors.insert("password".to_string(), "This field is required.".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid input", Some(field_errors)));
    }

    let username = payload.username.as_deref().unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    let pool = DatabaseManager::pool().await?;
    let user = queries::find_user_by_username(&pool, username).await?;

    let user = match user {
        Some(user) if auth::verify_password(password, &user.password) => user,
        _ => {
            tracing::warn!("failed login attempt for username '{}'", username);
            return Err(ApiError::validation_error(
                "Unable to log in with provided credentials.",
                None,
            ));
        }
    };

    let token = queries::get_or_create_token(&pool, user.id, &auth::generate_token()).await?;
    Ok(Json(TokenResponse { token }))
}

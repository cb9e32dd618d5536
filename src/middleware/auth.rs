use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::database::{queries, DatabaseManager};
use crate::error::ApiError;

/// Authenticated user context resolved from the bearer token.
///
/// Declared as a handler argument on every write endpoint, so a missing or
/// unknown token is rejected before any handler logic runs.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_headers(&parts.headers).map_err(ApiError::unauthorized)?;

        let pool = DatabaseManager::pool().await?;
        let user = queries::user_for_token(&pool, &token)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}

/// Extract an opaque token from the Authorization header.
/// Accepts both the `Bearer` and `Token` scheme names.
fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("Token "))
        .ok_or_else(|| "Authorization header must use Bearer or Token scheme".to_string())?;

    if token.trim().is_empty() {
        return Err("Empty token".to_string());
    }
    Ok(token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_bearer_and_token_schemes() {
        let token = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";
        for scheme in ["Bearer", "Token"] {
            let headers = headers_with(&format!("{} {}", scheme, token));
            assert_eq!(extract_token_from_headers(&headers).unwrap(), token);
        }
    }

    #[test]
    fn rejects_missing_header() {
        let err = extract_token_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(err.contains("Missing"));
    }

    #[test]
    fn rejects_unknown_scheme_and_empty_token() {
        assert!(extract_token_from_headers(&headers_with("Basic abc")).is_err());
        assert!(extract_token_from_headers(&headers_with("Bearer ")).is_err());
    }
}

//! Client collection and detail endpoints.
//!
//! Reads are open to anonymous callers; writes take an `AuthUser` argument
//! and therefore reject unauthenticated requests up front. Authorization is
//! deliberately coarse: any authenticated user may update or delete any
//! client.

use axum::{extract::Path, http::StatusCode, response::Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::api::format;
use crate::api::shapes::{ClientDetail, ClientSummary};
use crate::database::{queries, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::AuthUser;

const CLIENT_NOT_FOUND: &str = "No Client matches the given query.";

#[derive(Debug, Deserialize)]
pub struct ClientPayload {
    pub client_name: Option<String>,
}

fn require_client_name(payload: &ClientPayload) -> Result<&str, ApiError> {
    match payload.client_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        Some(_) => Err(ApiError::field_error("client_name", "This field may not be blank.")),
        None => Err(ApiError::field_error("client_name", "This field is required.")),
    }
}

async fn load_detail_or_500(pool: &PgPool, id: i64) -> Result<ClientDetail, ApiError> {
    format::load_client_detail(pool, id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load client"))
}

/// GET /clients/ - compact listing, anonymous
pub async fn list() -> Result<Json<Vec<ClientSummary>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let rows = queries::list_clients(&pool).await?;
    Ok(Json(rows.into_iter().map(ClientSummary::from).collect()))
}

/// POST /clients/ - create, authenticated
pub async fn create(
    user: AuthUser,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<ClientDetail>), ApiError> {
    let name = require_client_name(&payload)?;

    let pool = DatabaseManager::pool().await?;
    let id = queries::insert_client(&pool, name, user.id).await?;
    tracing::info!("client {} created by {}", id, user.username);

    let detail = load_detail_or_500(&pool, id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /clients/:id/ - detail with nested projects, anonymous
pub async fn retrieve(Path(id): Path<i64>) -> Result<Json<ClientDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let detail = format::load_client_detail(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(CLIENT_NOT_FOUND))?;
    Ok(Json(detail))
}

/// PUT /clients/:id/ - full update, client_name required.
/// The target is resolved before the body is validated, so an unknown id is
/// a 404 even when the payload is bad.
pub async fn update_put(
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<ClientDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_client_exists(&pool, id).await?;

    let name = require_client_name(&payload)?;
    apply_update(&pool, id, Some(name)).await
}

/// PATCH /clients/:id/ - partial update; a missing body still refreshes
/// updated_at, but a body that fails to parse is rejected
pub async fn update_patch(
    _user: AuthUser,
    Path(id): Path<i64>,
    body: axum::body::Bytes,
) -> Result<Json<ClientDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_client_exists(&pool, id).await?;

    // An absent body is a valid no-op patch; a present but malformed one is not
    let payload: ClientPayload = if body.is_empty() {
        ClientPayload { client_name: None }
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("JSON parse error: {}", e)))?
    };

    let name = match payload.client_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        Some(_) => {
            return Err(ApiError::field_error("client_name", "This field may not be blank."))
        }
        None => None,
    };
    apply_update(&pool, id, name.as_deref()).await
}

async fn ensure_client_exists(pool: &PgPool, id: i64) -> Result<(), ApiError> {
    if queries::fetch_client(pool, id).await?.is_none() {
        return Err(ApiError::not_found(CLIENT_NOT_FOUND));
    }
    Ok(())
}

async fn apply_update(pool: &PgPool, id: i64, name: Option<&str>) -> Result<Json<ClientDetail>, ApiError> {
    if !queries::update_client(pool, id, name).await? {
        return Err(ApiError::not_found(CLIENT_NOT_FOUND));
    }
    let detail = load_detail_or_500(pool, id).await?;
    Ok(Json(detail))
}

/// DELETE /clients/:id/ - cascades to the client's projects
pub async fn destroy(_user: AuthUser, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    if !queries::delete_client(&pool, id).await? {
        return Err(ApiError::not_found(CLIENT_NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_name_validation() {
        let missing = ClientPayload { client_name: None };
        let blank = ClientPayload { client_name: Some("   ".to_string()) };
        let ok = ClientPayload { client_name: Some(" Acme ".to_string()) };

        assert!(require_client_name(&missing).is_err());
        assert!(require_client_name(&blank).is_err());
        assert_eq!(require_client_name(&ok).unwrap(), "Acme");
    }
}

//! Project creation under a client, and the caller's assigned projects.

use axum::{extract::Path, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::api::format;
use crate::api::shapes::ProjectDetail;
use crate::database::{queries, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub project_name: Option<String>,
    pub users: Option<Vec<i64>>,
}

/// POST /clients/:id/projects/ - create a project under a client and assign users
pub async fn create_for_client(
    user: AuthUser,
    Path(client_id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<ProjectDetail>), ApiError> {
    let pool = DatabaseManager::pool().await?;

    // Unknown parent client is a 404 regardless of body contents
    if queries::fetch_client(&pool, client_id).await?.is_none() {
        return Err(ApiError::not_found("No Client matches the given query."));
    }

    let project_name = match payload.project_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        Some(_) => {
            return Err(ApiError::field_error("project_name", "This field may not be blank."))
        }
        None => return Err(ApiError::field_error("project_name", "This field is required.")),
    };

    let Some(user_ids) = payload.users else {
        return Err(ApiError::field_error("users", "This field is required."));
    };

    // Validate every referenced user before touching the projects table
    let mut unique_ids = user_ids;
    unique_ids.sort_unstable();
    unique_ids.dedup();

    let existing = queries::existing_user_ids(&pool, &unique_ids).await?;
    if let Some(missing) = unique_ids.iter().find(|id| !existing.contains(*id)) {
        return Err(ApiError::field_error(
            "users",
            format!("Invalid pk \"{}\" - object does not exist.", missing),
        ));
    }

    let project_id =
        queries::insert_project(&pool, client_id, project_name, user.id, &unique_ids).await?;
    tracing::info!(
        "project {} created under client {} by {}",
        project_id,
        client_id,
        user.username
    );

    let detail = format::load_project_detail(&pool, project_id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created project"))?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /projects/ - projects assigned to the calling user
pub async fn list_assigned(user: AuthUser) -> Result<Json<Vec<ProjectDetail>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let rows = queries::projects_for_user(&pool, user.id).await?;
    let details = format::project_details(&pool, rows).await?;
    Ok(Json(details))
}

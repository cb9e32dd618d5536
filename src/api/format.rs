//! Assembly of response shapes from database rows.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::api::shapes::{ClientDetail, ProjectDetail};
use crate::database::manager::DatabaseError;
use crate::database::models::{ProjectRow, UserRef};
use crate::database::queries;

/// Render project rows into detail shapes, batch-loading assignment sets
pub async fn project_details(
    pool: &PgPool,
    rows: Vec<ProjectRow>,
) -> Result<Vec<ProjectDetail>, DatabaseError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let mut users_by_project: HashMap<i64, Vec<UserRef>> = HashMap::new();
    for assignment in queries::assignments_for_projects(pool, &ids).await? {
        users_by_project
            .entry(assignment.project_id)
            .or_default()
            .push(UserRef {
                id: assignment.user_id,
                username: assignment.username,
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let users = users_by_project.remove(&row.id).unwrap_or_default();
            ProjectDetail::new(row, users)
        })
        .collect())
}

/// Load a client with its nested project details. None when the id is unknown.
pub async fn load_client_detail(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ClientDetail>, DatabaseError> {
    let Some(row) = queries::fetch_client(pool, id).await? else {
        return Ok(None);
    };

    let projects = queries::projects_for_client(pool, id).await?;
    let projects = project_details(pool, projects).await?;
    Ok(Some(ClientDetail::new(row, projects)))
}

/// Load a single project in its detail shape. None when the id is unknown.
pub async fn load_project_detail(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ProjectDetail>, DatabaseError> {
    let Some(row) = queries::fetch_project(pool, id).await? else {
        return Ok(None);
    };

    let details = project_details(pool, vec![row]).await?;
    Ok(details.into_iter().next())
}

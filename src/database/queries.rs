//! Hand-written queries for the fixed application schema.
//!
//! Creator usernames and client names are resolved in SQL so the rows come
//! back ready for serialization.

use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{ClientRow, ProjectAssignmentRow, ProjectRow, User, UserRef};

const CLIENT_SELECT: &str = "SELECT c.id, c.client_name, c.created_at, c.updated_at, \
     u.username AS created_by \
     FROM clients c LEFT JOIN users u ON u.id = c.created_by";

const PROJECT_SELECT: &str = "SELECT p.id, p.project_name, c.client_name, p.created_at, \
     u.username AS created_by \
     FROM projects p \
     JOIN clients c ON c.id = p.client_id \
     LEFT JOIN users u ON u.id = p.created_by";

// ---- Clients ----

/// All clients in insertion order
pub async fn list_clients(pool: &PgPool) -> Result<Vec<ClientRow>, DatabaseError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!("{} ORDER BY c.id", CLIENT_SELECT))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn fetch_client(pool: &PgPool, id: i64) -> Result<Option<ClientRow>, DatabaseError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!("{} WHERE c.id = $1", CLIENT_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert_client(
    pool: &PgPool,
    client_name: &str,
    created_by: i64,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO clients (client_name, created_by) VALUES ($1, $2) RETURNING id",
    )
    .bind(client_name)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Update a client, refreshing `updated_at` even when no new name is given.
/// Returns false when the id does not exist.
pub async fn update_client(
    pool: &PgPool,
    id: i64,
    client_name: Option<&str>,
) -> Result<bool, DatabaseError> {
    let result = match client_name {
        Some(name) => {
            sqlx::query("UPDATE clients SET client_name = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(name)
                .execute(pool)
                .await?
        }
        None => {
            sqlx::query("UPDATE clients SET updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        }
    };
    Ok(result.rows_affected() > 0)
}

/// Delete a client; its projects go with it via ON DELETE CASCADE.
/// Returns false when the id does not exist.
pub async fn delete_client(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---- Projects ----

pub async fn projects_for_client(
    pool: &PgPool,
    client_id: i64,
) -> Result<Vec<ProjectRow>, DatabaseError> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!(
        "{} WHERE p.client_id = $1 ORDER BY p.id",
        PROJECT_SELECT
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_project(pool: &PgPool, id: i64) -> Result<Option<ProjectRow>, DatabaseError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!("{} WHERE p.id = $1", PROJECT_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Projects assigned to a user through the project_users junction
pub async fn projects_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<ProjectRow>, DatabaseError> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!(
        "{} JOIN project_users pu ON pu.project_id = p.id WHERE pu.user_id = $1 ORDER BY p.id",
        PROJECT_SELECT
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Assignment pairs for a batch of projects, ordered for stable output
pub async fn assignments_for_projects(
    pool: &PgPool,
    project_ids: &[i64],
) -> Result<Vec<ProjectAssignmentRow>, DatabaseError> {
    if project_ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = sqlx::query_as::<_, ProjectAssignmentRow>(
        "SELECT pu.project_id, u.id AS user_id, u.username \
         FROM project_users pu \
         JOIN users u ON u.id = pu.user_id \
         WHERE pu.project_id = ANY($1) \
         ORDER BY pu.project_id, u.id",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Which of the given user ids actually exist
pub async fn existing_user_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(found)
}

/// Insert a project and its assignment set in one transaction, so a failed
/// assignment never leaves a partial project row.
pub async fn insert_project(
    pool: &PgPool,
    client_id: i64,
    project_name: &str,
    created_by: i64,
    user_ids: &[i64],
) -> Result<i64, DatabaseError> {
    let mut tx = pool.begin().await?;

    let project_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO projects (project_name, client_id, created_by) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(project_name)
    .bind(client_id)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await?;

    if !user_ids.is_empty() {
        sqlx::query(
            "INSERT INTO project_users (project_id, user_id) \
             SELECT $1, unnest($2::bigint[])",
        )
        .bind(project_id)
        .bind(user_ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(project_id)
}

// ---- Users and tokens ----

pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password) VALUES ($1, $2) \
         RETURNING id, username, password, created_at",
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRef>, DatabaseError> {
    let users = sqlx::query_as::<_, UserRef>("SELECT id, username FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Resolve a bearer token to its user
pub async fn user_for_token(pool: &PgPool, token: &str) -> Result<Option<UserRef>, DatabaseError> {
    let user = sqlx::query_as::<_, UserRef>(
        "SELECT u.id, u.username FROM auth_tokens t \
         JOIN users u ON u.id = t.user_id WHERE t.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Return the user's token, inserting `candidate` only on first issuance.
/// The no-op conflict update makes this race-safe in a single statement.
pub async fn get_or_create_token(
    pool: &PgPool,
    user_id: i64,
    candidate: &str,
) -> Result<String, DatabaseError> {
    let token = sqlx::query_scalar::<_, String>(
        "INSERT INTO auth_tokens (token, user_id) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE SET user_id = auth_tokens.user_id \
         RETURNING token",
    )
    .bind(candidate)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(token)
}

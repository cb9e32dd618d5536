use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Project row joined with its client name and creator's username
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub project_name: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

/// One project/user assignment pair, used to batch-load assignment sets
#[derive(Debug, Clone, FromRow)]
pub struct ProjectAssignmentRow {
    pub project_id: i64,
    pub user_id: i64,
    pub username: String,
}

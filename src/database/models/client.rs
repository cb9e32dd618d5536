use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Client row joined with the creator's username
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

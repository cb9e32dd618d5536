use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row. The password column holds a salted hash and the struct
/// is deliberately not serializable.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Public user reference as rendered inside project assignments
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

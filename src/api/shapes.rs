//! Response shapes for the HTTP surface.
//!
//! Three distinct renderings exist: the compact client list shape, the
//! client detail shape with nested projects, and the project detail shape.
//! `created_by` is always the creator's username string (null once the
//! creating user is removed), and a project's `client` is its client's name.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{ClientRow, ProjectRow, UserRef};

/// Compact shape used by GET /clients/
#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub id: i64,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<ClientRow> for ClientSummary {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            client_name: row.client_name,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

/// Full project rendering, nested under client detail and returned from
/// project creation and the assigned-projects listing
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub id: i64,
    pub project_name: String,
    pub client: String,
    pub users: Vec<UserRef>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl ProjectDetail {
    pub fn new(row: ProjectRow, users: Vec<UserRef>) -> Self {
        Self {
            id: row.id,
            project_name: row.project_name,
            client: row.client_name,
            users,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

/// Full client rendering used by detail, create and update responses
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    pub id: i64,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub projects: Vec<ProjectDetail>,
}

impl ClientDetail {
    pub fn new(row: ClientRow, projects: Vec<ProjectDetail>) -> Self {
        Self {
            id: row.id,
            client_name: row.client_name,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            projects,
        }
    }
}

/// Body of a successful POST /api-token-auth/
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

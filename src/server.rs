use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::{schema, DatabaseManager};
use crate::handlers;

/// Build the application router
pub fn app() -> Router {
    Router::new()
        // Service endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // API surface
        .merge(client_routes())
        .merge(project_routes())
        .merge(token_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn client_routes() -> Router {
    use handlers::clients;

    Router::new()
        // Collection: anonymous list, authenticated create
        .route("/clients/", get(clients::list).post(clients::create))
        // Detail: anonymous retrieve, authenticated mutations
        .route(
            "/clients/:id/",
            get(clients::retrieve)
                .put(clients::update_put)
                .patch(clients::update_patch)
                .delete(clients::destroy),
        )
}

fn project_routes() -> Router {
    use handlers::projects;

    Router::new()
        // Project creation as a sub-resource of a client
        .route("/clients/:id/projects/", post(projects::create_for_client))
        // Caller's assigned projects
        .route("/projects/", get(projects::list_assigned))
}

fn token_routes() -> Router {
    use handlers::tokens;

    Router::new().route("/api-token-auth/", post(tokens::obtain))
}

/// Bind and serve until shutdown, creating missing tables first
pub async fn serve(port: u16) -> anyhow::Result<()> {
    // Table bootstrap is best-effort: the server still starts when the
    // database is down and /health reports degraded instead.
    match DatabaseManager::pool().await {
        Ok(pool) => {
            if let Err(e) = schema::ensure_schema(&pool).await {
                tracing::warn!("schema bootstrap failed: {}", e);
            }
        }
        Err(e) => tracing::warn!("database unavailable at startup: {}", e),
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("Client-project API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Client-Project API",
        "version": version,
        "description": "Client and project management REST API with token authentication",
        "endpoints": {
            "clients": "/clients/ (GET public, POST authenticated)",
            "client": "/clients/:id/ (GET public; PUT/PATCH/DELETE authenticated)",
            "client_projects": "/clients/:id/projects/ (POST authenticated)",
            "my_projects": "/projects/ (GET authenticated)",
            "token": "/api-token-auth/ (POST public - token acquisition)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

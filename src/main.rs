use client_project_api::{config, server};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL and PORT
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!(
        "Starting client-project API in {:?} mode",
        config.environment
    );

    if let Err(e) = server::serve(config.server.port).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}

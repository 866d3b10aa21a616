use std::sync::Arc;

use planner_api::{config, database, routes, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Planner API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        panic!("JWT_SECRET must be set before the server can issue tokens");
    }

    let pool = database::connect_pool()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
    database::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));

    let state = Arc::new(AppState::new(pool));
    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Planner API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

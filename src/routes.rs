use axum::{
    extract::State,
    http::HeaderMap,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::public;
use crate::middleware;
use crate::SharedState;

pub fn app(state: SharedState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Session lifecycle
        .merge(auth_routes())
        // Resources
        .merge(user_routes())
        .merge(task_routes())
        .merge(note_routes())
        .merge(goal_routes())
        .merge(habit_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<SharedState> {
    use crate::handlers::public::auth;

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", delete(auth::logout))
        .route("/validate-token", get(auth::validate_token))
}

fn user_routes() -> Router<SharedState> {
    use crate::handlers::protected::users;

    // POST /users is anonymous; the other handlers authenticate through
    // the AuthUser extractor, so no middleware layer here.
    Router::new()
        .route("/users", post(public::users::create).get(users::list))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::remove),
        )
}

fn task_routes() -> Router<SharedState> {
    use crate::handlers::protected::tasks;

    Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/status", get(tasks::by_status))
        .route("/tasks/category", get(tasks::by_category))
        .route("/tasks/dateAssigned", get(tasks::by_date_assigned))
        .route("/tasks/dateDue", get(tasks::by_date_due))
        .route(
            "/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::remove),
        )
        .route("/tasks/:id/users", post(tasks::assign_user))
        .route("/tasks/:id/users/:user_id", delete(tasks::unassign_user))
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

fn note_routes() -> Router<SharedState> {
    use crate::handlers::protected::notes;

    Router::new()
        .route("/notes", get(notes::list).post(notes::create))
        .route(
            "/notes/:id",
            get(notes::get).put(notes::update).delete(notes::remove),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

fn goal_routes() -> Router<SharedState> {
    use crate::handlers::protected::goals;

    Router::new()
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/status", get(goals::by_status))
        .route("/goals/period", get(goals::by_period))
        .route(
            "/goals/:id",
            get(goals::get).put(goals::update).delete(goals::remove),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

fn habit_routes() -> Router<SharedState> {
    use crate::handlers::protected::habits;

    Router::new()
        .route("/habits", get(habits::list).post(habits::create))
        .route("/habits/status", get(habits::by_status))
        .route("/habits/days", get(habits::by_day))
        .route(
            "/habits/:id",
            get(habits::get).put(habits::update).delete(habits::remove),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

/// Personalized when a valid access token is presented, generic otherwise.
async fn root(State(state): State<SharedState>, headers: HeaderMap) -> Json<Value> {
    if let Ok(token) = middleware::extract_bearer_token(&headers) {
        if let Ok(identity) = state.sessions.validate(&token).await {
            return Json(json!({
                "message": format!("Welcome, {}!", identity.name),
                "userId": identity.user_id,
            }));
        }
    }

    Json(json!({
        "message": "Welcome to the homepage! To personalize your experience, log in.",
    }))
}

async fn health(State(state): State<SharedState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": e.to_string(),
            })),
        ),
    }
}

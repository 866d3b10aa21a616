pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use auth::TokenIssuer;
use services::{
    GoalService, HabitService, LinkService, NoteService, SessionService, TaskService, UserService,
};

/// Application context built once at startup and injected into every
/// handler; there is no ambient database state.
pub struct AppState {
    pub pool: PgPool,
    pub sessions: SessionService,
    pub users: UserService,
    pub tasks: TaskService,
    pub notes: NoteService,
    pub goals: GoalService,
    pub habits: HabitService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let tokens = TokenIssuer::from_config(&config::config().security);
        let links = LinkService::new(pool.clone());

        Self {
            sessions: SessionService::new(pool.clone(), tokens, links.clone()),
            users: UserService::new(pool.clone(), links.clone()),
            tasks: TaskService::new(pool.clone(), links.clone()),
            notes: NoteService::new(pool.clone()),
            goals: GoalService::new(pool.clone(), links.clone()),
            habits: HabitService::new(pool.clone(), links),
            pool,
        }
    }
}

pub type SharedState = Arc<AppState>;

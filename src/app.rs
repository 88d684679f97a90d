use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/auth/sign-up", post(handlers::sign_up))
        .route("/api/auth/sign-in", post(handlers::sign_in))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .route("/api/today", get(handlers::get_today))
        .route("/api/progress", post(handlers::add_progress))
        .route("/api/reset", post(handlers::reset_day))
        .route("/api/leaderboard", get(handlers::get_leaderboard))
        .with_state(state)
}

use crate::day::CalendarDay;
use crate::errors::AppError;
use crate::models::{
    DashboardResponse, LeaderboardQuery, LeaderboardResponse, ProgressRequest, SessionResponse,
    SignInRequest, SignUpRequest,
};
use crate::session::Session;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&CalendarDay::today(), &state.tracker.goals()))
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.tracker.sign_up(payload).await?;
    Ok(Json(to_response(session)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.tracker.sign_in(payload).await?;
    Ok(Json(to_response(session)))
}

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state.tracker.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_today(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let response = state.tracker.today(token, CalendarDay::today()).await?;
    Ok(Json(response))
}

pub async fn add_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let response = state
        .tracker
        .add_progress(token, payload.exercise, &payload.amount, CalendarDay::today())
        .await?;
    Ok(Json(response))
}

pub async fn reset_day(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let response = state.tracker.reset_day(token, CalendarDay::today()).await?;
    Ok(Json(response))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<LeaderboardResponse> {
    Json(state.tracker.leaderboard(query.mode, CalendarDay::today()).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("not signed in"))
}

fn to_response(session: Session) -> SessionResponse {
    SessionResponse {
        token: session.token,
        user: session.user,
    }
}

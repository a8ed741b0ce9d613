use crate::catalog::all_factors;
use crate::errors::AppError;
use crate::models::{
    AdjustRequest, Category, Day, DayView, FactorInfo, HistoryResponse, ProfileRequest,
    ProfileResponse, SetValueRequest, WeekView,
};
use crate::state::AppState;
use crate::stats::{build_day_view, build_history, build_today_view, build_week_view};
use crate::storage::persist_profile;
use crate::week::WeekKey;
use axum::{Json, extract::Path, extract::State, http::StatusCode};
use tracing::info;

pub async fn get_catalog() -> Json<Vec<FactorInfo>> {
    Json(all_factors().map(|factor| factor.info()).collect())
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let ledger = state.ledger.lock().await;
    Json(build_history(&ledger))
}

pub async fn get_current_week(State(state): State<AppState>) -> Result<Json<WeekView>, AppError> {
    let week = WeekKey::current()?;
    let ledger = state.ledger.lock().await;
    Ok(Json(build_week_view(&ledger, week)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<DayView>, AppError> {
    let ledger = state.ledger.lock().await;
    Ok(Json(build_today_view(&ledger)?))
}

pub async fn get_week(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<Json<WeekView>, AppError> {
    let week = WeekKey::parse_any(&week)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(build_week_view(&ledger, week)))
}

pub async fn reset_week(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<StatusCode, AppError> {
    let week = WeekKey::parse_any(&week)?;
    let mut ledger = state.ledger.lock().await;
    ledger.reset_week(week);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_day(
    State(state): State<AppState>,
    Path((week, day)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    let (week, day) = parse_week_day(&week, &day)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(build_day_view(&ledger, week, day)))
}

pub async fn reset_day(
    State(state): State<AppState>,
    Path((week, day)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    let (week, day) = parse_week_day(&week, &day)?;
    let mut ledger = state.ledger.lock().await;
    ledger.reset_day(week, day);
    Ok(Json(build_day_view(&ledger, week, day)))
}

pub async fn set_factor(
    State(state): State<AppState>,
    Path((week, day, category, factor)): Path<(String, String, Category, String)>,
    Json(payload): Json<SetValueRequest>,
) -> Result<Json<DayView>, AppError> {
    let (week, day) = parse_week_day(&week, &day)?;
    let mut ledger = state.ledger.lock().await;
    ledger.set_value(week, day, category, &factor, payload.value)?;
    Ok(Json(build_day_view(&ledger, week, day)))
}

pub async fn adjust_factor(
    State(state): State<AppState>,
    Path((week, day, category, factor)): Path<(String, String, Category, String)>,
    Json(payload): Json<AdjustRequest>,
) -> Result<Json<DayView>, AppError> {
    let (week, day) = parse_week_day(&week, &day)?;
    let mut ledger = state.ledger.lock().await;
    ledger.adjust_count(week, day, category, &factor, payload.delta)?;
    Ok(Json(build_day_view(&ledger, week, day)))
}

pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let profile = state.profile.lock().await;
    Json(profile.to_response())
}

pub async fn put_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut profile = state.profile.lock().await;
    let name = profile.set_name(&payload.name)?.to_string();
    persist_profile(&state.profile_path, &profile).await?;
    info!(%name, "athlete name updated");
    Ok(Json(profile.to_response()))
}

fn parse_week_day(week: &str, day: &str) -> Result<(WeekKey, Day), AppError> {
    Ok((WeekKey::parse_any(week)?, day.parse::<Day>()?))
}

use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/history", get(handlers::get_history))
        .route("/api/today", get(handlers::get_today))
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route("/api/weeks/current", get(handlers::get_current_week))
        .route(
            "/api/weeks/:week",
            get(handlers::get_week).delete(handlers::reset_week),
        )
        .route(
            "/api/weeks/:week/days/:day",
            get(handlers::get_day).delete(handlers::reset_day),
        )
        .route(
            "/api/weeks/:week/days/:day/:category/:factor",
            put(handlers::set_factor),
        )
        .route(
            "/api/weeks/:week/days/:day/:category/:factor/adjust",
            post(handlers::adjust_factor),
        )
        .with_state(state)
}

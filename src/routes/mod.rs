pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod notifications;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::cors::cors_layer;
use crate::middleware::rate_limit::{new_rps_state, rps_middleware};
use crate::AppState;

const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Full application router. The account routes are reachable without a
/// token, so only they sit behind the rate limiter window.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let account_api = auth::router(state.clone()).layer(from_fn_with_state(
        new_rps_state(config.public_rps),
        rps_middleware,
    ));

    let api = Router::new()
        .merge(applications::router(state.clone()))
        .merge(jobs::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(notifications::router(state.clone()));

    base_routes
        .merge(account_api)
        .merge(api)
        .with_state(state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::{
    error::Result,
    middleware::auth::{require_user, Identity},
    models::notification::Notification,
    AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/:id/read", put(mark_read))
        .route_layer(from_fn_with_state(state, require_user))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = Json<Vec<Notification>>)
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let notifications = state.notification_service.list(identity.subject_id).await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Json<Notification>),
        (status = 404, description = "Not found or not the caller's")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state
        .notification_service
        .mark_read(id, identity.subject_id)
        .await?;
    Ok(Json(notification))
}

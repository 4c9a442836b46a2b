use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json, Redirect},
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{SubmitApplicationPayload, SubmittedApplication},
    error::Result,
    middleware::auth::{require_user, Identity},
    AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/applications/apply/:job_id", post(submit_application))
        .route("/api/applications/:id/cv/view", get(view_cv))
        .route_layer(from_fn_with_state(state, require_user))
}

#[utoipa::path(
    post,
    path = "/api/applications/apply/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    request_body = SubmitApplicationPayload,
    responses(
        (status = 201, description = "Application created", body = Json<SubmittedApplication>),
        (status = 400, description = "Already applied"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
    payload: std::result::Result<Json<SubmitApplicationPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let submitted = state
        .application_service
        .submit(identity.subject_id, job_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/cv/view",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 307, description = "Redirect to the stored CV"),
        (status = 403, description = "Not the applicant or an admin"),
        (status = 404, description = "Application or CV not found")
    )
)]
#[axum::debug_handler]
pub async fn view_cv(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let location = state
        .application_service
        .cv_location(id, identity.subject_id, identity.is_admin())
        .await?;
    Ok(Redirect::temporary(&location))
}

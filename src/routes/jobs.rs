use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::{
    dto::{
        auth_dto::MessageResponse,
        job_dto::{ApplyJobPayload, ApplyJobResponse, CreateJobPayload, UpdateJobPayload},
    },
    error::Result,
    middleware::auth::{require_user, Identity},
    models::job::Job,
    utils::validation::validate,
    AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/jobs", post(create_job).get(list_jobs))
        .route("/api/jobs/:id", put(update_job).delete(delete_job))
        .route("/api/jobs/apply/:job_id", post(apply_to_job))
        .route_layer(from_fn_with_state(state, require_user))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Json<Job>),
        (status = 400, description = "Invalid payload or status")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: std::result::Result<Json<CreateJobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    let job = state.job_service.create(identity.subject_id, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Caller's jobs, newest first", body = Json<Vec<Job>>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(identity.subject_id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<Job>),
        (status = 400, description = "Invalid payload or status"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<UpdateJobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    let job = state
        .job_service
        .update(id, identity.subject_id, payload)
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job deleted", body = Json<MessageResponse>),
        (status = 400, description = "Job still has applications"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id, identity.subject_id).await?;
    Ok(Json(MessageResponse::new("Job deleted")))
}

#[utoipa::path(
    post,
    path = "/api/jobs/apply/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    request_body = ApplyJobPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplyJobResponse>),
        (status = 400, description = "Already applied"),
        (status = 404, description = "Job not found or not open")
    )
)]
#[axum::debug_handler]
pub async fn apply_to_job(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
    payload: std::result::Result<Json<ApplyJobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let application = state
        .job_service
        .apply(job_id, identity.subject_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplyJobResponse {
            message: "Application submitted successfully".to_string(),
            application,
        }),
    ))
}

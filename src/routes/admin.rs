use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    dto::{
        admin_dto::{ApplicationListQuery, ApplicationListResponse, ApplicationStats, JobStats},
        application_dto::{BatchStatusPayload, BatchStatusResponse, UpdateStatusPayload},
    },
    error::Result,
    middleware::auth::require_admin,
    models::application::Application,
    AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(application_stats))
        .route("/api/admin/job-stats", get(job_stats))
        .route("/api/admin/applications", get(list_applications))
        .route("/api/admin/applications/:id/status", put(update_status))
        .route("/api/admin/applications/batch-status", post(batch_update_status))
        .route_layer(from_fn_with_state(state, require_admin))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Application counts by status", body = Json<ApplicationStats>),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn application_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.application_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/job-stats",
    responses(
        (status = 200, description = "Job counts by status", body = Json<JobStats>),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn job_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.job_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications",
    params(
        ("status" = Option<String>, Query, description = "Application status"),
        ("age_min" = Option<i32>, Query, description = "Minimum applicant age"),
        ("age_max" = Option<i32>, Query, description = "Maximum applicant age"),
        ("degree_class" = Option<String>, Query, description = "Applicant education grade")
    ),
    responses(
        (status = 200, description = "Matching applications, newest first", body = Json<ApplicationListResponse>),
        (status = 400, description = "Unknown status filter")
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    query: std::result::Result<Query<ApplicationListQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let applications = state.admin_service.list_applications(query).await?;
    Ok(Json(ApplicationListResponse {
        total: applications.len(),
        applications,
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Updated application", body = Json<Application>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<UpdateStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let application = state
        .application_service
        .update_status(id, &payload.status)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/batch-status",
    request_body = BatchStatusPayload,
    responses(
        (status = 200, description = "Rows updated and notified", body = Json<BatchStatusResponse>),
        (status = 400, description = "Unknown status or empty id list"),
        (status = 404, description = "No application matched")
    )
)]
#[axum::debug_handler]
pub async fn batch_update_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let response = state
        .application_service
        .update_status_batch(&payload.application_ids, &payload.status)
        .await?;
    Ok(Json(response))
}

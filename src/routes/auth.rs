use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};

use crate::{
    dto::auth_dto::{
        ForgotPasswordPayload, LoginPayload, LoginResponse, MessageResponse, RegisterPayload,
        ResetPasswordPayload, UpdateProfilePayload, VerifyQuery,
    },
    error::Result,
    middleware::auth::{require_user, Identity},
    models::user::User,
    utils::validation::validate,
    AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let profile = Router::new()
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route_layer(from_fn_with_state(state, require_user));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify", get(verify_email))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .merge(profile)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created; verification email sent", body = Json<MessageResponse>),
        (status = 400, description = "Invalid payload or user already exists")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    state.account_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Registration successful. Please check your email to verify your account.",
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/verify",
    params(("token" = String, Query, description = "Verification token")),
    responses(
        (status = 200, description = "Email verified", body = Json<MessageResponse>),
        (status = 400, description = "Unknown token")
    )
)]
#[axum::debug_handler]
pub async fn verify_email(
    State(state): State<AppState>,
    query: std::result::Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    state.account_service.verify_email(&query.token).await?;
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed token and profile", body = Json<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    let response = state.account_service.login(payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Reset link sent", body = Json<MessageResponse>),
        (status = 404, description = "Unknown email"),
        (status = 500, description = "Reset email could not be sent")
    )
)]
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ForgotPasswordPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    state.account_service.forgot_password(&payload.email).await?;
    Ok(Json(MessageResponse::new(
        "Password reset link sent. Check your email.",
    )))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password changed", body = Json<MessageResponse>),
        (status = 400, description = "Unknown token or weak password")
    )
)]
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResetPasswordPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    state.account_service.reset_password(payload).await?;
    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}

#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Caller's profile", body = Json<User>),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let user = state.account_service.get_profile(identity.subject_id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/auth/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Updated profile", body = Json<User>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: std::result::Result<Json<UpdateProfilePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    let user = state
        .account_service
        .update_profile(identity.subject_id, payload)
        .await?;
    Ok(Json(user))
}

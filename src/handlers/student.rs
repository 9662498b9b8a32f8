// src/handlers/student.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::complaint::{Complaint, CreateComplaintPayload, FiledComplaint},
};

// POST /api/student/complaints
#[utoipa::path(
    post,
    path = "/api/student/complaints",
    tag = "Student",
    request_body = CreateComplaintPayload,
    responses(
        (status = 201, description = "Reclamação registrada (flagged = true se o filtro agiu)", body = FiledComplaint),
        (status = 400, description = "Dados inválidos ou categoria desconhecida"),
        (status = 403, description = "Apenas estudantes")
    ),
    security(("api_jwt" = []))
)]
pub async fn file_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateComplaintPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let filed = app_state
        .complaint_service
        .file_complaint(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(filed)))
}

// GET /api/student/complaints
#[utoipa::path(
    get,
    path = "/api/student/complaints",
    tag = "Student",
    responses(
        (status = 200, description = "Minhas reclamações, da mais nova para a mais antiga", body = Vec<Complaint>),
        (status = 403, description = "Apenas estudantes")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let complaints = app_state
        .complaint_service
        .list_own(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaints)))
}

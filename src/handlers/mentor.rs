// src/handlers/mentor.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        complaint::{Complaint, MentorReviewPayload},
        user::User,
    },
};

// GET /api/mentor/complaints
#[utoipa::path(
    get,
    path = "/api/mentor/complaints",
    tag = "Mentor",
    responses(
        (status = 200, description = "Reclamações dos mentorados", body = Vec<Complaint>),
        (status = 403, description = "Apenas mentores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_mentee_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let complaints = app_state
        .complaint_service
        .list_mentee_complaints(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaints)))
}

// GET /api/mentor/mentees
#[utoipa::path(
    get,
    path = "/api/mentor/mentees",
    tag = "Mentor",
    responses(
        (status = 200, description = "Estudantes orientados por mim", body = Vec<User>),
        (status = 403, description = "Apenas mentores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_mentees(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let mentees = app_state
        .complaint_service
        .list_mentees(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(mentees)))
}

// PUT /api/mentor/complaints/{id}
#[utoipa::path(
    put,
    path = "/api/mentor/complaints/{id}",
    tag = "Mentor",
    request_body = MentorReviewPayload,
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Comentário e urgência gravados", body = Complaint),
        (status = 403, description = "Não é reclamação de um mentorado"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(complaint_id): Path<Uuid>,
    Json(payload): Json<MentorReviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = app_state
        .complaint_service
        .mentor_review(&user, complaint_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaint)))
}

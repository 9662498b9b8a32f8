// src/handlers/warden.rs

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
    models::complaint::{Complaint, WardenBoard, WardenUpdatePayload},
};

// GET /api/warden/complaints
#[utoipa::path(
    get,
    path = "/api/warden/complaints",
    tag = "Warden",
    responses(
        (status = 200, description = "Painel do bloco, em colunas", body = WardenBoard),
        (status = 400, description = "Warden sem bloco"),
        (status = 403, description = "Apenas wardens")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .complaint_service
        .warden_board(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(board)))
}

// PUT /api/warden/complaints/{id}
#[utoipa::path(
    put,
    path = "/api/warden/complaints/{id}",
    tag = "Warden",
    request_body = WardenUpdatePayload,
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Status atualizado", body = Complaint),
        (status = 400, description = "Status inválido ou transição não permitida"),
        (status = 403, description = "Reclamação de outro bloco"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(complaint_id): Path<Uuid>,
    Json(payload): Json<WardenUpdatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = app_state
        .complaint_service
        .warden_update(&user, complaint_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaint)))
}

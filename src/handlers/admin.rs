// src/handlers/admin.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        complaint::{
            AdminComplaintPayload, AdminComplaintQuery, Complaint, CreateComplaintPayload, FiledComplaint,
            StatusCount, StudentProfile, SummaryQuery,
        },
        hostel::{Hostel, HostelDetail, HostelPayload, Room},
        user::{CreateUserPayload, UpdateUserPayload, User, UserQuery},
    },
};

// ---
// 1. Hostels
// ---

// GET /api/admin/hostels
#[utoipa::path(
    get,
    path = "/api/admin/hostels",
    tag = "Admin",
    responses((status = 200, description = "Todos os blocos", body = Vec<Hostel>)),
    security(("api_jwt" = []))
)]
pub async fn list_hostels(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let hostels = app_state
        .hostel_service
        .list_hostels(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(hostels)))
}

// POST /api/admin/hostels
#[utoipa::path(
    post,
    path = "/api/admin/hostels",
    tag = "Admin",
    request_body = HostelPayload,
    responses(
        (status = 201, description = "Bloco criado com os quartos gerados", body = HostelDetail),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_hostel(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<HostelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .hostel_service
        .create_hostel(&user, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/admin/hostels/{id}
#[utoipa::path(
    get,
    path = "/api/admin/hostels/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do bloco")),
    responses(
        (status = 200, description = "Bloco com quartos", body = HostelDetail),
        (status = 404, description = "Bloco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_hostel(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hostel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .hostel_service
        .get_hostel(&user, hostel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/admin/hostels/{id}
#[utoipa::path(
    put,
    path = "/api/admin/hostels/{id}",
    tag = "Admin",
    request_body = HostelPayload,
    params(("id" = Uuid, Path, description = "ID do bloco")),
    responses(
        (status = 200, description = "Bloco atualizado", body = Hostel),
        (status = 404, description = "Bloco não encontrado"),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_hostel(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hostel_id): Path<Uuid>,
    Json(payload): Json<HostelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let hostel = app_state
        .hostel_service
        .update_hostel(&user, hostel_id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(hostel)))
}

// DELETE /api/admin/hostels/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/hostels/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do bloco")),
    responses(
        (status = 204, description = "Bloco removido"),
        (status = 404, description = "Bloco não encontrado"),
        (status = 409, description = "Bloco em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_hostel(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hostel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .hostel_service
        .delete_hostel(&user, hostel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/hostels/{id}/rooms
#[utoipa::path(
    get,
    path = "/api/admin/hostels/{id}/rooms",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do bloco")),
    responses(
        (status = 200, description = "Quartos do bloco", body = Vec<Room>),
        (status = 404, description = "Bloco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hostel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = app_state
        .hostel_service
        .list_rooms(&user, hostel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rooms)))
}

// POST /api/admin/hostels/{id}/rooms
#[utoipa::path(
    post,
    path = "/api/admin/hostels/{id}/rooms",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do bloco")),
    responses(
        (status = 200, description = "Quartos criados agora (vazio se já existiam)", body = Vec<Room>),
        (status = 404, description = "Bloco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_rooms(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hostel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = app_state
        .hostel_service
        .generate_rooms(&user, hostel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rooms)))
}

// ---
// 2. Users
// ---

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserQuery),
    responses((status = 200, description = "Usuários filtrados, por número do quarto", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users(&user, query.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Dados inválidos ou mentor inválido"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .user_service
        .create_user(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/admin/users/{id}
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = app_state
        .user_service
        .get_user(&user, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(found)))
}

// PUT /api/admin/users/{id}
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .user_service
        .update_user(&user, user_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário e reclamações removidos"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .user_service
        .delete_user(&user, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/users/{id}/profile
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/profile",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do estudante")),
    responses(
        (status = 200, description = "Perfil com reclamações marcadas e histórico", body = StudentProfile),
        (status = 404, description = "Estudante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn student_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .user_service
        .student_profile(&user, student_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

// ---
// 3. Complaints
// ---

// GET /api/admin/complaints
#[utoipa::path(
    get,
    path = "/api/admin/complaints",
    tag = "Admin",
    params(AdminComplaintQuery),
    responses(
        (status = 200, description = "Reclamações filtradas (status padrão: pending)", body = Vec<Complaint>),
        (status = 400, description = "Status inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AdminComplaintQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let complaints = app_state
        .complaint_service
        .admin_list(&user, query.hostel_id, query.status.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaints)))
}

// GET /api/admin/complaints/summary
#[utoipa::path(
    get,
    path = "/api/admin/complaints/summary",
    tag = "Admin",
    params(SummaryQuery),
    responses((status = 200, description = "Contagem por status", body = Vec<StatusCount>)),
    security(("api_jwt" = []))
)]
pub async fn complaint_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = app_state
        .complaint_service
        .admin_summary(&user, query.hostel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(counts)))
}

// POST /api/admin/complaints
#[utoipa::path(
    post,
    path = "/api/admin/complaints",
    tag = "Admin",
    request_body = AdminComplaintPayload,
    responses(
        (status = 201, description = "Reclamação registrada em nome do estudante", body = FiledComplaint),
        (status = 404, description = "Estudante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AdminComplaintPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (student_id, draft) = payload.into_draft();
    let filed = app_state
        .complaint_service
        .admin_file(&user, student_id, draft)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(filed)))
}

// GET /api/admin/complaints/{id}
#[utoipa::path(
    get,
    path = "/api/admin/complaints/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Reclamação", body = Complaint),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(complaint_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = app_state
        .complaint_service
        .admin_get(&user, complaint_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaint)))
}

// PUT /api/admin/complaints/{id}
#[utoipa::path(
    put,
    path = "/api/admin/complaints/{id}",
    tag = "Admin",
    request_body = CreateComplaintPayload,
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Título, descrição e categoria corrigidos", body = Complaint),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(complaint_id): Path<Uuid>,
    Json(payload): Json<CreateComplaintPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let complaint = app_state
        .complaint_service
        .admin_edit(&user, complaint_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(complaint)))
}

// DELETE /api/admin/complaints/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/complaints/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 204, description = "Reclamação removida permanentemente"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(complaint_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .complaint_service
        .admin_delete(&user, complaint_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

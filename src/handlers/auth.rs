// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{AuthResponse, LoginUserPayload, SsoCallbackQuery, SsoRedirect},
        user::User,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Papel sem painel")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/auth/google
#[utoipa::path(
    get,
    path = "/api/auth/google",
    tag = "Auth",
    responses(
        (status = 200, description = "URL de autorização do Google", body = SsoRedirect),
        (status = 503, description = "SSO não configurado")
    )
)]
pub async fn google_login(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let provider = app_state
        .identity_provider
        .as_ref()
        .ok_or(AppError::SsoNotConfigured)
        .map_err(to_api)?;

    let state = app_state.auth_service.issue_sso_state().map_err(to_api)?;
    let authorize_url = provider.authorize_url(&state).map_err(to_api)?;

    Ok((StatusCode::OK, Json(SsoRedirect { authorize_url })))
}

// GET /api/auth/google/callback
#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    tag = "Auth",
    params(SsoCallbackQuery),
    responses(
        (status = 200, description = "Login via Google", body = AuthResponse),
        (status = 403, description = "E-mail não cadastrado"),
        (status = 502, description = "Falha no provedor de identidade")
    )
)]
pub async fn google_callback(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SsoCallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        let provider = app_state
            .identity_provider
            .as_ref()
            .ok_or(AppError::SsoNotConfigured)?;

        // 1. O provedor devolveu erro (ex.: usuário cancelou)
        if let Some(error) = query.error {
            return Err(AppError::ExternalProvider(format!("provedor recusou: {}", error)));
        }

        // 2. O "state" precisa ser nosso e estar dentro da validade
        let state = query
            .state
            .ok_or_else(|| AppError::ExternalProvider("callback sem state".to_string()))?;
        app_state.auth_service.verify_sso_state(&state)?;

        // 3. Troca o code por um e-mail verificado e mapeia para um usuário existente
        let code = query
            .code
            .ok_or_else(|| AppError::ExternalProvider("callback sem code".to_string()))?;
        let email = provider.verified_email(&code).await?;

        app_state.auth_service.login_with_email(&email).await
    }
    .await;

    let response = result.map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(response)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// src/common/error.rs

use std::{collections::HashMap, sync::LazyLock};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::{complaint::ComplaintStatus, user::Role},
};

// Para onde o cliente deve voltar quando o acesso é negado
pub const SAFE_REDIRECT: &str = "/";

// O erro de domínio. Toda operação devolve Result<_, AppError>;
// os handlers convertem para ApiError na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Autenticação / Autorização ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Papel exigido: {required}")]
    RoleMismatch { required: Role },

    #[error("A reclamação não é de um mentorado")]
    NotMenteeOf,

    #[error("A reclamação é de outro bloco")]
    OutsideHostel,

    #[error("Papel sem painel")]
    RoleNotRecognized,

    // --- Validação ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Status inválido: {0}")]
    InvalidStatus(String),

    #[error("Categoria inválida: {0}")]
    InvalidCategory(String),

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Mentor inválido")]
    InvalidMentor,

    #[error("Usuário sem bloco")]
    MissingHostel,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Bloco já existe: {0}")]
    HostelNameAlreadyExists(String),

    #[error("Quarto já existe")]
    RoomAlreadyExists,

    #[error("Bloco em uso")]
    HostelInUse,

    // --- Não encontrado ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Bloco não encontrado")]
    HostelNotFound,

    #[error("Reclamação não encontrada")]
    ComplaintNotFound,

    // --- Provedor externo (SSO) ---
    #[error("Falha no provedor de identidade: {0}")]
    ExternalProvider(String),

    #[error("SSO não configurado")]
    SsoNotConfigured,

    #[error("E-mail não cadastrado: {0}")]
    EmailNotRegistered(String),

    // --- Internos ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// A resposta que o cliente recebe
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,

            AppError::RoleMismatch { .. }
            | AppError::NotMenteeOf
            | AppError::OutsideHostel
            | AppError::RoleNotRecognized
            | AppError::EmailNotRegistered(_) => StatusCode::FORBIDDEN,

            AppError::ValidationError(_)
            | AppError::InvalidStatus(_)
            | AppError::InvalidCategory(_)
            | AppError::InvalidTransition { .. }
            | AppError::InvalidMentor
            | AppError::MissingHostel => StatusCode::BAD_REQUEST,

            AppError::EmailAlreadyExists
            | AppError::HostelNameAlreadyExists(_)
            | AppError::RoomAlreadyExists
            | AppError::HostelInUse => StatusCode::CONFLICT,

            AppError::UserNotFound | AppError::HostelNotFound | AppError::ComplaintNotFound => {
                StatusCode::NOT_FOUND
            }

            AppError::ExternalProvider(_) => StatusCode::BAD_GATEWAY,
            AppError::SsoNotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Chave do catálogo + parâmetros para interpolação
    fn message_key(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::InvalidCredentials => ("auth.invalid_credentials", vec![]),
            AppError::InvalidToken => ("auth.invalid_token", vec![]),
            AppError::RoleMismatch { required } => {
                ("access.role_mismatch", vec![("role", required.to_string())])
            }
            AppError::NotMenteeOf => ("access.not_mentee", vec![]),
            AppError::OutsideHostel => ("access.outside_hostel", vec![]),
            AppError::RoleNotRecognized => ("access.role_not_recognized", vec![]),
            AppError::ValidationError(_) => ("validation.invalid_fields", vec![]),
            AppError::InvalidStatus(value) => ("complaint.invalid_status", vec![("value", value.clone())]),
            AppError::InvalidCategory(value) => {
                ("complaint.invalid_category", vec![("value", value.clone())])
            }
            AppError::InvalidTransition { from, to } => (
                "complaint.invalid_transition",
                vec![("from", from.to_string()), ("to", to.to_string())],
            ),
            AppError::InvalidMentor => ("user.invalid_mentor", vec![]),
            AppError::MissingHostel => ("user.missing_hostel", vec![]),
            AppError::EmailAlreadyExists => ("user.email_exists", vec![]),
            AppError::HostelNameAlreadyExists(name) => ("hostel.name_exists", vec![("name", name.clone())]),
            AppError::RoomAlreadyExists => ("hostel.room_exists", vec![]),
            AppError::HostelInUse => ("hostel.in_use", vec![]),
            AppError::UserNotFound => ("user.not_found", vec![]),
            AppError::HostelNotFound => ("hostel.not_found", vec![]),
            AppError::ComplaintNotFound => ("complaint.not_found", vec![]),
            AppError::ExternalProvider(_) => ("sso.failed", vec![]),
            AppError::SsoNotConfigured => ("sso.not_configured", vec![]),
            AppError::EmailNotRegistered(email) => ("sso.not_registered", vec![("email", email.clone())]),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ("internal.unexpected", vec![]),
        }
    }

    /// Converte o erro de domínio na resposta HTTP traduzida.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();

        match self {
            // O `tracing` loga a mensagem detalhada; o cliente recebe só a genérica.
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => tracing::error!("Erro Interno do Servidor: {}", self),
            AppError::ExternalProvider(detail) => {
                tracing::warn!("Falha no provedor de identidade: {}", detail)
            }
            _ if status == StatusCode::FORBIDDEN => tracing::warn!("Acesso negado: {}", self),
            _ => {}
        }

        let (key, params) = self.message_key();
        let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let error = i18n.translate(&locale.0, key, &params);

        // Retorna todos os detalhes da validação, campo a campo.
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(message_key) => i18n.translate(&locale.0, message_key, &[]),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        let redirect_to = (status == StatusCode::FORBIDDEN).then_some(SAFE_REDIRECT);

        ApiError {
            status,
            error,
            details,
            redirect_to,
        }
    }
}

// Catálogo padrão para os caminhos sem acesso ao AppState (rejeições de extratores)
static DEFAULT_I18N: LazyLock<I18nStore> = LazyLock::new(I18nStore::embedded);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &DEFAULT_I18N).into_response()
    }
}

// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::Role;

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "validation.email"))]
    #[schema(example = "admin@kiit.ac.in")]
    pub email: String,
    #[validate(length(min = 1, message = "validation.password_required"))]
    pub password: String,
}

// Resposta de autenticação com o token e o painel de destino
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
    #[schema(example = "/student/dashboard")]
    pub redirect_to: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role, // Só informativo: a autorização sempre relê o usuário
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// "state" do fluxo OAuth, assinado com o mesmo segredo do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct SsoStateClaims {
    pub aud: String,
    pub nonce: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SsoRedirect {
    pub authorize_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SsoCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

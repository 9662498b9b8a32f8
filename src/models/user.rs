// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE user_role do banco.
// Um usuário tem exatamente um papel, atribuído pelo Admin na criação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
    Warden,
    Mentor,
    Gatekeeper,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Warden => "warden",
            Role::Mentor => "mentor",
            Role::Gatekeeper => "gatekeeper",
        }
    }

    /// Painel inicial de cada papel. Gatekeeper não tem painel.
    pub fn landing_path(self) -> Option<&'static str> {
        match self {
            Role::Admin => Some("/admin/dashboard"),
            Role::Student => Some("/student/dashboard"),
            Role::Warden => Some("/warden/dashboard"),
            Role::Mentor => Some("/mentor/dashboard"),
            Role::Gatekeeper => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- ENTIDADE ---

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "aluno@kiit.ac.in")]
    pub email: String,

    #[schema(example = "Ravi Kumar")]
    pub name: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub role: Role,

    pub hostel_id: Option<Uuid>,

    // Texto livre: não existe verificação contra a tabela de quartos
    #[schema(example = "104")]
    pub room_number: Option<String>,

    // Apenas estudantes: aponta para o usuário Mentor
    pub mentor_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// Dados para inserir um usuário (senha já em hash)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Role,
    pub hostel_id: Option<Uuid>,
    pub room_number: Option<String>,
    pub mentor_id: Option<Uuid>,
}

// Filtros de listagem (todos opcionais)
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub hostel_id: Option<Uuid>,
    pub mentor_id: Option<Uuid>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "validation.email"))]
    #[schema(example = "mentor@kiit.ac.in")]
    pub email: String,

    #[validate(length(min = 1, max = 120, message = "validation.name"))]
    #[schema(example = "Dr. Anjali Rao")]
    pub name: String,

    #[validate(length(min = 6, message = "validation.password"))]
    pub password: String,

    pub role: Role,

    pub hostel_id: Option<Uuid>,

    pub mentor_id: Option<Uuid>,

    #[validate(length(max = 20, message = "validation.room_number"))]
    pub room_number: Option<String>,
}

// Edição genérica. O papel não muda depois de atribuído.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 1, max = 120, message = "validation.name"))]
    pub name: String,

    pub hostel_id: Option<Uuid>,

    pub mentor_id: Option<Uuid>,

    #[validate(length(max = 20, message = "validation.room_number"))]
    pub room_number: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub hostel_id: Option<Uuid>,
}

impl From<UserQuery> for UserFilter {
    fn from(query: UserQuery) -> Self {
        Self {
            role: query.role,
            hostel_id: query.hostel_id,
            mentor_id: None,
        }
    }
}

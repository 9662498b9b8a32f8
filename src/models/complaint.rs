// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, models::user::User};

// --- ENUMS ---

// Mapeia o CREATE TYPE complaint_status do banco.
// As regras de transição ficam em services::lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Flagged,
    Rejected,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Flagged,
        ComplaintStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Flagged => "flagged",
            ComplaintStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::InvalidStatus(value.to_string()))
    }
}

// Mapeia o CREATE TYPE complaint_category do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electric,
    Toilet,
    Wifi,
    Mess,
    Personal,
    #[sqlx(rename = "others")]
    #[serde(rename = "others", alias = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electric,
        Category::Toilet,
        Category::Wifi,
        Category::Mess,
        Category::Personal,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electric => "electric",
            Category::Toilet => "toilet",
            Category::Wifi => "wifi",
            Category::Mess => "mess",
            Category::Personal => "personal",
            Category::Other => "others",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "other" {
            return Ok(Category::Other);
        }
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| AppError::InvalidCategory(value.to_string()))
    }
}

// --- ENTIDADE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    #[schema(example = "wifi down")]
    pub heading: String,
    #[schema(example = "No connectivity on the second floor since morning")]
    pub description: String,
    pub category: Category,
    pub status: ComplaintStatus,
    pub is_urgent: bool,
    pub is_abusive: bool,
    pub mentor_comment: Option<String>,
    pub warden_comment: Option<String>,
    // Autor (sempre um Student)
    pub user_id: Uuid,
    // Igual ao bloco do autor no momento da criação
    pub hostel_id: Uuid,
    pub created_at: DateTime<Utc>,
    // Preenchido só quando o status vira Resolved
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub heading: String,
    pub description: String,
    pub category: Category,
    pub status: ComplaintStatus,
    pub is_abusive: bool,
    pub user_id: Uuid,
    pub hostel_id: Uuid,
}

// Filtros de listagem. Resultado sempre do mais novo para o mais antigo.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub author_id: Option<Uuid>,
    // Conjunto de autores (mentorados de um mentor)
    pub author_ids: Option<Vec<Uuid>>,
    pub hostel_id: Option<Uuid>,
    pub status: Option<ComplaintStatus>,
}

// --- PAYLOADS ---

// Texto só com espaços conta como campo vazio
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// Categoria e status chegam como texto para devolver um erro de validação
// legível em vez da rejeição genérica do extrator Json.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintPayload {
    #[validate(
        length(min = 1, max = 100, message = "validation.heading"),
        custom(function = "validate_not_blank", message = "validation.heading")
    )]
    #[schema(example = "wifi down")]
    pub heading: String,

    #[validate(custom(function = "validate_not_blank", message = "validation.description"))]
    pub description: String,

    #[schema(example = "wifi")]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminComplaintPayload {
    pub student_id: Uuid,

    #[validate(
        length(min = 1, max = 100, message = "validation.heading"),
        custom(function = "validate_not_blank", message = "validation.heading")
    )]
    pub heading: String,

    #[validate(custom(function = "validate_not_blank", message = "validation.description"))]
    pub description: String,

    #[schema(example = "mess")]
    pub category: String,
}

impl AdminComplaintPayload {
    pub fn into_draft(self) -> (Uuid, CreateComplaintPayload) {
        (
            self.student_id,
            CreateComplaintPayload {
                heading: self.heading,
                description: self.description,
                category: self.category,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorReviewPayload {
    pub comment: Option<String>,
    #[serde(default)]
    pub is_urgent: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WardenUpdatePayload {
    #[schema(example = "in_progress")]
    pub status: String,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminComplaintQuery {
    pub hostel_id: Option<Uuid>,
    // Padrão: pending
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub hostel_id: Option<Uuid>,
}

// --- VIEW-MODELS ---

// Resposta da criação: `flagged` avisa o autor que o filtro de conteúdo agiu
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiledComplaint {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub flagged: bool,
}

// Em qual coluna do painel do Warden a reclamação aparece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WardenBucket {
    Archived,
    Completed,
    Escalated,
    InProgress,
    Pending,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WardenBoard {
    pub pending: Vec<Complaint>,
    pub escalated: Vec<Complaint>,
    pub in_progress: Vec<Complaint>,
    pub archived: Vec<Complaint>,
    pub completed: Vec<Complaint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ComplaintStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student: User,
    pub flagged: Vec<Complaint>,
    pub history: Vec<Complaint>,
}

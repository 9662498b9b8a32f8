// src/models/hostel.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE hostel_gender do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "hostel_gender")]
pub enum HostelGender {
    Boys,
    Girls,
}

// ---
// 1. Hostel (O "Bloco")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    pub id: Uuid,
    #[schema(example = "West Wing")]
    pub name: String,
    pub gender: HostelGender,
    #[schema(example = 10)]
    pub total_rooms: i32,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. Room (O "Quarto")
// ---
// Número único dentro do bloco
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub hostel_id: Uuid,
    #[schema(example = "101")]
    pub room_number: String,
}

#[derive(Debug, Clone)]
pub struct NewHostel {
    pub name: String,
    pub gender: HostelGender,
    pub total_rooms: i32,
}

// Bloco + quartos, para a tela de detalhe
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostelDetail {
    #[serde(flatten)]
    pub hostel: Hostel,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostelPayload {
    #[validate(length(min = 1, max = 50, message = "validation.hostel_name"))]
    #[schema(example = "West Wing")]
    pub name: String,

    pub gender: HostelGender,

    #[validate(range(min = 1, max = 999, message = "validation.total_rooms"))]
    #[schema(example = 10)]
    pub total_rooms: i32,
}

impl From<HostelPayload> for NewHostel {
    fn from(payload: HostelPayload) -> Self {
        Self {
            name: payload.name,
            gender: payload.gender,
            total_rooms: payload.total_rooms,
        }
    }
}

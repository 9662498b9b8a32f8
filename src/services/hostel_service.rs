// src/services/hostel_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        hostel::{Hostel, HostelDetail, NewHostel, Room},
        user::{Role, User},
    },
    services::access::authorize,
};

// Primeiro quarto é o 101
const FIRST_ROOM_OFFSET: i32 = 100;

/// Números dos quartos de um bloco com `total` quartos: 101..=100+total.
pub fn room_numbers(total: i32) -> Vec<String> {
    (1..=total).map(|i| (FIRST_ROOM_OFFSET + i).to_string()).collect()
}

/// Gera os quartos dentro da transação recebida. Se o bloco já tem
/// qualquer quarto, não faz nada e devolve uma lista vazia.
pub async fn generate_rooms(tx: &mut dyn StoreTx, hostel: &Hostel) -> Result<Vec<Room>, AppError> {
    // find_hostel travou a linha do bloco: duas gerações simultâneas se serializam aqui
    if tx.count_rooms(hostel.id).await? > 0 {
        return Ok(Vec::new());
    }
    let rooms = tx.insert_rooms(hostel.id, &room_numbers(hostel.total_rooms)).await?;
    tracing::info!("🚪 {} quartos gerados para o bloco '{}'", rooms.len(), hostel.name);
    Ok(rooms)
}

#[derive(Clone)]
pub struct HostelService {
    store: Arc<dyn Store>,
}

impl HostelService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Cria o bloco e, na mesma transação, os seus quartos.
    pub async fn create_hostel(&self, actor: &User, new_hostel: NewHostel) -> Result<HostelDetail, AppError> {
        authorize(actor, Role::Admin)?;

        // 1. Inicia a transação
        let mut tx = self.store.begin().await?;

        // 2. Nome único (a constraint do banco é a garantia final)
        if tx.find_hostel_by_name(&new_hostel.name).await?.is_some() {
            return Err(AppError::HostelNameAlreadyExists(new_hostel.name));
        }

        // 3. Cria o bloco e gera os quartos
        let hostel = tx.insert_hostel(&new_hostel).await?;
        let rooms = generate_rooms(tx.as_mut(), &hostel).await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!("🏠 Bloco '{}' criado ({:?}, {} quartos)", hostel.name, hostel.gender, hostel.total_rooms);
        Ok(HostelDetail { hostel, rooms })
    }

    /// Gera os quartos de um bloco existente. Idempotente.
    pub async fn generate_rooms(&self, actor: &User, hostel_id: Uuid) -> Result<Vec<Room>, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let hostel = tx.find_hostel(hostel_id).await?.ok_or(AppError::HostelNotFound)?;

        let created = generate_rooms(tx.as_mut(), &hostel).await?;
        if created.is_empty() {
            tracing::info!("Bloco '{}' já possui quartos; nada a gerar.", hostel.name);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_hostels(&self, actor: &User) -> Result<Vec<Hostel>, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let hostels = tx.list_hostels().await?;
        tx.commit().await?;
        Ok(hostels)
    }

    pub async fn get_hostel(&self, actor: &User, hostel_id: Uuid) -> Result<HostelDetail, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let hostel = tx.find_hostel(hostel_id).await?.ok_or(AppError::HostelNotFound)?;
        let rooms = tx.list_rooms(hostel.id).await?;
        tx.commit().await?;

        Ok(HostelDetail { hostel, rooms })
    }

    pub async fn list_rooms(&self, actor: &User, hostel_id: Uuid) -> Result<Vec<Room>, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        tx.find_hostel(hostel_id).await?.ok_or(AppError::HostelNotFound)?;
        let rooms = tx.list_rooms(hostel_id).await?;
        tx.commit().await?;
        Ok(rooms)
    }

    /// Altera nome, gênero e total de quartos. Os quartos já gerados não mudam.
    pub async fn update_hostel(
        &self,
        actor: &User,
        hostel_id: Uuid,
        changes: NewHostel,
    ) -> Result<Hostel, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let mut hostel = tx.find_hostel(hostel_id).await?.ok_or(AppError::HostelNotFound)?;

        if let Some(other) = tx.find_hostel_by_name(&changes.name).await? {
            if other.id != hostel.id {
                return Err(AppError::HostelNameAlreadyExists(changes.name));
            }
        }

        hostel.name = changes.name;
        hostel.gender = changes.gender;
        hostel.total_rooms = changes.total_rooms;

        let updated = tx.update_hostel(&hostel).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Remove o bloco e os seus quartos. Bloco com moradores ou reclamações é recusado.
    pub async fn delete_hostel(&self, actor: &User, hostel_id: Uuid) -> Result<(), AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        if !tx.delete_hostel(hostel_id).await? {
            return Err(AppError::HostelNotFound);
        }
        tx.commit().await?;

        tracing::info!("Bloco {} removido", hostel_id);
        Ok(())
    }
}

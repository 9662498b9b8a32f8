// src/services/user_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        complaint::{ComplaintFilter, ComplaintStatus, StudentProfile},
        user::{CreateUserPayload, NewUser, Role, UpdateUserPayload, User, UserFilter},
    },
    services::{access::authorize, auth::hash_password},
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Cria um usuário de qualquer papel (operação do Admin).
    pub async fn create_user(&self, actor: &User, payload: CreateUserPayload) -> Result<User, AppError> {
        authorize(actor, Role::Admin)?;

        // 1. Hashing (fora da transação, não toca no banco)
        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;

        // 2. Inicia a transação e valida as referências
        let mut tx = self.store.begin().await?;

        if tx.find_user_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }
        check_references(tx.as_mut(), payload.role, payload.hostel_id, payload.mentor_id).await?;

        // 3. Insere
        let new_user = NewUser {
            email: payload.email,
            name: Some(payload.name),
            password_hash: Some(password_hash),
            role: payload.role,
            hostel_id: payload.hostel_id,
            room_number: payload.room_number.filter(|room| !room.trim().is_empty()),
            mentor_id: payload.mentor_id,
        };
        let user = tx.insert_user(&new_user).await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!("👤 Usuário {} criado com papel {}", user.email, user.role);
        Ok(user)
    }

    /// Lista com filtros opcionais. Ordenado pelo número do quarto.
    pub async fn list_users(&self, actor: &User, filter: UserFilter) -> Result<Vec<User>, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let users = tx.list_users(&filter).await?;
        tx.commit().await?;
        Ok(users)
    }

    pub async fn get_user(&self, actor: &User, user_id: Uuid) -> Result<User, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let user = tx.find_user(user_id).await?.ok_or(AppError::UserNotFound)?;
        tx.commit().await?;
        Ok(user)
    }

    /// Edição genérica. O papel e a senha não mudam por aqui.
    pub async fn update_user(
        &self,
        actor: &User,
        user_id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let mut user = tx.find_user(user_id).await?.ok_or(AppError::UserNotFound)?;

        if let Some(other) = tx.find_user_by_email(&payload.email).await? {
            if other.id != user.id {
                return Err(AppError::EmailAlreadyExists);
            }
        }
        check_references(tx.as_mut(), user.role, payload.hostel_id, payload.mentor_id).await?;

        user.email = payload.email;
        user.name = Some(payload.name);
        user.hostel_id = payload.hostel_id;
        user.mentor_id = payload.mentor_id;
        user.room_number = payload.room_number.filter(|room| !room.trim().is_empty());

        let updated = tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!("Perfil de {} atualizado", updated.email);
        Ok(updated)
    }

    /// Remove o usuário, as reclamações dele e as referências de mentor que apontam para ele.
    pub async fn delete_user(&self, actor: &User, user_id: Uuid) -> Result<(), AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        if !tx.delete_user(user_id).await? {
            return Err(AppError::UserNotFound);
        }
        tx.commit().await?;

        tracing::info!("Usuário {} removido", user_id);
        Ok(())
    }

    /// Perfil completo de um estudante: reclamações marcadas separadas do histórico.
    pub async fn student_profile(&self, actor: &User, student_id: Uuid) -> Result<StudentProfile, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let student = tx
            .find_user(student_id)
            .await?
            .filter(|user| user.role == Role::Student)
            .ok_or(AppError::UserNotFound)?;

        let filter = ComplaintFilter {
            author_id: Some(student.id),
            ..Default::default()
        };
        let all = tx.list_complaints(&filter).await?;
        tx.commit().await?;

        let (flagged, history) = all
            .into_iter()
            .partition(|complaint| complaint.status == ComplaintStatus::Flagged);

        Ok(StudentProfile {
            student,
            flagged,
            history,
        })
    }

    /// Na subida: cria o primeiro Admin se ainda não existir nenhum.
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        let mut tx = self.store.begin().await?;
        let admins = tx
            .list_users(&UserFilter {
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await?;
        if !admins.is_empty() {
            return Ok(None);
        }

        let admin = tx
            .insert_user(&NewUser {
                email: email.to_string(),
                name: Some("Administrator".to_string()),
                password_hash: Some(password_hash),
                role: Role::Admin,
                hostel_id: None,
                room_number: None,
                mentor_id: None,
            })
            .await?;
        tx.commit().await?;

        tracing::info!("🔑 Admin inicial criado: {}", admin.email);
        Ok(Some(admin))
    }
}

// Bloco precisa existir; mentor só para estudantes e precisa ser um Mentor
async fn check_references(
    tx: &mut dyn StoreTx,
    role: Role,
    hostel_id: Option<Uuid>,
    mentor_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(hostel_id) = hostel_id {
        tx.find_hostel(hostel_id).await?.ok_or(AppError::HostelNotFound)?;
    }

    if let Some(mentor_id) = mentor_id {
        if role != Role::Student {
            return Err(AppError::InvalidMentor);
        }
        let mentor = tx.find_user(mentor_id).await?.ok_or(AppError::InvalidMentor)?;
        if mentor.role != Role::Mentor {
            return Err(AppError::InvalidMentor);
        }
    }
    Ok(())
}

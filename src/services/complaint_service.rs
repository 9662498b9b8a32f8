// src/services/complaint_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        complaint::{
            Category, Complaint, ComplaintFilter, ComplaintStatus, CreateComplaintPayload, FiledComplaint,
            MentorReviewPayload, NewComplaint, StatusCount, WardenBoard, WardenUpdatePayload,
        },
        user::{Role, User, UserFilter},
    },
    services::{
        access::{authorize, ensure_mentor_of, ensure_same_hostel},
        lifecycle,
        moderation::{contains_flagged_content, Blocklist},
    },
};

#[derive(Clone)]
pub struct ComplaintService {
    store: Arc<dyn Store>,
    blocklist: Arc<Blocklist>,
}

impl ComplaintService {
    pub fn new(store: Arc<dyn Store>, blocklist: Arc<Blocklist>) -> Self {
        Self { store, blocklist }
    }

    // Passa pelo filtro de conteúdo e grava no bloco do autor
    async fn file_for(
        &self,
        tx: &mut dyn StoreTx,
        author: &User,
        draft: CreateComplaintPayload,
    ) -> Result<FiledComplaint, AppError> {
        let category: Category = draft.category.parse()?;
        let hostel_id = author.hostel_id.ok_or(AppError::MissingHostel)?;

        let flagged = contains_flagged_content(Some(draft.heading.as_str()), &self.blocklist)
            || contains_flagged_content(Some(draft.description.as_str()), &self.blocklist);
        let (status, is_abusive) = lifecycle::initial_state(flagged);

        let complaint = tx
            .insert_complaint(&NewComplaint {
                heading: draft.heading,
                description: draft.description,
                category,
                status,
                is_abusive,
                user_id: author.id,
                hostel_id,
            })
            .await?;

        if flagged {
            tracing::warn!("🚩 Reclamação {} de {} marcada pelo filtro de conteúdo", complaint.id, author.email);
        } else {
            tracing::info!("📝 Reclamação {} registrada por {}", complaint.id, author.email);
        }
        Ok(FiledComplaint { complaint, flagged })
    }

    // ---
    // Student
    // ---

    pub async fn file_complaint(
        &self,
        actor: &User,
        draft: CreateComplaintPayload,
    ) -> Result<FiledComplaint, AppError> {
        authorize(actor, Role::Student)?;

        let mut tx = self.store.begin().await?;
        let filed = self.file_for(tx.as_mut(), actor, draft).await?;
        tx.commit().await?;
        Ok(filed)
    }

    pub async fn list_own(&self, actor: &User) -> Result<Vec<Complaint>, AppError> {
        authorize(actor, Role::Student)?;

        let filter = ComplaintFilter {
            author_id: Some(actor.id),
            ..Default::default()
        };
        let mut tx = self.store.begin().await?;
        let complaints = tx.list_complaints(&filter).await?;
        tx.commit().await?;
        Ok(complaints)
    }

    // ---
    // Mentor
    // ---

    pub async fn list_mentees(&self, actor: &User) -> Result<Vec<User>, AppError> {
        authorize(actor, Role::Mentor)?;

        let mut tx = self.store.begin().await?;
        let mentees = tx.list_users(&mentee_filter(actor)).await?;
        tx.commit().await?;
        Ok(mentees)
    }

    /// Reclamações de todos os mentorados, da mais nova para a mais antiga.
    pub async fn list_mentee_complaints(&self, actor: &User) -> Result<Vec<Complaint>, AppError> {
        authorize(actor, Role::Mentor)?;

        let mut tx = self.store.begin().await?;
        let mentee_ids: Vec<Uuid> = tx
            .list_users(&mentee_filter(actor))
            .await?
            .into_iter()
            .map(|mentee| mentee.id)
            .collect();

        if mentee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = ComplaintFilter {
            author_ids: Some(mentee_ids),
            ..Default::default()
        };
        let complaints = tx.list_complaints(&filter).await?;
        tx.commit().await?;
        Ok(complaints)
    }

    pub async fn mentor_review(
        &self,
        actor: &User,
        complaint_id: Uuid,
        review: MentorReviewPayload,
    ) -> Result<Complaint, AppError> {
        authorize(actor, Role::Mentor)?;

        // 1. Lê e trava a reclamação
        let mut tx = self.store.begin().await?;
        let mut complaint = tx
            .find_complaint(complaint_id)
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        // 2. Posse: o autor precisa ser mentorado de quem chama
        let author = tx.find_user(complaint.user_id).await?.ok_or(AppError::UserNotFound)?;
        ensure_mentor_of(actor, &author)?;

        // 3. Aplica e grava
        lifecycle::mentor_review(&mut complaint, review.comment, review.is_urgent);
        let updated = tx.update_complaint(&complaint).await?;
        tx.commit().await?;

        if updated.is_urgent {
            tracing::info!("⚠️ Reclamação {} escalada pelo mentor {}", updated.id, actor.email);
        }
        Ok(updated)
    }

    // ---
    // Warden
    // ---

    pub async fn warden_board(&self, actor: &User) -> Result<WardenBoard, AppError> {
        authorize(actor, Role::Warden)?;
        let hostel_id = actor.hostel_id.ok_or(AppError::MissingHostel)?;

        let filter = ComplaintFilter {
            hostel_id: Some(hostel_id),
            ..Default::default()
        };
        let mut tx = self.store.begin().await?;
        let complaints = tx.list_complaints(&filter).await?;
        tx.commit().await?;

        Ok(lifecycle::build_board(complaints))
    }

    pub async fn warden_update(
        &self,
        actor: &User,
        complaint_id: Uuid,
        update: WardenUpdatePayload,
    ) -> Result<Complaint, AppError> {
        authorize(actor, Role::Warden)?;

        // Status desconhecido é recusado antes de qualquer leitura
        let to: ComplaintStatus = update.status.parse()?;

        let mut tx = self.store.begin().await?;
        let mut complaint = tx
            .find_complaint(complaint_id)
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        ensure_same_hostel(actor, &complaint)?;
        let from = complaint.status;
        lifecycle::warden_transition(&mut complaint, to, update.comment, Utc::now())?;

        let updated = tx.update_complaint(&complaint).await?;
        tx.commit().await?;

        tracing::info!("Reclamação {}: {} -> {} (warden {})", updated.id, from, to, actor.email);
        Ok(updated)
    }

    // ---
    // Admin
    // ---

    /// Sem status, lista as pendentes. Sem bloco, lista de todos os blocos.
    pub async fn admin_list(
        &self,
        actor: &User,
        hostel_id: Option<Uuid>,
        status: Option<&str>,
    ) -> Result<Vec<Complaint>, AppError> {
        authorize(actor, Role::Admin)?;

        let status = match status {
            Some(value) => value.parse::<ComplaintStatus>()?,
            None => ComplaintStatus::Pending,
        };
        let filter = ComplaintFilter {
            hostel_id,
            status: Some(status),
            ..Default::default()
        };

        let mut tx = self.store.begin().await?;
        let complaints = tx.list_complaints(&filter).await?;
        tx.commit().await?;
        Ok(complaints)
    }

    /// Contagem por status. Todos os cinco aparecem, mesmo com zero.
    pub async fn admin_summary(&self, actor: &User, hostel_id: Option<Uuid>) -> Result<Vec<StatusCount>, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let mut counts = Vec::with_capacity(ComplaintStatus::ALL.len());
        for status in ComplaintStatus::ALL {
            let count = tx.count_complaints(hostel_id, status).await?;
            counts.push(StatusCount { status, count });
        }
        tx.commit().await?;
        Ok(counts)
    }

    /// Registra em nome de um estudante, com as mesmas regras da criação pelo aluno.
    pub async fn admin_file(
        &self,
        actor: &User,
        student_id: Uuid,
        draft: CreateComplaintPayload,
    ) -> Result<FiledComplaint, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let author = tx
            .find_user(student_id)
            .await?
            .filter(|user| user.role == Role::Student)
            .ok_or(AppError::UserNotFound)?;

        let filed = self.file_for(tx.as_mut(), &author, draft).await?;
        tx.commit().await?;
        Ok(filed)
    }

    pub async fn admin_get(&self, actor: &User, complaint_id: Uuid) -> Result<Complaint, AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        let complaint = tx
            .find_complaint(complaint_id)
            .await?
            .ok_or(AppError::ComplaintNotFound)?;
        tx.commit().await?;
        Ok(complaint)
    }

    /// Corrige título, descrição e categoria. O status não muda por aqui.
    pub async fn admin_edit(
        &self,
        actor: &User,
        complaint_id: Uuid,
        changes: CreateComplaintPayload,
    ) -> Result<Complaint, AppError> {
        authorize(actor, Role::Admin)?;
        let category: Category = changes.category.parse()?;

        let mut tx = self.store.begin().await?;
        let mut complaint = tx
            .find_complaint(complaint_id)
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        complaint.heading = changes.heading;
        complaint.description = changes.description;
        complaint.category = category;

        let updated = tx.update_complaint(&complaint).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn admin_delete(&self, actor: &User, complaint_id: Uuid) -> Result<(), AppError> {
        authorize(actor, Role::Admin)?;

        let mut tx = self.store.begin().await?;
        if !tx.delete_complaint(complaint_id).await? {
            return Err(AppError::ComplaintNotFound);
        }
        tx.commit().await?;

        tracing::info!("🗑️ Reclamação {} removida permanentemente por {}", complaint_id, actor.email);
        Ok(())
    }
}

fn mentee_filter(mentor: &User) -> UserFilter {
    UserFilter {
        role: Some(Role::Student),
        hostel_id: None,
        mentor_id: Some(mentor.id),
    }
}

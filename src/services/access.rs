// src/services/access.rs
//
// O guardião de acesso. Primeiro o papel, depois a posse do recurso.

use crate::{
    common::error::AppError,
    models::{complaint::Complaint, user::{Role, User}},
};

/// Toda operação de painel começa aqui.
pub fn authorize(actor: &User, required: Role) -> Result<(), AppError> {
    if actor.role != required {
        return Err(AppError::RoleMismatch { required });
    }
    Ok(())
}

/// Mentor só mexe em reclamações de quem ele orienta.
pub fn ensure_mentor_of(mentor: &User, author: &User) -> Result<(), AppError> {
    if author.mentor_id != Some(mentor.id) {
        return Err(AppError::NotMenteeOf);
    }
    Ok(())
}

/// Warden só mexe em reclamações do próprio bloco.
pub fn ensure_same_hostel(warden: &User, complaint: &Complaint) -> Result<(), AppError> {
    if warden.hostel_id != Some(complaint.hostel_id) {
        return Err(AppError::OutsideHostel);
    }
    Ok(())
}

// src/db/memory.rs
//
// Store em memória usado pelos testes. Reproduz as constraints do schema
// (nomes únicos, e-mail único, quarto único por bloco, cascatas) e a
// atomicidade: a transação trabalha numa cópia e só publica no commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Store, StoreTx},
    models::{
        complaint::{Complaint, ComplaintFilter, ComplaintStatus, NewComplaint},
        hostel::{Hostel, NewHostel, Room},
        user::{NewUser, User, UserFilter},
    },
};

#[derive(Debug, Clone, Default)]
struct MemState {
    hostels: Vec<Hostel>,
    rooms: Vec<Room>,
    users: Vec<User>,
    complaints: Vec<Complaint>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        // Uma transação por vez: equivale a isolamento serializável
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemState>,
    work: MemState,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn insert_hostel(&mut self, hostel: &NewHostel) -> Result<Hostel, AppError> {
        if self.work.hostels.iter().any(|h| h.name == hostel.name) {
            return Err(AppError::HostelNameAlreadyExists(hostel.name.clone()));
        }
        let created = Hostel {
            id: Uuid::new_v4(),
            name: hostel.name.clone(),
            gender: hostel.gender,
            total_rooms: hostel.total_rooms,
            created_at: Utc::now(),
        };
        self.work.hostels.push(created.clone());
        Ok(created)
    }

    async fn find_hostel(&mut self, id: Uuid) -> Result<Option<Hostel>, AppError> {
        Ok(self.work.hostels.iter().find(|h| h.id == id).cloned())
    }

    async fn find_hostel_by_name(&mut self, name: &str) -> Result<Option<Hostel>, AppError> {
        Ok(self.work.hostels.iter().find(|h| h.name == name).cloned())
    }

    async fn list_hostels(&mut self) -> Result<Vec<Hostel>, AppError> {
        let mut hostels = self.work.hostels.clone();
        hostels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hostels)
    }

    async fn update_hostel(&mut self, hostel: &Hostel) -> Result<Hostel, AppError> {
        if self
            .work
            .hostels
            .iter()
            .any(|h| h.name == hostel.name && h.id != hostel.id)
        {
            return Err(AppError::HostelNameAlreadyExists(hostel.name.clone()));
        }
        let slot = self
            .work
            .hostels
            .iter_mut()
            .find(|h| h.id == hostel.id)
            .ok_or(AppError::HostelNotFound)?;
        slot.name = hostel.name.clone();
        slot.gender = hostel.gender;
        slot.total_rooms = hostel.total_rooms;
        Ok(slot.clone())
    }

    async fn delete_hostel(&mut self, id: Uuid) -> Result<bool, AppError> {
        let referenced = self.work.users.iter().any(|u| u.hostel_id == Some(id))
            || self.work.complaints.iter().any(|c| c.hostel_id == id);
        if referenced {
            return Err(AppError::HostelInUse);
        }
        let before = self.work.hostels.len();
        self.work.hostels.retain(|h| h.id != id);
        self.work.rooms.retain(|r| r.hostel_id != id);
        Ok(self.work.hostels.len() < before)
    }

    async fn count_rooms(&mut self, hostel_id: Uuid) -> Result<i64, AppError> {
        Ok(self.work.rooms.iter().filter(|r| r.hostel_id == hostel_id).count() as i64)
    }

    async fn insert_rooms(&mut self, hostel_id: Uuid, numbers: &[String]) -> Result<Vec<Room>, AppError> {
        let mut created = Vec::with_capacity(numbers.len());
        for number in numbers {
            let taken = self
                .work
                .rooms
                .iter()
                .any(|r| r.hostel_id == hostel_id && &r.room_number == number);
            if taken {
                return Err(AppError::RoomAlreadyExists);
            }
            let room = Room {
                id: Uuid::new_v4(),
                hostel_id,
                room_number: number.clone(),
            };
            self.work.rooms.push(room.clone());
            created.push(room);
        }
        Ok(created)
    }

    async fn list_rooms(&mut self, hostel_id: Uuid) -> Result<Vec<Room>, AppError> {
        let mut rooms: Vec<Room> = self
            .work
            .rooms
            .iter()
            .filter(|r| r.hostel_id == hostel_id)
            .cloned()
            .collect();
        rooms.sort_by(|a, b| {
            (a.room_number.len(), &a.room_number).cmp(&(b.room_number.len(), &b.room_number))
        });
        Ok(rooms)
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError> {
        if self
            .work
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::EmailAlreadyExists);
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            hostel_id: user.hostel_id,
            room_number: user.room_number.clone(),
            mentor_id: user.mentor_id,
            created_at: Utc::now(),
        };
        self.work.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.work.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .work
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self
            .work
            .users
            .iter()
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .filter(|u| filter.hostel_id.is_none_or(|id| u.hostel_id == Some(id)))
            .filter(|u| filter.mentor_id.is_none_or(|id| u.mentor_id == Some(id)))
            .cloned()
            .collect();
        users.sort_by(|a, b| {
            (a.room_number.is_none(), &a.room_number, &a.email)
                .cmp(&(b.room_number.is_none(), &b.room_number, &b.email))
        });
        Ok(users)
    }

    async fn update_user(&mut self, user: &User) -> Result<User, AppError> {
        if self
            .work
            .users
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::EmailAlreadyExists);
        }
        let slot = self
            .work
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::UserNotFound)?;
        slot.email = user.email.clone();
        slot.name = user.name.clone();
        slot.hostel_id = user.hostel_id;
        slot.room_number = user.room_number.clone();
        slot.mentor_id = user.mentor_id;
        Ok(slot.clone())
    }

    async fn delete_user(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.work.users.len();
        self.work.users.retain(|u| u.id != id);
        self.work.complaints.retain(|c| c.user_id != id);
        for mentee in self.work.users.iter_mut().filter(|u| u.mentor_id == Some(id)) {
            mentee.mentor_id = None;
        }
        Ok(self.work.users.len() < before)
    }

    async fn insert_complaint(&mut self, complaint: &NewComplaint) -> Result<Complaint, AppError> {
        let created = Complaint {
            id: Uuid::new_v4(),
            heading: complaint.heading.clone(),
            description: complaint.description.clone(),
            category: complaint.category,
            status: complaint.status,
            is_urgent: false,
            is_abusive: complaint.is_abusive,
            mentor_comment: None,
            warden_comment: None,
            user_id: complaint.user_id,
            hostel_id: complaint.hostel_id,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.work.complaints.push(created.clone());
        Ok(created)
    }

    async fn find_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        Ok(self.work.complaints.iter().find(|c| c.id == id).cloned())
    }

    async fn list_complaints(&mut self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, AppError> {
        // Inserção mais recente primeiro; o sort estável mantém essa ordem em empates
        let mut complaints: Vec<Complaint> = self
            .work
            .complaints
            .iter()
            .rev()
            .filter(|c| filter.author_id.is_none_or(|id| c.user_id == id))
            .filter(|c| {
                filter
                    .author_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&c.user_id))
            })
            .filter(|c| filter.hostel_id.is_none_or(|id| c.hostel_id == id))
            .filter(|c| filter.status.is_none_or(|status| c.status == status))
            .cloned()
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    async fn update_complaint(&mut self, complaint: &Complaint) -> Result<Complaint, AppError> {
        let slot = self
            .work
            .complaints
            .iter_mut()
            .find(|c| c.id == complaint.id)
            .ok_or(AppError::ComplaintNotFound)?;
        *slot = complaint.clone();
        Ok(slot.clone())
    }

    async fn delete_complaint(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.work.complaints.len();
        self.work.complaints.retain(|c| c.id != id);
        Ok(self.work.complaints.len() < before)
    }

    async fn count_complaints(
        &mut self,
        hostel_id: Option<Uuid>,
        status: ComplaintStatus,
    ) -> Result<i64, AppError> {
        Ok(self
            .work
            .complaints
            .iter()
            .filter(|c| c.status == status)
            .filter(|c| hostel_id.is_none_or(|id| c.hostel_id == id))
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hostel::HostelGender;

    fn west_wing() -> NewHostel {
        NewHostel {
            name: "West Wing".into(),
            gender: HostelGender::Boys,
            total_rooms: 3,
        }
    }

    #[tokio::test]
    async fn uncommitted_transactions_leave_no_trace() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.expect("begin");
        tx.insert_hostel(&west_wing()).await.expect("insert");
        drop(tx);

        let mut tx = store.begin().await.expect("begin");
        assert!(tx.list_hostels().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_later_transactions() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.expect("begin");
        tx.insert_hostel(&west_wing()).await.expect("insert");
        tx.commit().await.expect("commit");

        let mut tx = store.begin().await.expect("begin");
        let found = tx.find_hostel_by_name("West Wing").await.expect("find");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn room_numbers_are_unique_per_hostel() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        let hostel = tx.insert_hostel(&west_wing()).await.expect("insert");

        tx.insert_rooms(hostel.id, &["101".into()]).await.expect("first");
        let err = tx
            .insert_rooms(hostel.id, &["101".into()])
            .await
            .expect_err("duplicate");
        assert!(matches!(err, AppError::RoomAlreadyExists));
    }
}

// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        complaint::{Complaint, ComplaintFilter, ComplaintStatus, NewComplaint},
        hostel::{Hostel, NewHostel, Room},
        user::{NewUser, User, UserFilter},
    },
};

/// A fronteira de persistência.
///
/// Cada operação de serviço abre uma transação com `begin`, faz as leituras
/// de verificação e as escritas nela, e chama `commit`. Se a transação for
/// descartada sem `commit`, nada é gravado.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}

#[async_trait]
pub trait StoreTx: Send {
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    // --- HOSTELS ---

    async fn insert_hostel(&mut self, hostel: &NewHostel) -> Result<Hostel, AppError>;

    /// Trava a linha do bloco até o fim da transação.
    async fn find_hostel(&mut self, id: Uuid) -> Result<Option<Hostel>, AppError>;

    async fn find_hostel_by_name(&mut self, name: &str) -> Result<Option<Hostel>, AppError>;

    async fn list_hostels(&mut self) -> Result<Vec<Hostel>, AppError>;

    async fn update_hostel(&mut self, hostel: &Hostel) -> Result<Hostel, AppError>;

    async fn delete_hostel(&mut self, id: Uuid) -> Result<bool, AppError>;

    // --- ROOMS ---

    async fn count_rooms(&mut self, hostel_id: Uuid) -> Result<i64, AppError>;

    async fn insert_rooms(&mut self, hostel_id: Uuid, numbers: &[String]) -> Result<Vec<Room>, AppError>;

    /// Ordenados pelo número do quarto.
    async fn list_rooms(&mut self, hostel_id: Uuid) -> Result<Vec<Room>, AppError>;

    // --- USERS ---

    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError>;

    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;

    /// Ordenados pelo número do quarto (sem quarto por último) e depois pelo e-mail.
    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError>;

    async fn update_user(&mut self, user: &User) -> Result<User, AppError>;

    /// Remove também as reclamações do usuário e limpa referências de mentor.
    async fn delete_user(&mut self, id: Uuid) -> Result<bool, AppError>;

    // --- COMPLAINTS ---

    async fn insert_complaint(&mut self, complaint: &NewComplaint) -> Result<Complaint, AppError>;

    /// Trava a linha da reclamação até o fim da transação.
    async fn find_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError>;

    /// Do mais novo para o mais antigo.
    async fn list_complaints(&mut self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, AppError>;

    async fn update_complaint(&mut self, complaint: &Complaint) -> Result<Complaint, AppError>;

    async fn delete_complaint(&mut self, id: Uuid) -> Result<bool, AppError>;

    async fn count_complaints(
        &mut self,
        hostel_id: Option<Uuid>,
        status: ComplaintStatus,
    ) -> Result<i64, AppError>;
}

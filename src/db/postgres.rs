// src/db/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::Config,
    db::store::{Store, StoreTx},
    models::{
        complaint::{Complaint, ComplaintFilter, ComplaintStatus, NewComplaint},
        hostel::{Hostel, NewHostel, Room},
        user::{NewUser, User, UserFilter},
    },
};

const HOSTEL_COLUMNS: &str = "id, name, gender, total_rooms, created_at";
const ROOM_COLUMNS: &str = "id, hostel_id, room_number";
const USER_COLUMNS: &str = "id, email, name, password_hash, role, hostel_id, room_number, mentor_id, created_at";
const COMPLAINT_COLUMNS: &str = "id, heading, description, category, status, is_urgent, is_abusive, \
     mentor_comment, warden_comment, user_id, hostel_id, created_at, resolved_at";

// Verifica se o erro é a violação de uma constraint específica
fn violates(e: &sqlx::Error, constraint: &str) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

fn violates_foreign_key(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

// O store de produção, em cima da pool do Postgres
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  HOSTELS
    // =========================================================================

    async fn insert_hostel(&mut self, hostel: &NewHostel) -> Result<Hostel, AppError> {
        sqlx::query_as::<_, Hostel>(&format!(
            "INSERT INTO hostels (name, gender, total_rooms) VALUES ($1, $2, $3) RETURNING {HOSTEL_COLUMNS}"
        ))
        .bind(&hostel.name)
        .bind(hostel.gender)
        .bind(hostel.total_rooms)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            if violates(&e, "hostels_name_key") {
                return AppError::HostelNameAlreadyExists(hostel.name.clone());
            }
            e.into()
        })
    }

    async fn find_hostel(&mut self, id: Uuid) -> Result<Option<Hostel>, AppError> {
        let hostel = sqlx::query_as::<_, Hostel>(&format!(
            "SELECT {HOSTEL_COLUMNS} FROM hostels WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(hostel)
    }

    async fn find_hostel_by_name(&mut self, name: &str) -> Result<Option<Hostel>, AppError> {
        let hostel = sqlx::query_as::<_, Hostel>(&format!(
            "SELECT {HOSTEL_COLUMNS} FROM hostels WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(hostel)
    }

    async fn list_hostels(&mut self) -> Result<Vec<Hostel>, AppError> {
        let hostels = sqlx::query_as::<_, Hostel>(&format!(
            "SELECT {HOSTEL_COLUMNS} FROM hostels ORDER BY name"
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(hostels)
    }

    async fn update_hostel(&mut self, hostel: &Hostel) -> Result<Hostel, AppError> {
        sqlx::query_as::<_, Hostel>(&format!(
            "UPDATE hostels SET name = $2, gender = $3, total_rooms = $4 WHERE id = $1 RETURNING {HOSTEL_COLUMNS}"
        ))
        .bind(hostel.id)
        .bind(&hostel.name)
        .bind(hostel.gender)
        .bind(hostel.total_rooms)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            if violates(&e, "hostels_name_key") {
                return AppError::HostelNameAlreadyExists(hostel.name.clone());
            }
            AppError::from(e)
        })?
        .ok_or(AppError::HostelNotFound)
    }

    async fn delete_hostel(&mut self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM hostels WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                // Usuários e reclamações ainda apontam para o bloco
                if violates_foreign_key(&e) {
                    return AppError::HostelInUse;
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ROOMS
    // =========================================================================

    async fn count_rooms(&mut self, hostel_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE hostel_id = $1")
            .bind(hostel_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn insert_rooms(&mut self, hostel_id: Uuid, numbers: &[String]) -> Result<Vec<Room>, AppError> {
        if numbers.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO rooms (hostel_id, room_number) ");
        builder.push_values(numbers, |mut row, number| {
            row.push_bind(hostel_id).push_bind(number);
        });
        builder.push(format!(" RETURNING {ROOM_COLUMNS}"));

        builder
            .build_query_as::<Room>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| {
                // A constraint única (hostel_id, room_number) é a rede de proteção
                if violates(&e, "rooms_hostel_room_number_key") {
                    return AppError::RoomAlreadyExists;
                }
                e.into()
            })
    }

    async fn list_rooms(&mut self, hostel_id: Uuid) -> Result<Vec<Room>, AppError> {
        // Números gerados têm sempre 3 dígitos, mas ordenamos por tamanho antes por garantia
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE hostel_id = $1 ORDER BY length(room_number), room_number"
        ))
        .bind(hostel_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rooms)
    }

    // =========================================================================
    //  USERS
    // =========================================================================

    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role, hostel_id, room_number, mentor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.hostel_id)
        .bind(&user.room_number)
        .bind(user.mentor_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            if violates(&e, "users_email_key") {
                return AppError::EmailAlreadyExists;
            }
            e.into()
        })
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));

        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role);
        }
        if let Some(hostel_id) = filter.hostel_id {
            builder.push(" AND hostel_id = ").push_bind(hostel_id);
        }
        if let Some(mentor_id) = filter.mentor_id {
            builder.push(" AND mentor_id = ").push_bind(mentor_id);
        }
        builder.push(" ORDER BY room_number ASC NULLS LAST, email ASC");

        let users = builder.build_query_as::<User>().fetch_all(&mut *self.tx).await?;
        Ok(users)
    }

    async fn update_user(&mut self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $2, name = $3, hostel_id = $4, room_number = $5, mentor_id = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.hostel_id)
        .bind(&user.room_number)
        .bind(user.mentor_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            if violates(&e, "users_email_key") {
                return AppError::EmailAlreadyExists;
            }
            AppError::from(e)
        })?
        .ok_or(AppError::UserNotFound)
    }

    async fn delete_user(&mut self, id: Uuid) -> Result<bool, AppError> {
        // complaints.user_id tem ON DELETE CASCADE e users.mentor_id ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  COMPLAINTS
    // =========================================================================

    async fn insert_complaint(&mut self, complaint: &NewComplaint) -> Result<Complaint, AppError> {
        let created = sqlx::query_as::<_, Complaint>(&format!(
            r#"
            INSERT INTO complaints (heading, description, category, status, is_abusive, user_id, hostel_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(&complaint.heading)
        .bind(&complaint.description)
        .bind(complaint.category)
        .bind(complaint.status)
        .bind(complaint.is_abusive)
        .bind(complaint.user_id)
        .bind(complaint.hostel_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn find_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(complaint)
    }

    async fn list_complaints(&mut self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE TRUE"));

        if let Some(author_id) = filter.author_id {
            builder.push(" AND user_id = ").push_bind(author_id);
        }
        if let Some(author_ids) = &filter.author_ids {
            builder.push(" AND user_id = ANY(").push_bind(author_ids.clone()).push(")");
        }
        if let Some(hostel_id) = filter.hostel_id {
            builder.push(" AND hostel_id = ").push_bind(hostel_id);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC");

        let complaints = builder.build_query_as::<Complaint>().fetch_all(&mut *self.tx).await?;
        Ok(complaints)
    }

    async fn update_complaint(&mut self, complaint: &Complaint) -> Result<Complaint, AppError> {
        sqlx::query_as::<_, Complaint>(&format!(
            r#"
            UPDATE complaints
            SET heading = $2, description = $3, category = $4, status = $5,
                is_urgent = $6, is_abusive = $7, mentor_comment = $8, warden_comment = $9,
                resolved_at = $10
            WHERE id = $1
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(complaint.id)
        .bind(&complaint.heading)
        .bind(&complaint.description)
        .bind(complaint.category)
        .bind(complaint.status)
        .bind(complaint.is_urgent)
        .bind(complaint.is_abusive)
        .bind(&complaint.mentor_comment)
        .bind(&complaint.warden_comment)
        .bind(complaint.resolved_at)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or(AppError::ComplaintNotFound)
    }

    async fn delete_complaint(&mut self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_complaints(
        &mut self,
        hostel_id: Option<Uuid>,
        status: ComplaintStatus,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM complaints WHERE status = $1 AND ($2::uuid IS NULL OR hostel_id = $2)",
        )
        .bind(status)
        .bind(hostel_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(count)
    }
}

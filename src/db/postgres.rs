use crate::config::DatabaseConfig;
use crate::db::models::{Meeting, MeetingRecord, Role, User};
use crate::db::{MeetingStore, MeetingUpdate, UserStore, UserUpdate};
use crate::error::DatabaseError;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const USERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    phone_number TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    deleted BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

const MEETINGS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meetings (
    id UUID PRIMARY KEY,
    agenda TEXT NOT NULL,
    attendees TEXT[] NOT NULL DEFAULT '{}',
    location TEXT,
    related TEXT,
    date_time TIMESTAMPTZ NOT NULL,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL,
    deleted BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

const MEETING_COLUMNS: &str = "m.id, m.agenda, m.attendees, m.location, m.related, \
     m.date_time, m.notes, m.created_by, m.created_at, m.deleted, \
     u.first_name || ' ' || u.last_name AS created_by_name";

/// Postgres-backed store for users and meetings.
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let store = Self { pool: Arc::new(pool) };
        store.init_schema().await?;
        store.seed_default_admin().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(USERS_SCHEMA).execute(self.pool.as_ref()).await?;
        sqlx::query(MEETINGS_SCHEMA).execute(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Creates the bootstrap superAdmin account when none exists, so a fresh
    /// deployment is reachable. The password must be changed afterwards.
    async fn seed_default_admin(&self) -> Result<(), DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'superAdmin'")
            .fetch_one(self.pool.as_ref())
            .await?;

        if count == 0 {
            let password_hash = bcrypt::hash("admin123", bcrypt::DEFAULT_COST)
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
            let admin = User::new(
                "admin@gmail.com".to_string(),
                password_hash,
                "Super".to_string(),
                "Admin".to_string(),
                String::new(),
                Role::SuperAdmin,
            );
            self.insert_user(&admin).await?;
            info!("Default admin account created (username: admin@gmail.com)");
            warn!("Change the default admin password before exposing this server");
        }

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, first_name, last_name, phone_number, role, created_at, deleted)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.deleted)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 AND deleted = FALSE",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE deleted = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }

    async fn update_user(&self, id: Uuid, changes: &UserUpdate) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET
                 username = COALESCE($2, username),
                 first_name = COALESCE($3, first_name),
                 last_name = COALESCE($4, last_name),
                 phone_number = COALESCE($5, phone_number)
             WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.phone_number)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1 AND deleted = FALSE")
            .bind(id)
            .bind(role.as_str())
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_users(&self, ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE users SET deleted = TRUE WHERE id = ANY($1)")
            .bind(ids)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MeetingStore for PgStore {
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO meetings (id, agenda, attendees, location, related, date_time, notes, created_by, created_at, deleted)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(meeting.id)
        .bind(&meeting.agenda)
        .bind(&meeting.attendees)
        .bind(&meeting.location)
        .bind(&meeting.related)
        .bind(meeting.date_time)
        .bind(&meeting.notes)
        .bind(meeting.created_by)
        .bind(meeting.created_at)
        .bind(meeting.deleted)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn meeting_by_id(&self, id: Uuid) -> Result<Option<MeetingRecord>, DatabaseError> {
        let query = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings m
             JOIN users u ON u.id = m.created_by
             WHERE m.id = $1 AND m.deleted = FALSE",
        );
        let record = sqlx::query_as::<_, MeetingRecord>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>, DatabaseError> {
        let query = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings m
             JOIN users u ON u.id = m.created_by
             WHERE m.deleted = FALSE
             ORDER BY m.created_at DESC",
        );
        let records = sqlx::query_as::<_, MeetingRecord>(&query)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records)
    }

    async fn update_meeting(&self, id: Uuid, changes: &MeetingUpdate) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE meetings SET
                 agenda = COALESCE($2, agenda),
                 attendees = COALESCE($3, attendees),
                 location = COALESCE($4, location),
                 related = COALESCE($5, related),
                 date_time = COALESCE($6, date_time),
                 notes = COALESCE($7, notes)
             WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .bind(&changes.agenda)
        .bind(&changes.attendees)
        .bind(&changes.location)
        .bind(&changes.related)
        .bind(changes.date_time)
        .bind(&changes.notes)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_meeting(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE meetings SET deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_meetings(&self, ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE meetings SET deleted = TRUE WHERE id = ANY($1)")
            .bind(ids)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

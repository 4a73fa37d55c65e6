//! Storage layer: user and meeting repositories.
//!
//! Handlers talk to the `UserStore` / `MeetingStore` traits; `PgStore` is the
//! Postgres implementation and `MemoryStore` backs the integration tests.
//! Deletion is always a soft delete (a `deleted` flag), matching the rest of
//! the CRM stack.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{Meeting, MeetingRecord, Role, User};
pub use postgres::PgStore;

use crate::error::DatabaseError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Profile fields that may be changed through `PUT /api/user/edit/{id}`.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError>;

    /// Looks up a non-deleted user by username.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// All non-deleted users.
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// Fails with `DatabaseError::NotFound` when the user does not exist.
    async fn update_user(&self, id: Uuid, changes: &UserUpdate) -> Result<(), DatabaseError>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError>;

    async fn soft_delete_user(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Soft-deletes the given users, returning how many rows changed.
    async fn soft_delete_users(&self, ids: &[Uuid]) -> Result<u64, DatabaseError>;
}

/// Meeting fields that may be changed through `PUT /api/meeting/edit/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingUpdate {
    pub agenda: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub location: Option<String>,
    pub related: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<(), DatabaseError>;

    /// A non-deleted meeting with its creator's name, or `None`.
    async fn meeting_by_id(&self, id: Uuid) -> Result<Option<MeetingRecord>, DatabaseError>;

    /// All non-deleted meetings, newest first.
    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>, DatabaseError>;

    /// Fails with `DatabaseError::NotFound` when the meeting does not exist.
    async fn update_meeting(&self, id: Uuid, changes: &MeetingUpdate) -> Result<(), DatabaseError>;

    async fn soft_delete_meeting(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn soft_delete_meetings(&self, ids: &[Uuid]) -> Result<u64, DatabaseError>;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. `SuperAdmin` accounts are exempt from deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "superAdmin")]
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::SuperAdmin => "superAdmin",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "superAdmin" => Ok(Role::SuperAdmin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

impl User {
    pub fn new(
        username: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone_number: String,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            first_name,
            last_name,
            phone_number,
            role,
            created_at: Utc::now(),
            deleted: false,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub agenda: String,
    pub attendees: Vec<String>,
    pub location: Option<String>,
    pub related: Option<String>,
    pub date_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

impl Meeting {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agenda: String,
        attendees: Vec<String>,
        location: Option<String>,
        related: Option<String>,
        date_time: DateTime<Utc>,
        notes: Option<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agenda,
            attendees,
            location,
            related,
            date_time,
            notes,
            created_by,
            created_at: Utc::now(),
            deleted: false,
        }
    }
}

/// A meeting joined with its creator's display name, the shape the frontend
/// expects from list and view endpoints.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MeetingRecord {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meeting: Meeting,
    pub created_by_name: String,
}

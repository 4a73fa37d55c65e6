use crate::db::models::{Meeting, MeetingRecord, Role, User};
use crate::db::{MeetingStore, MeetingUpdate, UserStore, UserUpdate};
use crate::error::DatabaseError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory store with the same trait surface as `PgStore`. Backs the
/// integration tests and local development without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    meetings: HashMap<Uuid, Meeting>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn record_for(&self, meeting: &Meeting) -> MeetingRecord {
        let created_by_name = self
            .users
            .get(&meeting.created_by)
            .map(|u| u.display_name())
            .unwrap_or_else(|| "Unknown".to_string());
        MeetingRecord {
            meeting: meeting.clone(),
            created_by_name,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Duplicate);
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username && !u.deleted)
            .cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let inner = self.inner.read().unwrap();
        let mut users: Vec<User> = inner.users.values().filter(|u| !u.deleted).cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, changes: &UserUpdate) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let user = inner
            .users
            .get_mut(&id)
            .filter(|u| !u.deleted)
            .ok_or(DatabaseError::NotFound)?;

        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(first_name) = &changes.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(phone_number) = &changes.phone_number {
            user.phone_number = phone_number.clone();
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let user = inner
            .users
            .get_mut(&id)
            .filter(|u| !u.deleted)
            .ok_or(DatabaseError::NotFound)?;
        user.role = role;
        Ok(())
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let user = inner.users.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        user.deleted = true;
        Ok(())
    }

    async fn soft_delete_users(&self, ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let mut changed = 0;
        for id in ids {
            if let Some(user) = inner.users.get_mut(id) {
                user.deleted = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        inner.meetings.insert(meeting.id, meeting.clone());
        Ok(())
    }

    async fn meeting_by_id(&self, id: Uuid) -> Result<Option<MeetingRecord>, DatabaseError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .meetings
            .get(&id)
            .filter(|m| !m.deleted)
            .map(|m| inner.record_for(m)))
    }

    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>, DatabaseError> {
        let inner = self.inner.read().unwrap();
        let mut records: Vec<MeetingRecord> = inner
            .meetings
            .values()
            .filter(|m| !m.deleted)
            .map(|m| inner.record_for(m))
            .collect();
        records.sort_by(|a, b| b.meeting.created_at.cmp(&a.meeting.created_at));
        Ok(records)
    }

    async fn update_meeting(&self, id: Uuid, changes: &MeetingUpdate) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let meeting = inner
            .meetings
            .get_mut(&id)
            .filter(|m| !m.deleted)
            .ok_or(DatabaseError::NotFound)?;

        if let Some(agenda) = &changes.agenda {
            meeting.agenda = agenda.clone();
        }
        if let Some(attendees) = &changes.attendees {
            meeting.attendees = attendees.clone();
        }
        if let Some(location) = &changes.location {
            meeting.location = Some(location.clone());
        }
        if let Some(related) = &changes.related {
            meeting.related = Some(related.clone());
        }
        if let Some(date_time) = changes.date_time {
            meeting.date_time = date_time;
        }
        if let Some(notes) = &changes.notes {
            meeting.notes = Some(notes.clone());
        }
        Ok(())
    }

    async fn soft_delete_meeting(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let meeting = inner.meetings.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        meeting.deleted = true;
        Ok(())
    }

    async fn soft_delete_meetings(&self, ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.write().unwrap();
        let mut changed = 0;
        for id in ids {
            if let Some(meeting) = inner.meetings.get_mut(id) {
                meeting.deleted = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(username: &str) -> User {
        User::new(
            username.to_string(),
            "hash".to_string(),
            "Test".to_string(),
            "User".to_string(),
            "555-0100".to_string(),
            Role::User,
        )
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.insert_user(&sample_user("a@example.com")).await.unwrap();

        let result = store.insert_user(&sample_user("a@example.com")).await;
        assert!(matches!(result, Err(DatabaseError::Duplicate)));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_not_listed() {
        let store = MemoryStore::new();
        let user = sample_user("a@example.com");
        store.insert_user(&user).await.unwrap();

        store.soft_delete_user(user.id).await.unwrap();

        assert!(store.list_users().await.unwrap().is_empty());
        assert!(store.user_by_username("a@example.com").await.unwrap().is_none());
        // The row itself survives; only the flag flips.
        assert!(store.user_by_id(user.id).await.unwrap().unwrap().deleted);
    }

    #[tokio::test]
    async fn test_meeting_list_carries_creator_name() {
        let store = MemoryStore::new();
        let user = sample_user("a@example.com");
        store.insert_user(&user).await.unwrap();

        let meeting = Meeting::new(
            "Kickoff".to_string(),
            vec![],
            None,
            None,
            Utc::now(),
            None,
            user.id,
        );
        store.insert_meeting(&meeting).await.unwrap();

        let records = store.list_meetings().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].created_by_name, "Test User");
    }
}

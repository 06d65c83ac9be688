use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;

/// User directory held in process memory, for the `memory` storage backend and tests.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<UserId, UserRecord>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: UserId, username: &str) {
        self.users.insert(
            user_id,
            UserRecord {
                user_id,
                username: username.to_string(),
                is_active: true,
                created_at: Utc::now(),
            },
        );
    }

    pub fn deactivate(&self, user_id: UserId) {
        if let Some(mut record) = self.users.get_mut(&user_id) {
            record.is_active = false;
        }
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        Ok(self
            .users
            .iter()
            .find(|r| r.is_active && r.username == username)
            .map(|r| r.value().clone()))
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserError> {
        Ok(self
            .users
            .get(&user_id)
            .filter(|r| r.is_active)
            .map(|r| r.value().clone()))
    }

    async fn get_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>, UserError> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(id))
            .filter(|r| r.is_active)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn list_excluding(&self, excluded: &[UserId]) -> Result<Vec<UserRecord>, UserError> {
        Ok(self
            .users
            .iter()
            .filter(|r| r.is_active && !excluded.contains(r.key()))
            .map(|r| r.value().clone())
            .collect())
    }
}

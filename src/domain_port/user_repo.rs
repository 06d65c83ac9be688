use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.user_id,
            username: self.username.clone(),
        }
    }
}

/// Read side of the user directory. Only active users are visible.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserError>;

    async fn get_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>, UserError>;

    async fn list_excluding(&self, excluded: &[UserId]) -> Result<Vec<UserRecord>, UserError>;
}

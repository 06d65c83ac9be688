use crate::domain_model::{UserId, UserSummary};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("store error: {0}")]
    Store(String),
}

/// Identity lookup and serialization over the user directory.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn resolve_username(&self, username: &str) -> Result<UserSummary, UserError>;
    async fn get_user(&self, user_id: UserId) -> Result<UserSummary, UserError>;
    /// Users for the given ids, sorted by username. Unknown or inactive ids are skipped.
    async fn get_users(&self, user_ids: &[UserId]) -> Result<Vec<UserSummary>, UserError>;
    /// Every active user not in `excluded`, sorted by username.
    async fn list_users_excluding(
        &self,
        excluded: &[UserId],
    ) -> Result<Vec<UserSummary>, UserError>;
}

use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealUserService {
        RealUserService { user_repo }
    }

    fn summarize(records: Vec<UserRecord>) -> Vec<UserSummary> {
        let mut users: Vec<UserSummary> = records.iter().map(UserRecord::summary).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn resolve_username(&self, username: &str) -> Result<UserSummary, UserError> {
        self.user_repo
            .get_by_username(username)
            .await?
            .map(|r| r.summary())
            .ok_or(UserError::UserNotFound)
    }

    async fn get_user(&self, user_id: UserId) -> Result<UserSummary, UserError> {
        self.user_repo
            .get_by_id(user_id)
            .await?
            .map(|r| r.summary())
            .ok_or(UserError::UserNotFound)
    }

    async fn get_users(&self, user_ids: &[UserId]) -> Result<Vec<UserSummary>, UserError> {
        let records = self.user_repo.get_many(user_ids).await?;
        Ok(Self::summarize(records))
    }

    async fn list_users_excluding(
        &self,
        excluded: &[UserId],
    ) -> Result<Vec<UserSummary>, UserError> {
        let records = self.user_repo.list_excluding(excluded).await?;
        Ok(Self::summarize(records))
    }
}

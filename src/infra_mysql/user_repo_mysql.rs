use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

const USER_COLUMNS: &str = "SELECT user_id, username, is_active, created_at FROM user";

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<UserRecord, UserError> {
        let user_id: UserId = row
            .try_get("user_id")
            .map_err(|e| UserError::Store(e.to_string()))?;
        let username: String = row
            .try_get("username")
            .map_err(|e| UserError::Store(e.to_string()))?;
        let is_active: bool = row
            .try_get("is_active")
            .map_err(|e| UserError::Store(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| UserError::Store(e.to_string()))?;

        Ok(UserRecord {
            user_id,
            username,
            is_active,
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        let row_opt = sqlx::query(&format!(
            "{USER_COLUMNS} WHERE username = ? AND is_active = 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Store(format!("query user by username: {e}")))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserError> {
        let row_opt = sqlx::query(&format!(
            "{USER_COLUMNS} WHERE user_id = ? AND is_active = 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Store(format!("query user by id: {e}")))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>, UserError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(USER_COLUMNS);
        qb.push(" WHERE is_active = 1 AND user_id IN (");
        let mut ids = qb.separated(", ");
        for id in user_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY username");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::Store(format!("query users by id: {e}")))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn list_excluding(&self, excluded: &[UserId]) -> Result<Vec<UserRecord>, UserError> {
        let mut qb = QueryBuilder::<MySql>::new(USER_COLUMNS);
        qb.push(" WHERE is_active = 1");
        if !excluded.is_empty() {
            qb.push(" AND user_id NOT IN (");
            let mut ids = qb.separated(", ");
            for id in excluded {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
        }
        qb.push(" ORDER BY username");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::Store(format!("list users: {e}")))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }
}

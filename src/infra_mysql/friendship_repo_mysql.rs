use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlFriendshipRepo {
    pool: MySqlPool,
}

impl MySqlFriendshipRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_friendship(row: MySqlRow) -> Result<Friendship, FriendshipError> {
        let sender: UserId = row
            .try_get("sender_id")
            .map_err(|e| FriendshipError::Store(format!("decode sender_id: {e}")))?;
        let receiver: UserId = row
            .try_get("receiver_id")
            .map_err(|e| FriendshipError::Store(format!("decode receiver_id: {e}")))?;
        let status: FriendshipStatus = row
            .try_get("status")
            .map_err(|e| FriendshipError::Store(format!("decode status: {e}")))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| FriendshipError::Store(format!("decode created_at: {e}")))?;
        let updated_at: DateTime<Utc> = row
            .try_get("updated_at")
            .map_err(|e| FriendshipError::Store(format!("decode updated_at: {e}")))?;

        Ok(Friendship {
            sender,
            receiver,
            status,
            created_at,
            updated_at,
        })
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MySqlFriendshipRepo {
    async fn insert_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Friendship, FriendshipError> {
        let friendship = Friendship::new_pending(sender, receiver);

        let res = sqlx::query(
            r#"
INSERT INTO friendship (sender_id, receiver_id, status, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(friendship.sender)
        .bind(friendship.receiver)
        .bind(friendship.status)
        .bind(friendship.created_at)
        .bind(friendship.updated_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(friendship),
            Err(e) if is_dup_key(&e) => Err(FriendshipError::FriendshipExists),
            Err(e) => Err(FriendshipError::Store(format!("insert friendship: {e}"))),
        }
    }

    async fn resolve_pending(
        &self,
        sender: UserId,
        receiver: UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship, FriendshipError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        // the status guard makes concurrent accept/reject race to a single winner
        let updated = sqlx::query(
            r#"
UPDATE friendship SET status = ?, updated_at = ?
WHERE sender_id = ? AND receiver_id = ? AND status = ?
"#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(sender)
        .bind(receiver)
        .bind(FriendshipStatus::Pending)
        .execute(&mut *tx)
        .await
        .map_err(|e| FriendshipError::Store(format!("update friendship: {e}")))?;

        if updated.rows_affected() == 0 {
            return Err(FriendshipError::FriendRequestNotFound);
        }

        let row = sqlx::query(
            r#"
SELECT sender_id, receiver_id, status, created_at, updated_at
FROM friendship
WHERE sender_id = ? AND receiver_id = ?
"#,
        )
        .bind(sender)
        .bind(receiver)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| FriendshipError::Store(format!("select friendship: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        Self::row_to_friendship(row)
    }

    async fn list_involving(
        &self,
        user_id: UserId,
        status: Option<FriendshipStatus>,
    ) -> Result<Vec<Friendship>, FriendshipError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    r#"
SELECT sender_id, receiver_id, status, created_at, updated_at
FROM friendship
WHERE (sender_id = ? OR receiver_id = ?) AND status = ?
"#,
                )
                .bind(user_id)
                .bind(user_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
SELECT sender_id, receiver_id, status, created_at, updated_at
FROM friendship
WHERE sender_id = ? OR receiver_id = ?
"#,
                )
                .bind(user_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| FriendshipError::Store(format!("list friendships: {e}")))?;

        rows.into_iter().map(Self::row_to_friendship).collect()
    }

    async fn list_received(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, FriendshipError> {
        let rows = sqlx::query(
            r#"
SELECT sender_id, receiver_id, status, created_at, updated_at
FROM friendship
WHERE receiver_id = ? AND status = ?
"#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FriendshipError::Store(format!("list received friendships: {e}")))?;

        rows.into_iter().map(Self::row_to_friendship).collect()
    }
}

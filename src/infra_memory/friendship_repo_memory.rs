use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Relationship store held in process memory.
///
/// The map key is the ordered pair, so the entry API gives the same
/// exactly-one-wins behavior as the unique key in MySQL.
#[derive(Default)]
pub struct MemoryFriendshipRepo {
    records: DashMap<(UserId, UserId), Friendship>,
}

impl MemoryFriendshipRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, keep: F) -> Vec<Friendship>
    where
        F: Fn(&Friendship) -> bool,
    {
        self.records
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MemoryFriendshipRepo {
    async fn insert_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Friendship, FriendshipError> {
        match self.records.entry((sender, receiver)) {
            Entry::Occupied(_) => Err(FriendshipError::FriendshipExists),
            Entry::Vacant(slot) => {
                let friendship = Friendship::new_pending(sender, receiver);
                slot.insert(friendship.clone());
                Ok(friendship)
            }
        }
    }

    async fn resolve_pending(
        &self,
        sender: UserId,
        receiver: UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship, FriendshipError> {
        let mut record = self
            .records
            .get_mut(&(sender, receiver))
            .ok_or(FriendshipError::FriendRequestNotFound)?;
        if record.status != FriendshipStatus::Pending {
            return Err(FriendshipError::FriendRequestNotFound);
        }
        record.status = status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn list_involving(
        &self,
        user_id: UserId,
        status: Option<FriendshipStatus>,
    ) -> Result<Vec<Friendship>, FriendshipError> {
        Ok(self.collect(|f| f.involves(user_id) && status.is_none_or(|s| f.status == s)))
    }

    async fn list_received(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, FriendshipError> {
        Ok(self.collect(|f| f.receiver == user_id && f.status == status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn uid(n: u128) -> UserId {
        UserId(uuid::Uuid::from_u128(n))
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let repo = MemoryFriendshipRepo::new();
        repo.insert_pending(uid(1), uid(2)).await.unwrap();

        let err = repo.insert_pending(uid(1), uid(2)).await.unwrap_err();
        assert!(matches!(err, FriendshipError::FriendshipExists));

        // the reverse direction is its own pair
        repo.insert_pending(uid(2), uid(1)).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_requests_have_one_winner() {
        let repo = Arc::new(MemoryFriendshipRepo::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert_pending(uid(1), uid(2)).await.is_ok()
            }));
        }

        let mut won = 0;
        for handle in handles {
            if handle.await.unwrap() {
                won += 1;
            }
        }
        assert_eq!(won, 1);
    }

    #[tokio::test]
    async fn resolve_only_touches_pending() {
        let repo = MemoryFriendshipRepo::new();
        repo.insert_pending(uid(1), uid(2)).await.unwrap();

        let f = repo
            .resolve_pending(uid(1), uid(2), FriendshipStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(f.status, FriendshipStatus::Rejected);

        let err = repo
            .resolve_pending(uid(1), uid(2), FriendshipStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, FriendshipError::FriendRequestNotFound));

        let err = repo
            .resolve_pending(uid(2), uid(1), FriendshipStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, FriendshipError::FriendRequestNotFound));
    }

    #[tokio::test]
    async fn listings_filter_by_direction_and_status() {
        let repo = MemoryFriendshipRepo::new();
        repo.insert_pending(uid(1), uid(2)).await.unwrap();
        repo.insert_pending(uid(3), uid(1)).await.unwrap();
        repo.resolve_pending(uid(3), uid(1), FriendshipStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(repo.list_involving(uid(1), None).await.unwrap().len(), 2);
        let accepted = repo
            .list_involving(uid(1), Some(FriendshipStatus::Accepted))
            .await
            .unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].other(uid(1)), uid(3));

        let received = repo
            .list_received(uid(2), FriendshipStatus::Pending)
            .await
            .unwrap();
        assert_eq!(received.len(), 1);
        assert!(
            repo.list_received(uid(1), FriendshipStatus::Pending)
                .await
                .unwrap()
                .is_empty()
        );
    }
}

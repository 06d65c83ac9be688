use crate::application_port::*;
use crate::domain_model::*;

/// Relationship store. Every method is a single atomic operation.
#[async_trait::async_trait]
pub trait FriendshipRepo: Send + Sync {
    /// Inserts a pending record for the ordered pair.
    ///
    /// Fails with [`FriendshipError::FriendshipExists`] when the pair already has a record.
    async fn insert_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Friendship, FriendshipError>;

    /// Moves the pending record (sender, receiver) to `status`.
    ///
    /// Fails with [`FriendshipError::FriendRequestNotFound`] when no pending record exists.
    async fn resolve_pending(
        &self,
        sender: UserId,
        receiver: UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship, FriendshipError>;

    /// Records in `status` where `user_id` is either sender or receiver.
    async fn list_involving(
        &self,
        user_id: UserId,
        status: Option<FriendshipStatus>,
    ) -> Result<Vec<Friendship>, FriendshipError>;

    /// Records in `status` where `user_id` is the receiver.
    async fn list_received(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, FriendshipError>;
}

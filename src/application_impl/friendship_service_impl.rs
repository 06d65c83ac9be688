use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct RealFriendshipService {
    user_service: Arc<dyn UserService>,
    friendship_repo: Arc<dyn FriendshipRepo>,
    strict: bool,
}

impl RealFriendshipService {
    /// With `strict` unset, unknown action tags yield an empty result and unknown
    /// status filters fall back to listing strangers.
    pub fn new(
        user_service: Arc<dyn UserService>,
        friendship_repo: Arc<dyn FriendshipRepo>,
        strict: bool,
    ) -> Self {
        Self {
            user_service,
            friendship_repo,
            strict,
        }
    }

    fn to_view(
        friendship: &Friendship,
        caller: &UserSummary,
        other: &UserSummary,
    ) -> FriendshipView {
        let name_of = |id: UserId| {
            if id == caller.user_id {
                caller.username.clone()
            } else {
                other.username.clone()
            }
        };
        FriendshipView {
            sender: name_of(friendship.sender),
            receiver: name_of(friendship.receiver),
            status: friendship.status,
        }
    }

    async fn others(
        &self,
        caller: UserId,
        friendships: &[Friendship],
    ) -> Result<Vec<UserSummary>, FriendshipError> {
        let ids: BTreeSet<UserId> = friendships.iter().map(|f| f.other(caller)).collect();
        let ids: Vec<UserId> = ids.into_iter().collect();
        Ok(self.user_service.get_users(&ids).await?)
    }
}

#[async_trait::async_trait]
impl FriendshipService for RealFriendshipService {
    async fn act(
        &self,
        caller: UserId,
        username: &str,
        action: FriendshipAction,
    ) -> Result<Option<FriendshipView>, FriendshipError> {
        let transition = match action {
            FriendshipAction::Request => None,
            FriendshipAction::Accept => Some(FriendshipStatus::Accepted),
            FriendshipAction::Reject => Some(FriendshipStatus::Rejected),
            FriendshipAction::Other(tag) => {
                if self.strict {
                    return Err(FriendshipError::UnknownAction(tag));
                }
                warn!(%caller, action = %tag, "ignoring unknown friendship action");
                return Ok(None);
            }
        };

        let me = self
            .user_service
            .get_user(caller)
            .await
            .map_err(|e| match e {
                UserError::UserNotFound => FriendshipError::CallerNotFound,
                e => e.into(),
            })?;
        let other = self.user_service.resolve_username(username).await?;

        let friendship = match transition {
            None => {
                if other.user_id == caller {
                    return Err(FriendshipError::SelfFriendship);
                }
                self.friendship_repo
                    .insert_pending(caller, other.user_id)
                    .await?
            }
            // only the receiver of a request can answer it
            Some(status) => {
                self.friendship_repo
                    .resolve_pending(other.user_id, caller, status)
                    .await?
            }
        };
        debug!(
            sender = %friendship.sender,
            receiver = %friendship.receiver,
            status = %friendship.status,
            "friendship updated"
        );

        Ok(Some(Self::to_view(&friendship, &me, &other)))
    }

    async fn list(
        &self,
        caller: UserId,
        filter: FriendFilter,
    ) -> Result<Vec<UserSummary>, FriendshipError> {
        let filter = match filter {
            FriendFilter::Other(status) if self.strict => {
                return Err(FriendshipError::InvalidStatusFilter(status));
            }
            FriendFilter::Other(status) => {
                warn!(%caller, %status, "unknown status filter, listing strangers");
                FriendFilter::Strangers
            }
            filter => filter,
        };

        match filter {
            FriendFilter::Accepted => {
                let friendships = self
                    .friendship_repo
                    .list_involving(caller, Some(FriendshipStatus::Accepted))
                    .await?;
                self.others(caller, &friendships).await
            }
            FriendFilter::Pending => {
                let friendships = self
                    .friendship_repo
                    .list_received(caller, FriendshipStatus::Pending)
                    .await?;
                self.others(caller, &friendships).await
            }
            FriendFilter::Strangers | FriendFilter::Other(_) => {
                let friendships = self.friendship_repo.list_involving(caller, None).await?;
                let mut excluded: BTreeSet<UserId> =
                    friendships.iter().map(|f| f.other(caller)).collect();
                excluded.insert(caller);
                let excluded: Vec<UserId> = excluded.into_iter().collect();
                Ok(self.user_service.list_users_excluding(&excluded).await?)
            }
        }
    }
}

use crate::application_port::UserError;
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("user not found")]
    UserNotFound,
    #[error("caller is not an active user")]
    CallerNotFound,
    #[error("friendship already exists")]
    FriendshipExists,
    #[error("no pending friend request")]
    FriendRequestNotFound,
    #[error("cannot befriend yourself")]
    SelfFriendship,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown status filter: {0}")]
    InvalidStatusFilter(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<UserError> for FriendshipError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound => FriendshipError::UserNotFound,
            UserError::Store(e) => FriendshipError::Store(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendshipAction {
    Request,
    Accept,
    Reject,
    Other(String),
}

impl From<&str> for FriendshipAction {
    fn from(tag: &str) -> Self {
        match tag {
            "request" => FriendshipAction::Request,
            "accept" => FriendshipAction::Accept,
            "reject" => FriendshipAction::Reject,
            other => FriendshipAction::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendFilter {
    Accepted,
    Pending,
    /// Users with no relationship of any status to the caller.
    Strangers,
    Other(String),
}

impl From<Option<&str>> for FriendFilter {
    fn from(status: Option<&str>) -> Self {
        match status {
            None | Some("") => FriendFilter::Strangers,
            Some(s) => match s.parse::<FriendshipStatus>() {
                Ok(FriendshipStatus::Accepted) => FriendFilter::Accepted,
                Ok(FriendshipStatus::Pending) => FriendFilter::Pending,
                _ => FriendFilter::Other(s.to_string()),
            },
        }
    }
}

#[async_trait::async_trait]
pub trait FriendshipService: Send + Sync {
    /// Applies `action` from `caller` towards `username`.
    ///
    /// Returns `None` only for an unrecognized action when the service runs in
    /// lenient mode.
    async fn act(
        &self,
        caller: UserId,
        username: &str,
        action: FriendshipAction,
    ) -> Result<Option<FriendshipView>, FriendshipError>;

    async fn list(
        &self,
        caller: UserId,
        filter: FriendFilter,
    ) -> Result<Vec<UserSummary>, FriendshipError>;
}

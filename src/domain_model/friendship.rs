use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::{Database, Decode, Encode, Type};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    /// One-letter code used in storage and in the `status` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "P",
            FriendshipStatus::Accepted => "A",
            FriendshipStatus::Rejected => "R",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for FriendshipStatus {
    type Err = String;

    /// Accepts both the storage code and the full word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" | "pending" => Ok(FriendshipStatus::Pending),
            "A" | "accepted" => Ok(FriendshipStatus::Accepted),
            "R" | "rejected" => Ok(FriendshipStatus::Rejected),
            other => Err(format!("unknown friendship status: {other}")),
        }
    }
}

impl<'r, DB: Database> Decode<'r, DB> for FriendshipStatus
where
    &'r str: Decode<'r, DB>,
{
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<DB>>::decode(value)?;
        Ok(s.parse()?)
    }
}

impl<'q, DB: Database> Encode<'q, DB> for FriendshipStatus
where
    String: Encode<'q, DB>,
{
    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        self.code().to_string().encode_by_ref(buf)
    }
}

impl<DB: Database> Type<DB> for FriendshipStatus
where
    String: Type<DB>,
{
    fn type_info() -> <DB as Database>::TypeInfo {
        <String as Type<DB>>::type_info()
    }

    fn compatible(ty: &<DB as Database>::TypeInfo) -> bool {
        <String as Type<DB>>::compatible(ty)
    }
}

/// A directed relationship record. At most one exists per (sender, receiver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friendship {
    pub sender: UserId,
    pub receiver: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    pub fn new_pending(sender: UserId, receiver: UserId) -> Self {
        let now = Utc::now();
        Self {
            sender,
            receiver,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, user_id: UserId) -> bool {
        self.sender == user_id || self.receiver == user_id
    }

    /// The party on the other side from `user_id`.
    pub fn other(&self, user_id: UserId) -> UserId {
        if self.receiver == user_id {
            self.sender
        } else {
            self.receiver
        }
    }
}

/// Serialized friendship, keyed by usernames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipView {
    pub sender: String,
    pub receiver: String,
    pub status: FriendshipStatus,
}

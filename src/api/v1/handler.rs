use super::error::*;
use crate::application_port::{FriendFilter, FriendshipAction, FriendshipService};
use crate::domain_model::UserId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

/// Envelope for error responses. Successful calls return their payload bare.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FriendshipRequest {
    pub username: String,
    pub action: String,
}

pub async fn update_friendship(
    user_id: UserId,
    body: FriendshipRequest,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let action = FriendshipAction::from(body.action.as_str());
    let view = friendship_service
        .act(user_id, &body.username, action)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    match view {
        Some(view) => Ok(warp::reply::json(&view)),
        None => Ok(warp::reply::json(&serde_json::json!({}))),
    }
}

#[derive(Debug, Deserialize)]
pub struct FriendListQuery {
    pub status: Option<String>,
}

pub async fn list_friends(
    user_id: UserId,
    query: FriendListQuery,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let filter = FriendFilter::from(query.status.as_deref());
    let users = friendship_service
        .list(user_id, filter)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&users))
}

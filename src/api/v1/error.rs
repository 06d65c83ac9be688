use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{
    InvalidQuery, MethodNotAllowed, MissingHeader, PayloadTooLarge, UnsupportedMediaType,
};
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<MissingHeader>().is_some() {
        ApiErrorCode::InvalidToken
    } else if err.find::<BodyDeserializeError>().is_some()
        || err.find::<InvalidQuery>().is_some()
        || err.find::<PayloadTooLarge>().is_some()
        || err.find::<UnsupportedMediaType>().is_some()
    {
        ApiErrorCode::InvalidRequest
    } else if err.find::<MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::InternalError,
            format!("Unhandled error: {:?}", err),
        ));
        return Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
pub enum ApiErrorCode {
    #[error("User not found")]
    UserNotFound,
    #[error("Friendship already exists")]
    FriendshipExists,
    #[error("No pending friend request from this user")]
    FriendRequestNotFound,
    #[error("Cannot send a friend request to yourself")]
    SelfFriendship,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Unknown status filter: {0}")]
    InvalidStatusFilter(String),
    #[error("Malformed request")]
    InvalidRequest,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Authenticated user is not in the directory")]
    UnknownCaller,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::UserNotFound
            | ApiErrorCode::FriendRequestNotFound
            | ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::FriendshipExists => StatusCode::CONFLICT,
            ApiErrorCode::SelfFriendship
            | ApiErrorCode::UnknownAction(_)
            | ApiErrorCode::InvalidStatusFilter(_)
            | ApiErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidToken | ApiErrorCode::UnknownCaller => StatusCode::UNAUTHORIZED,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenInvalid | AuthError::TokenExpired => ApiErrorCode::InvalidToken,
        }
    }
}

impl From<FriendshipError> for ApiErrorCode {
    fn from(error: FriendshipError) -> Self {
        match error {
            FriendshipError::UserNotFound => ApiErrorCode::UserNotFound,
            FriendshipError::CallerNotFound => ApiErrorCode::UnknownCaller,
            FriendshipError::FriendshipExists => ApiErrorCode::FriendshipExists,
            FriendshipError::FriendRequestNotFound => ApiErrorCode::FriendRequestNotFound,
            FriendshipError::SelfFriendship => ApiErrorCode::SelfFriendship,
            FriendshipError::UnknownAction(tag) => ApiErrorCode::UnknownAction(tag),
            FriendshipError::InvalidStatusFilter(s) => ApiErrorCode::InvalidStatusFilter(s),
            FriendshipError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

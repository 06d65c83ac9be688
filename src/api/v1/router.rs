use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

/// Friendship endpoints, mounted by the caller under `/api/v1`.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let friendship = warp::post()
        .and(warp::path("friendships"))
        .and(warp::path("friendship"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(server.friendship_service.clone()))
        .and_then(handler::update_friendship);

    let friend = warp::get()
        .and(warp::path("friendships"))
        .and(warp::path("friend"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::query::<handler::FriendListQuery>())
        .and(with(server.friendship_service.clone()))
        .and_then(handler::list_friends);

    friendship.or(friend)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let auth_service = auth_service.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let user_id = auth_service
                    .verify_token(token)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok(user_id)
            } else {
                Err(reject::custom(ApiErrorCode::InvalidToken))
            }
        }
    })
}

use rapport::api;
use rapport::application_impl::FakeAuthService;
use rapport::server::Server;
use serde_json::{Value, json};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

const USERS: &[&str] = &["alice", "bob", "carol"];

fn app(
    strict: bool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    let server = Arc::new(Server::in_memory(USERS, strict));
    warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server))
        .recover(api::v1::recover_error)
}

fn bearer(username: &str) -> String {
    format!("Bearer {}", FakeAuthService::token_for(username))
}

async fn post_action<F>(app: &F, as_user: &str, username: &str, action: &str) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/friendships/friendship/")
        .header("authorization", bearer(as_user))
        .json(&json!({ "username": username, "action": action }))
        .reply(app)
        .await;
    let body = serde_json::from_slice(res.body()).unwrap();
    (res.status(), body)
}

async fn get_friends<F>(app: &F, as_user: &str, status: Option<&str>) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let path = match status {
        Some(s) => format!("/api/v1/friendships/friend/?status={s}"),
        None => "/api/v1/friendships/friend/".to_string(),
    };
    let res = warp::test::request()
        .method("GET")
        .path(&path)
        .header("authorization", bearer(as_user))
        .reply(app)
        .await;
    let body = serde_json::from_slice(res.body()).unwrap();
    (res.status(), body)
}

fn usernames(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn request_accept_scenario() {
    let app = app(true);

    let (status, body) = post_action(&app, "alice", "bob", "request").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "sender": "alice", "receiver": "bob", "status": "pending" })
    );

    let (status, body) = get_friends(&app, "bob", Some("P")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["alice"]);

    let (status, body) = post_action(&app, "bob", "alice", "accept").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "sender": "alice", "receiver": "bob", "status": "accepted" })
    );

    let (_, body) = get_friends(&app, "alice", Some("A")).await;
    assert_eq!(usernames(&body), vec!["bob"]);
    let (_, body) = get_friends(&app, "bob", Some("A")).await;
    assert_eq!(usernames(&body), vec!["alice"]);

    let (_, body) = get_friends(&app, "alice", None).await;
    assert_eq!(usernames(&body), vec!["carol"]);
    let (_, body) = get_friends(&app, "bob", None).await;
    assert_eq!(usernames(&body), vec!["carol"]);
}

#[tokio::test]
async fn user_records_carry_id_and_username() {
    let app = app(true);
    let (status, body) = get_friends(&app, "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &body.as_array().unwrap()[0];
    assert_eq!(first["username"], "bob");
    assert!(first["user_id"].is_string());
}

#[tokio::test]
async fn reject_hides_request_from_lists() {
    let app = app(true);
    post_action(&app, "alice", "bob", "request").await;

    let (status, body) = post_action(&app, "bob", "alice", "reject").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (_, body) = get_friends(&app, "bob", Some("P")).await;
    assert!(usernames(&body).is_empty());
    let (_, body) = get_friends(&app, "bob", Some("A")).await;
    assert!(usernames(&body).is_empty());
    let (_, body) = get_friends(&app, "alice", None).await;
    assert_eq!(usernames(&body), vec!["carol"]);
}

#[tokio::test]
async fn error_statuses() {
    let app = app(true);

    let (status, body) = post_action(&app, "alice", "mallory", "request").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UserNotFound");

    post_action(&app, "alice", "bob", "request").await;
    let (status, body) = post_action(&app, "alice", "bob", "request").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "FriendshipExists");

    let (status, body) = post_action(&app, "carol", "alice", "accept").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "FriendRequestNotFound");

    let (status, _) = post_action(&app, "alice", "alice", "request").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_action(&app, "alice", "bob", "poke").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_friends(&app, "alice", Some("R")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lenient_mode_returns_empty_object_for_unknown_action() {
    let app = app(false);
    let (status, body) = post_action(&app, "alice", "bob", "poke").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn requires_authentication() {
    let app = app(true);

    let res = warp::test::request()
        .method("GET")
        .path("/api/v1/friendships/friend/")
        .reply(&app)
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/friendships/friendship/")
        .header("authorization", "Bearer garbage")
        .json(&json!({ "username": "bob", "action": "request" }))
        .reply(&app)
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app(true);
    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/friendships/friendship/")
        .header("authorization", bearer("alice"))
        .json(&json!({ "username": "bob" }))
        .reply(&app)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pending_request_removes_both_from_strangers() {
    let app = app(true);
    post_action(&app, "alice", "bob", "request").await;

    let (_, body) = get_friends(&app, "alice", None).await;
    assert_eq!(usernames(&body), vec!["carol"]);
    let (_, body) = get_friends(&app, "bob", None).await;
    assert_eq!(usernames(&body), vec!["carol"]);
}

#[tokio::test]
async fn valid_token_for_unknown_caller_is_unauthorized() {
    let app = app(true);
    let (status, body) = post_action(&app, "ghost", "bob", "request").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UnknownCaller");
}

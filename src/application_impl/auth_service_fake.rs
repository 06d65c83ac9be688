use crate::application_port::*;
use crate::domain_model::UserId;

const FAKE_TOKEN_PREFIX: &str = "fake-access-token:";

/// Accepts `fake-access-token:<username>` and maps the username to a stable id.
#[derive(Debug, Default)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }

    pub fn token_for(username: &str) -> String {
        format!("{FAKE_TOKEN_PREFIX}{username}")
    }
}

#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        match token.strip_prefix(FAKE_TOKEN_PREFIX) {
            Some(username) if !username.is_empty() => Ok(fake_user_id(username)),
            _ => Err(AuthError::TokenInvalid),
        }
    }
}

/// Id the fake backend assigns to `username`. Seeded in-memory users use the same ids.
pub fn fake_user_id(username: &str) -> UserId {
    UserId(uuid::Uuid::new_v5(
        &uuid::Uuid::NAMESPACE_OID,
        username.as_bytes(),
    ))
}

use crate::application_port::*;
use crate::domain_model::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // user id as string
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// Verifies HS256 access tokens issued by the account service.
pub struct JwtAuthService {
    cfg: JwtConfig,
}

impl JwtAuthService {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtAuthService { cfg }
    }

    fn decode_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        v.set_audience(&[self.cfg.audience.clone()]);
        v.set_issuer(&[self.cfg.issuer.clone()]);
        let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&self.cfg.signing_key), &v)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;
        Ok(data.claims)
    }
}

#[async_trait::async_trait]
impl AuthService for JwtAuthService {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.decode_access(token)?;
        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config() -> JwtConfig {
        JwtConfig {
            issuer: "rapport.test".to_string(),
            audience: "rapport-client".to_string(),
            signing_key: b"test-key".to_vec(),
        }
    }

    fn token(sub: &str, aud: &str, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: sub.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: "rapport.test".to_string(),
            aud: aud.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-key"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let auth = JwtAuthService::new(config());
        let user_id = UserId(uuid::Uuid::new_v4());
        let verified = auth
            .verify_token(&token(&user_id.to_string(), "rapport-client", Duration::hours(1)))
            .await
            .unwrap();
        assert_eq!(verified, user_id);
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let auth = JwtAuthService::new(config());
        let sub = uuid::Uuid::new_v4().to_string();
        let result = auth
            .verify_token(&token(&sub, "rapport-client", Duration::hours(-1)))
            .await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn rejects_wrong_audience_and_bad_subject() {
        let auth = JwtAuthService::new(config());
        let sub = uuid::Uuid::new_v4().to_string();
        let result = auth
            .verify_token(&token(&sub, "someone-else", Duration::hours(1)))
            .await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));

        let result = auth
            .verify_token(&token("not-a-uuid", "rapport-client", Duration::hours(1)))
            .await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }
}

use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;

const DEV_JWT_SIGNING_KEY: &str = "my-dev-secret-key";

// release builds never sign with the public dev key
#[cfg(debug_assertions)]
const ALLOW_DEV_SIGNING_KEY: bool = true;
#[cfg(not(debug_assertions))]
const ALLOW_DEV_SIGNING_KEY: bool = false;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub friendship_service: Arc<dyn FriendshipService>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let user_repo: Arc<dyn UserRepo>;
        let friendship_repo: Arc<dyn FriendshipRepo>;
        let mut pool = None;

        match settings.storage.backend.as_str() {
            "memory" => {
                let memory_users = Arc::new(MemoryUserRepo::new());
                for username in &settings.storage.seed_users {
                    memory_users.insert(fake_user_id(username), username);
                }
                user_repo = memory_users;
                friendship_repo = Arc::new(MemoryFriendshipRepo::new());
            }
            "mysql" => {
                let dsn = settings
                    .storage
                    .mysql_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("storage.mysql_dsn is required"))?;
                let mysql_pool = Pool::<MySql>::connect(dsn).await?;
                user_repo = Arc::new(MySqlUserRepo::new(mysql_pool.clone()));
                friendship_repo = Arc::new(MySqlFriendshipRepo::new(mysql_pool.clone()));
                pool = Some(mysql_pool);
            }
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }

        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new()),
            "jwt" => {
                let key = jwt_signing_key(
                    std::env::var("JWT_SIGNING_KEY").ok(),
                    ALLOW_DEV_SIGNING_KEY,
                )?;
                Arc::new(JwtAuthService::new(JwtConfig {
                    issuer: settings.auth.issuer.clone(),
                    audience: settings.auth.audience.clone(),
                    signing_key: key,
                }))
            }
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        let mut server = Self::with_repos(
            auth_service,
            user_repo,
            friendship_repo,
            settings.friendship.strict_actions,
        );
        server.pool = pool;

        info!(
            storage = %settings.storage.backend,
            auth = %settings.auth.backend,
            "server started"
        );
        Ok(server)
    }

    pub fn with_repos(
        auth_service: Arc<dyn AuthService>,
        user_repo: Arc<dyn UserRepo>,
        friendship_repo: Arc<dyn FriendshipRepo>,
        strict_actions: bool,
    ) -> Self {
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(user_repo));
        let friendship_service: Arc<dyn FriendshipService> = Arc::new(RealFriendshipService::new(
            user_service,
            friendship_repo,
            strict_actions,
        ));

        Self {
            auth_service,
            friendship_service,
            pool: None,
        }
    }

    /// Fake auth over in-memory stores seeded with `usernames`.
    pub fn in_memory(usernames: &[&str], strict_actions: bool) -> Self {
        let user_repo = Arc::new(MemoryUserRepo::new());
        for username in usernames {
            user_repo.insert(fake_user_id(username), username);
        }
        Self::with_repos(
            Arc::new(FakeAuthService::new()),
            user_repo,
            Arc::new(MemoryFriendshipRepo::new()),
            strict_actions,
        )
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Signing key for the `jwt` backend. An unset or empty key is only tolerated
/// when `allow_dev_default` is set.
fn jwt_signing_key(value: Option<String>, allow_dev_default: bool) -> anyhow::Result<Vec<u8>> {
    match value.filter(|v| !v.is_empty()) {
        Some(key) => Ok(key.into_bytes()),
        None if allow_dev_default => {
            warn!("JWT_SIGNING_KEY is not set, using the development key");
            Ok(DEV_JWT_SIGNING_KEY.as_bytes().to_vec())
        }
        None => Err(anyhow::anyhow!(
            "JWT_SIGNING_KEY must be set for the jwt auth backend"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_key_from_env_value() {
        let key = jwt_signing_key(Some("prod-key".to_string()), false).unwrap();
        assert_eq!(key, b"prod-key".to_vec());
    }

    #[test]
    fn missing_signing_key_fails_without_dev_default() {
        assert!(jwt_signing_key(None, false).is_err());
        assert!(jwt_signing_key(Some(String::new()), false).is_err());
    }

    #[test]
    fn missing_signing_key_uses_dev_default_when_allowed() {
        let key = jwt_signing_key(None, true).unwrap();
        assert_eq!(key, DEV_JWT_SIGNING_KEY.as_bytes().to_vec());
    }
}

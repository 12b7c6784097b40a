//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sea_orm::{DbErr, SqlErr};
use sha2::Sha512;
use tracing::info;

use crate::db::{NewUser, Store, User};
use crate::services::auth_service::{AuthError, AuthService};

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes.
const SALT_LEN: usize = 128;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.to_lowercase();

        if self.store.user_exists(&username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);

        let created = self
            .store
            .create_user(NewUser {
                username,
                password_hash,
                password_salt: salt.to_vec(),
            })
            .await;

        match created {
            Ok(user) => {
                info!(user_id = user.id, "Registered user: {}", user.username);
                Ok(user)
            }
            // Two concurrent registrations can both pass the pre-check; the
            // unique index on username is the actual guard.
            Err(e) if is_unique_violation(&e) => Err(AuthError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Option<User>, AuthError> {
        let username = username.to_lowercase();

        let Some(row) = self.store.get_user_credentials(&username).await? else {
            return Ok(None);
        };

        if verify_password(password, &row.password_salt, &row.password_hash) {
            Ok(Some(row.user))
        } else {
            Ok(None)
        }
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.store.user_exists(&username.to_lowercase()).await?)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>().is_some_and(|db_err| {
        matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    })
}

fn generate_salt() -> [u8; SALT_LEN] {
    use rand::Rng;

    rand::rng().random()
}

/// Keyed hash of the password: HMAC-SHA-512 over the password bytes, keyed
/// by the per-user salt.
pub(crate) fn hash_password(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha512::new_from_slice(salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison of the recomputed hash against the stored one.
fn verify_password(password: &str, salt: &[u8], expected: &[u8]) -> bool {
    let mut mac = HmacSha512::new_from_slice(salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac.verify_slice(expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[test]
    fn hash_is_deterministic_for_fixed_salt() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(
            hash_password("secret123", &salt),
            hash_password("secret123", &salt)
        );
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let a = [1u8; SALT_LEN];
        let b = [2u8; SALT_LEN];
        assert_ne!(hash_password("secret123", &a), hash_password("secret123", &b));
    }

    #[test]
    fn hash_output_is_sha512_sized() {
        let salt = generate_salt();
        assert_eq!(hash_password("p", &salt).len(), 64);
        assert_eq!(salt.len(), SALT_LEN);
    }

    #[test]
    fn verify_accepts_right_password_and_rejects_wrong_one() {
        let salt = generate_salt();
        let hash = hash_password("secret123", &salt);

        assert!(verify_password("secret123", &salt, &hash));
        assert!(!verify_password("secret124", &salt, &hash));
        assert!(!verify_password("", &salt, &hash));
    }

    async fn test_service() -> SeaOrmAuthService {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("Failed to create in-memory store");
        SeaOrmAuthService::new(store)
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let service = test_service().await;

        let created = service.register("Alice", "secret123").await.unwrap();
        assert_eq!(created.username, "alice");

        let logged_in = service.login("Alice", "secret123").await.unwrap().unwrap();
        assert_eq!(logged_in.id, created.id);

        assert!(service.login("alice", "wrong").await.unwrap().is_none());
        assert!(service.login("nobody", "secret123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected_case_insensitively() {
        let service = test_service().await;

        service.register("Alice", "secret123").await.unwrap();

        let err = service.register("alice", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));

        let err = service.register("ALICE", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn user_exists_ignores_case() {
        let service = test_service().await;

        service.register("Bob", "hunter22").await.unwrap();

        assert!(service.user_exists("BOB").await.unwrap());
        assert!(service.user_exists("bob").await.unwrap());
        assert!(!service.user_exists("alice").await.unwrap());
    }
}

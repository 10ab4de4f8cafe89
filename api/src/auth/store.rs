use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::user::User;

/// Where credential records live. The auth core only reads and inserts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive match.
    async fn find_credential_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn insert_credential(&self, email: &str, password_hash: &str)
        -> Result<User, sqlx::Error>;
}

#[async_trait]
impl CredentialStore for SqlitePool {
    async fn find_credential_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self)
        .await
    }

    async fn insert_credential(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES (?, ?) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self)
        .await
    }
}

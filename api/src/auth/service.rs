use std::sync::Arc;

use super::{AuthError, CredentialStore, PasswordPolicy, TokenService};
use crate::models::user::User;

/// Verified against when the email is unknown, so both failure paths pay for
/// one hash verification.
const DUMMY_PASSWORD: &str = "budget-server-timing-equalizer";

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    passwords: PasswordPolicy,
    tokens: TokenService,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: PasswordPolicy,
        tokens: TokenService,
    ) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            passwords,
            tokens,
            dummy_hash,
        })
    }

    /// Hashes the password and stores a new credential record.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = self.passwords.hash(password)?;
        let user = self.store.insert_credential(email, &password_hash).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// `Ok(None)` when the email is unknown or the password is wrong; the
    /// caller cannot tell which.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Some(user) = self.store.find_credential_by_email(email).await? else {
            let _ = self.passwords.verify(password, &self.dummy_hash);
            return Ok(None);
        };

        match self.passwords.verify(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "stored password hash is unreadable");
                Err(e)
            }
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        self.tokens.issue(user)
    }

    /// Validates the token, then looks its subject up in the store.
    pub async fn resolve_identity(&self, token: &str) -> Result<User, AuthError> {
        let email = self.tokens.validate(token)?;
        self.store
            .find_credential_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use argon2::password_hash::PasswordHash;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use jsonwebtoken::Algorithm;

    use super::*;
    use crate::auth::token::tests::ManualClock;

    #[derive(Default)]
    struct MemoryStore {
        users: Mutex<HashMap<String, User>>,
        lookups: Mutex<usize>,
    }

    impl MemoryStore {
        fn remove(&self, email: &str) {
            self.users.lock().unwrap().remove(email);
        }

        fn put_raw(&self, email: &str, password_hash: &str) {
            let mut users = self.users.lock().unwrap();
            let id = users.len() as i64 + 1;
            users.insert(
                email.to_string(),
                User {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now().naive_utc(),
                },
            );
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_credential_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
            *self.lookups.lock().unwrap() += 1;
            Ok(self.users.lock().unwrap().get(email).cloned())
        }

        async fn insert_credential(
            &self,
            email: &str,
            password_hash: &str,
        ) -> Result<User, sqlx::Error> {
            self.put_raw(email, password_hash);
            Ok(self.users.lock().unwrap()[email].clone())
        }
    }

    const SECRET: &[u8] = b"service-test-secret";

    fn service_with(store: Arc<MemoryStore>, tokens: TokenService) -> AuthService {
        let passwords = PasswordPolicy::with_params(1024, 1, 1).unwrap();
        AuthService::new(store, passwords, tokens).unwrap()
    }

    fn service(store: Arc<MemoryStore>) -> AuthService {
        service_with(
            store,
            TokenService::new(SECRET, Algorithm::HS256, Duration::minutes(30)),
        )
    }

    #[tokio::test]
    async fn authenticates_registered_user() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());

        let created = auth.register("real@example.com", "rightpassword").await.unwrap();
        assert_ne!(created.password_hash, "rightpassword");

        let found = auth
            .authenticate("real@example.com", "rightpassword")
            .await
            .unwrap()
            .expect("identity");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());
        auth.register("real@example.com", "rightpassword").await.unwrap();

        let unknown = auth.authenticate("nobody@example.com", "anything").await.unwrap();
        let wrong = auth
            .authenticate("real@example.com", "wrongpassword")
            .await
            .unwrap();

        assert!(unknown.is_none());
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn unknown_email_still_pays_for_a_verification() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());
        let real = auth.register("real@example.com", "rightpassword").await.unwrap();

        // The stand-in hash costs the same as a stored one.
        let dummy = PasswordHash::new(&auth.dummy_hash).unwrap();
        let stored = PasswordHash::new(&real.password_hash).unwrap();
        assert_eq!(dummy.algorithm, stored.algorithm);
        assert_eq!(dummy.version, stored.version);
        assert_eq!(dummy.params.to_string(), stored.params.to_string());

        let before = auth.passwords.verification_count();
        assert!(auth
            .authenticate("nobody@example.com", "anything")
            .await
            .unwrap()
            .is_none());
        assert_eq!(auth.passwords.verification_count(), before + 1);

        assert!(auth
            .authenticate("real@example.com", "wrongpassword")
            .await
            .unwrap()
            .is_none());
        assert_eq!(auth.passwords.verification_count(), before + 2);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());
        auth.register("real@example.com", "rightpassword").await.unwrap();

        let result = auth
            .authenticate("Real@Example.com", "rightpassword")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn corrupt_hash_surfaces_as_integrity_error() {
        let store = Arc::new(MemoryStore::default());
        store.put_raw("broken@example.com", "plaintext-oops");
        let auth = service(store);

        let err = auth
            .authenticate("broken@example.com", "plaintext-oops")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidHashFormat(_)));
    }

    #[tokio::test]
    async fn resolves_identity_from_issued_token() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());
        let user = auth.register("a@b.com", "rightpassword").await.unwrap();

        let token = auth.issue_token(&user).unwrap();
        let resolved = auth.resolve_identity(&token).await.unwrap();

        assert_eq!(resolved.email, "a@b.com");
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn token_outlives_its_window() {
        let store = Arc::new(MemoryStore::default());
        let clock = ManualClock::starting_now();
        let tokens =
            TokenService::with_clock(SECRET, Algorithm::HS256, Duration::minutes(30), clock.clone());
        let auth = service_with(store, tokens);
        let user = auth.register("a@b.com", "rightpassword").await.unwrap();
        let token = auth.issue_token(&user).unwrap();

        assert_eq!(auth.resolve_identity(&token).await.unwrap().email, "a@b.com");

        clock.advance(Duration::minutes(31));
        assert!(matches!(
            auth.resolve_identity(&token).await,
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn deleted_user_is_unknown_subject() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());
        let user = auth.register("gone@example.com", "rightpassword").await.unwrap();
        let token = auth.issue_token(&user).unwrap();

        store.remove("gone@example.com");

        assert!(matches!(
            auth.resolve_identity(&token).await,
            Err(AuthError::UnknownSubject)
        ));
    }

    #[tokio::test]
    async fn rejected_tokens_skip_the_store() {
        let store = Arc::new(MemoryStore::default());
        let auth = service(store.clone());

        let err = auth.resolve_identity("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
        assert!(err.is_token_rejection());
        assert_eq!(*store.lookups.lock().unwrap(), 0);
    }
}

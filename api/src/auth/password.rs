//! Password hashing policy.
//!
//! Argon2id with a per-hash random salt. The PHC string returned by
//! [`PasswordPolicy::hash`] carries algorithm, version, cost parameters and
//! salt, so verification never needs outside configuration.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;

use super::AuthError;

#[derive(Clone, Default)]
pub struct PasswordPolicy {
    argon2: Argon2<'static>,
    #[cfg(test)]
    verifications: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl PasswordPolicy {
    /// Argon2id with explicit cost parameters (memory in KiB, iterations,
    /// lanes). Useful when the library defaults are too slow, e.g. in tests.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::Hashing(e.into()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            #[cfg(test)]
            verifications: Default::default(),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(AuthError::Hashing)
    }

    /// `Ok(false)` on mismatch. Only an unparseable hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        #[cfg(test)]
        self.verifications
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let parsed = PasswordHash::new(hash).map_err(AuthError::InvalidHashFormat)?;

        // Cost parameters are taken from the parsed hash, not from `self`.
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InvalidHashFormat(e)),
        }
    }

    /// Number of `verify` calls made through this policy or its clones.
    #[cfg(test)]
    pub(crate) fn verification_count(&self) -> usize {
        self.verifications.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl std::fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordPolicy").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn verifies_own_hash() {
        let policy = policy();
        let hash = policy.hash("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(policy.verify("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn rejects_other_password() {
        let policy = policy();
        let hash = policy.hash("hunter22").unwrap();

        assert!(!policy.verify("hunter23", &hash).unwrap());
        assert!(!policy.verify("", &hash).unwrap());
    }

    #[test]
    fn salts_every_hash() {
        let policy = policy();
        let first = policy.hash("same-password").unwrap();
        let second = policy.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(policy.verify("same-password", &first).unwrap());
        assert!(policy.verify("same-password", &second).unwrap());
    }

    #[test]
    fn hash_carries_its_own_params() {
        let cheap = policy();
        let hash = cheap.hash("portable").unwrap();

        // A verifier built with different params still reads them from the hash.
        assert!(PasswordPolicy::default().verify("portable", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = policy().verify("whatever", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::InvalidHashFormat(_)));

        let err = policy().verify("whatever", "").unwrap_err();
        assert!(matches!(err, AuthError::InvalidHashFormat(_)));
    }
}

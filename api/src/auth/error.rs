use thiserror::Error;

/// Failures produced by the authentication core.
///
/// The token variants are deliberately kept apart here so they can be logged
/// precisely; the HTTP layer folds all of them into one unauthorized answer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The stored hash could not be parsed. This is a data-integrity problem,
    /// not a failed login.
    #[error("stored password hash is malformed: {0}")]
    InvalidHashFormat(argon2::password_hash::Error),

    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),

    #[error("malformed token")]
    MalformedToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token has no subject")]
    SubjectMissing,

    #[error("token subject does not resolve to a user")]
    UnknownSubject,

    #[error("token lifetime does not fit in a timestamp")]
    LifetimeOutOfRange,

    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl AuthError {
    /// True for every reason a presented bearer token was refused.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::SubjectMissing
                | AuthError::UnknownSubject
        )
    }

    /// Short machine-readable tag used in log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::InvalidHashFormat(_) => "invalid_hash_format",
            AuthError::Hashing(_) => "hashing",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::SubjectMissing => "subject_missing",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::LifetimeOutOfRange => "lifetime_out_of_range",
            AuthError::Signing(_) => "signing",
            AuthError::Store(_) => "store",
        }
    }
}

//! Authentication core: password hashing, credential verification and
//! bearer-token issuance/validation.

mod error;
pub mod password;
mod service;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use password::PasswordPolicy;
pub use service::AuthService;
pub use store::CredentialStore;
pub use token::{Clock, SystemClock, TokenService};

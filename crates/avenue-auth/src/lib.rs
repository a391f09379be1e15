//! # avenue-auth
//!
//! Authentication for Avenue: Argon2id password hashing, password length
//! policy, a synchronized in-process session store, and the
//! [`SessionAuthenticator`] that resolves a session token to a user id.

pub mod password;
pub mod session;

pub use password::{PasswordHasher, PasswordPolicy};
pub use session::{Session, SessionAuthenticator, SessionStore};

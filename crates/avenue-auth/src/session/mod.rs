//! Session lifecycle: creation at login, lookup, invalidation, expiry.

pub mod authenticator;
pub mod store;

pub use authenticator::SessionAuthenticator;
pub use store::{Session, SessionStore};

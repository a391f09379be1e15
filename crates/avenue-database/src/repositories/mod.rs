//! PostgreSQL implementations of the catalog traits.

pub mod file;
pub mod folder;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// The violated constraint, if `err` is a foreign-key violation.
fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
    violation(err, FOREIGN_KEY_VIOLATION)
}

/// The violated constraint, if `err` is a unique violation.
fn unique_violation(err: &sqlx::Error) -> Option<String> {
    violation(err, UNIQUE_VIOLATION)
}

fn violation(err: &sqlx::Error, code: &str) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(code) => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

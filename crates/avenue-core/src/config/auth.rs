//! Account and session configuration.

use serde::{Deserialize, Serialize};

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of a login session in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Minimum password length at registration.
    #[serde(default = "default_min_password")]
    pub min_password_length: usize,
    /// Maximum password length.
    #[serde(default = "default_max_password")]
    pub max_password_length: usize,
    /// Minimum length when changing a password.
    #[serde(default = "default_min_new_password")]
    pub min_new_password_length: usize,
    /// Maximum length when changing a password.
    #[serde(default = "default_max_new_password")]
    pub max_new_password_length: usize,
    /// Where the CLI keeps live sessions between invocations.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
            min_password_length: default_min_password(),
            max_password_length: default_max_password(),
            min_new_password_length: default_min_new_password(),
            max_new_password_length: default_max_new_password(),
            session_file: default_session_file(),
        }
    }
}

fn default_session_ttl() -> u64 {
    12
}

fn default_min_password() -> usize {
    4
}

fn default_max_password() -> usize {
    64
}

fn default_min_new_password() -> usize {
    8
}

fn default_max_new_password() -> usize {
    128
}

fn default_session_file() -> String {
    "./data/sessions.json".to_string()
}

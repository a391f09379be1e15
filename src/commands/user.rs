//! Account and session commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use avenue_core::error::AppError;
use avenue_core::types::UserId;
use avenue_entity::user::User;
use avenue_service::RegisterRequest;

use super::{password_or_prompt, text_or_prompt};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account
    Register {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Username (defaults to the email)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and print a session token
    Login {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the current user's profile
    Whoami,
    /// Change the current user's email
    Email {
        /// New email address
        email: String,
    },
    /// Change the current user's password
    Passwd {
        /// Current password (will prompt if not provided)
        #[arg(long)]
        current: Option<String>,
        /// New password (will prompt if not provided)
        #[arg(long)]
        new: Option<String>,
    },
    /// Stop a user from logging in
    Disable {
        /// User ID
        id: i64,
    },
    /// Soft-delete a user
    Delete {
        /// User ID
        id: i64,
    },
    /// Create or reset the root account
    Bootstrap {
        /// Root password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: i64,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Status
    status: &'static str,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.value(),
            username: u.username.clone(),
            email: u.email.clone(),
            status: if u.is_active() { "active" } else { "disabled" },
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Token to pass as --session
    token: String,
    /// User ID
    user_id: i64,
    /// Expiry
    expires_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    app: &App,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Register {
            email,
            username,
            password,
        } => {
            let email = text_or_prompt(email, "Email")?;
            let password = password_or_prompt(password, "Password", true)?;
            let user = app
                .users
                .register(RegisterRequest {
                    email,
                    username: username.clone(),
                    password,
                })
                .await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::Login { email, password } => {
            let email = text_or_prompt(email, "Email")?;
            let password = password_or_prompt(password, "Password", false)?;
            let session = app.auth.login(&email, &password).await?;
            app.save_sessions().await?;
            output::print_item(
                &SessionRow {
                    token: session.token,
                    user_id: session.user_id.value(),
                    expires_at: session.expires_at.to_rfc3339(),
                },
                format,
            );
        }
        UserCommand::Logout => {
            let token = session
                .ok_or_else(|| AppError::unauthorized("This command needs --session <token>"))?;
            app.auth.logout(token)?;
            app.save_sessions().await?;
            output::print_success("Logged out");
        }
        UserCommand::Whoami => {
            let ctx = app.context(session).await?;
            let user = app.users.get_profile(&ctx).await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::Email { email } => {
            let ctx = app.context(session).await?;
            let user = app.users.update_email(&ctx, email).await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::Passwd { current, new } => {
            let ctx = app.context(session).await?;
            let current = password_or_prompt(current, "Current password", false)?;
            let new = password_or_prompt(new, "New password", true)?;
            app.users.update_password(&ctx, &current, &new).await?;
            output::print_success("Password updated");
        }
        UserCommand::Disable { id } => {
            let id = UserId(*id);
            app.users.disable(id).await?;
            app.auth.sessions().revoke_user(id);
            app.save_sessions().await?;
            output::print_success(&format!("User {id} disabled"));
        }
        UserCommand::Delete { id } => {
            let id = UserId(*id);
            app.users.soft_delete(id).await?;
            app.auth.sessions().revoke_user(id);
            app.save_sessions().await?;
            output::print_success(&format!("User {id} deleted"));
        }
        UserCommand::Bootstrap { password } => {
            let password = password_or_prompt(password, "Root password", true)?;
            let root = app.users.ensure_root_user(&password).await?;
            output::print_item(&UserRow::from(&root), format);
        }
    }

    Ok(())
}

//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};

use avenue_core::config::AppConfig;
use avenue_core::error::AppError;

use crate::app::App;
use crate::output::OutputFormat;

/// Avenue: per-user file and folder storage
#[derive(Debug, Parser)]
#[command(name = "avenue", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Session token from `avenue user login`
    #[arg(short, long, global = true)]
    pub session: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Accounts and sessions
    User(user::UserArgs),
    /// Upload, download, and manage files
    File(file::FileArgs),
    /// Create, list, and delete folders
    Folder(folder::FolderArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let session = self.session.as_deref();
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::User(args) => {
                let app = App::build(config).await?;
                user::execute(args, &app, session, self.format).await
            }
            Commands::File(args) => {
                let app = App::build(config).await?;
                file::execute(args, &app, session, self.format).await
            }
            Commands::Folder(args) => {
                let app = App::build(config).await?;
                folder::execute(args, &app, session, self.format).await
            }
        }
    }
}

/// Read a value from the command line or prompt for it.
pub fn text_or_prompt(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Read a password from the command line or prompt for it without echo.
pub fn password_or_prompt(
    value: &Option<String>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

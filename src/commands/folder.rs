//! Folder commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use avenue_core::error::AppError;
use avenue_core::types::{FolderId, ROOT_SENTINEL};
use avenue_entity::folder::Folder;
use avenue_service::FolderService;

use super::file::FileRow;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (top level when omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// List the immediate children of a folder
    List {
        /// Folder ID, or -1 for the top level
        #[arg(default_value = ROOT_SENTINEL, allow_hyphen_values = true)]
        folder: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder ID
        id: String,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
pub struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent folder
    parent: String,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent: f.parent().to_string(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    app: &App,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = app.context(session).await?;

    match &args.command {
        FolderCommand::Create { name, parent } => {
            let folder = app
                .hierarchy
                .create_folder(&ctx, name, parent.as_deref())
                .await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::List { folder } => {
            let parent = FolderService::listing_ref(folder)?;
            let contents = app.hierarchy.list_children(&ctx, parent).await?;

            let folders: Vec<FolderRow> = contents.folders.iter().map(FolderRow::from).collect();
            let files: Vec<FileRow> = contents.files.iter().map(FileRow::from).collect();
            match format {
                OutputFormat::Json => {
                    let json = serde_json::json!({ "folders": folders, "files": files });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Table => {
                    println!("Folders:");
                    output::print_list(&folders, format);
                    println!("Files:");
                    output::print_list(&files, format);
                }
            }
        }
        FolderCommand::Delete { id } => {
            let id: FolderId = id
                .parse()
                .map_err(|_| AppError::not_found(format!("Folder {id} not found")))?;
            app.hierarchy.delete_folder(&ctx, id).await?;
            output::print_success(&format!("Folder {id} deleted"));
        }
    }

    Ok(())
}

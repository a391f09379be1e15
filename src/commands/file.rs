//! File commands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use futures::StreamExt;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::AsyncWriteExt;

use avenue_core::error::{AppError, ErrorKind};
use avenue_core::types::FileId;
use avenue_entity::file::File;
use avenue_service::UploadRequest;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file
    Upload {
        /// Local path to read
        path: PathBuf,
        /// Display name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,
        /// Extension (defaults to the path's extension)
        #[arg(short, long)]
        extension: Option<String>,
        /// Parent folder ID (top level when omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Stream a file's bytes to a local path or stdout
    Download {
        /// File ID
        id: String,
        /// Where to write (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show a file's metadata
    Stat {
        /// File ID
        id: String,
    },
    /// Delete a file's bytes and record
    Delete {
        /// File ID
        id: String,
    },
    /// List all of your files
    List,
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// File ID
    id: String,
    /// Name with extension
    name: String,
    /// Size in bytes
    size: i64,
    /// Parent folder
    parent: String,
    /// Created at
    created_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.file_name(),
            size: f.size_bytes,
            parent: f.parent().to_string(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn parse_id(raw: &str) -> Result<FileId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("File {raw} not found")))
}

fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem, extension)
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    app: &App,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = app.context(session).await?;

    match &args.command {
        FileCommand::Upload {
            path,
            name,
            extension,
            parent,
        } => {
            let (stem, ext) = split_name(path);
            let source = tokio::fs::File::open(path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Cannot read {}", path.display()),
                    e,
                )
            })?;

            let mut req = UploadRequest::new(
                name.clone().unwrap_or(stem),
                extension.clone().unwrap_or(ext),
                Box::pin(source),
            );
            req.parent = parent.clone();

            let file = app.hierarchy.upload(&ctx, req).await?;
            output::print_item(&FileRow::from(&file), format);
        }
        FileCommand::Download { id, output: target } => {
            let mut download = app.hierarchy.download(&ctx, parse_id(id)?).await?;
            let mut sink: std::pin::Pin<Box<dyn tokio::io::AsyncWrite + Send>> = match target {
                Some(path) => Box::pin(tokio::fs::File::create(path).await?),
                None => Box::pin(tokio::io::stdout()),
            };

            while let Some(chunk) = download.stream.next().await {
                sink.write_all(&chunk?).await?;
            }
            sink.flush().await?;

            if let Some(path) = target {
                output::print_success(&format!(
                    "Wrote {} ({} bytes) to {}",
                    download.file.file_name(),
                    download.file.size_bytes,
                    path.display()
                ));
            }
        }
        FileCommand::Stat { id } => {
            let file = app.hierarchy.stat(&ctx, parse_id(id)?).await?;
            output::print_item(&FileRow::from(&file), format);
        }
        FileCommand::Delete { id } => {
            let id = parse_id(id)?;
            app.hierarchy.delete(&ctx, id).await?;
            output::print_success(&format!("File {id} deleted"));
        }
        FileCommand::List => {
            let files = app.hierarchy.list_files(&ctx).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

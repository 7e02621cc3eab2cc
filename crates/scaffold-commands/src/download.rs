//! `/download_file`: fetch a URL into the temp workspace and upload it.

use crate::embeds::error_embed;
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use reqwest::StatusCode;
use scaffold_common::{filename_from_url, TempWorkspace};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLockReadGuard;
use tracing::{debug, info};

/// Largest body accepted; Discord refuses bigger attachments anyway.
pub const MAX_DOWNLOAD_BYTES: u64 = 25 * 1024 * 1024;

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// User-facing download failure.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered with something other than 200.
    #[error("Downloading media {url} returned status code `{status}`")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },

    /// The body is larger than the download limit.
    #[error("Downloading media {url} exceeds the {limit} byte limit")]
    TooLarge {
        /// Requested URL.
        url: String,
        /// Limit in bytes.
        limit: u64,
    },

    /// Transport, body or filesystem failure.
    #[error("Downloading media returned invalid data! {0}")]
    InvalidData(String),
}

impl DownloadError {
    fn invalid(err: impl std::fmt::Display) -> Self {
        Self::InvalidData(err.to_string())
    }
}

/// A file present in the workspace.
///
/// Holds the workspace's shared guard, so the file cannot be swept while this
/// value is alive.
#[derive(Debug)]
pub struct Downloaded<'a> {
    /// Location of the file.
    pub path: PathBuf,
    /// Whether the file was already present and no request was made.
    pub reused: bool,
    _guard: RwLockReadGuard<'a, ()>,
}

/// Ensures the file behind `url` is present in `workspace`.
pub async fn fetch_to_workspace<'a>(
    client: &reqwest::Client,
    workspace: &'a TempWorkspace,
    url: &str,
) -> Result<Downloaded<'a>, DownloadError> {
    fetch_with_limit(client, workspace, url, MAX_DOWNLOAD_BYTES).await
}

/// [`fetch_to_workspace`] with an explicit body size limit.
///
/// The body is streamed into a part file that is renamed into place once
/// complete, so a failed or oversized download never leaves a file behind.
pub async fn fetch_with_limit<'a>(
    client: &reqwest::Client,
    workspace: &'a TempWorkspace,
    url: &str,
    limit: u64,
) -> Result<Downloaded<'a>, DownloadError> {
    let file_name = filename_from_url(url).map_err(DownloadError::invalid)?;
    let guard = workspace.lock_shared().await;
    let path = workspace.file_path(&file_name);

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        info!("File at {url} already exists at {}", path.display());
        return Ok(Downloaded {
            path,
            reused: true,
            _guard: guard,
        });
    }

    let response = client.get(url).send().await.map_err(DownloadError::invalid)?;
    if response.status() != StatusCode::OK {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    if response.content_length().is_some_and(|len| len > limit) {
        return Err(DownloadError::TooLarge {
            url: url.to_string(),
            limit,
        });
    }

    let part = workspace.file_path(&format!(
        ".{file_name}.{}.part",
        PART_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    if let Err(e) = write_part(response, &part, url, limit).await {
        if let Err(cleanup) = tokio::fs::remove_file(&part).await {
            debug!("Could not remove {}: {cleanup}", part.display());
        }
        return Err(e);
    }
    tokio::fs::rename(&part, &path)
        .await
        .map_err(DownloadError::invalid)?;
    info!("Downloaded file at {url} to {}", path.display());

    Ok(Downloaded {
        path,
        reused: false,
        _guard: guard,
    })
}

async fn write_part(
    mut response: reqwest::Response,
    part: &Path,
    url: &str,
    limit: u64,
) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(part)
        .await
        .map_err(DownloadError::invalid)?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(DownloadError::invalid)? {
        written += chunk.len() as u64;
        if written > limit {
            return Err(DownloadError::TooLarge {
                url: url.to_string(),
                limit,
            });
        }
        file.write_all(&chunk).await.map_err(DownloadError::invalid)?;
    }

    file.flush().await.map_err(DownloadError::invalid)?;
    Ok(())
}

/// Download a file from a URL.
#[poise::command(slash_command, category = "General")]
pub async fn download_file(
    ctx: Context<'_>,
    #[description = "The URL of the file to download"] url: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let client = data.http.client()?;

    let downloaded = match fetch_to_workspace(&client, &data.workspace, &url).await {
        Ok(downloaded) => downloaded,
        Err(e) => {
            ctx.send(CreateReply::default().embed(error_embed(e.to_string())))
                .await?;
            return Ok(());
        }
    };

    let attachment = serenity::CreateAttachment::path(&downloaded.path).await?;
    ctx.send(CreateReply::default().attachment(attachment)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = DownloadError::Status {
            url: "https://example.com/a.png".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Downloading media https://example.com/a.png returned status code `404`"
        );
    }

    #[tokio::test]
    async fn test_existing_file_is_reused_without_request() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();
        std::fs::write(workspace.file_path("cached.png"), b"cached").unwrap();

        // Nothing listens on this port; a request would fail.
        let client = reqwest::Client::new();
        let downloaded =
            fetch_to_workspace(&client, &workspace, "http://127.0.0.1:9/cached.png?size=2")
                .await
                .unwrap();

        assert!(downloaded.reused);
        assert_eq!(downloaded.path, workspace.file_path("cached.png"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_invalid_data() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();

        let client = reqwest::Client::new();
        let err = fetch_to_workspace(&client, &workspace, "http://127.0.0.1:9/missing.png")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::InvalidData(_)));
        assert!(err
            .to_string()
            .starts_with("Downloading media returned invalid data! "));
        assert!(!workspace.file_path("missing.png").exists());
    }
}

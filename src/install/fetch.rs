//! Resumable archive downloads

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use reqwest::header::RANGE;
use tracing::{debug, info};

use crate::config;
use crate::install::error::InstallError;

/// HTTP fetcher for release archives and packages.
///
/// Downloads land next to their final name with an `.inprogress` suffix and
/// are renamed on completion, so a leftover partial file marks an interrupted
/// run and is continued with a Range request instead of refetched.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("chromeprov")
                .timeout(std::time::Duration::from_millis(config::FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Download `url` to `dest`, resuming a previous partial download if one
    /// is present. `dest`'s parent directory must already exist.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        let partial = in_progress_path(dest);
        let resume_from = std::fs::metadata(&partial).map(|m| m.len()).unwrap_or(0);

        match self.fetch(url, &partial, resume_from).await {
            // 416 on a resume means the partial already holds the whole file
            // (interrupted after the last write, before the rename). The
            // server cannot serve past the end, so refetch from scratch.
            Err(InstallError::HttpStatus { status: 416, .. }) if resume_from > 0 => {
                debug!("stale partial for {}, refetching from scratch", url);
                std::fs::remove_file(&partial)?;
                self.fetch(url, &partial, 0).await?;
            }
            Err(e) => return Err(e),
            Ok(()) => {}
        }

        std::fs::rename(&partial, dest)?;
        info!("downloaded {} to {}", url, dest.display());
        Ok(())
    }

    async fn fetch(&self, url: &str, partial: &Path, resume_from: u64) -> Result<(), InstallError> {
        let mut request = self.client.get(url);
        if resume_from > 0 {
            debug!("resuming download of {} from byte {}", url, resume_from);
            request = request.header(RANGE, format!("bytes={resume_from}-"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(InstallError::ArchiveMissing {
                url: url.to_string(),
            });
        }

        if status == StatusCode::PARTIAL_CONTENT && resume_from > 0 {
            let body = response.bytes().await?;
            let mut file = OpenOptions::new().append(true).open(partial)?;
            file.write_all(&body)?;
        } else if status.is_success() {
            // Full body; the server either got no Range header or ignored it.
            let body = response.bytes().await?;
            std::fs::write(partial, &body)?;
        } else {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

fn in_progress_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".inprogress");
    dest.with_file_name(name)
}

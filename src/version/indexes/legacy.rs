//! Legacy chromedriver storage index (major-version policy, Chrome <= 114)

use tracing::{debug, warn};

use crate::config;
use crate::host::env::Platform;
use crate::version::error::ResolveError;
use crate::version::index::ReleaseIndex;
use crate::version::types::{BrowserVersion, DriverVersion, ResolutionPolicy};

/// Index client for the legacy `chromedriver.storage.googleapis.com` layout.
/// The same host serves both the `LATEST_RELEASE_<major>` lookup and the
/// versioned archives.
pub struct LegacyDriverIndex {
    client: reqwest::Client,
    base_url: String,
}

impl LegacyDriverIndex {
    /// Creates an index client with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("chromeprov")
                .timeout(std::time::Duration::from_millis(config::FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for LegacyDriverIndex {
    fn default() -> Self {
        Self::new(config::LEGACY_DRIVER_INDEX)
    }
}

#[async_trait::async_trait]
impl ReleaseIndex for LegacyDriverIndex {
    fn policy(&self) -> ResolutionPolicy {
        ResolutionPolicy::MajorVersion
    }

    async fn latest_driver_version(
        &self,
        installed: &BrowserVersion,
    ) -> Result<DriverVersion, ResolveError> {
        let url = format!("{}/LATEST_RELEASE_{}", self.base_url, installed.major());
        debug!("querying legacy release index: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(installed.to_string()));
        }

        if !status.is_success() {
            warn!("legacy index returned status {}: {}", status, url);
            return Err(ResolveError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::InvalidResponse(e.to_string()))?;

        DriverVersion::new(&body).ok_or_else(|| ResolveError::EmptyResponse(installed.to_string()))
    }

    fn archive_url(&self, version: &DriverVersion, platform: Platform) -> String {
        format!(
            "{}/{}/chromedriver_{}.zip",
            self.base_url,
            version,
            platform.archive_tag()
        )
    }
}

//! Chrome for Testing release index (full-version policy, Chrome 115+)

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config;
use crate::host::env::Platform;
use crate::version::error::ResolveError;
use crate::version::index::ReleaseIndex;
use crate::version::types::{BrowserVersion, DriverVersion, ResolutionPolicy};

/// Index client for the Chrome for Testing endpoints.
///
/// Primary lookup is `LATEST_RELEASE_<full version>`. When that exact build
/// has no entry (common for very fresh Chrome builds), falls back to the
/// `latest-patch-versions-per-build.json` document keyed by the
/// `major.minor.build` prefix.
pub struct ChromeForTestingIndex {
    client: reqwest::Client,
    index_base: String,
    download_base: String,
}

impl ChromeForTestingIndex {
    /// Creates an index client with custom index and download hosts
    pub fn new(index_base: &str, download_base: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("chromeprov")
                .timeout(std::time::Duration::from_millis(config::FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            index_base: index_base.to_string(),
            download_base: download_base.to_string(),
        }
    }
}

impl Default for ChromeForTestingIndex {
    fn default() -> Self {
        Self::new(
            config::CHROME_FOR_TESTING_INDEX,
            config::CHROME_FOR_TESTING_DOWNLOADS,
        )
    }
}

/// `latest-patch-versions-per-build.json` document structure
#[derive(Debug, Deserialize)]
struct LatestPatchVersions {
    builds: HashMap<String, BuildEntry>,
}

#[derive(Debug, Deserialize)]
struct BuildEntry {
    version: String,
}

impl ChromeForTestingIndex {
    async fn lookup_by_build(
        &self,
        installed: &BrowserVersion,
        build_prefix: &str,
    ) -> Result<DriverVersion, ResolveError> {
        let url = format!("{}/latest-patch-versions-per-build.json", self.index_base);
        debug!("falling back to per-build index: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("per-build index returned status {}: {}", status, url);
            return Err(ResolveError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let document: LatestPatchVersions = response
            .json()
            .await
            .map_err(|e| ResolveError::InvalidResponse(e.to_string()))?;

        let entry = document
            .builds
            .get(build_prefix)
            .ok_or_else(|| ResolveError::NotFound(installed.to_string()))?;

        DriverVersion::new(&entry.version)
            .ok_or_else(|| ResolveError::EmptyResponse(installed.to_string()))
    }
}

#[async_trait::async_trait]
impl ReleaseIndex for ChromeForTestingIndex {
    fn policy(&self) -> ResolutionPolicy {
        ResolutionPolicy::FullVersion
    }

    async fn latest_driver_version(
        &self,
        installed: &BrowserVersion,
    ) -> Result<DriverVersion, ResolveError> {
        let Some(build_prefix) = installed.build_prefix() else {
            return Err(ResolveError::FullVersionRequired(installed.to_string()));
        };

        let url = format!("{}/LATEST_RELEASE_{}", self.index_base, installed);
        debug!("querying release index: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return self.lookup_by_build(installed, &build_prefix).await;
        }

        if !status.is_success() {
            warn!("release index returned status {}: {}", status, url);
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
        let tag = platform.archive_tag();
        format!(
            "{}/{}/{}/chromedriver-{}.zip",
            self.download_base, version, tag, tag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn full(version: &str) -> BrowserVersion {
        version.parse().unwrap()
    }

    #[tokio::test]
    async fn latest_driver_version_returns_exact_build_release() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/LATEST_RELEASE_124.0.6367.91")
            .with_status(200)
            .with_body("124.0.6367.91\n")
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index
            .latest_driver_version(&full("124.0.6367.91"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.as_str(), "124.0.6367.91");
    }

    #[tokio::test]
    async fn latest_driver_version_falls_back_to_per_build_index_on_404() {
        let mut server = Server::new_async().await;
        let exact = server
            .mock("GET", "/LATEST_RELEASE_124.0.6367.91")
            .with_status(404)
            .create_async()
            .await;
        let per_build = server
            .mock("GET", "/latest-patch-versions-per-build.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "timestamp": "2024-05-01T00:00:00.000Z",
                    "builds": {
                        "124.0.6367": {"version": "124.0.6367.78"}
                    }
                }"#,
            )
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index
            .latest_driver_version(&full("124.0.6367.91"))
            .await
            .unwrap();

        exact.assert_async().await;
        per_build.assert_async().await;
        assert_eq!(result.as_str(), "124.0.6367.78");
    }

    #[tokio::test]
    async fn latest_driver_version_returns_not_found_when_build_is_unknown() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/LATEST_RELEASE_999.0.1.2")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/latest-patch-versions-per-build.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {}}"#)
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index.latest_driver_version(&full("999.0.1.2")).await;

        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn latest_driver_version_rejects_empty_index_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/LATEST_RELEASE_124.0.6367.91")
            .with_status(200)
            .with_body("  \n")
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index.latest_driver_version(&full("124.0.6367.91")).await;

        assert!(matches!(result, Err(ResolveError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn latest_driver_version_carries_rate_limit_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/LATEST_RELEASE_124.0.6367.91")
            .with_status(429)
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index.latest_driver_version(&full("124.0.6367.91")).await;

        match result {
            Err(err @ ResolveError::HttpStatus { status: 429, .. }) => {
                assert!(err.is_transient());
            }
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn per_build_fallback_carries_server_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/LATEST_RELEASE_124.0.6367.91")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/latest-patch-versions-per-build.json")
            .with_status(503)
            .create_async()
            .await;

        let index = ChromeForTestingIndex::new(&server.url(), &server.url());
        let result = index.latest_driver_version(&full("124.0.6367.91")).await;

        match result {
            Err(err @ ResolveError::HttpStatus { status: 503, .. }) => {
                assert!(err.is_transient());
            }
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_driver_version_requires_full_version() {
        let server = Server::new_async().await;
        let index = ChromeForTestingIndex::new(&server.url(), &server.url());

        let result = index
            .latest_driver_version(&BrowserVersion::Major(124))
            .await;

        assert!(matches!(result, Err(ResolveError::FullVersionRequired(_))));
    }

    #[tokio::test]
    async fn latest_driver_version_handles_network_error() {
        let index =
            ChromeForTestingIndex::new("http://invalid.localhost.test:1", "http://unused.test");

        let result = index.latest_driver_version(&full("124.0.6367.91")).await;

        assert!(matches!(result, Err(ResolveError::Network(_))));
    }

    #[test]
    fn archive_url_references_exact_version() {
        let index = ChromeForTestingIndex::new("http://index.test", "http://downloads.test");
        let version = DriverVersion::new("124.0.6367.91").unwrap();

        assert_eq!(
            index.archive_url(&version, Platform::Linux64),
            "http://downloads.test/124.0.6367.91/linux64/chromedriver-linux64.zip"
        );
    }
}

//! ReleaseIndex trait for resolving compatible driver versions

#[cfg(test)]
use mockall::automock;

use crate::host::env::Platform;
use crate::version::error::ResolveError;
use crate::version::types::{BrowserVersion, DriverVersion, ResolutionPolicy};

/// Trait for a remote release index mapping a browser version to the latest
/// compatible driver release.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseIndex: Send + Sync {
    /// Returns the resolution policy this index implements
    fn policy(&self) -> ResolutionPolicy;

    /// Resolves the latest driver version compatible with `installed`
    ///
    /// # Returns
    /// * `Ok(DriverVersion)` - A non-empty candidate version
    /// * `Err(ResolveError)` - Network failure, no matching release, or an
    ///   empty index response; never an empty version passed downstream
    async fn latest_driver_version(
        &self,
        installed: &BrowserVersion,
    ) -> Result<DriverVersion, ResolveError>;

    /// Builds the download URL for the driver archive of `version` on
    /// `platform`, per this index's archive layout
    fn archive_url(&self, version: &DriverVersion, platform: Platform) -> String;
}

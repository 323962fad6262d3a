//! Driver download and placement

use std::path::{Path, PathBuf};

use tracing::info;

use crate::host::env::HostEnvironment;
use crate::install::archive;
use crate::install::error::InstallError;
use crate::install::fetch::Fetcher;
use crate::version::index::ReleaseIndex;
use crate::version::types::DriverVersion;

/// Fetches a resolved driver release and places the executable at its
/// destination.
pub struct DriverInstaller<'a> {
    fetcher: &'a Fetcher,
    env: &'a HostEnvironment,
}

impl<'a> DriverInstaller<'a> {
    pub fn new(fetcher: &'a Fetcher, env: &'a HostEnvironment) -> Self {
        Self { fetcher, env }
    }

    /// Download the archive for `version` from `index`, extract the driver
    /// executable, and install it into `dest_dir`. Returns the final binary
    /// path. Re-installing over an existing binary replaces it in place, so
    /// re-running yields the same path.
    pub async fn install(
        &self,
        index: &dyn ReleaseIndex,
        version: &DriverVersion,
        dest_dir: &Path,
    ) -> Result<PathBuf, InstallError> {
        let platform = self.env.platform();
        let url = index.archive_url(version, platform);

        std::fs::create_dir_all(self.env.staging_dir())?;
        let archive_path = self.env.staging_dir().join(format!(
            "chromedriver-{}-{}.zip",
            version,
            platform.archive_tag()
        ));

        info!("downloading driver {} from {}", version, url);
        self.fetcher.download(&url, &archive_path).await?;

        std::fs::create_dir_all(dest_dir)?;
        let dest = dest_dir.join(platform.driver_binary());
        archive::extract_binary(&archive_path, platform.driver_binary(), &dest)?;

        // The staged archive has served its purpose; a failure to remove it
        // is not a failed installation.
        let _ = std::fs::remove_file(&archive_path);

        info!("installed driver {} at {}", version, dest.display());
        Ok(dest)
    }
}

//! One-shot provisioning flow
//!
//! Drives the one-way state machine
//! `NotInstalled -> BrowserInstalled -> VersionDetected -> CompanionResolved -> CompanionInstalled`.
//! Each transition runs to completion before the next starts; the only
//! "upgrade" path is re-running the whole flow, which is idempotent.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::host::env::HostEnvironment;
use crate::host::error::{CommandError, HostError};
use crate::host::runner::CommandRunner;
use crate::install::browser::BrowserInstaller;
use crate::install::driver::DriverInstaller;
use crate::install::error::InstallError;
use crate::install::fetch::Fetcher;
use crate::version::detect::detect_browser_version;
use crate::version::error::{ResolveError, VersionError};
use crate::version::index::ReleaseIndex;
use crate::version::types::{BrowserVersion, DriverVersion};

/// Sysexits `EX_TEMPFAIL`: the operator can simply retry.
const EXIT_TRANSIENT: u8 = 75;
const EXIT_FATAL: u8 = 1;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl ProvisionError {
    /// Transient errors (network hiccups) are worth a plain retry; everything
    /// else needs operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Resolve(e) => e.is_transient(),
            Self::Install(e) => e.is_transient(),
            Self::Version(_) | Self::Host(_) | Self::Command(_) => false,
        }
    }

    /// Process exit status for this error class.
    pub fn exit_code(&self) -> u8 {
        if self.is_transient() {
            EXIT_TRANSIENT
        } else {
            EXIT_FATAL
        }
    }
}

/// Provisioning progress. Transitions are one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionState {
    NotInstalled,
    BrowserInstalled,
    VersionDetected(BrowserVersion),
    CompanionResolved(DriverVersion),
    CompanionInstalled(PathBuf),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub browser_version: BrowserVersion,
    pub driver_version: DriverVersion,
    pub driver_path: PathBuf,
}

/// Options for one provisioning run.
pub struct ProvisionOptions {
    /// Destination directory for the driver binary.
    pub dest_dir: PathBuf,
    /// Skip the browser installation steps and use whatever browser is
    /// already present.
    pub skip_browser: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from(crate::config::DEFAULT_INSTALL_DIR),
            skip_browser: false,
        }
    }
}

/// Runs the full browser + driver provisioning sequence.
pub struct Provisioner<'a> {
    runner: &'a dyn CommandRunner,
    index: &'a dyn ReleaseIndex,
    fetcher: Fetcher,
    options: ProvisionOptions,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        index: &'a dyn ReleaseIndex,
        options: ProvisionOptions,
    ) -> Self {
        Self {
            runner,
            index,
            fetcher: Fetcher::new(),
            options,
        }
    }

    /// Run the whole flow against `env`. On success the driver binary is at
    /// the returned path and `env`'s search path contains its directory
    /// exactly once.
    pub async fn run(&self, env: &mut HostEnvironment) -> Result<ProvisionReport, ProvisionError> {
        let mut state = ProvisionState::NotInstalled;
        debug!("starting provisioning in state {:?}", state);

        if self.options.skip_browser {
            info!("skipping browser installation, using the installed browser");
        } else {
            let installer =
                BrowserInstaller::new(self.runner, &self.fetcher, env.staging_dir().to_path_buf());
            installer.install().await?;
        }
        state = ProvisionState::BrowserInstalled;
        debug!("state: {:?}", state);

        let browser_version = detect_browser_version(self.runner).await?;
        state = ProvisionState::VersionDetected(browser_version.clone());
        debug!("state: {:?}", state);

        let driver_version = self.index.latest_driver_version(&browser_version).await?;
        info!(
            "resolved driver {} for browser {} ({:?} policy)",
            driver_version,
            browser_version,
            self.index.policy()
        );
        state = ProvisionState::CompanionResolved(driver_version.clone());
        debug!("state: {:?}", state);

        let driver_path = self
            .install_driver(env, &driver_version, &self.options.dest_dir)
            .await?;
        state = ProvisionState::CompanionInstalled(driver_path.clone());
        debug!("state: {:?}", state);

        Ok(ProvisionReport {
            browser_version,
            driver_version,
            driver_path,
        })
    }

    async fn install_driver(
        &self,
        env: &mut HostEnvironment,
        version: &DriverVersion,
        dest_dir: &Path,
    ) -> Result<PathBuf, ProvisionError> {
        let installer = DriverInstaller::new(&self.fetcher, env);
        let path = installer.install(self.index, version, dest_dir).await?;

        // Record the destination on the session search path. A directory
        // already present (e.g. /usr/local/bin) is left untouched.
        if env.ensure_on_path(dest_dir) {
            env.apply_path()?;
        }

        Ok(path)
    }
}

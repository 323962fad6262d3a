//! Explicit host environment context
//!
//! Global mutable host state (platform, search path, staging directory) is
//! carried as a value through the provisioning flow instead of being read
//! ad hoc, so every step can be exercised against a synthetic environment
//! and path changes can be asserted via snapshots.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::host::error::HostError;

/// Target platform, as the release indexes name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux64,
}

impl Platform {
    /// Detect the current host platform. Only Debian-era Linux on x86_64 has
    /// driver archives, so everything else is an unsupported-host error.
    pub fn detect() -> Result<Self, HostError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_parts(os: &str, arch: &str) -> Result<Self, HostError> {
        match (os, arch) {
            ("linux", "x86_64") => Ok(Self::Linux64),
            (os, arch) => Err(HostError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }

    /// Platform tag as used in archive names and download paths.
    pub fn archive_tag(&self) -> &'static str {
        match self {
            Self::Linux64 => "linux64",
        }
    }

    /// Name of the driver executable inside the archive.
    pub fn driver_binary(&self) -> &'static str {
        match self {
            Self::Linux64 => "chromedriver",
        }
    }
}

/// Mutable host context passed to each provisioning step.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    platform: Platform,
    path_entries: Vec<PathBuf>,
    staging_dir: PathBuf,
}

impl HostEnvironment {
    /// Build the environment from the real host: detected platform, the
    /// current `PATH`, and the default staging directory.
    pub fn detect() -> Result<Self, HostError> {
        let path_entries = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        Ok(Self {
            platform: Platform::detect()?,
            path_entries,
            staging_dir: crate::config::staging_dir(),
        })
    }

    /// Build a synthetic environment. Used by tests.
    pub fn with_parts(platform: Platform, path_entries: Vec<PathBuf>, staging_dir: PathBuf) -> Self {
        Self {
            platform,
            path_entries,
            staging_dir,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Current search-path entries, in order. Cheap to snapshot before and
    /// after a step to assert what changed.
    pub fn path_snapshot(&self) -> Vec<PathBuf> {
        self.path_entries.clone()
    }

    pub fn is_on_path(&self, dir: &Path) -> bool {
        self.path_entries.iter().any(|entry| entry == dir)
    }

    /// Prepend `dir` to the search path unless already present.
    /// Returns whether an entry was added.
    pub fn ensure_on_path(&mut self, dir: &Path) -> bool {
        if self.is_on_path(dir) {
            return false;
        }
        debug!("prepending {} to search path", dir.display());
        self.path_entries.insert(0, dir.to_path_buf());
        true
    }

    /// Write the tracked entries back to the process `PATH` for the rest of
    /// the session.
    pub fn apply_path(&self) -> Result<(), HostError> {
        let joined = std::env::join_paths(&self.path_entries)?;
        // Safety: the provisioning flow is sequential; nothing else reads or
        // writes the environment concurrently.
        unsafe { std::env::set_var("PATH", &joined) };
        Ok(())
    }
}

use std::path::PathBuf;

// =============================================================================
// Network endpoints
// =============================================================================

/// Release index serving `LATEST_RELEASE_<full version>` lookups (Chrome 115+).
pub const CHROME_FOR_TESTING_INDEX: &str = "https://googlechromelabs.github.io/chrome-for-testing";

/// Download host for Chrome for Testing driver archives.
pub const CHROME_FOR_TESTING_DOWNLOADS: &str =
    "https://storage.googleapis.com/chrome-for-testing-public";

/// Legacy release index serving `LATEST_RELEASE_<major>` lookups (Chrome <= 114).
/// Driver archives are served from the same host.
pub const LEGACY_DRIVER_INDEX: &str = "https://chromedriver.storage.googleapis.com";

/// Direct download URL for the current stable Chrome `.deb`.
pub const CHROME_DEB_URL: &str =
    "https://dl.google.com/linux/direct/google-chrome-stable_current_amd64.deb";

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Host package management
// =============================================================================

/// Packages that conflict with the Chrome `.deb` and are removed before install.
pub const CONFLICTING_PACKAGES: &[&str] = &["chromium-browser", "chromium", "chromium-driver"];

/// Runtime dependencies installed before the Chrome `.deb`.
pub const BROWSER_DEPENDENCIES: &[&str] = &[
    "ca-certificates",
    "fonts-liberation",
    "libasound2",
    "libnss3",
    "libu2f-udev",
    "libvulkan1",
    "xdg-utils",
];

// =============================================================================
// Filesystem layout
// =============================================================================

/// Default destination directory for the driver binary. Already on `PATH` on
/// any standard Linux host.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// Returns the staging directory used for downloads and extraction.
/// Uses the platform cache directory if available, otherwise the system
/// temporary directory. Stable across runs so an interrupted download can
/// be resumed.
pub fn staging_dir() -> PathBuf {
    staging_dir_with(dirs::cache_dir())
}

fn staging_dir_with(cache_dir: Option<PathBuf>) -> PathBuf {
    cache_dir
        .unwrap_or_else(std::env::temp_dir)
        .join("chromeprov")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_dir_with_uses_cache_dir_when_available() {
        let path = staging_dir_with(Some(PathBuf::from("/home/user/.cache")));
        assert_eq!(path, PathBuf::from("/home/user/.cache/chromeprov"));
    }

    #[test]
    fn staging_dir_with_falls_back_to_temp_dir() {
        let path = staging_dir_with(None);
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("chromeprov"));
    }
}

//! Chrome installation through the host package manager

use std::path::PathBuf;

use tracing::info;

use crate::config;
use crate::host::runner::CommandRunner;
use crate::install::error::InstallError;
use crate::install::fetch::Fetcher;

/// Installs Google Chrome on a Debian-based host.
///
/// Runs the classic provisioning sequence: refresh the package index, remove
/// packages that conflict with the Chrome `.deb`, install its runtime
/// dependencies, download the `.deb` directly, and hand it to `apt-get` so
/// remaining dependencies are resolved. Any failing step aborts the sequence;
/// partially completed package state is left as is.
pub struct BrowserInstaller<'a> {
    runner: &'a dyn CommandRunner,
    fetcher: &'a Fetcher,
    deb_url: String,
    staging_dir: PathBuf,
}

impl<'a> BrowserInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, fetcher: &'a Fetcher, staging_dir: PathBuf) -> Self {
        Self {
            runner,
            fetcher,
            deb_url: config::CHROME_DEB_URL.to_string(),
            staging_dir,
        }
    }

    /// Override the `.deb` download URL. Used by tests.
    pub fn with_deb_url(mut self, deb_url: &str) -> Self {
        self.deb_url = deb_url.to_string();
        self
    }

    pub async fn install(&self) -> Result<(), InstallError> {
        info!("updating package index");
        self.apt_get(&["update"]).await?;

        info!("removing conflicting packages");
        let mut remove = vec!["remove", "-y"];
        remove.extend_from_slice(config::CONFLICTING_PACKAGES);
        self.apt_get(&remove).await?;

        info!("installing browser dependencies");
        let mut install = vec!["install", "-y"];
        install.extend_from_slice(config::BROWSER_DEPENDENCIES);
        self.apt_get(&install).await?;

        std::fs::create_dir_all(&self.staging_dir)?;
        let deb_path = self.staging_dir.join("google-chrome-stable.deb");
        info!("downloading Chrome package from {}", self.deb_url);
        self.fetcher.download(&self.deb_url, &deb_path).await?;

        info!("installing Chrome package");
        let deb_arg = deb_path.display().to_string();
        self.apt_get(&["install", "-y", &deb_arg]).await?;

        Ok(())
    }

    async fn apt_get(&self, args: &[&str]) -> Result<(), InstallError> {
        let output = self.runner.run("apt-get", args).await?;
        if !output.success() {
            return Err(InstallError::CommandFailed {
                command: format!("apt-get {}", args.join(" ")),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::runner::{CommandOutput, RecordingRunner};
    use mockito::Server;
    use tempfile::TempDir;

    #[tokio::test]
    async fn install_runs_package_steps_in_order() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/chrome.deb")
            .with_status(200)
            .with_body("deb-bytes")
            .create_async()
            .await;

        let staging = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let fetcher = Fetcher::new();
        let installer = BrowserInstaller::new(&runner, &fetcher, staging.path().to_path_buf())
            .with_deb_url(&format!("{}/chrome.deb", server.url()));

        installer.install().await.unwrap();

        let calls = runner.recorded_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], "apt-get update");
        assert!(calls[1].starts_with("apt-get remove -y chromium-browser"));
        assert!(calls[2].starts_with("apt-get install -y ca-certificates"));
        assert!(calls[3].starts_with("apt-get install -y"));
        assert!(calls[3].ends_with("google-chrome-stable.deb"));

        let deb = staging.path().join("google-chrome-stable.deb");
        assert_eq!(std::fs::read(&deb).unwrap(), b"deb-bytes");
    }

    #[tokio::test]
    async fn install_aborts_on_package_manager_failure() {
        let staging = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        runner.script(
            "apt-get",
            CommandOutput::failed(100, "E: Could not get lock /var/lib/dpkg/lock"),
        );
        let fetcher = Fetcher::new();
        let installer = BrowserInstaller::new(&runner, &fetcher, staging.path().to_path_buf());

        let result = installer.install().await;

        assert!(matches!(result, Err(InstallError::CommandFailed { .. })));
        // First step failed, nothing further ran.
        assert_eq!(runner.recorded_calls(), vec!["apt-get update"]);
    }

    #[tokio::test]
    async fn install_aborts_when_deb_download_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/chrome.deb")
            .with_status(404)
            .create_async()
            .await;

        let staging = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let fetcher = Fetcher::new();
        let installer = BrowserInstaller::new(&runner, &fetcher, staging.path().to_path_buf())
            .with_deb_url(&format!("{}/chrome.deb", server.url()));

        let result = installer.install().await;

        assert!(matches!(result, Err(InstallError::ArchiveMissing { .. })));
        // The final apt-get install of the .deb never ran.
        assert_eq!(runner.recorded_calls().len(), 3);
    }
}

//! Installed browser version detection

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::host::runner::CommandRunner;
use crate::version::error::VersionError;
use crate::version::types::BrowserVersion;

/// Binaries probed for a version report, in order.
const VERSION_COMMANDS: &[&str] = &["google-chrome", "google-chrome-stable"];

/// Locates the 4-part version token in output like "Google Chrome 124.0.6367.91".
/// Extraction only; the strict parser validates the token.
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("version token pattern is valid"));

/// Detect the installed browser version by running the browser's
/// `--version` command and strictly parsing its output.
///
/// Probes each known binary name; a binary that cannot be spawned or exits
/// non-zero is skipped. Fails with [`VersionError::BrowserNotFound`] when no
/// binary responds, or [`VersionError::NotDetected`] when the output carries
/// no parseable version token.
pub async fn detect_browser_version(
    runner: &dyn CommandRunner,
) -> Result<BrowserVersion, VersionError> {
    for program in VERSION_COMMANDS {
        match runner.run(program, &["--version"]).await {
            Ok(output) if output.success() => {
                let version = extract_version(&output.stdout)?;
                info!("detected browser version {} via {}", version, program);
                return Ok(version);
            }
            Ok(output) => {
                debug!(
                    "{} exited with status {:?}, trying next candidate",
                    program, output.status
                );
            }
            Err(e) => {
                debug!("{} not runnable ({}), trying next candidate", program, e);
            }
        }
    }
    Err(VersionError::BrowserNotFound)
}

fn extract_version(output: &str) -> Result<BrowserVersion, VersionError> {
    let token = VERSION_TOKEN
        .find(output)
        .ok_or_else(|| VersionError::NotDetected(output.trim().to_string()))?;
    token.as_str().parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::runner::{CommandOutput, RecordingRunner};
    use rstest::rstest;

    #[rstest]
    #[case("Google Chrome 124.0.6367.91 \n", "124.0.6367.91")]
    #[case("Google Chrome 124.0.6367.91 dev\n", "124.0.6367.91")]
    #[case("Chromium 91.0.4472.114 snap\n", "91.0.4472.114")]
    fn extract_version_finds_token_in_report_output(#[case] output: &str, #[case] expected: &str) {
        let version = extract_version(output).unwrap();
        assert_eq!(version.to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("Google Chrome\n")]
    #[case("command not found")]
    fn extract_version_fails_without_token(#[case] output: &str) {
        assert!(matches!(
            extract_version(output),
            Err(VersionError::NotDetected(_))
        ));
    }

    #[tokio::test]
    async fn detect_uses_first_responding_binary() {
        let runner = RecordingRunner::new();
        runner.script(
            "google-chrome",
            CommandOutput::ok("Google Chrome 124.0.6367.91 \n"),
        );

        let version = detect_browser_version(&runner).await.unwrap();

        assert_eq!(version.to_string(), "124.0.6367.91");
        assert_eq!(runner.recorded_calls(), vec!["google-chrome --version"]);
    }

    #[tokio::test]
    async fn detect_falls_back_when_first_binary_fails() {
        let runner = RecordingRunner::new();
        runner.script(
            "google-chrome",
            CommandOutput::failed(127, "not found"),
        );
        runner.script(
            "google-chrome-stable",
            CommandOutput::ok("Google Chrome 124.0.6367.91 \n"),
        );

        let version = detect_browser_version(&runner).await.unwrap();

        assert_eq!(version.to_string(), "124.0.6367.91");
        assert_eq!(
            runner.recorded_calls(),
            vec![
                "google-chrome --version",
                "google-chrome-stable --version"
            ]
        );
    }

    #[tokio::test]
    async fn detect_reports_browser_not_found_when_all_binaries_fail() {
        let runner = RecordingRunner::new();
        for program in VERSION_COMMANDS {
            runner.script(program, CommandOutput::failed(127, "not found"));
        }

        let result = detect_browser_version(&runner).await;

        assert!(matches!(result, Err(VersionError::BrowserNotFound)));
    }

    #[tokio::test]
    async fn detect_fails_loudly_on_unparseable_output() {
        let runner = RecordingRunner::new();
        runner.script("google-chrome", CommandOutput::ok("Google Chrome\n"));

        let result = detect_browser_version(&runner).await;

        assert!(matches!(result, Err(VersionError::NotDetected(_))));
    }
}

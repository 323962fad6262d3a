//! Command execution capability
//!
//! External commands (package manager, browser binary) run through the
//! [`CommandRunner`] trait. Production code uses [`SystemRunner`]; tests use
//! [`RecordingRunner`], which records every invocation and replays scripted
//! output without touching the host.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::host::error::CommandError;

/// Captured result of one command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status code; `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// A successful invocation with the given stdout.
    pub fn ok(stdout: &str) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// A failed invocation with the given status code and stderr.
    pub fn failed(status: i32, stderr: &str) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Trait for running external commands, privileged or not.
///
/// A non-zero exit status is not an `Err`: spawning succeeded and callers
/// decide what a failure means for their step.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Runs commands on the real host.
pub struct SystemRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        debug!("running command: {} {}", program, args.join(" "));

        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Fake runner that records invocations and replays scripted output.
///
/// Unscripted programs succeed with empty output, so tests only script the
/// commands whose output matters.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    scripts: Mutex<HashMap<String, CommandOutput>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output returned whenever `program` is invoked.
    pub fn script(&self, program: &str, output: CommandOutput) {
        self.scripts
            .lock()
            .expect("scripts lock poisoned")
            .insert(program.to_string(), output);
    }

    /// Every invocation so far, rendered as `program arg1 arg2 ...`.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let rendered = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(rendered);

        let scripted = self
            .scripts
            .lock()
            .expect("scripts lock poisoned")
            .get(program)
            .cloned();

        Ok(scripted.unwrap_or_else(|| CommandOutput::ok("")))
    }
}

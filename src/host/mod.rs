//! Host environment and privileged command execution
//!
//! The provisioner mutates global host state (package database, filesystem,
//! search path). Both mutations go through explicit seams so tests can observe
//! them without touching the host:
//!
//! - [`env`]: `HostEnvironment` context object with search-path snapshots
//! - [`error`]: Error types for host detection and command execution
//! - [`runner`]: `CommandRunner` capability trait with a real system runner
//!   and a recording fake

pub mod env;
pub mod error;
pub mod runner;

//! chromeprov: one-shot provisioning of Google Chrome and a matching
//! ChromeDriver on Linux hosts
//!
//! The flow is linear: ensure the browser is installed, detect its version,
//! resolve the compatible driver release via a remote index, download and
//! place the driver on the executable search path.
//!
//! # Modules
//!
//! - [`config`]: Endpoints, timeouts, package lists, default paths
//! - [`host`]: Host environment context and command execution seams
//! - [`install`]: Download, extraction, and placement of browser and driver
//! - [`provision`]: The orchestrating state machine and error taxonomy
//! - [`version`]: Strict version types, detection, and release-index lookup

pub mod config;
pub mod host;
pub mod install;
pub mod provision;
pub mod version;

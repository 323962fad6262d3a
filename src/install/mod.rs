//! Fetching, unpacking, and placing the browser and driver binaries
//!
//! # Modules
//!
//! - [`archive`]: Extracts the driver executable from a release archive
//! - [`browser`]: Installs the Chrome `.deb` through the host package manager
//! - [`driver`]: Places the resolved driver at its destination
//! - [`error`]: Installer error types
//! - [`fetch`]: Resumable HTTP downloads to the staging directory

pub mod archive;
pub mod browser;
pub mod driver;
pub mod error;
pub mod fetch;

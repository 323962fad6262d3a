//! Version detection and driver-version resolution
//!
//! This module maps the installed browser version to a compatible driver
//! version via a remote release index.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Detect    │────▶│    Types    │◀────│ ReleaseIndex│
//! │ (--version) │     │ (strict ver)│     │  (lookup)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │   Indexes   │
//!                                         │ (cft,legacy)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`detect`]: Runs the browser's version-report command and parses the output
//! - [`error`]: Error types for parsing and resolution
//! - [`index`]: `ReleaseIndex` trait for looking up compatible driver versions
//! - [`indexes`]: Concrete index implementations (Chrome for Testing, legacy)
//! - [`types`]: `BrowserVersion`, `DriverVersion`, `ResolutionPolicy`

pub mod detect;
pub mod error;
pub mod index;
pub mod indexes;
pub mod types;

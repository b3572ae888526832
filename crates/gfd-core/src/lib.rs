//! Configuration resolution and reconciliation engine for GitLab File Downloader
//!
//! This crate sits between the Layer 0 crates and the CLI:
//!
//! - **Configuration resolution**: layered TOML files plus flag overrides
//!   merged into [`RawSettings`], validated into an immutable [`Settings`]
//! - **Mode derivation**: [`Mode`] follows from which target fields are set
//! - **SyncEngine**: fetch, compare by SHA-256 and write only what changed
//!
//! # Architecture
//!
//! ```text
//!        gfd-cli
//!           |
//!        gfd-core
//!           |
//!     +-----+-----+
//!     |           |
//!  gfd-fs      gfd-api
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gfd_api::HttpTransport;
//! use gfd_core::{ConfigResolver, RawSettings, SyncEngine, SyncOptions};
//!
//! let raw = ConfigResolver::new().resolve(&RawSettings::default())?;
//! let settings = raw.validate()?;
//! let transport = HttpTransport::new(HttpTransport::DEFAULT_TIMEOUT)?;
//! let report = SyncEngine::new(transport, SyncOptions::default()).run(&settings)?;
//! ```

pub mod config;
pub mod error;
pub mod mode;
pub mod settings;
pub mod sync;

pub use config::{ConfigResolver, RawSettings};
pub use error::{Error, Result};
pub use mode::Mode;
pub use settings::{ConfigError, Settings, Target};
pub use sync::{ItemReport, Outcome, SyncEngine, SyncOptions, SyncReport, WriteReason};

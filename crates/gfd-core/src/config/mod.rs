//! Configuration resolution
//!
//! Settings are merged from these sources (later sources override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/gitlab-file-downloader/config.toml`
//! 2. **Explicit file** - the TOML file passed with `--config`
//! 3. **Overrides** - environment variables and command-line flags
//!
//! The result is a [`RawSettings`]; [`RawSettings::validate`] turns it into
//! [`crate::Settings`].
//!
//! # Example
//!
//! ```ignore
//! use gfd_core::config::{ConfigResolver, RawSettings};
//!
//! let overrides = RawSettings {
//!     token: Some("glpat-...".into()),
//!     ..Default::default()
//! };
//! let raw = ConfigResolver::new()
//!     .with_config_file("downloader.toml")
//!     .resolve(&overrides)?;
//! let settings = raw.validate()?;
//! ```

mod raw;
mod resolver;

pub use raw::RawSettings;
pub use resolver::{CONFIG_DIR_NAME, ConfigResolver, DEFAULT_BRANCH};

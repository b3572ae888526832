//! Shared test utilities for the gitlab-file-downloader workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: JSON envelopes shaped like the GitLab files and tree endpoints
//! - [`transport`]: [`FakeTransport`], a scripted in-memory [`gfd_api::Transport`]
//! - [`workspace`]: [`TestWorkspace`], a temporary output directory with assertions

pub mod fixtures;
pub mod transport;
pub mod workspace;

pub use transport::FakeTransport;
pub use workspace::TestWorkspace;

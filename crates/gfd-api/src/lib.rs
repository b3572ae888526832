//! GitLab repository API client for GitLab File Downloader
//!
//! Two read-only operations are exposed by [`RepositoryClient`]:
//!
//! - [`RepositoryClient::get_file`]: one file with its server-computed SHA-256
//! - [`RepositoryClient::list_folder`]: the direct children of a folder
//!
//! The network is reached only through the [`Transport`] trait so callers can
//! swap in a deterministic implementation.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{Endpoint, RepositoryClient, default_user_agent, encode_component};
pub use error::{Error, Result};
pub use models::{EntryKind, RemoteFileRecord, RemoteFolderEntry};
pub use transport::{AUTH_HEADER, ApiRequest, HttpResponse, HttpTransport, Transport};

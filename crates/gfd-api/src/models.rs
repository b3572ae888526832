//! Response envelopes of the repository files and tree endpoints

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single file as returned by `GET /projects/:id/repository/files/:path`.
///
/// `content_sha256` is computed by the server over the decoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    pub content_sha256: String,
    /// File content in the transport encoding named by `encoding`
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub blob_id: Option<String>,
    #[serde(default)]
    pub last_commit_id: Option<String>,
}

impl RemoteFileRecord {
    /// Parse the JSON envelope of a files endpoint response.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::decode("file envelope", e))
    }

    /// Decode `content` into the raw file bytes.
    ///
    /// Line breaks inside the base64 text are tolerated.
    pub fn decode_content(&self) -> Result<Vec<u8>> {
        match self.encoding.as_deref() {
            None | Some("base64") => {}
            Some(other) => {
                return Err(Error::decode(
                    format!("content of {}", self.display_path()),
                    format!("unsupported encoding '{}'", other),
                ));
            }
        }

        let compact: String = self
            .content
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| Error::decode(format!("content of {}", self.display_path()), e))
    }

    fn display_path(&self) -> &str {
        if self.file_path.is_empty() {
            &self.file_name
        } else {
            &self.file_path
        }
    }
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Anything else the server reports, e.g. `commit` for submodules
    #[serde(other)]
    Other,
}

/// One direct child of a folder as returned by `GET /projects/:id/repository/tree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFolderEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    #[serde(default)]
    pub mode: String,
}

impl RemoteFolderEntry {
    /// Parse one page of a tree endpoint response.
    pub fn list_from_json(body: &[u8]) -> Result<Vec<Self>> {
        serde_json::from_slice(body).map_err(|e| Error::decode("folder listing", e))
    }

    /// Last segment of the entry path.
    pub fn basename(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

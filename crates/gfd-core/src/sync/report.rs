//! Per-item outcomes of a sync run

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Why a file is (or would be) written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteReason {
    /// No local file existed
    New,
    /// The local file hashed differently from the remote one
    Changed,
}

/// What happened to one remote entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Wrote { reason: WriteReason },
    /// Dry run: the file would have been written
    WouldWrite { reason: WriteReason },
    /// Local content already matches
    Skipped,
    /// A folder entry that is not a regular file
    SkippedNotAFile,
    /// The item failed; other items were still processed
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub remote_path: String,
    pub local_path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Report from a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub mode: Mode,
    pub dry_run: bool,
    /// One entry per remote item, in listing order
    pub items: Vec<ItemReport>,
}

impl SyncReport {
    pub fn new(mode: Mode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    /// Items written, or that would be written in a dry run.
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Wrote { .. } | Outcome::WouldWrite { .. }))
    }

    /// Items left alone, unchanged files and non-file entries alike.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped | Outcome::SkippedNotAFile))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Whether no item failed
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.items.iter().filter(|i| predicate(&i.outcome)).count()
    }
}

//! Operating mode derived from which target fields are populated

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a run synchronizes.
///
/// Never configured directly: [`crate::RawSettings::mode`] derives it from the
/// populated fields and [`crate::Settings::mode`] from the validated target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Neither a complete file pair nor a complete folder pair is set
    Undefined,
    /// One remote file to one local path
    File,
    /// Direct children of one remote folder into one local folder
    Folder,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Undefined => write!(f, "undefined"),
            Mode::File => write!(f, "file"),
            Mode::Folder => write!(f, "folder"),
        }
    }
}

//! Per-path snapshot record owned by a note.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Row id of a file snapshot record.
pub type FileId = i64;

/// Git object kind of one snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Blob,
    Tree,
    /// Submodule reference.
    Commit,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

/// One file or directory captured when a repository was imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub note_id: NoteId,
    pub path: String,
    pub kind: FileKind,
    pub sha: String,
    /// Byte size, known for blobs only.
    pub size: Option<i64>,
}

/// Insert payload for one snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileEntry {
    pub path: String,
    pub kind: FileKind,
    pub sha: String,
    pub size: Option<i64>,
}

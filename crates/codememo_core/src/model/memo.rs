//! Memo model and its create-then-edit lifecycle.
//!
//! # Invariants
//! - A memo starts as `MemoState::Empty` and only becomes `Edited` through an
//!   explicit content update.
//! - Deletion removes the row; there is no tombstone, so a deleted memo can
//!   never be edited back into existence.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Row id of a memo. Ids grow with insertion order.
pub type MemoId = i64;

/// Content state of a memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MemoState {
    /// Placeholder created ahead of the first edit.
    Empty,
    /// Holds the latest written content.
    Edited { content: String },
}

impl MemoState {
    /// Maps the nullable `content` column to a state.
    pub fn from_content(content: Option<String>) -> Self {
        match content {
            Some(content) => Self::Edited { content },
            None => Self::Empty,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Edited { content } => Some(content.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Free-text annotation owned by one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub note_id: NoteId,
    /// Optional anchor (file path or page) inside the note.
    pub page: Option<String>,
    pub state: MemoState,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Memo {
    pub fn content(&self) -> Option<&str> {
        self.state.content()
    }
}

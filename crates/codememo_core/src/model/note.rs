//! Note model: one imported snapshot of an external repository.
//!
//! # Invariants
//! - `member_id` is set at creation and never changes.
//! - Counts are stored as reported by the hosting API, except
//!   `contributors_count`, which may hold the lookup fallback sentinel.

use crate::model::member::MemberId;
use serde::{Deserialize, Serialize};

/// Row id of a note.
pub type NoteId = i64;

/// Persisted repository snapshot, root of the note aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub member_id: MemberId,
    /// Source repository URL as entered by the user.
    pub url: String,
    pub title: String,
    /// Repository owner's avatar URL.
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub contributors_count: i64,
    pub stars_count: i64,
    pub forks_count: i64,
    pub branch: String,
    pub version: Option<String>,
    /// Epoch milliseconds of the last time the note was opened.
    pub viewed_at: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Projects the lightweight summary view.
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            title: self.title.clone(),
            url: self.url.clone(),
            branch: self.branch.clone(),
            version: self.version.clone(),
        }
    }
}

/// Light projection used when only identification fields are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub url: String,
    pub branch: String,
    pub version: Option<String>,
}

/// Insert payload for a note row; the id and `created_at` are assigned by
/// storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub member_id: MemberId,
    pub url: String,
    pub title: String,
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub contributors_count: i64,
    pub stars_count: i64,
    pub forks_count: i64,
    pub branch: String,
    pub version: Option<String>,
    pub viewed_at: i64,
}

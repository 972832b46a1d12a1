//! Member (note owner) model.

use serde::{Deserialize, Serialize};

/// Row id of a member account.
pub type MemberId = i64;

/// An owner account. Exists independently of the notes it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub login: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

//! Domain model for imported repository notes and their children.
//!
//! # Responsibility
//! - Define the records shared by repositories and services.
//! - Encode the memo create-then-edit lifecycle as a tagged state.
//!
//! # Invariants
//! - A `Note` is the sole owner of its `Memo` and `FileEntry` rows; children
//!   only hold the owning `NoteId` as a lookup link.

pub mod file;
pub mod member;
pub mod memo;
pub mod note;

use std::fmt::{Display, Formatter};

/// Entity kinds that can be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Member,
    Note,
    Memo,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Member => "member",
            Self::Note => "note",
            Self::Memo => "memo",
        };
        f.write_str(label)
    }
}

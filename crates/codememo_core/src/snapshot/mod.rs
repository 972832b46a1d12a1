//! File snapshot collaborator.
//!
//! # Responsibility
//! - Capture the file tree of an imported repository branch as `files` rows
//!   attached to an already-persisted note.
//! - Remove those rows when the owning note is deleted.
//!
//! # Invariants
//! - `build_snapshot` requires a committed note row; it never creates notes.
//! - The tree is fetched before the write transaction opens.
//! - A truncated tree listing is rejected; partial snapshots are never stored.
//! - `delete_all_for_note` never opens its own transaction, so it joins the
//!   caller's cascade scope.

use crate::github::repo_url::{parse_repo_name, RepoName, RepoUrlError};
use crate::github::{ProviderError, ProviderResult};
use crate::model::file::NewFileEntry;
use crate::model::note::{Note, NoteId};
use crate::model::EntityKind;
use crate::repo::file_repo::{FileRepository, SqliteFileRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Recursive tree listing of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeListing {
    pub entries: Vec<NewFileEntry>,
    /// Provider stopped before listing every entry.
    pub truncated: bool,
}

/// Source of repository file trees.
pub trait RepositoryTreeProvider {
    /// Lists every entry of `branch`, recursively.
    fn list_tree(&self, repo: &RepoName, branch: &str) -> ProviderResult<TreeListing>;
}

impl<T: RepositoryTreeProvider + ?Sized> RepositoryTreeProvider for &T {
    fn list_tree(&self, repo: &RepoName, branch: &str) -> ProviderResult<TreeListing> {
        (**self).list_tree(repo, branch)
    }
}

/// Failure while building a file snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    InvalidUrl(RepoUrlError),
    Provider(ProviderError),
    /// The provider returned only part of the tree.
    Truncated {
        repo: String,
        branch: String,
        listed: usize,
    },
    Repo(RepoError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "{err}"),
            Self::Provider(err) => write!(f, "file tree fetch failed: {err}"),
            Self::Truncated {
                repo,
                branch,
                listed,
            } => write!(
                f,
                "file tree of {repo}@{branch} is truncated after {listed} entries"
            ),
            Self::Repo(err) => write!(f, "file snapshot persistence failed: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUrl(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Truncated { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoUrlError> for SnapshotError {
    fn from(value: RepoUrlError) -> Self {
        Self::InvalidUrl(value)
    }
}

impl From<ProviderError> for SnapshotError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<RepoError> for SnapshotError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SnapshotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Call contract the note service relies on.
pub trait FileSnapshotBuilder {
    /// Persists the file tree of `url`@`branch` under `note`. Returns the
    /// number of rows written.
    fn build_snapshot(
        &self,
        conn: &mut Connection,
        url: &str,
        branch: &str,
        note: &Note,
    ) -> Result<usize, SnapshotError>;

    /// Removes every file row of the note. Returns the number removed.
    fn delete_all_for_note(&self, conn: &Connection, note_id: NoteId) -> RepoResult<usize>;
}

impl<T: FileSnapshotBuilder + ?Sized> FileSnapshotBuilder for &T {
    fn build_snapshot(
        &self,
        conn: &mut Connection,
        url: &str,
        branch: &str,
        note: &Note,
    ) -> Result<usize, SnapshotError> {
        (**self).build_snapshot(conn, url, branch, note)
    }

    fn delete_all_for_note(&self, conn: &Connection, note_id: NoteId) -> RepoResult<usize> {
        (**self).delete_all_for_note(conn, note_id)
    }
}

/// Snapshot builder that stores the provider's tree listing in `files`.
pub struct TreeSnapshotBuilder<T> {
    provider: T,
}

impl<T: RepositoryTreeProvider> TreeSnapshotBuilder<T> {
    pub fn new(provider: T) -> Self {
        Self { provider }
    }
}

impl<T: RepositoryTreeProvider> FileSnapshotBuilder for TreeSnapshotBuilder<T> {
    fn build_snapshot(
        &self,
        conn: &mut Connection,
        url: &str,
        branch: &str,
        note: &Note,
    ) -> Result<usize, SnapshotError> {
        let started_at = Instant::now();
        let repo = parse_repo_name(url)?;
        let listing = self.provider.list_tree(&repo, branch)?;
        if listing.truncated {
            warn!(
                "event=snapshot_build module=snapshot status=error repo={} branch={} error_code=tree_truncated listed={}",
                repo,
                branch,
                listing.entries.len()
            );
            return Err(SnapshotError::Truncated {
                repo: repo.to_string(),
                branch: branch.to_string(),
                listed: listing.entries.len(),
            });
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !SqliteNoteRepository::new(&tx).note_exists(note.id)? {
            return Err(SnapshotError::Repo(RepoError::NotFound {
                kind: EntityKind::Note,
                id: note.id,
            }));
        }
        let inserted = SqliteFileRepository::new(&tx).insert_files(note.id, &listing.entries)?;
        tx.commit()?;

        info!(
            "event=snapshot_build module=snapshot status=ok note_id={} repo={} branch={} files={} duration_ms={}",
            note.id,
            repo,
            branch,
            inserted,
            started_at.elapsed().as_millis()
        );
        Ok(inserted)
    }

    fn delete_all_for_note(&self, conn: &Connection, note_id: NoteId) -> RepoResult<usize> {
        SqliteFileRepository::new(conn).delete_by_note(note_id)
    }
}

//! Note use-case service: repository import and the note aggregate lifecycle.
//!
//! # Responsibility
//! - Import a hosted repository as a note owned by a member.
//! - Provide note lookups, rename and view-time refresh.
//! - Delete a note together with every file and memo it owns.
//!
//! # Invariants
//! - Metadata is fetched before any write transaction opens.
//! - A metadata failure that is not masked aborts the import before any
//!   note row is written.
//! - The note insert is committed before the snapshot builder runs; when the
//!   snapshot fails, the note is removed again through the cascade.
//! - Cascade order is files, then memos, then the note row, inside one
//!   immediate transaction.

use crate::db::now_epoch_ms;
use crate::github::metadata::{fetch_metadata, RepositoryMetadataProvider};
use crate::github::repo_url::parse_repo_name;
use crate::model::file::FileEntry;
use crate::model::member::MemberId;
use crate::model::note::{NewNote, Note, NoteId, NoteSummary};
use crate::model::EntityKind;
use crate::repo::ensure_schema_ready;
use crate::repo::file_repo::{FileRepository, SqliteFileRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::memo_service::delete_memos_for_note;
use crate::snapshot::FileSnapshotBuilder;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

/// Import request for one repository branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub url: String,
    pub title: String,
    pub branch: String,
    pub version: Option<String>,
}

/// Rows removed by one cascading note delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub files_removed: usize,
    pub memos_removed: usize,
    pub note_removed: bool,
}

/// Note service over one migrated connection, a metadata provider and a file
/// snapshot collaborator.
pub struct NoteService<'conn, M, S> {
    conn: &'conn mut Connection,
    metadata: M,
    snapshot: S,
}

impl<'conn, M, S> NoteService<'conn, M, S>
where
    M: RepositoryMetadataProvider,
    S: FileSnapshotBuilder,
{
    /// Creates a service after checking the connection schema.
    pub fn try_new(conn: &'conn mut Connection, metadata: M, snapshot: S) -> ServiceResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self {
            conn,
            metadata,
            snapshot,
        })
    }

    /// Imports a repository snapshot for `owner_id` and returns the new note id.
    ///
    /// # Errors
    /// - `NotFound(Member)` when the owner does not exist.
    /// - `InvalidArgument` for a malformed URL or blank title/branch.
    /// - `ExternalService` when the repository lookup fails.
    /// - `Snapshot` when the file tree cannot be stored; no note remains.
    pub fn import_repository(
        &mut self,
        owner_id: MemberId,
        request: &ImportRequest,
    ) -> ServiceResult<NoteId> {
        let started_at = Instant::now();

        SqliteMemberRepository::new(self.conn)
            .find_by_id(owner_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Member, owner_id))?;
        let repo = parse_repo_name(&request.url)?;
        let title = require_text("title", &request.title)?;
        let branch = require_text("branch", &request.branch)?;

        info!(
            "event=note_import module=note_service status=start owner_id={} repo={} branch={}",
            owner_id, repo, branch
        );
        let metadata = fetch_metadata(&self.metadata, &repo).map_err(|err| {
            error!(
                "event=note_import module=note_service status=error owner_id={} repo={} error_code=metadata_fetch_failed error={}",
                owner_id, repo, err
            );
            err
        })?;

        let new_note = NewNote {
            member_id: owner_id,
            url: request.url.trim().to_string(),
            title,
            avatar: metadata.avatar,
            description: metadata.description,
            contributors_count: metadata.contributors_count,
            stars_count: metadata.stars_count,
            forks_count: metadata.forks_count,
            branch,
            version: request
                .version
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            viewed_at: now_epoch_ms(),
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let note_id = SqliteNoteRepository::new(&tx).insert_note(&new_note)?;
        tx.commit()?;

        let note = self.get_note(note_id)?;
        let files = match self
            .snapshot
            .build_snapshot(self.conn, &note.url, &note.branch, &note)
        {
            Ok(files) => files,
            Err(err) => {
                error!(
                    "event=note_import module=note_service status=error note_id={} error_code=snapshot_failed error={}",
                    note_id, err
                );
                if let Err(cleanup_err) = self.delete_note(note_id) {
                    error!(
                        "event=note_import module=note_service status=error note_id={} error_code=rollback_failed error={}",
                        note_id, cleanup_err
                    );
                }
                return Err(err.into());
            }
        };

        info!(
            "event=note_import module=note_service status=ok note_id={} files={} duration_ms={}",
            note_id,
            files,
            started_at.elapsed().as_millis()
        );
        Ok(note_id)
    }

    /// Lists the owner's notes, most recently viewed first.
    pub fn list_notes(&self, owner_id: MemberId) -> ServiceResult<Vec<Note>> {
        SqliteMemberRepository::new(self.conn)
            .find_by_id(owner_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Member, owner_id))?;
        Ok(SqliteNoteRepository::new(self.conn).list_notes_by_member(owner_id)?)
    }

    /// Gets one note.
    pub fn get_note(&self, note_id: NoteId) -> ServiceResult<Note> {
        SqliteNoteRepository::new(self.conn)
            .get_note(note_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Note, note_id))
    }

    /// Gets the summary projection of one note.
    pub fn get_note_summary(&self, note_id: NoteId) -> ServiceResult<NoteSummary> {
        self.get_note(note_id).map(|note| note.summary())
    }

    /// Lists the file snapshot of one note, ordered by path.
    pub fn list_files(&self, note_id: NoteId) -> ServiceResult<Vec<FileEntry>> {
        self.get_note(note_id)?;
        Ok(SqliteFileRepository::new(self.conn).list_files(note_id)?)
    }

    /// Replaces the note title.
    pub fn rename_note(&mut self, note_id: NoteId, title: &str) -> ServiceResult<()> {
        let title = require_text("title", title)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteNoteRepository::new(&tx).update_title(note_id, &title)?;
        tx.commit()?;

        info!("event=note_rename module=note_service status=ok note_id={note_id}");
        Ok(())
    }

    /// Marks the note as viewed now.
    pub fn touch_viewed_at(&mut self, note_id: NoteId) -> ServiceResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteNoteRepository::new(&tx).update_viewed_at(note_id, now_epoch_ms())?;
        tx.commit()?;
        Ok(())
    }

    /// Deletes the note with all of its files and memos.
    ///
    /// Deleting a note that does not exist is a no-op.
    pub fn delete_note(&mut self, note_id: NoteId) -> ServiceResult<CascadeReport> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let report = cascade_delete(&tx, &self.snapshot, note_id)?;
        tx.commit()?;

        let status = if report.note_removed { "ok" } else { "noop" };
        info!(
            "event=note_delete module=note_service status={} note_id={} files_removed={} memos_removed={}",
            status, note_id, report.files_removed, report.memos_removed
        );
        Ok(report)
    }
}

fn cascade_delete<S: FileSnapshotBuilder>(
    conn: &Connection,
    snapshot: &S,
    note_id: NoteId,
) -> ServiceResult<CascadeReport> {
    let files_removed = snapshot.delete_all_for_note(conn, note_id)?;
    let memos_removed = delete_memos_for_note(conn, note_id)?;
    let note_removed = SqliteNoteRepository::new(conn).delete_note(note_id)?;
    Ok(CascadeReport {
        files_removed,
        memos_removed,
        note_removed,
    })
}

fn require_text(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidArgument(format!(
            "{field} must not be blank"
        )));
    }
    Ok(trimmed.to_string())
}

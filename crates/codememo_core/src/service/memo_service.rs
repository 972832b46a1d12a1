//! Memo use-case service.
//!
//! # Responsibility
//! - Create placeholder memos under an existing note and edit them later.
//! - Read, delete and list memos of a note.
//! - Provide the bulk delete used by the note cascade.
//!
//! # Invariants
//! - Creation checks the owning note inside the same write transaction.
//! - Memo ids of a note are listed in creation order.
//! - Deletes are idempotent: a missing memo is a no-op, never an error.
//! - Updates never recreate a deleted memo.

use crate::model::memo::{Memo, MemoId};
use crate::model::note::NoteId;
use crate::model::EntityKind;
use crate::repo::ensure_schema_ready;
use crate::repo::memo_repo::{MemoRepository, SqliteMemoRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::RepoResult;
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info};
use rusqlite::{Connection, TransactionBehavior};

/// Memo service over one migrated connection.
pub struct MemoService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> MemoService<'conn> {
    /// Creates a service after checking the connection schema.
    pub fn try_new(conn: &'conn mut Connection) -> ServiceResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    /// Creates an empty, unanchored memo under the note.
    pub fn create_memo(&mut self, note_id: NoteId) -> ServiceResult<MemoId> {
        self.insert_memo(note_id, None)
    }

    /// Creates an empty memo anchored to a page or file path.
    pub fn create_memo_at(&mut self, note_id: NoteId, page: &str) -> ServiceResult<MemoId> {
        let page = page.trim();
        if page.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "memo page must not be blank".to_string(),
            ));
        }
        self.insert_memo(note_id, Some(page))
    }

    /// Returns memo content; `None` while the memo is still empty.
    pub fn read_memo(&self, memo_id: MemoId) -> ServiceResult<Option<String>> {
        let memo = self.get_memo(memo_id)?;
        Ok(memo.content().map(str::to_string))
    }

    /// Returns the full memo record.
    pub fn get_memo(&self, memo_id: MemoId) -> ServiceResult<Memo> {
        SqliteMemoRepository::new(self.conn)
            .get_memo(memo_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Memo, memo_id))
    }

    /// Replaces memo content. Repeating the same edit is harmless.
    pub fn update_memo(&mut self, memo_id: MemoId, content: &str) -> ServiceResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteMemoRepository::new(&tx).update_content(memo_id, content)?;
        tx.commit()?;

        debug!(
            "event=memo_update module=memo_service status=ok memo_id={} content_len={}",
            memo_id,
            content.len()
        );
        Ok(())
    }

    /// Deletes one memo. Returns whether a row was removed.
    pub fn delete_memo(&mut self, memo_id: MemoId) -> ServiceResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = SqliteMemoRepository::new(&tx).delete_memo(memo_id)?;
        tx.commit()?;

        let status = if removed { "ok" } else { "noop" };
        info!("event=memo_delete module=memo_service status={status} memo_id={memo_id}");
        Ok(removed)
    }

    /// Lists memo ids of the note, oldest first. Unknown notes yield an
    /// empty list.
    pub fn list_memo_ids(&self, note_id: NoteId) -> ServiceResult<Vec<MemoId>> {
        Ok(SqliteMemoRepository::new(self.conn).list_memo_ids(note_id)?)
    }

    /// Deletes every memo of the note. Returns how many were removed.
    pub fn delete_all_for_note(&mut self, note_id: NoteId) -> ServiceResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = delete_memos_for_note(&tx, note_id)?;
        tx.commit()?;
        Ok(removed)
    }

    fn insert_memo(&mut self, note_id: NoteId, page: Option<&str>) -> ServiceResult<MemoId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !SqliteNoteRepository::new(&tx).note_exists(note_id)? {
            return Err(ServiceError::not_found(EntityKind::Note, note_id));
        }
        let memo_id = SqliteMemoRepository::new(&tx).insert_memo(note_id, page)?;
        tx.commit()?;

        info!(
            "event=memo_create module=memo_service status=ok note_id={} memo_id={} anchored={}",
            note_id,
            memo_id,
            page.is_some()
        );
        Ok(memo_id)
    }
}

/// Bulk memo removal inside the caller's transaction.
///
/// Shared by `MemoService::delete_all_for_note` and the note cascade.
pub(crate) fn delete_memos_for_note(conn: &Connection, note_id: NoteId) -> RepoResult<usize> {
    let removed = SqliteMemoRepository::new(conn).delete_by_note(note_id)?;
    debug!(
        "event=memo_bulk_delete module=memo_service status=ok note_id={} removed={}",
        note_id, removed
    );
    Ok(removed)
}

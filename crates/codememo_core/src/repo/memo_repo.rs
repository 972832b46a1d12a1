//! Memo repository contract and SQLite implementation.
//!
//! # Invariants
//! - `content IS NULL` is the storage form of `MemoState::Empty`.
//! - Memo ids per note are listed in ascending id order, which is insertion
//!   order (`AUTOINCREMENT` never reuses ids).

use crate::model::memo::{Memo, MemoId, MemoState};
use crate::model::note::NoteId;
use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for memo rows.
pub trait MemoRepository {
    /// Inserts one empty memo under the note and returns its id.
    fn insert_memo(&self, note_id: NoteId, page: Option<&str>) -> RepoResult<MemoId>;
    /// Gets one memo by id.
    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Writes memo content, moving it to the edited state.
    fn update_content(&self, id: MemoId, content: &str) -> RepoResult<()>;
    /// Deletes one memo. Returns `false` when nothing was deleted.
    fn delete_memo(&self, id: MemoId) -> RepoResult<bool>;
    /// Lists memo ids of one note in insertion order.
    fn list_memo_ids(&self, note_id: NoteId) -> RepoResult<Vec<MemoId>>;
    /// Deletes every memo of one note and returns how many were removed.
    fn delete_by_note(&self, note_id: NoteId) -> RepoResult<usize>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn insert_memo(&self, note_id: NoteId, page: Option<&str>) -> RepoResult<MemoId> {
        self.conn.execute(
            "INSERT INTO memos (note_id, page, content) VALUES (?1, ?2, NULL);",
            params![note_id, page],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let memo = self
            .conn
            .query_row(
                "SELECT id, note_id, page, content, created_at, updated_at
                 FROM memos
                 WHERE id = ?1;",
                [id],
                parse_memo_row,
            )
            .optional()?;
        Ok(memo)
    }

    fn update_content(&self, id: MemoId, content: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE memos
             SET
                content = ?2,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE id = ?1;",
            params![id, content],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Memo,
                id,
            });
        }
        Ok(())
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_memo_ids(&self, note_id: NoteId) -> RepoResult<Vec<MemoId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM memos WHERE note_id = ?1 ORDER BY id ASC;")?;
        let ids = stmt
            .query_map([note_id], |row| row.get::<_, MemoId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn delete_by_note(&self, note_id: NoteId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM memos WHERE note_id = ?1;", [note_id])?;
        Ok(removed)
    }
}

fn parse_memo_row(row: &Row<'_>) -> rusqlite::Result<Memo> {
    Ok(Memo {
        id: row.get("id")?,
        note_id: row.get("note_id")?,
        page: row.get("page")?,
        state: MemoState::from_content(row.get("content")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

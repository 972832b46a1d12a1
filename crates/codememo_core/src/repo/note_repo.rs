//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and query `notes` rows.
//! - Keep single-row mutations as single statements so the caller's
//!   transaction is the only atomic scope needed.
//!
//! # Invariants
//! - `member_id` is written once on insert and never updated.
//! - Listing order is `viewed_at DESC, id DESC`.
//! - Deleting a note with remaining `files`/`memos` rows fails with a foreign
//!   key error; children must be removed first.

use crate::model::member::MemberId;
use crate::model::note::{NewNote, Note, NoteId};
use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    member_id,
    url,
    title,
    avatar,
    description,
    contributors_count,
    stars_count,
    forks_count,
    branch,
    version,
    viewed_at,
    created_at
FROM notes";

/// Repository interface for note rows.
pub trait NoteRepository {
    /// Inserts one note and returns the storage-assigned id.
    fn insert_note(&self, note: &NewNote) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Returns whether the note row exists.
    fn note_exists(&self, id: NoteId) -> RepoResult<bool>;
    /// Lists all notes of one member, most recently viewed first.
    fn list_notes_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Note>>;
    /// Replaces the note title.
    fn update_title(&self, id: NoteId, title: &str) -> RepoResult<()>;
    /// Sets the last-viewed timestamp.
    fn update_viewed_at(&self, id: NoteId, viewed_at: i64) -> RepoResult<()>;
    /// Deletes the note row. Returns `false` when nothing was deleted.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &NewNote) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (
                member_id,
                url,
                title,
                avatar,
                description,
                contributors_count,
                stars_count,
                forks_count,
                branch,
                version,
                viewed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                note.member_id,
                note.url.as_str(),
                note.title.as_str(),
                note.avatar.as_deref(),
                note.description.as_deref(),
                note.contributors_count,
                note.stars_count,
                note.forks_count,
                note.branch.as_str(),
                note.version.as_deref(),
                note.viewed_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn note_exists(&self, id: NoteId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_notes_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE member_id = ?1
             ORDER BY viewed_at DESC, id DESC;"
        ))?;
        let notes = stmt
            .query_map([member_id], parse_note_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn update_title(&self, id: NoteId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?2 WHERE id = ?1;",
            params![id, title],
        )?;
        ensure_changed(changed, id)
    }

    fn update_viewed_at(&self, id: NoteId, viewed_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET viewed_at = ?2 WHERE id = ?1;",
            params![id, viewed_at],
        )?;
        ensure_changed(changed, id)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn ensure_changed(changed: usize, id: NoteId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound {
            kind: EntityKind::Note,
            id,
        });
    }
    Ok(())
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        member_id: row.get("member_id")?,
        url: row.get("url")?,
        title: row.get("title")?,
        avatar: row.get("avatar")?,
        description: row.get("description")?,
        contributors_count: row.get("contributors_count")?,
        stars_count: row.get("stars_count")?,
        forks_count: row.get("forks_count")?,
        branch: row.get("branch")?,
        version: row.get("version")?,
        viewed_at: row.get("viewed_at")?,
        created_at: row.get("created_at")?,
    })
}

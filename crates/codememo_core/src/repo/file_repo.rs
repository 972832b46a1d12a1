//! File snapshot rows owned by a note.

use crate::model::file::{FileEntry, FileKind, NewFileEntry};
use crate::model::note::NoteId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for `files` rows.
pub trait FileRepository {
    /// Inserts a batch of entries for one note; returns the inserted count.
    fn insert_files(&self, note_id: NoteId, entries: &[NewFileEntry]) -> RepoResult<usize>;
    /// Lists entries of one note ordered by path.
    fn list_files(&self, note_id: NoteId) -> RepoResult<Vec<FileEntry>>;
    /// Deletes every entry of one note and returns how many were removed.
    fn delete_by_note(&self, note_id: NoteId) -> RepoResult<usize>;
}

pub struct SqliteFileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FileRepository for SqliteFileRepository<'_> {
    fn insert_files(&self, note_id: NoteId, entries: &[NewFileEntry]) -> RepoResult<usize> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO files (note_id, path, kind, sha, size)
             VALUES (?1, ?2, ?3, ?4, ?5);",
        )?;
        let mut inserted = 0;
        for entry in entries {
            inserted += stmt.execute(params![
                note_id,
                entry.path.as_str(),
                entry.kind.as_str(),
                entry.sha.as_str(),
                entry.size,
            ])?;
        }
        Ok(inserted)
    }

    fn list_files(&self, note_id: NoteId) -> RepoResult<Vec<FileEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, note_id, path, kind, sha, size
             FROM files
             WHERE note_id = ?1
             ORDER BY path ASC;",
        )?;
        let mut rows = stmt.query([note_id])?;
        let mut files = Vec::new();
        while let Some(row) = rows.next()? {
            let kind_text: String = row.get("kind")?;
            let kind = FileKind::parse(&kind_text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid file kind `{kind_text}` in files.kind"))
            })?;
            files.push(FileEntry {
                id: row.get("id")?,
                note_id: row.get("note_id")?,
                path: row.get("path")?,
                kind,
                sha: row.get("sha")?,
                size: row.get("size")?,
            });
        }
        Ok(files)
    }

    fn delete_by_note(&self, note_id: NoteId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM files WHERE note_id = ?1;", [note_id])?;
        Ok(removed)
    }
}

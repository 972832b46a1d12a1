//! Member directory backed by the `members` table.

use crate::model::member::{Member, MemberId};
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension};

/// Lookup contract for note owners.
pub trait MemberRepository {
    /// Registers one member and returns its id.
    fn create_member(&self, login: &str) -> RepoResult<MemberId>;
    /// Gets one member by id.
    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;
}

pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, login: &str) -> RepoResult<MemberId> {
        self.conn
            .execute("INSERT INTO members (login) VALUES (?1);", [login])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, login, created_at FROM members WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Member {
                        id: row.get("id")?,
                        login: row.get("login")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(member)
    }
}

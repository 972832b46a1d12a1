//! Shared fixtures for integration tests: stub hosting provider and seeding
//! helpers.

#![allow(dead_code)]

use codememo_core::db::open_db_in_memory;
use codememo_core::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use codememo_core::{
    FileKind, ImportRequest, MemberId, NewFileEntry, ProviderError, ProviderResult, RepoName,
    RepositoryInfo, RepositoryMetadataProvider, RepositoryTreeProvider, TreeListing,
};
use rusqlite::Connection;
use std::cell::Cell;

/// Hosting provider answering from fixed values.
pub struct StubProvider {
    pub repository: ProviderResult<RepositoryInfo>,
    pub contributors: ProviderResult<i64>,
    pub tree: ProviderResult<Vec<NewFileEntry>>,
    pub tree_truncated: bool,
    pub repository_calls: Cell<usize>,
}

impl StubProvider {
    /// stars=42, forks=3, contributors=17, three tree entries.
    pub fn healthy() -> Self {
        Self {
            repository: Ok(RepositoryInfo {
                avatar: Some("https://avatars.example/acme.png".to_string()),
                description: Some("Widgets for everyone".to_string()),
                stars_count: 42,
                forks_count: 3,
            }),
            contributors: Ok(17),
            tree: Ok(vec![
                entry("README.md", FileKind::Blob, Some(120)),
                entry("src", FileKind::Tree, None),
                entry("src/lib.rs", FileKind::Blob, Some(2048)),
            ]),
            tree_truncated: false,
            repository_calls: Cell::new(0),
        }
    }

    pub fn with_contributors(mut self, contributors: ProviderResult<i64>) -> Self {
        self.contributors = contributors;
        self
    }

    pub fn with_repository(mut self, repository: ProviderResult<RepositoryInfo>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_tree(mut self, tree: ProviderResult<Vec<NewFileEntry>>) -> Self {
        self.tree = tree;
        self
    }

    /// Marks the tree listing as cut off by the provider.
    pub fn with_truncated_tree(mut self) -> Self {
        self.tree_truncated = true;
        self
    }
}

impl RepositoryMetadataProvider for StubProvider {
    fn repository(&self, _repo: &RepoName) -> ProviderResult<RepositoryInfo> {
        self.repository_calls.set(self.repository_calls.get() + 1);
        self.repository.clone()
    }

    fn contributors_count(&self, _repo: &RepoName) -> ProviderResult<i64> {
        self.contributors.clone()
    }
}

impl RepositoryTreeProvider for StubProvider {
    fn list_tree(&self, _repo: &RepoName, _branch: &str) -> ProviderResult<TreeListing> {
        Ok(TreeListing {
            entries: self.tree.clone()?,
            truncated: self.tree_truncated,
        })
    }
}

pub fn entry(path: &str, kind: FileKind, size: Option<i64>) -> NewFileEntry {
    NewFileEntry {
        path: path.to_string(),
        kind,
        sha: format!("sha-{path}"),
        size,
    }
}

pub fn rate_limited() -> ProviderError {
    ProviderError::Status {
        code: 403,
        message: "API rate limit exceeded".to_string(),
    }
}

pub fn import_request(url: &str) -> ImportRequest {
    ImportRequest {
        url: url.to_string(),
        title: "Widget study".to_string(),
        branch: "main".to_string(),
        version: Some("v1.2.0".to_string()),
    }
}

/// Opens a migrated in-memory database with one member.
pub fn setup() -> (Connection, MemberId) {
    let conn = open_db_in_memory().unwrap();
    let owner = SqliteMemberRepository::new(&conn)
        .create_member("alice")
        .unwrap();
    (conn, owner)
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

pub fn count_rows_for_note(conn: &Connection, table: &str, note_id: i64) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE note_id = ?1;"),
        [note_id],
        |row| row.get(0),
    )
    .unwrap()
}

//! Core domain logic for codememo: imported repository snapshots ("notes")
//! and the memos attached to them.
//! This crate is the single source of truth for the note aggregate invariants.

pub mod db;
pub mod github;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod snapshot;

pub use github::client::GithubClient;
pub use github::config::GithubConfig;
pub use github::metadata::{
    fetch_metadata, RepositoryInfo, RepositoryMetadata, RepositoryMetadataProvider,
    CONTRIBUTORS_COUNT_FALLBACK,
};
pub use github::repo_url::{parse_repo_name, RepoName, RepoUrlError};
pub use github::{ProviderError, ProviderResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::file::{FileEntry, FileKind, NewFileEntry};
pub use model::member::{Member, MemberId};
pub use model::memo::{Memo, MemoId, MemoState};
pub use model::note::{Note, NoteId, NoteSummary};
pub use model::EntityKind;
pub use repo::{RepoError, RepoResult};
pub use service::error::{ServiceError, ServiceResult};
pub use service::memo_service::MemoService;
pub use service::note_service::{CascadeReport, ImportRequest, NoteService};
pub use snapshot::{
    FileSnapshotBuilder, RepositoryTreeProvider, SnapshotError, TreeListing, TreeSnapshotBuilder,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

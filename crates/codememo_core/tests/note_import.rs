mod common;

use codememo_core::{
    EntityKind, FileKind, NoteService, ProviderError, ServiceError, SnapshotError,
    TreeSnapshotBuilder, CONTRIBUTORS_COUNT_FALLBACK,
};
use common::{count_rows, import_request, rate_limited, setup, StubProvider};

#[test]
fn import_persists_note_with_fetched_metadata_and_files() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy();
    let mut service =
        NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider)).unwrap();

    let note_id = service
        .import_repository(owner, &import_request("https://github.com/acme/widget"))
        .unwrap();

    let note = service.get_note(note_id).unwrap();
    assert_eq!(note.member_id, owner);
    assert_eq!(note.url, "https://github.com/acme/widget");
    assert_eq!(note.title, "Widget study");
    assert_eq!(note.branch, "main");
    assert_eq!(note.version.as_deref(), Some("v1.2.0"));
    assert_eq!(
        note.avatar.as_deref(),
        Some("https://avatars.example/acme.png")
    );
    assert_eq!(note.description.as_deref(), Some("Widgets for everyone"));
    assert_eq!(note.stars_count, 42);
    assert_eq!(note.forks_count, 3);
    assert_eq!(note.contributors_count, 17);
    assert!(note.viewed_at > 0);

    let files = service.list_files(note_id).unwrap();
    let paths: Vec<&str> = files.iter().map(|file| file.path.as_str()).collect();
    assert_eq!(paths, vec!["README.md", "src", "src/lib.rs"]);
    assert_eq!(files[1].kind, FileKind::Tree);
    assert_eq!(files[2].size, Some(2048));
}

#[test]
fn contributor_lookup_failure_uses_fallback_and_keeps_real_counts() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy().with_contributors(Err(rate_limited()));
    let mut service =
        NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider)).unwrap();

    let note_id = service
        .import_repository(owner, &import_request("https://github.com/acme/widget"))
        .unwrap();

    let note = service.get_note(note_id).unwrap();
    assert_eq!(note.contributors_count, CONTRIBUTORS_COUNT_FALLBACK);
    assert_eq!(note.contributors_count, 10_000);
    assert_eq!(note.stars_count, 42);
    assert_eq!(note.forks_count, 3);
}

#[test]
fn malformed_url_is_rejected_before_fetch_and_persists_nothing() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy();
    {
        let mut service =
            NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider))
                .unwrap();
        let err = service
            .import_repository(owner, &import_request("not a repository url"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    assert_eq!(provider.repository_calls.get(), 0);
    assert_eq!(count_rows(&conn, "notes"), 0);
    assert_eq!(count_rows(&conn, "files"), 0);
}

#[test]
fn unknown_owner_is_not_found() {
    let (mut conn, _owner) = setup();
    let provider = StubProvider::healthy();
    let mut service =
        NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider)).unwrap();

    let err = service
        .import_repository(999, &import_request("https://github.com/acme/widget"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Member,
            id: 999
        }
    ));
}

#[test]
fn repository_lookup_failure_aborts_import_without_note_row() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy()
        .with_repository(Err(ProviderError::Transport("connection reset".to_string())));
    {
        let mut service =
            NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider))
                .unwrap();
        let err = service
            .import_repository(owner, &import_request("https://github.com/acme/widget"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ExternalService(ProviderError::Transport(_))
        ));
    }

    assert_eq!(count_rows(&conn, "notes"), 0);
}

#[test]
fn snapshot_failure_removes_the_imported_note() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy().with_tree(Err(ProviderError::Status {
        code: 404,
        message: "Not Found".to_string(),
    }));
    {
        let mut service =
            NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider))
                .unwrap();
        let err = service
            .import_repository(owner, &import_request("https://github.com/acme/widget"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Snapshot(_)));
        assert!(service.list_notes(owner).unwrap().is_empty());
    }

    assert_eq!(count_rows(&conn, "notes"), 0);
    assert_eq!(count_rows(&conn, "files"), 0);
}

#[test]
fn blank_title_is_invalid_argument() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy();
    let mut service =
        NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider)).unwrap();

    let mut request = import_request("https://github.com/acme/widget");
    request.title = "   ".to_string();
    let err = service.import_repository(owner, &request).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[test]
fn foreign_host_is_rejected_before_fetch() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy();
    {
        let mut service =
            NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider))
                .unwrap();
        let err = service
            .import_repository(owner, &import_request("https://gitlab.com/acme/widget"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    assert_eq!(provider.repository_calls.get(), 0);
    assert_eq!(count_rows(&conn, "notes"), 0);
}

#[test]
fn truncated_tree_aborts_import_without_partial_snapshot() {
    let (mut conn, owner) = setup();
    let provider = StubProvider::healthy().with_truncated_tree();
    {
        let mut service =
            NoteService::try_new(&mut conn, &provider, TreeSnapshotBuilder::new(&provider))
                .unwrap();
        let err = service
            .import_repository(owner, &import_request("https://github.com/acme/widget"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Snapshot(SnapshotError::Truncated { listed: 3, .. })
        ));
    }

    assert_eq!(count_rows(&conn, "notes"), 0);
    assert_eq!(count_rows(&conn, "files"), 0);
}

mod common;

use codememo_core::{
    EntityKind, MemoService, MemoState, NoteId, NoteService, ServiceError, TreeSnapshotBuilder,
};
use common::{import_request, setup, StubProvider};
use rusqlite::Connection;

fn seed_note(conn: &mut Connection, owner: i64) -> NoteId {
    let provider = StubProvider::healthy();
    let mut notes =
        NoteService::try_new(conn, &provider, TreeSnapshotBuilder::new(&provider)).unwrap();
    notes
        .import_repository(owner, &import_request("https://github.com/acme/widget"))
        .unwrap()
}

#[test]
fn new_memo_is_empty_and_listed_last() {
    let (mut conn, owner) = setup();
    let note_id = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();

    let first = memos.create_memo(note_id).unwrap();
    let second = memos.create_memo(note_id).unwrap();

    assert_eq!(memos.list_memo_ids(note_id).unwrap(), vec![first, second]);
    assert_eq!(memos.read_memo(second).unwrap(), None);
    assert_eq!(memos.get_memo(second).unwrap().state, MemoState::Empty);
}

#[test]
fn update_then_read_returns_latest_content() {
    let (mut conn, owner) = setup();
    let note_id = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();
    let memo_id = memos.create_memo(note_id).unwrap();

    memos.update_memo(memo_id, "first pass").unwrap();
    assert_eq!(
        memos.read_memo(memo_id).unwrap().as_deref(),
        Some("first pass")
    );

    memos.update_memo(memo_id, "second pass").unwrap();
    memos.update_memo(memo_id, "second pass").unwrap();
    let memo = memos.get_memo(memo_id).unwrap();
    assert_eq!(memo.content(), Some("second pass"));
    assert!(memo.updated_at >= memo.created_at);
}

#[test]
fn deleted_memo_is_gone_and_cannot_be_updated() {
    let (mut conn, owner) = setup();
    let note_id = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();
    let memo_id = memos.create_memo(note_id).unwrap();

    assert!(memos.delete_memo(memo_id).unwrap());
    assert!(!memos.delete_memo(memo_id).unwrap());

    let read_err = memos.read_memo(memo_id).unwrap_err();
    assert!(matches!(
        read_err,
        ServiceError::NotFound {
            kind: EntityKind::Memo,
            ..
        }
    ));

    let update_err = memos.update_memo(memo_id, "revived?").unwrap_err();
    assert!(matches!(update_err, ServiceError::NotFound { .. }));
    assert!(memos.list_memo_ids(note_id).unwrap().is_empty());
}

#[test]
fn delete_all_for_note_empties_the_list() {
    let (mut conn, owner) = setup();
    let note_id = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();
    for _ in 0..3 {
        memos.create_memo(note_id).unwrap();
    }

    assert_eq!(memos.delete_all_for_note(note_id).unwrap(), 3);
    assert!(memos.list_memo_ids(note_id).unwrap().is_empty());
    assert_eq!(memos.delete_all_for_note(note_id).unwrap(), 0);
}

#[test]
fn create_under_missing_note_is_not_found() {
    let (mut conn, _owner) = setup();
    let mut memos = MemoService::try_new(&mut conn).unwrap();

    let err = memos.create_memo(404).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Note,
            id: 404
        }
    ));
}

#[test]
fn anchored_memo_keeps_its_page() {
    let (mut conn, owner) = setup();
    let note_id = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();

    let memo_id = memos.create_memo_at(note_id, " src/lib.rs ").unwrap();
    assert_eq!(
        memos.get_memo(memo_id).unwrap().page.as_deref(),
        Some("src/lib.rs")
    );

    let err = memos.create_memo_at(note_id, "  ").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[test]
fn memos_of_other_notes_are_not_listed() {
    let (mut conn, owner) = setup();
    let first = seed_note(&mut conn, owner);
    let second = seed_note(&mut conn, owner);
    let mut memos = MemoService::try_new(&mut conn).unwrap();

    let kept = memos.create_memo(first).unwrap();
    memos.create_memo(second).unwrap();
    memos.delete_all_for_note(second).unwrap();

    assert_eq!(memos.list_memo_ids(first).unwrap(), vec![kept]);
}

use kanban_core::{
    Board, BoardError, BoardEvent, EditKey, MemoryStateRepository, PersistenceStore, TitleCommit,
};

fn board() -> Board<MemoryStateRepository> {
    Board::new(PersistenceStore::new(MemoryStateRepository::new()))
}

#[test]
fn commit_updates_title_and_requests_recapture() {
    let mut board = board();
    let list = board.add_list(Some("Design"));
    board.end_turn();

    board.begin_list_title_edit(list).unwrap();
    board.set_list_title_draft(list, "  Discovery  ").unwrap();
    assert_eq!(board.list(list).unwrap().displayed_title(), "  Discovery  ");
    assert_eq!(board.list(list).unwrap().title(), "Design");

    let outcome = board.commit_list_title_edit(list).unwrap();
    assert_eq!(outcome, TitleCommit::Changed("Discovery".to_string()));
    assert_eq!(board.list(list).unwrap().title(), "Discovery");
    assert!(board.has_pending_recapture());

    board.end_turn();
    assert_eq!(board.store().load().lists[0].title, "Discovery");
}

#[test]
fn empty_commit_reverts_to_pre_edit_title() {
    let mut board = board();
    let list = board.add_list(Some("Build"));
    let card = board.add_card(list, Some("Spec")).unwrap();
    board.end_turn();

    board.begin_card_title_edit(card).unwrap();
    board.set_card_title_draft(card, "   ").unwrap();
    assert_eq!(
        board.commit_card_title_edit(card).unwrap(),
        TitleCommit::Reverted
    );
    assert_eq!(board.card(card).unwrap().title(), "Spec");
    assert_eq!(board.card(card).unwrap().displayed_title(), "Spec");
    assert!(!board.has_pending_recapture());
}

#[test]
fn unchanged_commit_does_not_request_recapture() {
    let mut board = board();
    let list = board.add_list(Some("Build"));
    board.end_turn();

    board.begin_list_title_edit(list).unwrap();
    board.set_list_title_draft(list, "Build ").unwrap();
    assert_eq!(
        board.commit_list_title_edit(list).unwrap(),
        TitleCommit::Unchanged
    );
    assert!(!board.has_pending_recapture());
}

#[test]
fn escape_reverts_to_title_held_when_editing_began() {
    let mut board = board();
    let list = board.add_list(Some("Design"));
    let card = board.add_card(list, Some("Spec")).unwrap();
    board.end_turn();

    board.dispatch(BoardEvent::CardTitleFocused { card }).unwrap();
    for text in ["S", "Sp", "Spx", "Specs and more"] {
        board
            .dispatch(BoardEvent::CardTitleInput {
                card,
                text: text.to_string(),
            })
            .unwrap();
    }
    board
        .dispatch(BoardEvent::CardTitleKey {
            card,
            key: EditKey::Escape,
        })
        .unwrap();
    board.dispatch(BoardEvent::CardTitleBlurred { card }).unwrap();

    let node = board.card(card).unwrap();
    assert_eq!(node.title(), "Spec");
    assert_eq!(node.displayed_title(), "Spec");
    assert!(!node.is_editing_title());
    assert!(!board.has_pending_recapture());
}

#[test]
fn enter_commits_like_blur() {
    let mut board = board();
    let list = board.add_list(None);

    board.dispatch(BoardEvent::ListTitleFocused { list }).unwrap();
    board
        .dispatch(BoardEvent::ListTitleInput {
            list,
            text: "Backlog".to_string(),
        })
        .unwrap();
    board
        .dispatch(BoardEvent::ListTitleKey {
            list,
            key: EditKey::Enter,
        })
        .unwrap();
    board.dispatch(BoardEvent::ListTitleBlurred { list }).unwrap();

    assert_eq!(board.list(list).unwrap().title(), "Backlog");
    assert!(!board.list(list).unwrap().is_editing_title());
}

#[test]
fn refocus_keeps_original_title_of_running_edit() {
    let mut board = board();
    let list = board.add_list(Some("Design"));

    board.begin_list_title_edit(list).unwrap();
    board.set_list_title_draft(list, "Draft").unwrap();
    board.begin_list_title_edit(list).unwrap();

    assert_eq!(board.cancel_list_title_edit(list).unwrap(), "Design");
}

#[test]
fn commit_without_edit_is_an_error() {
    let mut board = board();
    let list = board.add_list(None);
    let card = board.add_card(list, None).unwrap();

    assert_eq!(
        board.commit_list_title_edit(list).unwrap_err(),
        BoardError::NotEditing
    );
    assert_eq!(
        board.set_card_title_draft(card, "x").unwrap_err(),
        BoardError::NotEditing
    );
    board.dispatch(BoardEvent::CardTitleBlurred { card }).unwrap();
}

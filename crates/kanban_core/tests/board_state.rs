use kanban_core::{
    Board, BoardEvent, CardRecord, ListRecord, MemoryStateRepository, PersistenceStore, Snapshot,
    StateRepository, DEFAULT_CARD_TITLE, DEFAULT_LIST_TITLE, STATE_KEY,
};
use std::collections::HashSet;

fn board() -> Board<MemoryStateRepository> {
    Board::new(PersistenceStore::new(MemoryStateRepository::new()))
}

fn well_formed_snapshot() -> Snapshot {
    Snapshot {
        lists: vec![
            ListRecord::new("todo", "Todo")
                .with_card(CardRecord::new("c1", "Write spec").with_description("## scope"))
                .with_card(CardRecord::new("c2", "Review")),
            ListRecord::new("doing", "  Doing ")
                .with_card(CardRecord::new("c4", " Pair on drag ").with_description(""))
                .with_card(CardRecord::new("c5", "Triage").with_description("  \n")),
            ListRecord::new("done", "Done").with_card(CardRecord::new("c3", "Kickoff")),
        ],
    }
}

fn titles(snapshot: &Snapshot) -> Vec<(String, Vec<String>)> {
    snapshot
        .lists
        .iter()
        .map(|list| {
            (
                list.title.clone(),
                list.cards.iter().map(|card| card.title.clone()).collect(),
            )
        })
        .collect()
}

#[test]
fn new_board_is_empty_and_does_not_save() {
    let board = board();
    assert!(board.state().is_empty());
    assert!(board.lists().is_empty());
    assert!(!board.has_pending_recapture());
    assert_eq!(board.store().repository().read_state(STATE_KEY).unwrap(), None);
}

#[test]
fn restore_then_capture_roundtrips_well_formed_snapshot() {
    let mut board = board();
    let snapshot = well_formed_snapshot();

    board.restore_state(snapshot.clone());

    assert_eq!(board.capture_state(), &snapshot);
    assert_eq!(board.state(), &snapshot);
}

#[test]
fn restore_keeps_padded_titles_and_blank_descriptions() {
    let mut board = board();
    let payload = r#"{"lists":[{"id":"l1","title":" Design ","cards":[{"id":"c1","title":"Spec","description":""},{"id":"c2","title":"Ship","description":"  "},{"id":"c3","title":"Plain"}]}]}"#;
    let expected = Snapshot::from_json(payload).unwrap();

    assert!(board.restore_from_json(payload));

    assert_eq!(board.capture_state(), &expected);
    assert_eq!(board.capture_state().to_json().unwrap(), payload);
    let list = board.find_list_by_id("l1").unwrap();
    assert_eq!(board.list(list).unwrap().title(), " Design ");
    let blank = board.find_card_by_id("c1").unwrap();
    assert_eq!(board.card(blank).unwrap().description(), Some(""));
    assert_eq!(board.card(blank).unwrap().preview(), None);
    let plain = board.find_card_by_id("c3").unwrap();
    assert_eq!(board.card(plain).unwrap().description(), None);
}

#[test]
fn capture_is_idempotent_byte_for_byte() {
    let mut board = board();
    let list = board.add_list(Some("Todo"));
    board.add_card(list, Some("a")).unwrap();
    board.add_card(list, None).unwrap();
    board.add_list(None);

    let first = board.capture_state().to_json().unwrap();
    let second = board.capture_state().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn captured_ids_are_pairwise_distinct() {
    let mut board = board();
    for _ in 0..5 {
        let list = board.add_list(None);
        for _ in 0..4 {
            board.add_card(list, None).unwrap();
        }
    }

    let snapshot = board.capture_state();
    let list_ids: HashSet<_> = snapshot.lists.iter().map(|list| &list.id).collect();
    let card_ids: HashSet<_> = snapshot
        .lists
        .iter()
        .flat_map(|list| list.cards.iter().map(|card| &card.id))
        .collect();
    assert_eq!(list_ids.len(), 5);
    assert_eq!(card_ids.len(), 20);
    assert!(snapshot.has_unique_ids());
}

#[test]
fn add_with_empty_title_uses_defaults() {
    let mut board = board();
    let list = board.add_list(Some("   "));
    let card = board.add_card(list, Some("")).unwrap();

    assert_eq!(board.list(list).unwrap().title(), DEFAULT_LIST_TITLE);
    assert_eq!(board.card(card).unwrap().title(), DEFAULT_CARD_TITLE);
}

#[test]
fn add_appends_in_order() {
    let mut board = board();
    let first = board.add_list(Some("One"));
    board.add_list(Some("Two"));
    board.add_card(first, Some("a")).unwrap();
    board.add_card(first, Some("b")).unwrap();

    let snapshot = board.capture_state().clone();
    assert_eq!(
        titles(&snapshot),
        vec![
            ("One".to_string(), vec!["a".to_string(), "b".to_string()]),
            ("Two".to_string(), vec![]),
        ]
    );
}

#[test]
fn restore_heals_missing_titles_cards_and_ids() {
    let mut board = board();
    let restored = board.restore_from_json(
        r#"{"lists":[
            {"id":"dup","title":"","cards":[{"id":"dup"},{"title":"Keep","id":"k"}]},
            {"id":"dup","title":null},
            {"title":"No id","cards":[{"id":"k","title":"Clash"}]}
        ]}"#,
    );
    assert!(restored);

    let snapshot = board.state().clone();
    assert!(snapshot.has_unique_ids());
    assert_eq!(snapshot.lists.len(), 3);
    assert_eq!(snapshot.lists[0].id, "dup");
    assert_eq!(snapshot.lists[0].title, DEFAULT_LIST_TITLE);
    assert_ne!(snapshot.lists[0].cards[0].id, "dup");
    assert_eq!(snapshot.lists[0].cards[0].title, DEFAULT_CARD_TITLE);
    assert_eq!(snapshot.lists[0].cards[1].id, "k");
    assert_ne!(snapshot.lists[1].id, "dup");
    assert_eq!(snapshot.lists[1].title, DEFAULT_LIST_TITLE);
    assert!(snapshot.lists[1].cards.is_empty());
    assert!(!snapshot.lists[2].id.is_empty());
    assert_ne!(snapshot.lists[2].cards[0].id, "k");

    assert_eq!(board.capture_state(), &snapshot);
}

#[test]
fn restore_from_undecodable_payload_falls_back_to_empty_board() {
    let mut board = board();
    board.add_list(Some("Stale"));

    assert!(!board.restore_from_json("<<garbage>>"));
    assert!(board.lists().is_empty());
    assert!(board.state().is_empty());
}

#[test]
fn restore_does_not_save() {
    let mut board = board();
    board.restore_state(well_formed_snapshot());

    assert!(!board.has_pending_recapture());
    assert!(!board.end_turn());
    assert_eq!(board.store().repository().read_state(STATE_KEY).unwrap(), None);
}

#[test]
fn load_state_rebuilds_tree_from_store() {
    let repo = MemoryStateRepository::new();
    PersistenceStore::new(&repo).save(&well_formed_snapshot());

    let mut board = Board::new(PersistenceStore::new(&repo));
    let loaded = board.load_state().clone();

    assert_eq!(loaded, well_formed_snapshot());
    assert_eq!(board.lists().len(), 3);
    let card = board.find_card_by_id("c1").unwrap();
    assert_eq!(board.card(card).unwrap().preview(), Some("scope"));
}

#[test]
fn mutations_in_one_turn_collapse_into_one_save() {
    let mut board = board();
    let list = board.add_list(Some("Design"));
    board.add_card(list, Some("Spec")).unwrap();
    board.add_list(Some("Build"));
    assert!(board.has_pending_recapture());

    assert!(board.end_turn());
    assert!(!board.end_turn());

    let persisted = board.store().load();
    assert_eq!(&persisted, board.state());
    assert_eq!(
        titles(&persisted),
        vec![
            ("Design".to_string(), vec!["Spec".to_string()]),
            ("Build".to_string(), vec![]),
        ]
    );
}

#[test]
fn remove_list_is_idempotent_and_never_reappears() {
    let mut board = board();
    let keep = board.add_list(Some("Keep"));
    let doomed = board.add_list(Some("Drop"));
    board.add_card(doomed, Some("gone")).unwrap();
    board.end_turn();

    assert!(board.request_list_removal(doomed));
    assert!(!board.remove_list(doomed));
    board.end_turn();

    let persisted = board.store().load();
    assert_eq!(persisted.lists.len(), 1);
    assert_eq!(persisted.lists[0].id, board.list(keep).unwrap().id());
    assert_eq!(persisted.card_count(), 0);
}

#[test]
fn removed_card_never_appears_in_saved_snapshot() {
    let mut board = board();
    let list = board.add_list(None);
    let stay = board.add_card(list, Some("stay")).unwrap();
    let gone = board.add_card(list, Some("gone")).unwrap();
    board.end_turn();

    board.dispatch(BoardEvent::CardRemoveClicked { card: gone }).unwrap();
    assert!(board.card(gone).is_none());
    assert!(!board.remove_card(gone));
    board.end_turn();

    let persisted = board.store().load();
    assert_eq!(persisted.lists[0].cards.len(), 1);
    assert_eq!(persisted.lists[0].cards[0].id, board.card(stay).unwrap().id());
}

#[test]
fn clear_state_leaves_empty_snapshot_persisted() {
    let mut board = board();
    let list = board.add_list(Some("Design"));
    board.add_card(list, Some("Spec")).unwrap();
    board.end_turn();

    board.dispatch(BoardEvent::ClearConfirmed).unwrap();

    assert!(board.lists().is_empty());
    assert!(board.state().is_empty());
    assert!(!board.has_pending_recapture());
    assert_eq!(board.store().load(), Snapshot::empty());
    assert_eq!(
        board.store().repository().read_state(STATE_KEY).unwrap().as_deref(),
        Some(r#"{"lists":[]}"#)
    );
}

#[test]
fn storage_failure_keeps_live_tree_authoritative() {
    let mut board = Board::new(PersistenceStore::new(MemoryStateRepository::with_quota(16)));
    let list = board.add_list(Some("Design"));
    board.add_card(list, Some("Spec")).unwrap();

    assert!(board.end_turn());
    assert_eq!(board.store().load(), Snapshot::empty());
    assert_eq!(board.state().lists[0].title, "Design");
    assert_eq!(board.lists()[0].cards().len(), 1);
}

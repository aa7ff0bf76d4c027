//! Board state synchronization engine.
//!
//! # Responsibility
//! - Own the live list/card tree and every structural mutation of it.
//! - Capture canonical snapshots from the tree and restore the tree from
//!   snapshots.
//! - Be the only caller of the persistence store.
//!
//! # Invariants
//! - Every captured snapshot has pairwise-distinct, non-empty ids.
//! - Capturing twice with no mutation in between yields identical output.
//! - A card is held by exactly one list; moves never duplicate or drop it.
//! - Mutations only mark the tree dirty; `end_turn` performs at most one
//!   capture + save per turn.

mod dialog;
mod drag;
mod edit;
mod event;
mod node;
mod scheduler;

pub use dialog::{DescriptionDialog, DialogSave};
pub use drag::{DragCoordinator, DragError};
pub use event::{BoardEvent, EditKey};
pub use node::{CardKey, CardNode, DragPhase, ListKey, ListNode};
pub use scheduler::RecaptureScheduler;

use crate::model::snapshot::{
    generate_id, Snapshot, DEFAULT_CARD_TITLE, DEFAULT_LIST_TITLE,
};
use crate::model::title::{heal_title, restore_title};
use crate::repo::state_repo::StateRepository;
use crate::service::persistence_store::PersistenceStore;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from board operations.
///
/// Only caller mistakes surface here; storage failures are recovered inside
/// the board and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// List handle no longer refers to a live list.
    ListNotFound(ListKey),
    /// Card handle no longer refers to a live card.
    CardNotFound(CardKey),
    /// Drag protocol violation.
    Drag(DragError),
    /// Commit/cancel without a matching begin.
    NotEditing,
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListNotFound(key) => write!(f, "list not found: {key}"),
            Self::CardNotFound(key) => write!(f, "card not found: {key}"),
            Self::Drag(err) => write!(f, "{err}"),
            Self::NotEditing => write!(f, "no title edit in progress"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Drag(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DragError> for BoardError {
    fn from(value: DragError) -> Self {
        Self::Drag(value)
    }
}

/// Root owner of the list sequence.
pub struct Board<R: StateRepository> {
    store: PersistenceStore<R>,
    lists: Vec<ListNode>,
    state: Snapshot,
    drag: DragCoordinator,
    scheduler: RecaptureScheduler,
    next_key: u64,
}

impl<R: StateRepository> Board<R> {
    /// Initializes an empty board. Nothing is loaded or saved.
    pub fn new(store: PersistenceStore<R>) -> Self {
        Self {
            store,
            lists: Vec::new(),
            state: Snapshot::empty(),
            drag: DragCoordinator::new(),
            scheduler: RecaptureScheduler::new(),
            next_key: 0,
        }
    }

    pub fn store(&self) -> &PersistenceStore<R> {
        &self.store
    }

    /// Snapshot produced by the most recent capture or restore.
    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    /// Lists in display order.
    pub fn lists(&self) -> &[ListNode] {
        &self.lists
    }

    pub fn list(&self, key: ListKey) -> Option<&ListNode> {
        self.lists.iter().find(|list| list.key == key)
    }

    pub fn card(&self, key: CardKey) -> Option<&CardNode> {
        self.lists
            .iter()
            .find_map(|list| list.cards.iter().find(|card| card.key == key))
    }

    pub fn find_list_by_id(&self, id: &str) -> Option<ListKey> {
        self.lists
            .iter()
            .find(|list| list.id == id)
            .map(|list| list.key)
    }

    pub fn find_card_by_id(&self, id: &str) -> Option<CardKey> {
        self.lists
            .iter()
            .flat_map(|list| list.cards.iter())
            .find(|card| card.id == id)
            .map(|card| card.key)
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Whether a recapture is waiting for the end of the turn.
    pub fn has_pending_recapture(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Notification that the tree changed outside the board's own mutators.
    pub fn request_recapture(&mut self) {
        self.scheduler.request("external");
    }

    /// Startup path: loads the persisted snapshot and rebuilds the tree.
    pub fn load_state(&mut self) -> &Snapshot {
        let snapshot = self.store.load();
        self.restore_state(snapshot);
        &self.state
    }

    /// Appends a new list with a fresh id.
    pub fn add_list(&mut self, title: Option<&str>) -> ListKey {
        let key = self.next_list_key();
        let title = heal_title(title.unwrap_or_default(), DEFAULT_LIST_TITLE);
        let id = generate_id();
        debug!("event=list_add module=board list_id={id}");
        self.lists.push(ListNode::new(key, id, title));
        self.scheduler.request("list_add");
        key
    }

    /// Detaches a list and its cards. Removing a detached list is a no-op.
    pub fn remove_list(&mut self, key: ListKey) -> bool {
        let Some(position) = self.list_position(key) else {
            return false;
        };
        let removed = self.lists.remove(position);
        if let Some(active) = self.drag.active() {
            if removed.card_position(active).is_some() {
                self.drag.reset();
            }
        }
        debug!(
            "event=list_remove module=board list_id={} cards={}",
            removed.id,
            removed.cards.len()
        );
        self.scheduler.request("list_remove");
        true
    }

    /// A list's own delete control. The board performs the removal.
    pub fn request_list_removal(&mut self, key: ListKey) -> bool {
        self.remove_list(key)
    }

    /// Appends a new card with a fresh id to `list`.
    pub fn add_card(&mut self, list: ListKey, title: Option<&str>) -> Result<CardKey, BoardError> {
        let key = self.next_card_key();
        let title = heal_title(title.unwrap_or_default(), DEFAULT_CARD_TITLE);
        let node = self.list_mut(list)?;
        let id = generate_id();
        debug!(
            "event=card_add module=board list_id={} card_id={id}",
            node.id
        );
        node.push_card(CardNode::new(key, list, id, title));
        self.scheduler.request("card_add");
        Ok(key)
    }

    /// Detaches a card from its list. Removing a detached card is a no-op.
    pub fn remove_card(&mut self, card: CardKey) -> bool {
        let Some((list_index, _)) = self.locate_card(card) else {
            return false;
        };
        let removed = self.lists[list_index].take_card(card);
        self.drag.end(card);
        if let Some(removed) = removed {
            debug!("event=card_remove module=board card_id={}", removed.id);
        }
        self.scheduler.request("card_remove");
        true
    }

    /// Card drag-start: takes the coordinator slot and sets the marker.
    pub fn drag_start(&mut self, card: CardKey) -> Result<(), BoardError> {
        let (list_index, position) = self.locate_card(card).ok_or(BoardError::CardNotFound(card))?;
        self.drag.begin(card)?;
        let node = &mut self.lists[list_index].cards[position];
        node.phase = DragPhase::Dragging;
        debug!("event=drag_start module=board card_id={}", node.id);
        Ok(())
    }

    /// Pointer entered a list while dragging.
    pub fn drag_enter(&mut self, list: ListKey) -> Result<(), BoardError> {
        self.list_mut(list)?.drag_over = true;
        Ok(())
    }

    /// Pointer left a list while dragging.
    pub fn drag_leave(&mut self, list: ListKey) -> Result<(), BoardError> {
        self.list_mut(list)?.drag_over = false;
        Ok(())
    }

    /// Drop onto `list`: moves the dragged card to the tail of `list`.
    ///
    /// Returns `Ok(false)` when nothing is being dragged.
    pub fn drop_on(&mut self, list: ListKey) -> Result<bool, BoardError> {
        let target_index = self.list_position(list).ok_or(BoardError::ListNotFound(list))?;
        self.lists[target_index].drag_over = false;

        let Some(card) = self.drag.active() else {
            return Ok(false);
        };
        let Some((source_index, _)) = self.locate_card(card) else {
            warn!("event=drop module=board status=stale card={card}");
            self.drag.reset();
            return Ok(false);
        };

        // Take and push happen within this call, so the card is never
        // observable in two lists or in none.
        let Some(moved) = self.lists[source_index].take_card(card) else {
            return Ok(false);
        };
        debug!(
            "event=drop module=board card_id={} from={} to={}",
            moved.id, self.lists[source_index].id, self.lists[target_index].id
        );
        self.lists[target_index].push_card(moved);
        self.scheduler.request("card_drop");
        Ok(true)
    }

    /// Card drag-end: releases the slot and clears every drag marker.
    ///
    /// Clearing happens whether or not a drop occurred, and before the card
    /// handle is validated.
    pub fn drag_end(&mut self, card: CardKey) -> Result<(), BoardError> {
        self.drag.end(card);
        for list in &mut self.lists {
            list.drag_over = false;
        }
        let (list_index, position) = self.locate_card(card).ok_or(BoardError::CardNotFound(card))?;
        let node = &mut self.lists[list_index].cards[position];
        node.phase = DragPhase::Idle;
        debug!("event=drag_end module=board card_id={}", node.id);
        self.scheduler.request("drag_end");
        Ok(())
    }

    /// Walks the live tree in display order and records a snapshot.
    ///
    /// Missing or duplicate ids are replaced with fresh ones and written back
    /// to the tree, so the next capture returns the same ids.
    pub fn capture_state(&mut self) -> &Snapshot {
        let mut seen = HashSet::new();
        for list in &mut self.lists {
            ensure_unique_id(&mut list.id, &mut seen, "list");
            for card in &mut list.cards {
                ensure_unique_id(&mut card.id, &mut seen, "card");
            }
        }
        self.state = Snapshot {
            lists: self.lists.iter().map(ListNode::to_record).collect(),
        };
        &self.state
    }

    /// Replaces the live tree with one rebuilt from `snapshot`.
    ///
    /// Titles and descriptions are kept as stored; only blank titles become
    /// defaults. Missing or duplicate ids are regenerated. Nothing is saved.
    pub fn restore_state(&mut self, snapshot: Snapshot) {
        self.drag.reset();
        let mut seen = HashSet::new();
        let mut lists = Vec::with_capacity(snapshot.lists.len());
        for record in snapshot.lists {
            let list_key = self.next_list_key();
            let mut list_id = record.id;
            ensure_unique_id(&mut list_id, &mut seen, "list");
            let mut list = ListNode::new(
                list_key,
                list_id,
                restore_title(record.title, DEFAULT_LIST_TITLE),
            );
            for card_record in record.cards {
                let mut card_id = card_record.id;
                ensure_unique_id(&mut card_id, &mut seen, "card");
                let mut card = CardNode::new(
                    self.next_card_key(),
                    list_key,
                    card_id,
                    restore_title(card_record.title, DEFAULT_CARD_TITLE),
                );
                card.restore_description(card_record.description);
                list.push_card(card);
            }
            lists.push(list);
        }
        self.lists = lists;
        self.capture_state();
        info!(
            "event=state_restore module=board status=ok lists={} cards={}",
            self.state.lists.len(),
            self.state.card_count()
        );
    }

    /// Restores from a raw payload; undecodable input yields an empty board.
    ///
    /// Returns whether the payload decoded.
    pub fn restore_from_json(&mut self, payload: &str) -> bool {
        match Snapshot::from_json(payload) {
            Ok(snapshot) => {
                self.restore_state(snapshot);
                true
            }
            Err(err) => {
                warn!("event=state_restore module=board status=error error_code=decode_failed error={err}");
                self.restore_state(Snapshot::empty());
                false
            }
        }
    }

    /// Empties storage and the live tree, then saves the empty snapshot once.
    pub fn clear_state(&mut self) {
        self.store.clear();
        self.lists.clear();
        self.drag.reset();
        self.scheduler.clear();
        self.state = Snapshot::empty();
        self.store.save(&self.state);
        info!("event=state_clear module=board status=ok");
    }

    /// Runs the deferred recapture, if one is pending.
    ///
    /// Returns whether a capture + save ran.
    pub fn end_turn(&mut self) -> bool {
        let Some(folded) = self.scheduler.take() else {
            return false;
        };
        self.capture_state();
        let saved = self.store.save(&self.state);
        debug!("event=recapture module=board folded_requests={folded} saved={saved}");
        true
    }

    fn next_list_key(&mut self) -> ListKey {
        self.next_key += 1;
        ListKey(self.next_key)
    }

    fn next_card_key(&mut self) -> CardKey {
        self.next_key += 1;
        CardKey(self.next_key)
    }

    fn list_position(&self, key: ListKey) -> Option<usize> {
        self.lists.iter().position(|list| list.key == key)
    }

    fn list_mut(&mut self, key: ListKey) -> Result<&mut ListNode, BoardError> {
        self.lists
            .iter_mut()
            .find(|list| list.key == key)
            .ok_or(BoardError::ListNotFound(key))
    }

    /// Returns `(list index, card position)` for a live card.
    fn locate_card(&self, card: CardKey) -> Option<(usize, usize)> {
        self.lists
            .iter()
            .enumerate()
            .find_map(|(index, list)| list.card_position(card).map(|position| (index, position)))
    }

    fn card_mut(&mut self, card: CardKey) -> Result<&mut CardNode, BoardError> {
        let (list_index, position) = self.locate_card(card).ok_or(BoardError::CardNotFound(card))?;
        Ok(&mut self.lists[list_index].cards[position])
    }
}

fn ensure_unique_id(id: &mut String, seen: &mut HashSet<String>, kind: &'static str) {
    if id.trim().is_empty() || seen.contains(id.as_str()) {
        let fresh = generate_id();
        debug!("event=id_heal module=board kind={kind} old_id={id:?} new_id={fresh}");
        *id = fresh;
    }
    seen.insert(id.clone());
}

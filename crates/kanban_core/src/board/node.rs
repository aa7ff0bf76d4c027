//! Live tree nodes owned by the board.
//!
//! # Invariants
//! - A `ListNode` owns its cards; a card lives in exactly one list.
//! - `CardNode::owner` is a lookup link kept equal to the holding list's
//!   key. It never decides lifetime.
//! - Setters report whether the stored value actually changed.

use crate::model::preview::derive_description_preview;
use crate::model::snapshot::{CardRecord, ListRecord};
use crate::model::title::TitleEdit;
use std::fmt::{Display, Formatter};

/// Handle for a live list. Distinct from the persisted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListKey(pub(crate) u64);

/// Handle for a live card. Distinct from the persisted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey(pub(crate) u64);

impl Display for ListKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

impl Display for CardKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Card drag sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Carries the transient "being dragged" marker.
    Dragging,
}

/// Live card.
#[derive(Debug, Clone)]
pub struct CardNode {
    pub(crate) key: CardKey,
    pub(crate) owner: ListKey,
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) preview: Option<String>,
    pub(crate) phase: DragPhase,
    pub(crate) title_edit: Option<TitleEdit>,
}

impl CardNode {
    pub(crate) fn new(key: CardKey, owner: ListKey, id: String, title: String) -> Self {
        Self {
            key,
            owner,
            id,
            title,
            description: None,
            preview: None,
            phase: DragPhase::Idle,
            title_edit: None,
        }
    }

    pub fn key(&self) -> CardKey {
        self.key
    }

    /// List currently holding this card.
    pub fn owner(&self) -> ListKey {
        self.owner
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Text shown in the title slot: the draft while editing.
    pub fn displayed_title(&self) -> &str {
        self.title_edit
            .as_ref()
            .map_or(self.title.as_str(), TitleEdit::draft)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Rendered description preview.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn is_editing_title(&self) -> bool {
        self.title_edit.is_some()
    }

    pub(crate) fn set_title(&mut self, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        true
    }

    /// Stores the description and refreshes the preview when it changed.
    ///
    /// Blank text clears the description.
    pub(crate) fn set_description(&mut self, description: &str) -> bool {
        let next = if description.trim().is_empty() {
            None
        } else {
            Some(description.to_string())
        };
        if self.description == next {
            return false;
        }
        self.preview = next.as_deref().and_then(derive_description_preview);
        self.description = next;
        true
    }

    /// Stores a persisted description verbatim, blank text included.
    pub(crate) fn restore_description(&mut self, description: Option<String>) {
        self.preview = description.as_deref().and_then(derive_description_preview);
        self.description = description;
    }

    pub(crate) fn to_record(&self) -> CardRecord {
        CardRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// Live list.
#[derive(Debug, Clone)]
pub struct ListNode {
    pub(crate) key: ListKey,
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) cards: Vec<CardNode>,
    pub(crate) drag_over: bool,
    pub(crate) title_edit: Option<TitleEdit>,
}

impl ListNode {
    pub(crate) fn new(key: ListKey, id: String, title: String) -> Self {
        Self {
            key,
            id,
            title,
            cards: Vec::new(),
            drag_over: false,
            title_edit: None,
        }
    }

    pub fn key(&self) -> ListKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn displayed_title(&self) -> &str {
        self.title_edit
            .as_ref()
            .map_or(self.title.as_str(), TitleEdit::draft)
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[CardNode] {
        &self.cards
    }

    /// Whether the drop-target marker is set.
    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn is_editing_title(&self) -> bool {
        self.title_edit.is_some()
    }

    pub(crate) fn set_title(&mut self, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        true
    }

    pub(crate) fn card_position(&self, key: CardKey) -> Option<usize> {
        self.cards.iter().position(|card| card.key == key)
    }

    /// Appends at the tail and re-points the card's owner link.
    pub(crate) fn push_card(&mut self, mut card: CardNode) {
        card.owner = self.key;
        self.cards.push(card);
    }

    pub(crate) fn take_card(&mut self, key: CardKey) -> Option<CardNode> {
        let position = self.card_position(key)?;
        Some(self.cards.remove(position))
    }

    pub(crate) fn to_record(&self) -> ListRecord {
        ListRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            cards: self.cards.iter().map(CardNode::to_record).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CardKey, CardNode, ListKey, ListNode};

    #[test]
    fn set_description_refreshes_preview_only_on_change() {
        let mut card = CardNode::new(CardKey(1), ListKey(1), "c".into(), "Card".into());
        assert!(card.set_description("**Ship** it"));
        assert_eq!(card.preview(), Some("Ship it"));
        assert!(!card.set_description("**Ship** it"));

        assert!(card.set_description("   "));
        assert_eq!(card.description(), None);
        assert_eq!(card.preview(), None);
    }

    #[test]
    fn push_card_repoints_owner() {
        let mut list = ListNode::new(ListKey(7), "l".into(), "List".into());
        let card = CardNode::new(CardKey(1), ListKey(3), "c".into(), "Card".into());
        list.push_card(card);
        assert_eq!(list.cards()[0].owner(), ListKey(7));
        assert!(list.take_card(CardKey(1)).is_some());
        assert!(list.take_card(CardKey(1)).is_none());
    }
}

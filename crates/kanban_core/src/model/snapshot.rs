//! Board snapshot model.
//!
//! # Responsibility
//! - Define the canonical serializable shape of the whole board.
//! - Decode persisted payloads leniently so restore can heal them.
//!
//! # Invariants
//! - Sequence order of `lists` and of each `cards` is display order.
//! - Wire field names match the persisted format exactly.
//! - Decoding never substitutes defaults for titles or ids; healing is the
//!   board's job at restore time.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Title substituted for a list whose title is empty.
pub const DEFAULT_LIST_TITLE: &str = "New List";
/// Title substituted for a card whose title is empty.
pub const DEFAULT_CARD_TITLE: &str = "New Task";

/// Generates a fresh id for a list or card.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Full board state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Lists in left-to-right order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub lists: Vec<ListRecord>,
}

/// One persisted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Cards in top-to-bottom order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cards: Vec<CardRecord>,
}

/// One persisted card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Omitted from the payload when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Snapshot {
    /// Returns the `{ "lists": [] }` snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }

    pub fn find_list(&self, id: &str) -> Option<&ListRecord> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Finds a card and the list currently holding it.
    pub fn find_card(&self, id: &str) -> Option<(&ListRecord, &CardRecord)> {
        self.lists.iter().find_map(|list| {
            list.cards
                .iter()
                .find(|card| card.id == id)
                .map(|card| (list, card))
        })
    }

    /// Returns whether every list and card id is non-empty and distinct.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.lists.iter().all(|list| {
            !list.id.is_empty()
                && seen.insert(list.id.as_str())
                && list
                    .cards
                    .iter()
                    .all(|card| !card.id.is_empty() && seen.insert(card.id.as_str()))
        })
    }

    /// Serializes into the persisted JSON format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes the persisted JSON format.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

impl ListRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    /// Appends a card, returning `self` for fixture-style construction.
    pub fn with_card(mut self, card: CardRecord) -> Self {
        self.cards.push(card);
        self
    }
}

impl CardRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// `null` and a missing field are treated the same way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Drag coordination between a dragged card and its drop target.
//!
//! The coordinator is owned by one board and scoped to its interactions;
//! there is no process-wide slot.
//!
//! # Invariants
//! - At most one card holds the slot at any time.
//! - Only the holder's drag-end clears the slot.

use crate::board::node::CardKey;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from drag coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    /// Another card is already being dragged.
    AlreadyActive { active: CardKey, requested: CardKey },
}

impl Display for DragError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActive { active, requested } => write!(
                f,
                "cannot start dragging {requested}: {active} is already being dragged"
            ),
        }
    }
}

impl Error for DragError {}

/// Single-slot reference to the card being dragged.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    active: Option<CardKey>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card currently being dragged, if any.
    pub fn active(&self) -> Option<CardKey> {
        self.active
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Registers `card` as the dragged card.
    ///
    /// Re-registering the current holder is a no-op.
    pub fn begin(&mut self, card: CardKey) -> Result<(), DragError> {
        match self.active {
            Some(active) if active != card => Err(DragError::AlreadyActive {
                active,
                requested: card,
            }),
            _ => {
                self.active = Some(card);
                Ok(())
            }
        }
    }

    /// Clears the slot when `card` holds it. Returns whether it did.
    pub fn end(&mut self, card: CardKey) -> bool {
        if self.active == Some(card) {
            self.active = None;
            return true;
        }
        false
    }

    pub(crate) fn reset(&mut self) {
        self.active = None;
    }
}

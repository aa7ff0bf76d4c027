//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical snapshot persisted for a board.
//! - Hold the pure rules shared by lists and cards (title healing, edit
//!   sessions, description previews).
//!
//! # Invariants
//! - Every list and card is identified by a string id unique within a
//!   snapshot.
//! - Titles are healed at the point of mutation, never at read time.

pub mod preview;
pub mod snapshot;
pub mod title;

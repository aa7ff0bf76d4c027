//! Repository layer for persisted board state.
//!
//! # Responsibility
//! - Define the raw keyed storage contract used by the persistence store.
//! - Isolate SQLite details from board orchestration.
//!
//! # Invariants
//! - Repository APIs store opaque payloads; decoding happens above them.

pub mod memory_repo;
pub mod state_repo;

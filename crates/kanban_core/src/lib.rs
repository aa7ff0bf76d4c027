//! Core state engine for the kanban board.
//! This crate is the single source of truth for board invariants: snapshot
//! capture/restore, list and card ordering, drag moves and persistence.

pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::{
    Board, BoardError, BoardEvent, CardKey, CardNode, DescriptionDialog, DialogSave,
    DragCoordinator, DragError, DragPhase, EditKey, ListKey, ListNode, RecaptureScheduler,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::preview::derive_description_preview;
pub use model::snapshot::{
    generate_id, CardRecord, ListRecord, Snapshot, DEFAULT_CARD_TITLE, DEFAULT_LIST_TITLE,
};
pub use model::title::{heal_title, restore_title, TitleCommit, TitleEdit};
pub use repo::memory_repo::MemoryStateRepository;
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::persistence_store::{PersistenceStore, STATE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

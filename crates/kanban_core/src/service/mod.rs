//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw repository access into snapshot-level persistence.
//! - Keep the board engine decoupled from storage details.

pub mod persistence_store;

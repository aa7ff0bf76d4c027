//! Title normalization and in-place edit sessions.
//!
//! # Invariants
//! - A stored title is never empty after trim.
//! - Cancelling an edit always yields the title held when editing began.

/// Trims `input`, substituting `default` when nothing is left.
pub fn heal_title(input: &str, default: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Keeps a persisted title byte-for-byte unless it is blank.
pub fn restore_title(stored: String, default: &str) -> String {
    if stored.trim().is_empty() {
        default.to_string()
    } else {
        stored
    }
}

/// Result of committing an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleCommit {
    /// Draft matched the original title after trim.
    Unchanged,
    /// Draft was blank; the original title stays.
    Reverted,
    /// Draft differed; carries the new trimmed title.
    Changed(String),
}

/// One in-progress title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEdit {
    original: String,
    draft: String,
}

impl TitleEdit {
    /// Starts editing from the currently held title.
    pub fn begin(current: &str) -> Self {
        Self {
            original: current.to_string(),
            draft: current.to_string(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the interim text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Ends the session the way losing focus does.
    pub fn commit(self) -> TitleCommit {
        let trimmed = self.draft.trim();
        if trimmed.is_empty() {
            TitleCommit::Reverted
        } else if trimmed == self.original {
            TitleCommit::Unchanged
        } else {
            TitleCommit::Changed(trimmed.to_string())
        }
    }

    /// Ends the session discarding every interim change.
    pub fn cancel(self) -> String {
        self.original
    }
}

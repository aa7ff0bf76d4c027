//! Card detail dialog contract.
//!
//! Presentation belongs to the host; the board only opens, closes and reacts
//! to save notifications.

use serde::{Deserialize, Serialize};

/// Host-provided description editor.
pub trait DescriptionDialog {
    /// Shows the dialog prefilled with `current`.
    fn open(&mut self, current: Option<&str>);
    /// Hides the dialog and discards its contents.
    fn close(&mut self);
}

/// Payload of the dialog's save notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSave {
    pub description: String,
    /// Whether the dialog should also close after saving.
    pub close_modal: bool,
}

impl DialogSave {
    pub fn new(description: impl Into<String>, close_modal: bool) -> Self {
        Self {
            description: description.into(),
            close_modal,
        }
    }
}

//! Title editing and description dialog handling for lists and cards.
//!
//! # Invariants
//! - Commit trims; a blank commit keeps the pre-edit title.
//! - Cancel restores the title held when the edit began.
//! - Only a commit that changes the title requests a recapture.

use crate::board::dialog::{DescriptionDialog, DialogSave};
use crate::board::node::{CardKey, CardNode, ListKey, ListNode};
use crate::board::{Board, BoardError};
use crate::model::title::{TitleCommit, TitleEdit};
use crate::repo::state_repo::StateRepository;
use log::debug;

/// Nodes whose title is edited in place.
trait EditableTitle {
    fn node_id(&self) -> &str;
    fn edit_slot(&mut self) -> &mut Option<TitleEdit>;
    fn current_title(&self) -> &str;
    fn store_title(&mut self, title: &str) -> bool;
}

impl EditableTitle for ListNode {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn edit_slot(&mut self) -> &mut Option<TitleEdit> {
        &mut self.title_edit
    }

    fn current_title(&self) -> &str {
        &self.title
    }

    fn store_title(&mut self, title: &str) -> bool {
        self.set_title(title)
    }
}

impl EditableTitle for CardNode {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn edit_slot(&mut self) -> &mut Option<TitleEdit> {
        &mut self.title_edit
    }

    fn current_title(&self) -> &str {
        &self.title
    }

    fn store_title(&mut self, title: &str) -> bool {
        self.set_title(title)
    }
}

fn begin_edit(node: &mut impl EditableTitle) {
    if node.edit_slot().is_none() {
        let edit = TitleEdit::begin(node.current_title());
        *node.edit_slot() = Some(edit);
    }
}

fn set_draft(node: &mut impl EditableTitle, text: String) -> Result<(), BoardError> {
    node.edit_slot()
        .as_mut()
        .ok_or(BoardError::NotEditing)?
        .set_draft(text);
    Ok(())
}

/// Applies a commit. Returns the outcome and whether the title changed.
fn commit_edit(node: &mut impl EditableTitle) -> Result<(TitleCommit, bool), BoardError> {
    let edit = node.edit_slot().take().ok_or(BoardError::NotEditing)?;
    let old_title = edit.original().to_string();
    let outcome = edit.commit();
    let changed = match &outcome {
        TitleCommit::Changed(title) => node.store_title(title),
        TitleCommit::Unchanged | TitleCommit::Reverted => false,
    };
    debug!(
        "event=title_commit module=board id={} old_title={old_title:?} outcome={outcome:?}",
        node.node_id()
    );
    Ok((outcome, changed))
}

fn cancel_edit(node: &mut impl EditableTitle) -> Result<String, BoardError> {
    let edit = node.edit_slot().take().ok_or(BoardError::NotEditing)?;
    Ok(edit.cancel())
}

impl<R: StateRepository> Board<R> {
    /// Focus on a list title. Re-focusing keeps the running edit.
    pub fn begin_list_title_edit(&mut self, list: ListKey) -> Result<(), BoardError> {
        begin_edit(self.list_mut(list)?);
        Ok(())
    }

    /// Interim typing into a list title.
    pub fn set_list_title_draft(
        &mut self,
        list: ListKey,
        text: impl Into<String>,
    ) -> Result<(), BoardError> {
        set_draft(self.list_mut(list)?, text.into())
    }

    /// Losing focus (or Enter) on a list title.
    pub fn commit_list_title_edit(&mut self, list: ListKey) -> Result<TitleCommit, BoardError> {
        let (outcome, changed) = commit_edit(self.list_mut(list)?)?;
        if changed {
            self.scheduler.request("list_title");
        }
        Ok(outcome)
    }

    /// Escape on a list title. Returns the restored title.
    pub fn cancel_list_title_edit(&mut self, list: ListKey) -> Result<String, BoardError> {
        cancel_edit(self.list_mut(list)?)
    }

    pub fn begin_card_title_edit(&mut self, card: CardKey) -> Result<(), BoardError> {
        begin_edit(self.card_mut(card)?);
        Ok(())
    }

    pub fn set_card_title_draft(
        &mut self,
        card: CardKey,
        text: impl Into<String>,
    ) -> Result<(), BoardError> {
        set_draft(self.card_mut(card)?, text.into())
    }

    pub fn commit_card_title_edit(&mut self, card: CardKey) -> Result<TitleCommit, BoardError> {
        let (outcome, changed) = commit_edit(self.card_mut(card)?)?;
        if changed {
            self.scheduler.request("card_title");
        }
        Ok(outcome)
    }

    pub fn cancel_card_title_edit(&mut self, card: CardKey) -> Result<String, BoardError> {
        cancel_edit(self.card_mut(card)?)
    }

    /// Opens the detail dialog prefilled with the card's description.
    pub fn open_card_details(
        &self,
        card: CardKey,
        dialog: &mut impl DescriptionDialog,
    ) -> Result<(), BoardError> {
        let node = self.card(card).ok_or(BoardError::CardNotFound(card))?;
        dialog.open(node.description());
        Ok(())
    }

    /// Handles the dialog's save notification.
    ///
    /// Updates description and preview, requests a recapture, and closes the
    /// dialog when the payload asks for it. Returns whether the description
    /// changed.
    pub fn apply_dialog_save(
        &mut self,
        card: CardKey,
        save: DialogSave,
        dialog: &mut impl DescriptionDialog,
    ) -> Result<bool, BoardError> {
        let node = self.card_mut(card)?;
        let changed = node.set_description(&save.description);
        debug!(
            "event=description_save module=board card_id={} changed={changed} close_modal={}",
            node.id, save.close_modal
        );
        self.scheduler.request("card_description");
        if save.close_modal {
            dialog.close();
        }
        Ok(changed)
    }
}

//! User gesture dispatch.
//!
//! Each event runs to completion inside `dispatch`; hosts call
//! `Board::end_turn` once the turn's events are handled.

use crate::board::node::{CardKey, ListKey};
use crate::board::{Board, BoardError};
use crate::repo::state_repo::StateRepository;

/// Keys with special meaning inside a title editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Commits, like losing focus.
    Enter,
    /// Reverts to the title held when editing began.
    Escape,
}

/// One user gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    AddListClicked,
    RemoveListClicked { list: ListKey },
    AddCardClicked { list: ListKey },
    ListTitleFocused { list: ListKey },
    ListTitleInput { list: ListKey, text: String },
    ListTitleKey { list: ListKey, key: EditKey },
    ListTitleBlurred { list: ListKey },
    CardTitleFocused { card: CardKey },
    CardTitleInput { card: CardKey, text: String },
    CardTitleKey { card: CardKey, key: EditKey },
    CardTitleBlurred { card: CardKey },
    CardRemoveClicked { card: CardKey },
    DragStarted { card: CardKey },
    DragEntered { list: ListKey },
    DragLeft { list: ListKey },
    Dropped { list: ListKey },
    DragEnded { card: CardKey },
    /// The user confirmed the "clear board" prompt.
    ClearConfirmed,
}

impl<R: StateRepository> Board<R> {
    /// Handles one gesture.
    ///
    /// Blur and keys outside an edit are ignored, mirroring a focus-less
    /// title element.
    pub fn dispatch(&mut self, event: BoardEvent) -> Result<(), BoardError> {
        match event {
            BoardEvent::AddListClicked => {
                self.add_list(None);
            }
            BoardEvent::RemoveListClicked { list } => {
                self.request_list_removal(list);
            }
            BoardEvent::AddCardClicked { list } => {
                self.add_card(list, None)?;
            }
            BoardEvent::ListTitleFocused { list } => self.begin_list_title_edit(list)?,
            BoardEvent::ListTitleInput { list, text } => self.set_list_title_draft(list, text)?,
            BoardEvent::ListTitleKey { list, key } => {
                if self.list(list).ok_or(BoardError::ListNotFound(list))?.is_editing_title() {
                    match key {
                        EditKey::Enter => {
                            self.commit_list_title_edit(list)?;
                        }
                        EditKey::Escape => {
                            self.cancel_list_title_edit(list)?;
                        }
                    }
                }
            }
            BoardEvent::ListTitleBlurred { list } => {
                if self.list(list).ok_or(BoardError::ListNotFound(list))?.is_editing_title() {
                    self.commit_list_title_edit(list)?;
                }
            }
            BoardEvent::CardTitleFocused { card } => self.begin_card_title_edit(card)?,
            BoardEvent::CardTitleInput { card, text } => self.set_card_title_draft(card, text)?,
            BoardEvent::CardTitleKey { card, key } => {
                if self.card(card).ok_or(BoardError::CardNotFound(card))?.is_editing_title() {
                    match key {
                        EditKey::Enter => {
                            self.commit_card_title_edit(card)?;
                        }
                        EditKey::Escape => {
                            self.cancel_card_title_edit(card)?;
                        }
                    }
                }
            }
            BoardEvent::CardTitleBlurred { card } => {
                if self.card(card).ok_or(BoardError::CardNotFound(card))?.is_editing_title() {
                    self.commit_card_title_edit(card)?;
                }
            }
            BoardEvent::CardRemoveClicked { card } => {
                self.remove_card(card);
            }
            BoardEvent::DragStarted { card } => self.drag_start(card)?,
            BoardEvent::DragEntered { list } => self.drag_enter(list)?,
            BoardEvent::DragLeft { list } => self.drag_leave(list)?,
            BoardEvent::Dropped { list } => {
                self.drop_on(list)?;
            }
            BoardEvent::DragEnded { card } => self.drag_end(card)?,
            BoardEvent::ClearConfirmed => self.clear_state(),
        }
        Ok(())
    }
}

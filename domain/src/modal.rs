use shared::ModalId;
use std::collections::BTreeSet;

/// Tracks which overlays are open.
///
/// Page scrolling is suspended while any overlay is open. Form resets on
/// close are handled by [`crate::page::Page`], which owns the forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalController {
    open: BTreeSet<ModalId>,
}

impl ModalController {
    /// Returns false when the overlay was already open
    pub fn open(&mut self, id: ModalId) -> bool {
        self.open.insert(id)
    }

    /// Returns false when the overlay was not open
    pub fn close(&mut self, id: ModalId) -> bool {
        self.open.remove(&id)
    }

    /// Close everything, returning what was open
    pub fn close_all(&mut self) -> Vec<ModalId> {
        std::mem::take(&mut self.open).into_iter().collect()
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.open.contains(&id)
    }

    pub fn open_modals(&self) -> impl Iterator<Item = ModalId> + '_ {
        self.open.iter().copied()
    }

    pub fn scroll_locked(&self) -> bool {
        !self.open.is_empty()
    }
}

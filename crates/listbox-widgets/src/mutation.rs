#![forbid(unsafe_code)]

//! Content mutation hooks.
//!
//! The owner of the content calls exactly one hook right after each mutation,
//! before anything else touches the listbox. The engine keeps no generation
//! counter: late, batched or reordered notifications desynchronize the
//! selection from the data.

use listbox_core::debug;
use listbox_core::geometry::Region;
use listbox_core::movement::Movement;

use crate::content::ListboxContent;
use crate::layout::LayoutDirty;
use crate::navigator::{Damage, ListNavigator, ListboxEvent};

impl<C: ListboxContent> ListNavigator<C> {
    /// A row was inserted before `index`.
    pub fn entry_added(&mut self, index: usize) {
        let ipp = self.viewport.items_per_page;
        if let Some(content) = &self.content {
            if ipp > 0 && content.size() % ipp == 1 {
                self.dirty.insert(LayoutDirty::GEOMETRY);
            }
        }
        if index <= self.viewport.selected {
            self.viewport.selected += 1;
        }
        if index <= self.viewport.top {
            self.viewport.top += 1;
        }
        debug!(index, selected = self.viewport.selected, "entry added");

        self.move_selection(Movement::JustCheck);

        if self.viewport.is_visible(index) {
            self.invalidate(Damage::Full);
        }
    }

    /// The row at `index` was removed.
    pub fn entry_removed(&mut self, index: usize) {
        let ipp = self.viewport.items_per_page;
        let mut movement = Movement::JustCheck;
        if let Some(content) = &self.content {
            let size = content.size();
            if ipp > 0 && size % ipp == 0 {
                self.dirty.insert(LayoutDirty::GEOMETRY);
            }
            if index == self.viewport.selected {
                self.viewport.selected = content.cursor_get();
            }
            if content.cursor_get() >= size {
                movement = Movement::MoveUp;
            }
        }
        debug!(index, selected = self.viewport.selected, "entry removed");

        self.move_selection(movement);

        if self.viewport.is_visible(index) {
            self.invalidate(Damage::Full);
        }
    }

    /// The row at `index` changed in place.
    pub fn entry_changed(&mut self, index: usize) {
        if !self.viewport.is_visible(index) {
            return;
        }
        if let Some(rect) = self.row_rect(index) {
            self.invalidate(Damage::Region(Region::from(rect)));
        }
    }

    /// The content was replaced wholesale. With `selection_home` the
    /// selection and window go back to the first row; otherwise the selection
    /// is kept where it still fits.
    ///
    /// `SelectionChanged` is emitted exactly once either way.
    pub fn entry_reset(&mut self, selection_home: bool) {
        self.dirty.insert(LayoutDirty::GEOMETRY | LayoutDirty::THUMB);

        if selection_home {
            if let Some(content) = self.content.as_mut() {
                content.cursor_home();
            }
            self.viewport.top = 0;
            self.viewport.selected = 0;
        }
        if let Some(content) = self.content.as_mut() {
            let last = content.size().saturating_sub(1);
            self.viewport.selected = self.viewport.selected.min(last);
            content.cursor_set(self.viewport.selected);
        }
        debug!(selection_home, selected = self.viewport.selected, "entries reset");

        let old_selected = self.viewport.selected;
        self.move_selection(Movement::JustCheck);
        if self.viewport.selected == old_selected {
            self.events.push(ListboxEvent::SelectionChanged);
        }
        self.invalidate(Damage::Full);
    }
}

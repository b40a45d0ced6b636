#![forbid(unsafe_code)]

//! Viewport layout: widget size, row height and items-per-page.

use bitflags::bitflags;
use listbox_core::config::FALLBACK_ITEM_HEIGHT;
use listbox_core::geometry::Size;
use listbox_core::movement::Movement;
use listbox_core::{debug, warn};

use crate::content::ListboxContent;
use crate::navigator::ListNavigator;

bitflags! {
    /// Layout work deferred to the next scrollbar update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutDirty: u8 {
        /// Scrollbar placement and row width must be recomputed.
        const GEOMETRY = 0b01;
        /// The thumb cache is stale.
        const THUMB    = 0b10;
    }
}

impl<C: ListboxContent> ListNavigator<C> {
    /// Widget size last passed to [`resize`](Self::resize).
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn item_height(&self) -> u16 {
        self.viewport.item_height
    }

    #[must_use]
    pub fn layout_dirty(&self) -> LayoutDirty {
        self.dirty
    }

    /// Width each row is painted with.
    #[must_use]
    pub fn content_width(&self) -> u16 {
        self.scrollbar
            .placement()
            .map_or(self.size.width, |p| p.content_width)
    }

    /// Horizontal offset of the rows; non-zero only for left scrollbars.
    #[must_use]
    pub fn x_offset(&self) -> u16 {
        if self.config.scrollbar_mode.is_left() {
            self.config.scrollbar_reserve()
        } else {
            0
        }
    }

    /// The widget was resized: recompute the page and re-validate the
    /// selection.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.dirty.insert(LayoutDirty::GEOMETRY | LayoutDirty::THUMB);

        let item_height = self.viewport.item_height;
        if let Some(content) = self.content.as_mut() {
            content.set_size(Size::new(size.width, item_height));
        }
        let ipp = usize::from(size.height / item_height);
        self.viewport.items_per_page = ipp;
        if ipp == 0 && size.height > 0 {
            warn!(
                height = size.height,
                item_height, "listbox shorter than one row, navigation disabled"
            );
        }
        debug!(
            width = size.width,
            height = size.height,
            items_per_page = ipp,
            "listbox resized"
        );

        self.move_selection(Movement::JustCheck);
    }

    /// Change the row height. Zero selects the 20 px fallback.
    pub fn set_item_height(&mut self, height: u16) {
        self.apply_item_height(height);
        self.resize(self.size);
    }

    pub(crate) fn apply_item_height(&mut self, height: u16) {
        let height = if height == 0 {
            FALLBACK_ITEM_HEIGHT
        } else {
            height
        };
        self.viewport.item_height = height;
        self.config.item_height = height;
        self.viewport.items_per_page = usize::from(self.size.height / height);
        self.dirty.insert(LayoutDirty::GEOMETRY | LayoutDirty::THUMB);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::VecContent;
    use listbox_core::config::{ListboxConfig, ScrollbarMode};

    fn nav(n: usize) -> ListNavigator<VecContent<usize>> {
        let config = ListboxConfig::default().with_item_height(10);
        ListNavigator::with_content(config, VecContent::from_values(0..n))
    }

    #[test]
    fn items_per_page_floors() {
        let mut nav = nav(20);
        nav.resize(Size::new(100, 45));
        assert_eq!(nav.items_per_page(), 4);
        assert_eq!(nav.content().map(VecContent::row_size), Some(Size::new(100, 10)));
    }

    #[test]
    fn short_widget_has_no_page() {
        let mut nav = nav(20);
        nav.resize(Size::new(100, 9));
        assert_eq!(nav.items_per_page(), 0);
        nav.move_selection(Movement::MoveDown);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn resize_revalidates_window() {
        let mut nav = nav(20);
        nav.resize(Size::new(100, 40));
        nav.move_selection_to(9);
        assert_eq!(nav.top(), 8);
        nav.resize(Size::new(100, 30));
        assert_eq!(nav.top(), 9);
        assert_eq!(nav.selected(), 9);
    }

    #[test]
    fn zero_item_height_uses_fallback() {
        let mut nav = nav(20);
        nav.resize(Size::new(100, 100));
        nav.set_item_height(0);
        assert_eq!(nav.item_height(), FALLBACK_ITEM_HEIGHT);
        assert_eq!(nav.items_per_page(), 5);
    }

    #[test]
    fn content_item_height_is_adopted() {
        let config = ListboxConfig::default();
        let content = VecContent::from_values(0..3).with_item_height(12);
        let mut nav = ListNavigator::with_content(config, content);
        nav.resize(Size::new(50, 48));
        assert_eq!(nav.item_height(), 12);
        assert_eq!(nav.items_per_page(), 4);
    }

    #[test]
    fn left_scrollbar_offsets_rows() {
        let config = ListboxConfig::default()
            .with_item_height(10)
            .with_scrollbar_mode(ScrollbarMode::LeftAlways);
        let mut nav = ListNavigator::with_content(config, VecContent::from_values(0..3));
        nav.resize(Size::new(100, 40));
        assert_eq!(nav.x_offset(), 15);
        assert_eq!(nav.content_width(), 85);
        assert!(nav.layout_dirty().is_empty());
    }
}

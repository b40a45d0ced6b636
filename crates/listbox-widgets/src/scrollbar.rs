#![forbid(unsafe_code)]

//! Scrollbar sync.
//!
//! The listbox only decides *where* the thumb goes, on a 0..=100 scale, and
//! where the scrollbar sits. Drawing it is up to a [`ScrollbarView`].

use listbox_core::config::{ListboxConfig, ScrollGranularity, ScrollbarMode};
use listbox_core::debug;
use listbox_core::geometry::{Rect, Size};

use crate::content::ListboxContent;
use crate::layout::LayoutDirty;
use crate::navigator::{ListNavigator, ListboxEvent, ViewportState};

/// Full scale of the thumb range.
pub const THUMB_RANGE: u16 = 100;

/// Smallest thumb in page mode.
const MIN_PAGE_THUMB: usize = 3;
/// Smallest thumb in line mode.
const MIN_LINE_THUMB: usize = 4;

/// Visible-range indicator, `0 <= start <= end <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thumb {
    pub start: u16,
    pub end: u16,
}

impl Thumb {
    /// Thumb for page-snapped scrolling.
    ///
    /// The track is divided into whole pages; the thumb covers one page and
    /// never shrinks below 3%.
    #[must_use]
    pub fn by_page(top: usize, items_per_page: usize, entries: usize) -> Self {
        if items_per_page == 0 || entries == 0 {
            return Self::default();
        }
        let range = usize::from(THUMB_RANGE);
        let span = entries.div_ceil(items_per_page) * items_per_page;
        let start = (top * range / span).min(range);
        let visible = (items_per_page * range).div_ceil(span).max(MIN_PAGE_THUMB);
        Self::clamped(start, start + visible)
    }

    /// Thumb for line-granular scrolling.
    ///
    /// The thumb size is the visible share of the content (at least 4%); its
    /// position follows the selected row rather than the window.
    #[must_use]
    pub fn by_line(selected: usize, items_per_page: usize, entries: usize) -> Self {
        if entries == 0 {
            return Self::default();
        }
        let range = usize::from(THUMB_RANGE);
        let thumb = ((items_per_page * range + entries / 2) / entries).min(range);
        let mut start = if entries > 1 {
            (range - thumb) * selected.min(entries - 1) / (entries - 1)
        } else {
            0
        };
        let visible = thumb.max(MIN_LINE_THUMB);
        let mut end = start + visible;
        if end > range {
            end = range;
            start = range - visible;
        }
        Self::clamped(start, end)
    }

    fn clamped(start: usize, end: usize) -> Self {
        let range = usize::from(THUMB_RANGE);
        let end = end.min(range);
        let start = start.min(end);
        Self {
            start: u16::try_from(start).unwrap_or(THUMB_RANGE),
            end: u16::try_from(end).unwrap_or(THUMB_RANGE),
        }
    }

    /// Thumb length on the 0..=100 scale.
    #[must_use]
    pub const fn len(&self) -> u16 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for Thumb {
    fn default() -> Self {
        Self {
            start: 0,
            end: THUMB_RANGE,
        }
    }
}

/// Where the scrollbar goes and how much width is left for the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollbarPlacement {
    /// Scrollbar bounds inside the widget.
    pub rect: Rect,
    pub visible: bool,
    /// Width handed to the content for each row.
    pub content_width: u16,
}

impl ScrollbarPlacement {
    /// Lay out the scrollbar for a widget of `size` showing `entries` rows,
    /// `items_per_page` at a time.
    ///
    /// Left modes always reserve their strip, visible or not. Right modes only
    /// take space while the scrollbar is shown.
    #[must_use]
    pub fn compute(config: &ListboxConfig, size: Size, entries: usize, items_per_page: usize) -> Self {
        let mode = config.scrollbar_mode;
        let overflow = entries > items_per_page;
        let bar_width = config.scrollbar_width.min(size.width);
        let reduced = size.width.saturating_sub(config.scrollbar_reserve());

        match mode {
            ScrollbarMode::Never => Self {
                rect: Rect::default(),
                visible: false,
                content_width: size.width,
            },
            ScrollbarMode::LeftOnDemand | ScrollbarMode::LeftAlways => Self {
                rect: Rect::new(0, 0, bar_width, size.height),
                visible: overflow || mode.is_always(),
                content_width: reduced,
            },
            ScrollbarMode::OnDemand | ScrollbarMode::Always if overflow || mode.is_always() => Self {
                rect: Rect::new(size.width - bar_width, 0, bar_width, size.height),
                visible: true,
                content_width: reduced,
            },
            ScrollbarMode::OnDemand | ScrollbarMode::Always => Self {
                rect: Rect::new(size.width - bar_width, 0, bar_width, size.height),
                visible: false,
                content_width: size.width,
            },
        }
    }
}

/// Cache of the last thumb pushed to the scrollbar view.
///
/// By page the cache key is the visible page index, by line it is the
/// selected index; nothing is recomputed while the key is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollbarSync {
    key: Option<usize>,
    last: Option<Thumb>,
    placement: Option<ScrollbarPlacement>,
}

impl ScrollbarSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget what was pushed; the next sync always yields a thumb.
    pub fn reset(&mut self) {
        self.key = None;
        self.last = None;
    }

    /// Compute the thumb for `viewport`, returning it only if it must be pushed.
    pub fn sync(
        &mut self,
        viewport: &ViewportState,
        granularity: ScrollGranularity,
        entries: usize,
    ) -> Option<Thumb> {
        let ipp = viewport.items_per_page;
        if ipp == 0 || entries == 0 {
            return None;
        }
        let key = match granularity {
            ScrollGranularity::ByPage => viewport.top / ipp,
            ScrollGranularity::ByLine => viewport.selected,
        };
        if self.key == Some(key) {
            return None;
        }
        self.key = Some(key);

        let thumb = match granularity {
            ScrollGranularity::ByPage => Thumb::by_page(viewport.top, ipp, entries),
            ScrollGranularity::ByLine => Thumb::by_line(viewport.selected, ipp, entries),
        };
        if self.last == Some(thumb) {
            return None;
        }
        self.last = Some(thumb);
        Some(thumb)
    }

    /// Thumb most recently pushed.
    #[must_use]
    pub fn last_thumb(&self) -> Option<Thumb> {
        self.last
    }

    /// Placement most recently computed.
    #[must_use]
    pub fn placement(&self) -> Option<ScrollbarPlacement> {
        self.placement
    }

    pub(crate) fn set_placement(&mut self, placement: Option<ScrollbarPlacement>) {
        self.placement = placement;
    }
}

/// Consumer of scrollbar updates, typically a slider widget.
pub trait ScrollbarView {
    /// New thumb range, `0 <= start <= end <= 100`.
    fn set_start_end(&mut self, start: u16, end: u16);
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    /// Move and resize.
    fn place(&mut self, rect: Rect);
    fn rect(&self) -> Rect;
    fn set_border_width(&mut self, width: u16);
}

/// Plain scrollbar state, usable directly as a [`ScrollbarView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliderState {
    pub thumb: Thumb,
    pub visible: bool,
    pub rect: Rect,
    pub border_width: u16,
    /// Number of thumb updates received.
    pub updates: usize,
}

impl ScrollbarView for SliderState {
    fn set_start_end(&mut self, start: u16, end: u16) {
        self.thumb = Thumb { start, end };
        self.updates += 1;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn place(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_border_width(&mut self, width: u16) {
        self.border_width = width;
    }
}

impl<C: ListboxContent> ListNavigator<C> {
    /// Scrollbar placement, if a scrollbar exists and has been laid out.
    #[must_use]
    pub fn scrollbar_placement(&self) -> Option<ScrollbarPlacement> {
        self.scrollbar.placement()
    }

    #[must_use]
    pub fn scrollbar_sync(&self) -> &ScrollbarSync {
        &self.scrollbar
    }

    /// Change the scrollbar mode. Switching to `Never` gives the full width
    /// back to the rows; any other mode is laid out right away.
    pub fn set_scrollbar_mode(&mut self, mode: ScrollbarMode) {
        if self.config.scrollbar_mode == mode {
            return;
        }
        self.config.scrollbar_mode = mode;
        self.dirty.insert(LayoutDirty::GEOMETRY | LayoutDirty::THUMB);
        if mode == ScrollbarMode::Never {
            self.scrollbar.set_placement(None);
            let row = Size::new(self.size.width, self.viewport.item_height);
            if let Some(content) = self.content.as_mut() {
                content.set_size(row);
            }
            return;
        }
        self.update_scrollbar();
    }

    /// Change the scroll granularity. With a scrollbar present the thumb is
    /// recomputed immediately.
    pub fn set_scrollbar_granularity(&mut self, granularity: ScrollGranularity) {
        let changed = self.config.granularity != granularity;
        self.config.granularity = granularity;
        if changed && self.config.scrollbar_mode != ScrollbarMode::Never {
            self.scrollbar.reset();
            self.update_scrollbar();
        }
    }

    /// Bring the scrollbar up to date: placement when geometry is dirty,
    /// thumb when its cache key moved.
    pub(crate) fn update_scrollbar(&mut self) {
        if self.config.scrollbar_mode == ScrollbarMode::Never {
            return;
        }
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let entries = content.size();
        let ipp = self.viewport.items_per_page;

        if self.dirty.contains(LayoutDirty::THUMB) {
            self.dirty.remove(LayoutDirty::THUMB);
            self.scrollbar.reset();
        }
        if self.dirty.contains(LayoutDirty::GEOMETRY) {
            self.dirty.remove(LayoutDirty::GEOMETRY);
            let placement = ScrollbarPlacement::compute(&self.config, self.size, entries, ipp);
            content.set_size(Size::new(placement.content_width, self.viewport.item_height));
            debug!(
                visible = placement.visible,
                x = placement.rect.x,
                content_width = placement.content_width,
                "scrollbar placed"
            );
            self.scrollbar.set_placement(Some(placement));
            self.events.push(ListboxEvent::ScrollbarPlaced(placement));
        }
        if let Some(thumb) = self
            .scrollbar
            .sync(&self.viewport, self.config.granularity, entries)
        {
            debug!(start = thumb.start, end = thumb.end, "scrollbar thumb");
            self.events.push(ListboxEvent::ScrollbarThumb(thumb));
        }
    }
}

#![forbid(unsafe_code)]

//! Navigation engine.
//!
//! [`ListNavigator`] owns the viewport window (`top`, `selected`,
//! items-per-page) over an externally owned [`ListboxContent`] and executes
//! movement commands against it. It never renders: every visible consequence
//! of a command is queued as a [`ListboxEvent`] and drained by the embedding
//! view (see [`crate::view::ListboxView`]).
//!
//! # Invariants
//!
//! With non-empty content and a non-zero page:
//! - `selected < size`
//! - by page: `top % items_per_page == 0` and
//!   `top <= selected < top + items_per_page`
//! - by line: `top <= selected < top + items_per_page`
//!
//! Every cursor scan terminates by comparing the landed position with the
//! previous landing or the original selection, so content without a single
//! selectable row leaves the selection where it was.

use listbox_core::config::{ListboxConfig, ScrollGranularity, ScrollbarMode};
use listbox_core::geometry::{Rect, Region, Size};
use listbox_core::movement::Movement;
use listbox_core::trace;

use crate::content::ListboxContent;
use crate::layout::LayoutDirty;
use crate::scrollbar::{ScrollbarPlacement, ScrollbarSync, Thumb};

/// The visible window over the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    /// Index of the first visible row.
    pub top: usize,
    /// Index of the selected row.
    pub selected: usize,
    /// Number of whole rows that fit the widget height.
    pub items_per_page: usize,
    /// Row height in pixels, never zero.
    pub item_height: u16,
}

impl ViewportState {
    #[must_use]
    pub const fn new(item_height: u16) -> Self {
        Self {
            top: 0,
            selected: 0,
            items_per_page: 0,
            item_height,
        }
    }

    /// Whether `index` lies in the visible window.
    #[must_use]
    pub const fn is_visible(&self, index: usize) -> bool {
        self.top <= index && index < self.top + self.items_per_page
    }
}

/// Scrolling behaviour, a view on the relevant part of [`ListboxConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub mode: ScrollbarMode,
    pub granularity: ScrollGranularity,
    pub wrap_around: bool,
}

impl From<&ListboxConfig> for ScrollPolicy {
    fn from(config: &ListboxConfig) -> Self {
        Self {
            mode: config.scrollbar_mode,
            granularity: config.granularity,
            wrap_around: config.wrap_around,
        }
    }
}

/// Part of the widget that must be repainted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Damage {
    /// The whole widget.
    Full,
    /// Only these row rectangles.
    Region(Region),
}

/// Side effects produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListboxEvent {
    /// The selected index changed, or the data under it did.
    SelectionChanged,
    Invalidate(Damage),
    /// The scrollbar moved, resized, appeared or disappeared.
    ScrollbarPlaced(ScrollbarPlacement),
    /// New thumb range for the scrollbar.
    ScrollbarThumb(Thumb),
}

/// Selection cursor and viewport engine for a virtualized list.
#[derive(Debug)]
pub struct ListNavigator<C> {
    pub(crate) content: Option<C>,
    pub(crate) config: ListboxConfig,
    pub(crate) viewport: ViewportState,
    pub(crate) size: Size,
    pub(crate) scrollbar: ScrollbarSync,
    pub(crate) dirty: LayoutDirty,
    pub(crate) selection_enabled: bool,
    pub(crate) last_movement: Movement,
    pub(crate) events: Vec<ListboxEvent>,
}

impl<C: ListboxContent> ListNavigator<C> {
    /// Create an engine without content and with a zero-sized viewport.
    #[must_use]
    pub fn new(config: ListboxConfig) -> Self {
        Self {
            content: None,
            viewport: ViewportState::new(config.item_height.max(1)),
            config,
            size: Size::ZERO,
            scrollbar: ScrollbarSync::new(),
            dirty: LayoutDirty::empty(),
            selection_enabled: true,
            last_movement: Movement::JustCheck,
            events: Vec::new(),
        }
    }

    /// Create an engine and attach `content` right away.
    #[must_use]
    pub fn with_content(config: ListboxConfig, content: C) -> Self {
        let mut navigator = Self::new(config);
        navigator.set_content(Some(content));
        navigator
    }

    #[must_use]
    pub fn config(&self) -> &ListboxConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> ScrollPolicy {
        ScrollPolicy::from(&self.config)
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    #[must_use]
    pub fn top(&self) -> usize {
        self.viewport.top
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.viewport.selected
    }

    #[must_use]
    pub fn items_per_page(&self) -> usize {
        self.viewport.items_per_page
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// Mutable access to the content. After mutating it, call the matching
    /// hook (`entry_added`, `entry_removed`, `entry_changed`, `entry_reset`).
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    /// Attach or detach content. The selection goes home.
    pub fn set_content(&mut self, content: Option<C>) {
        self.content = content;
        if let Some(height) = self.content.as_ref().and_then(ListboxContent::item_height) {
            self.apply_item_height(height);
        }
        self.entry_reset(true);
    }

    /// Detach and return the content.
    pub fn take_content(&mut self) -> Option<C> {
        let content = self.content.take();
        self.entry_reset(true);
        content
    }

    /// Movement most recently executed, reset to `JustCheck` once the selected
    /// row has been highlighted.
    #[must_use]
    pub fn last_movement(&self) -> Movement {
        self.last_movement
    }

    #[must_use]
    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    /// Take all pending side effects.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, ListboxEvent> {
        self.events.drain(..)
    }

    #[must_use]
    pub fn pending_events(&self) -> &[ListboxEvent] {
        &self.events
    }

    /// Cursor position if it is on a row, else 0.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match &self.content {
            Some(content) if content.cursor_valid() => content.cursor_get(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn at_begin(&self) -> bool {
        self.content.is_some() && self.viewport.selected == 0
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|c| c.size() == self.viewport.selected + 1)
    }

    /// Vertical pixel offset of the selected row inside the widget.
    #[must_use]
    pub fn entry_top(&self) -> usize {
        self.viewport.selected.saturating_sub(self.viewport.top)
            * usize::from(self.viewport.item_height)
    }

    pub fn set_wrap_around(&mut self, wrap: bool) {
        self.config.wrap_around = wrap;
    }

    /// Enable or disable selection highlighting. The selected row is redrawn
    /// when this changes.
    pub fn set_selection_enabled(&mut self, enabled: bool) {
        if self.selection_enabled == enabled {
            return;
        }
        self.selection_enabled = enabled;
        self.entry_changed(self.viewport.selected);
    }

    /// Place the cursor on `index` and re-validate.
    pub fn move_selection_to(&mut self, index: usize) {
        let Some(content) = self.content.as_mut() else {
            return;
        };
        content.cursor_set(index);
        self.move_selection(Movement::JustCheck);
    }

    /// Select the last row, scrolling it into view with as many rows as
    /// possible above it.
    pub fn move_to_end(&mut self) {
        let ipp = self.viewport.items_per_page;
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let size = content.size();
        if ipp == 0 || size == 0 {
            return;
        }
        let old_top = self.viewport.top;
        let old_selected = self.viewport.selected;

        content.cursor_end();
        let last = content.cursor_move(-1);
        if old_top + ipp <= last {
            let rest = size % ipp;
            self.viewport.top = if rest > 0 {
                (last + 1).saturating_sub(rest)
            } else {
                (last + 1).saturating_sub(ipp)
            };
        }
        self.viewport.selected = last;
        self.last_movement = Movement::MoveEnd;
        self.finish_move(old_top, old_selected, false);
    }

    /// Execute a movement command.
    ///
    /// Ignored without content. Empty content forces the window home; with a
    /// zero page the selection is only clamped onto the last row.
    pub fn move_selection(&mut self, movement: Movement) {
        let movement = movement.vertical();
        let ipp = self.viewport.items_per_page;
        let wrap = self.config.wrap_around;
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let size = content.size();
        if size == 0 {
            self.viewport.top = 0;
            self.viewport.selected = 0;
            return;
        }
        if ipp == 0 {
            // No layout yet: only keep the selection on a row.
            if self.viewport.selected >= size {
                self.viewport.selected = content.cursor_set(size - 1);
            }
            self.viewport.top = self.viewport.top.min(self.viewport.selected);
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "listbox_move",
            movement = movement.as_str(),
            selected = self.viewport.selected,
            top = self.viewport.top,
            size
        )
        .entered();

        self.last_movement = movement;
        let old_top = self.viewport.top;
        let old_selected = self.viewport.selected;

        match movement {
            Movement::MoveEnd => {
                content.cursor_end();
                scan_up(content, old_selected, wrap);
            }
            Movement::MoveUp | Movement::MoveLeft => scan_up(content, old_selected, wrap),
            Movement::Refresh => {}
            Movement::MoveTop => {
                content.cursor_home();
                if !landed(content) {
                    scan_down(content, old_selected, wrap);
                }
            }
            Movement::JustCheck => {
                if !landed(content) {
                    scan_down(content, old_selected, wrap);
                }
            }
            Movement::MoveDown | Movement::MoveRight => scan_down(content, old_selected, wrap),
            Movement::PageUp => page_up(content, old_selected, ipp),
            Movement::PageDown => page_down(content, old_selected, ipp),
        }

        let mut selected = content.cursor_get();
        if selected >= size {
            selected = content.cursor_set(size - 1);
        }

        let mut top = selected - selected % ipp;
        if self.config.granularity == ScrollGranularity::ByLine {
            let saved_top = || content.cursor_restore_top();
            top = line_top(LineStep {
                movement,
                selected,
                old_selected,
                old_top,
                page_top: top,
                size,
                ipp,
                wrap,
                saved_top,
            });
        }

        self.viewport.selected = selected;
        self.viewport.top = top;
        self.finish_move(old_top, old_selected, movement == Movement::Refresh);
    }

    /// Side effects of a move: clip reset, selection signal, scrollbar and
    /// damage, in that order.
    pub(crate) fn finish_move(&mut self, old_top: usize, old_selected: usize, forced: bool) {
        let ViewportState { top, selected, .. } = self.viewport;

        if top != old_top {
            if let Some(content) = self.content.as_mut() {
                content.reset_clip();
            }
        }
        if forced || selected != old_selected {
            self.events.push(ListboxEvent::SelectionChanged);
        }

        self.update_scrollbar();

        if top != old_top {
            self.invalidate(Damage::Full);
        } else if selected != old_selected {
            let region: Region = [self.row_rect(selected), self.row_rect(old_selected)]
                .into_iter()
                .flatten()
                .collect();
            self.invalidate(Damage::Region(region));
        } else if forced {
            if let Some(rect) = self.row_rect(selected) {
                self.invalidate(Damage::Region(Region::from(rect)));
            }
        }
    }

    /// Rectangle of row `index` inside the widget, if it is at or below `top`.
    #[must_use]
    pub fn row_rect(&self, index: usize) -> Option<Rect> {
        let offset = index.checked_sub(self.viewport.top)?;
        let height = self.viewport.item_height;
        Some(Rect::new(0, row_y(offset, height), self.size.width, height))
    }

    /// Queue damage, telling the content which area will be repainted.
    pub(crate) fn invalidate(&mut self, damage: Damage) {
        if let Some(content) = self.content.as_mut() {
            let region = match &damage {
                Damage::Full => Region::from(Rect::from_size(self.size)),
                Damage::Region(region) => region.clone(),
            };
            content.update_clip(&region);
        }
        self.events.push(ListboxEvent::Invalidate(damage));
    }
}

/// Pixel offset of the `offset`-th visible row, saturating at the widget edge.
pub(crate) fn row_y(offset: usize, item_height: u16) -> u16 {
    let y = offset.saturating_mul(usize::from(item_height));
    u16::try_from(y).unwrap_or(u16::MAX)
}

/// The cursor sits on a row that may take the selection.
fn landed<C: ListboxContent + ?Sized>(content: &C) -> bool {
    content.cursor_valid() && content.current_cursor_selectable()
}

/// Stop rule shared by the single-step scans: a selectable landing, or a
/// return to `guard`. An out-of-range origin cannot be returned to, so the
/// first landing becomes the guard instead.
fn scan_done<C: ListboxContent + ?Sized>(content: &C, at: usize, guard: &mut Option<usize>) -> bool {
    if landed(content) {
        return true;
    }
    trace!(index = at, "skipping unselectable row");
    match *guard {
        Some(stop) => at == stop,
        None => {
            *guard = Some(at);
            false
        }
    }
}

fn origin_guard<C: ListboxContent + ?Sized>(content: &C, origin: usize) -> Option<usize> {
    (origin < content.size()).then_some(origin)
}

/// Step the cursor up to the previous selectable row.
fn scan_up<C: ListboxContent + ?Sized>(content: &mut C, origin: usize, wrap: bool) {
    let mut guard = origin_guard(content, origin);
    let mut prev = origin;
    loop {
        let mut at = content.cursor_move(-1);
        if at == prev {
            if !wrap {
                content.cursor_set(origin);
                return;
            }
            content.cursor_end();
            at = content.cursor_move(-1);
        }
        prev = at;
        if scan_done(content, at, &mut guard) {
            return;
        }
    }
}

/// Step the cursor down to the next selectable row.
fn scan_down<C: ListboxContent + ?Sized>(content: &mut C, origin: usize, wrap: bool) {
    let mut guard = origin_guard(content, origin);
    loop {
        content.cursor_move(1);
        if !content.cursor_valid() {
            if wrap {
                content.cursor_home();
            } else {
                content.cursor_set(origin);
            }
        }
        let at = content.cursor_get();
        if scan_done(content, at, &mut guard) {
            return;
        }
    }
}

/// Jump one page back, landing on a selectable row of the target page.
fn page_up<C: ListboxContent + ?Sized>(content: &mut C, origin: usize, ipp: usize) {
    let step = isize::try_from(ipp).unwrap_or(isize::MAX);
    loop {
        let mut at = content.cursor_move(-step);
        let page_ind = at % ipp;
        let page_top = at - page_ind;

        // Lower part of the page first, then the upper part.
        while at != page_top + ipp && content.cursor_valid() && !content.current_cursor_selectable() {
            at = content.cursor_move(1);
        }
        // Reaching the next page's top row does not count as a hit.
        if at == page_top + ipp || !landed(content) {
            at = content.cursor_set(page_top + page_ind);
            while at != page_top && !content.current_cursor_selectable() {
                at = content.cursor_move(-1);
            }
            if landed(content) {
                return;
            }
        } else {
            return;
        }
        if at == 0 {
            // Nothing above: walk back down towards the old selection.
            while at != origin && content.cursor_valid() && !content.current_cursor_selectable() {
                at = content.cursor_move(1);
            }
            return;
        }
        content.cursor_set(page_top + page_ind);
    }
}

/// Jump one page forward, landing on a selectable row of the target page.
fn page_down<C: ListboxContent + ?Sized>(content: &mut C, origin: usize, ipp: usize) {
    let step = isize::try_from(ipp).unwrap_or(isize::MAX);
    loop {
        content.cursor_move(step);
        if !content.cursor_valid() {
            content.cursor_move(-1);
        }
        let mut at = content.cursor_get();
        let page_ind = at % ipp;
        let page_top = at - page_ind;

        // Upper part of the page first, then the lower part.
        while at != page_top && !content.current_cursor_selectable() {
            at = content.cursor_move(-1);
        }
        if !landed(content) {
            content.cursor_set(page_top + page_ind);
            loop {
                at = content.cursor_move(1);
                if at == page_top + ipp || !content.cursor_valid() || content.current_cursor_selectable()
                {
                    break;
                }
            }
        }
        if !content.cursor_valid() {
            // Ran off the end: back up towards the old selection.
            let mut prev = at;
            loop {
                at = content.cursor_move(-1);
                if at == origin || at == prev || content.current_cursor_selectable() {
                    return;
                }
                prev = at;
            }
        }
        if at != page_top + ipp {
            return;
        }
        content.cursor_set(page_top + page_ind);
    }
}

/// Inputs of the line-granular window computation.
struct LineStep<F> {
    movement: Movement,
    selected: usize,
    old_selected: usize,
    old_top: usize,
    /// Page-aligned top, the starting point.
    page_top: usize,
    size: usize,
    ipp: usize,
    wrap: bool,
    /// Reads the top stored by the last repaint.
    saved_top: F,
}

/// Window top for line-granular scrolling.
///
/// The step rules are order-sensitive; the up/down adjustments run only when
/// both the selection and the provisional top moved.
fn line_top<F: FnOnce() -> usize>(step: LineStep<F>) -> usize {
    let LineStep {
        movement,
        selected,
        old_selected,
        old_top,
        page_top,
        size,
        ipp,
        wrap,
        saved_top,
    } = step;
    let to_i = |v: usize| isize::try_from(v).unwrap_or(isize::MAX);
    let (sel, size_i, ipp_i) = (to_i(selected), to_i(size), to_i(ipp));
    let mut old_top = to_i(old_top);
    let mut top = to_i(page_top);

    match movement {
        Movement::MoveEnd => top = size_i - 1,
        Movement::JustCheck => {
            if old_top == 0 && sel > ipp_i {
                old_top = to_i(saved_top());
            }
            top = if old_top < size_i { old_top } else { size_i - 1 };
            if sel == 0 {
                top = 0;
            }
        }
        _ => {}
    }

    let moved = selected != old_selected || movement == Movement::Refresh;
    if moved && old_top != top {
        let max = size_i - ipp_i;
        if movement == Movement::MoveDown && top < size_i {
            top = if top == 0 && sel == 0 { 0 } else { old_top + 1 };
            if size_i > ipp_i {
                if sel < ipp_i {
                    top = 0;
                } else {
                    top = sel - ipp_i + 1;
                    if sel > ipp_i && top < old_top && top < max {
                        // Do not jump back after a preceding upward scroll.
                        top = (old_top + 1).min(max);
                    }
                }
            }
        }
        if movement == Movement::MoveUp {
            if sel + 1 < size_i {
                top = (old_top - 1).max(0);
            }
            if size_i > ipp_i && ((wrap && old_top == 0) || sel >= max) {
                top = max;
            }
            top = top.min(sel);
        }
    }

    // Keep the selection inside the window.
    let mut top = usize::try_from(top.clamp(0, size_i - 1)).unwrap_or(0);
    if selected < top {
        top = selected;
    } else if selected >= top + ipp {
        top = selected + 1 - ipp;
    }
    top
}

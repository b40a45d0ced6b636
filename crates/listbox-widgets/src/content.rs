#![forbid(unsafe_code)]

//! Content adapter contract.
//!
//! A listbox never owns the data it shows. It talks to an ordered collection
//! through [`ListboxContent`]: a single movable cursor, a selectability
//! predicate and a nestable save/restore stack for that cursor.
//!
//! Cursor positions range over `0..=size()`. `size()` itself is the "one past
//! end" sentinel and is a valid cursor position, but not a valid row.
//! Cursors track data: inserting before the cursor advances it, removing
//! before it moves it back, removing the row under it leaves it on the
//! following row (or on the sentinel if the last row was removed).
//!
//! [`VecContent`] is the in-memory implementation used by tests, demos and
//! simple embedders.

use std::fmt;

use listbox_core::config::ListboxStyle;
use listbox_core::geometry::{Point, Region, Size};

/// Ordered collection with one movable cursor, as seen by the navigator.
pub trait ListboxContent {
    /// Number of rows.
    fn size(&self) -> usize;

    /// Move the cursor to the first row.
    fn cursor_home(&mut self);

    /// Move the cursor to the end sentinel (`size()`).
    fn cursor_end(&mut self);

    /// Move the cursor by `delta`, clamping to `0..=size()`.
    /// Returns the new position.
    fn cursor_move(&mut self, delta: isize) -> usize;

    /// Place the cursor at `index`, clamping to `0..=size()`.
    /// Returns the new position.
    fn cursor_set(&mut self, index: usize) -> usize;

    fn cursor_get(&self) -> usize;

    /// Whether the cursor is on a row (not on the end sentinel).
    fn cursor_valid(&self) -> bool {
        self.cursor_get() < self.size()
    }

    /// Whether the row under the cursor may receive the selection.
    fn current_cursor_selectable(&self) -> bool {
        true
    }

    /// Push the cursor position on the save stack.
    fn cursor_save(&mut self);

    /// Pop the save stack into the cursor. A restore without a matching save
    /// leaves the cursor where it is.
    fn cursor_restore(&mut self);

    /// Store a window top in the single auxiliary slot.
    fn cursor_save_top(&mut self, top: usize);

    /// Read back the auxiliary top slot (0 if never saved).
    fn cursor_restore_top(&mut self) -> usize;

    /// Row extent the content should lay out for.
    fn set_size(&mut self, _size: Size) {}

    /// Preferred row height, if the content has one.
    fn item_height(&self) -> Option<u16> {
        None
    }

    /// The window scrolled: any cached clip for the old rows is stale.
    fn reset_clip(&mut self) {}

    /// The given area of the widget is about to be repainted.
    fn update_clip(&mut self, _region: &Region) {}
}

/// Content that can paint its current row onto a surface `S`.
///
/// During a repaint the cursor is pre-positioned on the row to paint and
/// advanced by one after each call. The cursor may sit on the end sentinel or
/// past the data for trailing rows; implementations paint an empty row then.
pub trait PaintContent<S: ?Sized>: ListboxContent {
    fn paint(&mut self, surface: &mut S, style: &ListboxStyle, offset: Point, selected: bool);
}

/// Cursor bookkeeping shared by content implementations: the cursor itself,
/// the save stack and the auxiliary top slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorStack {
    cursor: usize,
    saved: Vec<usize>,
    saved_top: usize,
}

impl CursorStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.cursor
    }

    /// Set the cursor, clamped to `0..=len`.
    pub fn set(&mut self, index: usize, len: usize) -> usize {
        self.cursor = index.min(len);
        self.cursor
    }

    /// Move the cursor by `delta`, clamped to `0..=len`.
    pub fn shift(&mut self, delta: isize, len: usize) -> usize {
        let target = self.cursor.saturating_add_signed(delta);
        self.set(target, len)
    }

    pub fn save(&mut self) {
        self.saved.push(self.cursor);
    }

    pub fn restore(&mut self, len: usize) {
        if let Some(position) = self.saved.pop() {
            self.cursor = position.min(len);
        }
    }

    /// Depth of the save stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save_top(&mut self, top: usize) {
        self.saved_top = top;
    }

    #[must_use]
    pub fn restore_top(&self) -> usize {
        self.saved_top
    }

    /// A row was inserted before `index`.
    pub fn on_insert(&mut self, index: usize) {
        let bump = |pos: &mut usize| {
            if index <= *pos {
                *pos += 1;
            }
        };
        bump(&mut self.cursor);
        self.saved.iter_mut().for_each(bump);
    }

    /// The row at `index` was removed.
    pub fn on_remove(&mut self, index: usize) {
        let pull = |pos: &mut usize| {
            if index < *pos {
                *pos -= 1;
            }
        };
        pull(&mut self.cursor);
        self.saved.iter_mut().for_each(pull);
    }

    /// The whole collection was replaced.
    pub fn on_reset(&mut self, len: usize) {
        self.cursor = self.cursor.min(len);
        self.saved.clear();
    }
}

/// A row of a [`VecContent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub value: T,
    pub selectable: bool,
}

impl<T> Entry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            selectable: true,
        }
    }

    /// A row that can be shown but never selected (headers, separators).
    pub fn unselectable(value: T) -> Self {
        Self {
            value,
            selectable: false,
        }
    }
}

impl<T> From<T> for Entry<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// In-memory content backed by a `Vec`.
///
/// Mutators keep the cursor on the same data but do not notify anyone: the
/// owner must call the matching navigator hook (`entry_added`,
/// `entry_removed`, `entry_changed`, `entry_reset`) right after each one.
#[derive(Debug, Clone, Default)]
pub struct VecContent<T> {
    entries: Vec<Entry<T>>,
    cursor: CursorStack,
    row_size: Size,
    item_height: Option<u16>,
    clip_resets: usize,
}

impl<T> VecContent<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: CursorStack::new(),
            row_size: Size::ZERO,
            item_height: None,
            clip_resets: 0,
        }
    }

    /// Build from values; every row is selectable.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        values.into_iter().map(Entry::new).collect()
    }

    /// Advertise a preferred row height.
    #[must_use]
    pub fn with_item_height(mut self, height: u16) -> Self {
        self.item_height = Some(height);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|e| &mut e.value)
    }

    #[must_use]
    pub fn is_selectable(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.selectable)
    }

    /// Change the selectable flag of a row. Returns `false` if out of range.
    pub fn set_selectable(&mut self, index: usize, selectable: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.selectable = selectable;
                true
            }
            None => false,
        }
    }

    /// Value under the cursor, if the cursor is on a row.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.get(self.cursor.get())
    }

    /// Append a row. Returns its index (pass it to `entry_added`).
    pub fn push(&mut self, entry: impl Into<Entry<T>>) -> usize {
        let index = self.entries.len();
        self.insert(index, entry);
        index
    }

    /// Insert a row before `index` (clamped to the end). Returns the index the
    /// row landed at.
    pub fn insert(&mut self, index: usize, entry: impl Into<Entry<T>>) -> usize {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry.into());
        self.cursor.on_insert(index);
        index
    }

    /// Remove the row at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.cursor.on_remove(index);
        Some(entry.value)
    }

    /// Replace every row (pass to `entry_reset`).
    pub fn replace(&mut self, values: impl IntoIterator<Item = impl Into<Entry<T>>>) {
        self.entries = values.into_iter().map(Into::into).collect();
        self.cursor.on_reset(self.entries.len());
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|e| &e.value)
    }

    /// Row extent last handed over by the listbox.
    #[must_use]
    pub fn row_size(&self) -> Size {
        self.row_size
    }

    /// How many times the listbox dropped the clip cache.
    #[must_use]
    pub fn clip_resets(&self) -> usize {
        self.clip_resets
    }

    /// Depth of the cursor save stack; zero outside a repaint.
    #[must_use]
    pub fn saved_depth(&self) -> usize {
        self.cursor.depth()
    }
}

impl<T, E: Into<Entry<T>>> FromIterator<E> for VecContent<T> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut content = Self::new();
        content.entries = iter.into_iter().map(Into::into).collect();
        content
    }
}

impl<T> ListboxContent for VecContent<T> {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn cursor_home(&mut self) {
        self.cursor.set(0, self.entries.len());
    }

    fn cursor_end(&mut self) {
        let len = self.entries.len();
        self.cursor.set(len, len);
    }

    fn cursor_move(&mut self, delta: isize) -> usize {
        self.cursor.shift(delta, self.entries.len())
    }

    fn cursor_set(&mut self, index: usize) -> usize {
        self.cursor.set(index, self.entries.len())
    }

    fn cursor_get(&self) -> usize {
        self.cursor.get()
    }

    fn current_cursor_selectable(&self) -> bool {
        self.is_selectable(self.cursor.get())
    }

    fn cursor_save(&mut self) {
        self.cursor.save();
    }

    fn cursor_restore(&mut self) {
        self.cursor.restore(self.entries.len());
    }

    fn cursor_save_top(&mut self, top: usize) {
        self.cursor.save_top(top);
    }

    fn cursor_restore_top(&mut self) -> usize {
        self.cursor.restore_top()
    }

    fn set_size(&mut self, size: Size) {
        self.row_size = size;
    }

    fn item_height(&self) -> Option<u16> {
        self.item_height
    }

    fn reset_clip(&mut self) {
        self.clip_resets += 1;
    }
}

/// Surface able to draw one text row. Implemented by whatever the embedder
/// renders into; [`VecContent`] paints through it.
pub trait RowSurface {
    fn draw_row(
        &mut self,
        origin: Point,
        size: Size,
        text: Option<&str>,
        style: &ListboxStyle,
        selected: bool,
    );
}

impl<T: fmt::Display, S: RowSurface + ?Sized> PaintContent<S> for VecContent<T> {
    fn paint(&mut self, surface: &mut S, style: &ListboxStyle, offset: Point, selected: bool) {
        let text = self.current().map(ToString::to_string);
        surface.draw_row(offset, self.row_size, text.as_deref(), style, selected);
    }
}

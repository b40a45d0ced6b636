//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use listbox_core::config::{ListboxConfig, ListboxStyle};
use listbox_core::geometry::{Point, Rect, Region, Size};
use listbox_widgets::{
    CursorStack, Damage, ListNavigator, ListboxContent, PaintContent, PaintSurface, RowSurface,
    ViewHost,
};

/// Content made of a selectability mask; row `i` carries the value `i`.
#[derive(Debug, Clone, Default)]
pub struct TestContent {
    mask: Vec<bool>,
    cursor: CursorStack,
    pub row_size: Size,
    pub clip_resets: usize,
    pub clips: Vec<Region>,
    pub saved_tops: Vec<usize>,
}

impl TestContent {
    pub fn new(len: usize) -> Self {
        Self::with_mask(&vec![true; len])
    }

    pub fn with_mask(mask: &[bool]) -> Self {
        Self {
            mask: mask.to_vec(),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, index: usize, selectable: bool) {
        self.mask.insert(index, selectable);
        self.cursor.on_insert(index);
    }

    pub fn remove(&mut self, index: usize) {
        self.mask.remove(index);
        self.cursor.on_remove(index);
    }

    pub fn replace(&mut self, mask: &[bool]) {
        self.mask = mask.to_vec();
        self.cursor.on_reset(self.mask.len());
    }

    pub fn saved_depth(&self) -> usize {
        self.cursor.depth()
    }
}

impl ListboxContent for TestContent {
    fn size(&self) -> usize {
        self.mask.len()
    }

    fn cursor_home(&mut self) {
        self.cursor.set(0, self.mask.len());
    }

    fn cursor_end(&mut self) {
        let len = self.mask.len();
        self.cursor.set(len, len);
    }

    fn cursor_move(&mut self, delta: isize) -> usize {
        self.cursor.shift(delta, self.mask.len())
    }

    fn cursor_set(&mut self, index: usize) -> usize {
        self.cursor.set(index, self.mask.len())
    }

    fn cursor_get(&self) -> usize {
        self.cursor.get()
    }

    fn current_cursor_selectable(&self) -> bool {
        self.mask.get(self.cursor.get()).copied().unwrap_or(false)
    }

    fn cursor_save(&mut self) {
        self.cursor.save();
    }

    fn cursor_restore(&mut self) {
        self.cursor.restore(self.mask.len());
    }

    fn cursor_save_top(&mut self, top: usize) {
        self.saved_tops.push(top);
        self.cursor.save_top(top);
    }

    fn cursor_restore_top(&mut self) -> usize {
        self.cursor.restore_top()
    }

    fn set_size(&mut self, size: Size) {
        self.row_size = size;
    }

    fn reset_clip(&mut self) {
        self.clip_resets += 1;
    }

    fn update_clip(&mut self, region: &Region) {
        self.clips.push(region.clone());
    }
}

/// One row paint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintedRow {
    /// Cursor position at the time of the call.
    pub index: usize,
    pub offset: Point,
    pub selected: bool,
    pub text: Option<String>,
}

/// Surface recording every row paint and background clear.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub rows: Vec<PaintedRow>,
    pub clears: Vec<Rect>,
}

impl RecordingSurface {
    pub fn selected_rows(&self) -> Vec<usize> {
        self.rows.iter().filter(|r| r.selected).map(|r| r.index).collect()
    }
}

impl PaintSurface for RecordingSurface {
    fn clear(&mut self, rect: Rect) {
        self.clears.push(rect);
    }
}

impl RowSurface for RecordingSurface {
    fn draw_row(
        &mut self,
        origin: Point,
        _size: Size,
        text: Option<&str>,
        _style: &ListboxStyle,
        selected: bool,
    ) {
        self.rows.push(PaintedRow {
            index: self.rows.len(),
            offset: origin,
            selected,
            text: text.map(str::to_string),
        });
    }
}

impl PaintContent<RecordingSurface> for TestContent {
    fn paint(
        &mut self,
        surface: &mut RecordingSurface,
        _style: &ListboxStyle,
        offset: Point,
        selected: bool,
    ) {
        let index = self.cursor.get();
        surface.rows.push(PaintedRow {
            index,
            offset,
            selected,
            text: (index < self.mask.len()).then(|| index.to_string()),
        });
    }
}

/// Host recording every invalidation.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub damage: Vec<Damage>,
}

impl ViewHost for RecordingHost {
    fn invalidate(&mut self, damage: &Damage) {
        self.damage.push(damage.clone());
    }
}

/// Config with 10 px rows.
pub fn config() -> ListboxConfig {
    ListboxConfig::default().with_item_height(10)
}

/// Navigator over `content`, sized for exactly `ipp` rows, events drained.
pub fn navigator_with(
    config: ListboxConfig,
    content: TestContent,
    ipp: u16,
) -> ListNavigator<TestContent> {
    let mut nav = ListNavigator::with_content(config, content);
    nav.resize(Size::new(100, ipp * config.item_height));
    nav.drain_events().for_each(drop);
    nav
}

pub fn navigator(len: usize, ipp: u16) -> ListNavigator<TestContent> {
    navigator_with(config(), TestContent::new(len), ipp)
}

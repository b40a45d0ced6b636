#![forbid(unsafe_code)]

//! View adapter.
//!
//! [`ListboxView`] wraps a [`ListNavigator`] and turns its queued events into
//! calls on the outside world: damage goes to a [`ViewHost`], thumb and
//! placement go to a [`ScrollbarView`], selection changes go to subscribers.
//! It also owns the repaint pass, the only place where the content cursor is
//! borrowed for sequential row access.

use listbox_core::config::{ListboxConfig, ScrollGranularity, ScrollbarMode};
use listbox_core::geometry::{Point, Rect, Size};
use listbox_core::movement::Movement;

use crate::content::{ListboxContent, PaintContent};
use crate::navigator::{Damage, ListNavigator, ListboxEvent, ViewportState, row_y};
use crate::scrollbar::{ScrollbarView, SliderState};

/// Receiver of repaint requests, usually the widget toolkit.
pub trait ViewHost {
    fn invalidate(&mut self, damage: &Damage);
}

impl ViewHost for () {
    fn invalidate(&mut self, _damage: &Damage) {}
}

/// Surface-level operations the repaint pass needs besides row painting.
pub trait PaintSurface {
    /// Fill `rect` with the listbox background.
    fn clear(&mut self, rect: Rect);
}

/// Handle returned by [`ListboxView::connect_selection_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SelectionCallback = Box<dyn FnMut()>;
type HighlightCallback = Box<dyn FnMut(Movement, Rect)>;

/// A listbox: navigation engine plus its scrollbar, host and observers.
pub struct ListboxView<C, H, B = SliderState> {
    navigator: ListNavigator<C>,
    host: H,
    scrollbar: Option<B>,
    subscribers: Vec<(SubscriptionId, SelectionCallback)>,
    next_subscription: u64,
    highlight: Option<HighlightCallback>,
    visible: bool,
    lowered: bool,
}

impl<C, H, B> ListboxView<C, H, B>
where
    C: ListboxContent,
    H: ViewHost,
    B: ScrollbarView + Default,
{
    #[must_use]
    pub fn new(config: ListboxConfig, host: H) -> Self {
        let mut view = Self {
            navigator: ListNavigator::new(config),
            host,
            scrollbar: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            highlight: None,
            visible: true,
            lowered: false,
        };
        view.sync_scrollbar_presence();
        view
    }

    #[must_use]
    pub fn with_content(config: ListboxConfig, content: C, host: H) -> Self {
        let mut view = Self::new(config, host);
        view.set_content(Some(content));
        view
    }

    #[must_use]
    pub fn navigator(&self) -> &ListNavigator<C> {
        &self.navigator
    }

    /// Run `f` against the engine, then deliver whatever it queued.
    pub fn with_navigator<R>(&mut self, f: impl FnOnce(&mut ListNavigator<C>) -> R) -> R {
        let result = f(&mut self.navigator);
        self.pump();
        result
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The scrollbar, present unless the mode is `Never`.
    #[must_use]
    pub fn scrollbar(&self) -> Option<&B> {
        self.scrollbar.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        self.navigator.viewport()
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.navigator.content()
    }

    /// See [`ListNavigator::content_mut`]: every mutation must be followed by
    /// the matching `entry_*` call.
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.navigator.content_mut()
    }

    pub fn set_content(&mut self, content: Option<C>) {
        self.with_navigator(|nav| nav.set_content(content));
    }

    pub fn take_content(&mut self) -> Option<C> {
        self.with_navigator(ListNavigator::take_content)
    }

    pub fn move_selection(&mut self, movement: Movement) {
        self.with_navigator(|nav| nav.move_selection(movement));
    }

    pub fn move_selection_to(&mut self, index: usize) {
        self.with_navigator(|nav| nav.move_selection_to(index));
    }

    pub fn move_to_end(&mut self) {
        self.with_navigator(ListNavigator::move_to_end);
    }

    pub fn resize(&mut self, size: Size) {
        self.with_navigator(|nav| nav.resize(size));
    }

    pub fn set_item_height(&mut self, height: u16) {
        self.with_navigator(|nav| nav.set_item_height(height));
    }

    pub fn entry_added(&mut self, index: usize) {
        self.with_navigator(|nav| nav.entry_added(index));
    }

    pub fn entry_removed(&mut self, index: usize) {
        self.with_navigator(|nav| nav.entry_removed(index));
    }

    pub fn entry_changed(&mut self, index: usize) {
        self.with_navigator(|nav| nav.entry_changed(index));
    }

    pub fn entry_reset(&mut self, selection_home: bool) {
        self.with_navigator(|nav| nav.entry_reset(selection_home));
    }

    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.with_navigator(|nav| nav.set_selection_enabled(enabled));
    }

    pub fn set_wrap_around(&mut self, wrap: bool) {
        self.navigator.set_wrap_around(wrap);
    }

    pub fn set_scrollbar_granularity(&mut self, granularity: ScrollGranularity) {
        self.with_navigator(|nav| nav.set_scrollbar_granularity(granularity));
    }

    /// Change the scrollbar mode, creating or dropping the scrollbar.
    pub fn set_scrollbar_mode(&mut self, mode: ScrollbarMode) {
        self.navigator.set_scrollbar_mode(mode);
        self.sync_scrollbar_presence();
        self.pump();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// A lowered listbox sits behind another widget and ignores actions.
    pub fn set_lowered(&mut self, lowered: bool) {
        self.lowered = lowered;
    }

    /// Run a bound action. Returns whether it was consumed.
    pub fn handle_action(&mut self, movement: Movement) -> bool {
        if !self.visible || self.lowered {
            return false;
        }
        self.move_selection(movement);
        true
    }

    /// Call `callback` on every selection change.
    pub fn connect_selection_changed(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        let callback: SelectionCallback = Box::new(callback);
        self.subscribers.push((id, callback));
        id
    }

    /// Returns `false` if `id` was not connected.
    pub fn disconnect_selection_changed(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Observer called during repaint with the last movement and the
    /// selected row's rectangle, for highlight animations.
    pub fn set_highlight_observer(&mut self, observer: impl FnMut(Movement, Rect) + 'static) {
        self.highlight = Some(Box::new(observer));
    }

    pub fn clear_highlight_observer(&mut self) {
        self.highlight = None;
    }

    /// Deliver every queued engine event.
    pub fn pump(&mut self) {
        for event in self.navigator.drain_events() {
            match event {
                ListboxEvent::SelectionChanged => {
                    for (_, callback) in &mut self.subscribers {
                        callback();
                    }
                }
                ListboxEvent::Invalidate(damage) => self.host.invalidate(&damage),
                ListboxEvent::ScrollbarPlaced(placement) => {
                    if let Some(bar) = self.scrollbar.as_mut() {
                        bar.place(placement.rect);
                        if placement.visible {
                            bar.show();
                        } else {
                            bar.hide();
                        }
                    }
                }
                ListboxEvent::ScrollbarThumb(thumb) => {
                    if let Some(bar) = self.scrollbar.as_mut() {
                        bar.set_start_end(thumb.start, thumb.end);
                    }
                }
            }
        }
    }

    /// Repaint every row slot of the window, `items_per_page + 1` of them so a
    /// partially visible last row is drawn too.
    ///
    /// The content cursor is saved, walked from `top` one row per call and
    /// restored afterwards.
    pub fn paint<S>(&mut self, surface: &mut S)
    where
        S: PaintSurface + ?Sized,
        C: PaintContent<S>,
    {
        self.pump();

        let nav = &mut self.navigator;
        let ViewportState {
            top,
            selected,
            items_per_page,
            item_height,
        } = nav.viewport;
        let config = nav.config;
        let width = nav.size.width;
        let x_offset = nav.x_offset();
        let selection_enabled = nav.selection_enabled;
        let bar = self.scrollbar.as_ref().map(|b| (b.rect(), b.is_visible()));
        let Some(content) = nav.content.as_mut() else {
            return;
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "listbox_paint",
            top,
            selected,
            rows = items_per_page + 1,
            size = content.size()
        )
        .entered();

        content.cursor_save();
        if bar.is_some() && config.granularity == ScrollGranularity::ByLine {
            content.cursor_save_top(top);
        }
        if top >= selected {
            content.cursor_move(isize::try_from(top - selected).unwrap_or(isize::MAX));
        } else {
            content.cursor_move(isize::try_from(selected - top).map_or(isize::MIN, |d| -d));
        }

        let size = content.size();
        let highlight_width = match bar {
            Some((rect, true)) => width.saturating_sub(rect.width),
            _ => width,
        };
        for row in 0..=items_per_page {
            let y = row_y(row, item_height);
            let is_selected = selection_enabled && size > 0 && content.cursor_get() == selected;
            content.paint(surface, &config.style, Point::new(x_offset, y), is_selected);
            if is_selected {
                if let Some(observer) = self.highlight.as_mut() {
                    observer(nav.last_movement, Rect::new(0, y, highlight_width, item_height));
                    nav.last_movement = Movement::JustCheck;
                }
            }
            content.cursor_move(1);
        }

        // Clear the strip between the scrollbar and the rows.
        if let Some((rect, visible)) = bar {
            let gap = config.scrollbar_offset;
            let clear = if config.scrollbar_mode.is_left() {
                if visible {
                    Some(Rect::new(rect.right(), rect.y, gap, rect.height))
                } else {
                    Some(Rect::new(rect.x, rect.y, rect.width.saturating_add(gap), rect.height))
                }
            } else if visible {
                Some(Rect::new(rect.x.saturating_sub(gap), rect.y, gap, rect.height))
            } else {
                None
            };
            if let Some(clear) = clear.filter(|r| !r.is_empty()) {
                surface.clear(clear);
            }
        }

        content.cursor_restore();
    }

    fn sync_scrollbar_presence(&mut self) {
        let config = *self.navigator.config();
        if config.scrollbar_mode == ScrollbarMode::Never {
            self.scrollbar = None;
        } else if self.scrollbar.is_none() {
            let mut bar = B::default();
            bar.hide();
            bar.set_border_width(config.scrollbar_border_width);
            self.scrollbar = Some(bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::VecContent;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Damages(Vec<Damage>);

    impl ViewHost for Damages {
        fn invalidate(&mut self, damage: &Damage) {
            self.0.push(damage.clone());
        }
    }

    fn view(mode: ScrollbarMode) -> ListboxView<VecContent<usize>, Damages> {
        let config = ListboxConfig::default()
            .with_item_height(10)
            .with_scrollbar_mode(mode);
        let content = VecContent::from_values(0..20);
        let mut view = ListboxView::with_content(config, content, Damages::default());
        view.resize(Size::new(100, 40));
        view
    }

    #[test]
    fn scrollbar_exists_unless_never() {
        assert!(view(ScrollbarMode::Never).scrollbar().is_none());
        let view = view(ScrollbarMode::OnDemand);
        let bar = view.scrollbar().copied().unwrap_or_default();
        assert!(bar.visible);
        assert_eq!(bar.rect, Rect::new(90, 0, 10, 40));
        assert_eq!(bar.border_width, 1);
    }

    #[test]
    fn thumb_follows_pages() {
        let mut view = view(ScrollbarMode::Always);
        view.move_selection(Movement::PageDown);
        let bar = view.scrollbar().copied().unwrap_or_default();
        assert_eq!((bar.thumb.start, bar.thumb.end), (20, 40));
    }

    #[test]
    fn mode_switch_creates_and_drops_scrollbar() {
        let mut view = view(ScrollbarMode::Never);
        view.set_scrollbar_mode(ScrollbarMode::LeftAlways);
        let bar = view.scrollbar().copied().unwrap_or_default();
        assert!(bar.visible);
        assert_eq!(bar.rect, Rect::new(0, 0, 10, 40));
        view.set_scrollbar_mode(ScrollbarMode::Never);
        assert!(view.scrollbar().is_none());
        assert_eq!(view.navigator().content_width(), 100);
    }

    #[test]
    fn subscribers_hear_selection_changes() {
        let mut view = view(ScrollbarMode::Never);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = view.connect_selection_changed(move || counter.set(counter.get() + 1));
        view.move_selection(Movement::MoveDown);
        view.move_selection(Movement::MoveDown);
        assert_eq!(hits.get(), 2);
        assert!(view.disconnect_selection_changed(id));
        assert!(!view.disconnect_selection_changed(id));
        view.move_selection(Movement::MoveDown);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn actions_need_a_visible_raised_listbox() {
        let mut view = view(ScrollbarMode::Never);
        view.set_lowered(true);
        assert!(!view.handle_action(Movement::MoveDown));
        view.set_lowered(false);
        view.set_visible(false);
        assert!(!view.handle_action(Movement::MoveDown));
        assert_eq!(view.viewport().selected, 0);
        view.set_visible(true);
        assert!(view.handle_action(Movement::MoveDown));
        assert_eq!(view.viewport().selected, 1);
    }

    #[test]
    fn host_receives_damage() {
        let mut view = view(ScrollbarMode::Never);
        view.host_mut().0.clear();
        view.move_selection(Movement::PageDown);
        assert_eq!(view.host().0, vec![Damage::Full]);
    }
}

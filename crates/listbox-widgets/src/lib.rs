#![forbid(unsafe_code)]

//! Virtualized listbox engine.
//!
//! A listbox shows a window of `items_per_page` rows over a collection it does
//! not own, keeps one row selected and a scrollbar thumb in sync with the
//! window. The pieces:
//!
//! - [`content`]: the contract a collection implements ([`ListboxContent`])
//!   and an in-memory implementation ([`VecContent`]).
//! - [`navigator`]: the engine ([`ListNavigator`]) executing movement
//!   commands and queueing [`ListboxEvent`]s.
//! - [`scrollbar`]: thumb computation and the [`ScrollbarView`] contract.
//! - [`layout`]: resize and row height handling.
//! - [`mutation`]: hooks the collection owner calls after each change.
//! - [`view`]: [`ListboxView`], which delivers events and runs the repaint
//!   pass.
//!
//! ```
//! use listbox_core::{ListboxConfig, Movement, Size};
//! use listbox_widgets::{ListNavigator, VecContent};
//!
//! let config = ListboxConfig::default().with_item_height(10);
//! let mut nav = ListNavigator::with_content(config, VecContent::from_values(0..10));
//! nav.resize(Size::new(80, 40));
//! nav.move_selection(Movement::PageDown);
//! assert_eq!((nav.selected(), nav.top()), (4, 4));
//! ```

pub mod content;
pub mod layout;
pub mod mutation;
pub mod navigator;
pub mod scrollbar;
pub mod view;

pub use content::{CursorStack, Entry, ListboxContent, PaintContent, RowSurface, VecContent};
pub use layout::LayoutDirty;
pub use navigator::{Damage, ListNavigator, ListboxEvent, ScrollPolicy, ViewportState};
pub use scrollbar::{ScrollbarPlacement, ScrollbarSync, ScrollbarView, SliderState, Thumb};
pub use view::{ListboxView, PaintSurface, SubscriptionId, ViewHost};

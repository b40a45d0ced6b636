//! Property-based invariant tests for the navigation engine.
//!
//! 1. By page: after any command, `top % ipp == 0` and the selection is on the
//!    visible page.
//! 2. By line: after any command, the selection is inside the window.
//! 3. Every command terminates for arbitrary selectability masks; without a
//!    single selectable row the selection never moves.
//! 4. A second `JustCheck` without intervening changes has no side effects.
//! 5. Without wrap-around, `MoveDown` then `MoveUp` returns to the start row
//!    unless the first move was refused at the bottom edge.

mod common;

use common::{TestContent, config, navigator_with};
use listbox_core::config::ScrollGranularity;
use listbox_core::movement::Movement;
use listbox_widgets::ListboxContent;
use proptest::prelude::*;

fn movement_strategy() -> impl Strategy<Value = Movement> {
    prop::sample::select(Movement::ALL.to_vec())
}

fn mask_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.7), 1..60)
}

proptest! {
    #[test]
    fn by_page_window_is_aligned(
        mask in mask_strategy(),
        ipp in 1u16..10,
        wrap in any::<bool>(),
        moves in prop::collection::vec(movement_strategy(), 1..40),
    ) {
        let size = mask.len();
        let config = config().with_wrap_around(wrap);
        let mut nav = navigator_with(config, TestContent::with_mask(&mask), ipp);
        let ipp = usize::from(ipp);
        for movement in moves {
            nav.move_selection(movement);
            let (top, selected) = (nav.top(), nav.selected());
            prop_assert!(selected < size, "{movement}: selected {selected} of {size}");
            prop_assert_eq!(top % ipp, 0);
            prop_assert!(top <= selected && selected < top + ipp, "{movement}: top {top} selected {selected}");
        }
    }

    #[test]
    fn by_line_selection_stays_visible(
        mask in mask_strategy(),
        ipp in 1u16..10,
        wrap in any::<bool>(),
        moves in prop::collection::vec(movement_strategy(), 1..40),
    ) {
        let size = mask.len();
        let config = config()
            .with_wrap_around(wrap)
            .with_granularity(ScrollGranularity::ByLine);
        let mut nav = navigator_with(config, TestContent::with_mask(&mask), ipp);
        let ipp = usize::from(ipp);
        for movement in moves {
            nav.move_selection(movement);
            let (top, selected) = (nav.top(), nav.selected());
            prop_assert!(selected < size);
            prop_assert!(top <= selected && selected < top + ipp, "{movement}: top {top} selected {selected}");
        }
    }

    #[test]
    fn unselectable_content_keeps_selection(
        len in 1usize..40,
        ipp in 1u16..8,
        wrap in any::<bool>(),
        moves in prop::collection::vec(movement_strategy(), 1..20),
    ) {
        let config = config().with_wrap_around(wrap);
        let mut nav = navigator_with(config, TestContent::with_mask(&vec![false; len]), ipp);
        let before = nav.selected();
        for movement in moves {
            nav.move_selection(movement);
            prop_assert_eq!(nav.selected(), before, "{}", movement);
        }
    }

    #[test]
    fn just_check_is_idempotent(
        mask in mask_strategy(),
        ipp in 1u16..10,
        by_line in any::<bool>(),
        moves in prop::collection::vec(movement_strategy(), 0..20),
        jump in any::<prop::sample::Index>(),
    ) {
        let granularity = if by_line {
            ScrollGranularity::ByLine
        } else {
            ScrollGranularity::ByPage
        };
        let config = config().with_granularity(granularity);
        let mut nav = navigator_with(config, TestContent::with_mask(&mask), ipp);
        for movement in moves {
            nav.move_selection(movement);
        }
        if let Some(content) = nav.content_mut() {
            content.cursor_set(jump.index(mask.len()));
        }
        nav.move_selection(Movement::JustCheck);
        nav.drain_events().for_each(drop);
        let viewport = *nav.viewport();

        nav.move_selection(Movement::JustCheck);
        prop_assert!(nav.pending_events().is_empty(), "{:?}", nav.pending_events());
        prop_assert_eq!(*nav.viewport(), viewport);
    }

    #[test]
    fn down_then_up_round_trips(
        len in 1usize..50,
        ipp in 1u16..10,
        start in any::<prop::sample::Index>(),
    ) {
        let config = config().with_wrap_around(false);
        let mut nav = navigator_with(config, TestContent::new(len), ipp);
        let start = start.index(len);
        nav.move_selection_to(start);
        nav.move_selection(Movement::MoveDown);
        if start + 1 == len {
            prop_assert_eq!(nav.selected(), start, "refused at the bottom edge");
        } else {
            prop_assert_eq!(nav.selected(), start + 1);
            nav.move_selection(Movement::MoveUp);
            prop_assert_eq!(nav.selected(), start);
        }
    }
}

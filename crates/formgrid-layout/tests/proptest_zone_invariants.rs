//! Property-based invariant tests for the zone indexer.
//!
//! Invariants verified for arbitrary layout sequences:
//!
//! 1. Offsets are strictly increasing exclusive prefix sums of capacities.
//! 2. Owner lookup inverts offsets for every in-range zone index.
//! 3. Out-of-range indices have no owner.
//! 4. Order stays contiguous `0..n` after arbitrary add/remove/move runs.
//! 5. Zone rect splitting yields `capacity` rects whose centers each
//!    hit-test back to exactly their own rect.

use formgrid_core::geometry::BoundRect;
use formgrid_layout::{
    LayoutRegistry, total_capacity, zone_offsets, zone_owner, zone_range, zone_rects,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn dims_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..=4, 1u32..=3), 0..8)
}

#[derive(Debug, Clone)]
enum Edit {
    Add(u32, u32),
    Remove(usize),
    Move(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (1u32..=4, 1u32..=3).prop_map(|(c, r)| Edit::Add(c, r)),
        (0usize..8).prop_map(Edit::Remove),
        (0usize..8, 0usize..8).prop_map(|(f, t)| Edit::Move(f, t)),
    ]
}

fn registry_with(dims: &[(u32, u32)]) -> LayoutRegistry {
    let mut reg = LayoutRegistry::new();
    for &(c, r) in dims {
        reg.add_layout(c, r).unwrap();
    }
    reg
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn offsets_are_exclusive_prefix_sums(dims in dims_strategy()) {
        let reg = registry_with(&dims);
        let layouts = reg.layouts();
        let offsets = zone_offsets(layouts);

        let mut expected = 0;
        for (layout, &(id, offset)) in layouts.iter().zip(&offsets) {
            prop_assert_eq!(layout.id, id);
            prop_assert_eq!(offset, expected);
            expected += layout.capacity();
        }
        prop_assert_eq!(total_capacity(layouts), expected);

        // Capacities are >= 1, so offsets are strictly increasing.
        for pair in offsets.windows(2) {
            prop_assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn owner_inverts_offsets(dims in dims_strategy()) {
        let reg = registry_with(&dims);
        let layouts = reg.layouts();

        for layout in layouts {
            let range = zone_range(layouts, layout.id).unwrap();
            prop_assert_eq!(range.len(), layout.capacity());
            for zone in range {
                prop_assert_eq!(zone_owner(layouts, zone), Some(layout.id));
            }
        }
        prop_assert_eq!(zone_owner(layouts, total_capacity(layouts)), None);
    }

    #[test]
    fn order_stays_contiguous_under_edits(
        dims in dims_strategy(),
        edits in prop::collection::vec(edit_strategy(), 0..16),
    ) {
        let mut reg = registry_with(&dims);
        for edit in edits {
            match edit {
                Edit::Add(c, r) => {
                    reg.add_layout(c, r).unwrap();
                }
                Edit::Remove(i) => {
                    if let Some(layout) = reg.layouts().get(i).copied() {
                        reg.remove_layout(layout.id).unwrap();
                    }
                }
                Edit::Move(f, t) => {
                    if reg.can_move(f, t) {
                        reg.move_layout(f, t).unwrap();
                    }
                }
            }
            let orders: Vec<usize> = reg.layouts().iter().map(|l| l.order).collect();
            let expected: Vec<usize> = (0..reg.len()).collect();
            prop_assert_eq!(orders, expected);
        }
    }

    #[test]
    fn zone_rect_centers_hit_their_own_rect(
        cols in 1u32..=4,
        rows in 1u32..=3,
        w in 30.0f32..800.0,
        h in 20.0f32..400.0,
    ) {
        let mut reg = LayoutRegistry::new();
        reg.add_layout(cols, rows).unwrap();
        let layout = reg.layouts()[0];

        let rects = zone_rects(&layout, BoundRect::new(7.0, 11.0, w, h));
        prop_assert_eq!(rects.len(), layout.capacity());

        for (i, rect) in rects.iter().enumerate() {
            let center = rect.center();
            let hits: Vec<usize> = rects
                .iter()
                .enumerate()
                .filter(|(_, r)| r.contains(center))
                .map(|(j, _)| j)
                .collect();
            prop_assert_eq!(hits, vec![i]);
        }
    }
}

//! Property-based invariant tests for the placement engine.
//!
//! Invariants verified across arbitrary gesture/edit sequences:
//!
//! 1. Zone exclusivity: no two squares ever hold the same zone.
//! 2. Used/placed sync: a square is `is_used` iff it holds a zone.
//! 3. Every committed zone index is inside the current capacity.
//! 4. Structural edits (remove/move layout) leave no placement behind;
//!    pure appends leave all placements intact.
//! 5. Rebuilding zone geometry without gestures changes nothing.

use std::collections::BTreeSet;

use formgrid_core::geometry::BoundRect;
use formgrid_engine::{EngineConfig, PlacementEngine, ZoneGeometry};
use formgrid_layout::total_capacity;
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    CreateSquare,
    AddLayout(u32, u32),
    RemoveLayout(usize),
    MoveLayout(usize, usize),
    Drop(usize, usize),
    Eject(usize),
    DeleteSquare(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::CreateSquare),
        2 => (1u32..=3, 1u32..=2).prop_map(|(c, r)| Op::AddLayout(c, r)),
        1 => (0usize..4).prop_map(Op::RemoveLayout),
        1 => (0usize..4, 0usize..4).prop_map(|(f, t)| Op::MoveLayout(f, t)),
        4 => (0usize..8, 0usize..12).prop_map(|(s, z)| Op::Drop(s, z)),
        1 => (0usize..8).prop_map(Op::Eject),
        1 => (0usize..8).prop_map(Op::DeleteSquare),
    ]
}

/// Lay every layout out in a vertical strip and collect zone rects.
fn geometry_of(eng: &PlacementEngine) -> ZoneGeometry {
    let mut areas = Vec::new();
    let mut y = 0.0;
    for layout in eng.layouts().layouts() {
        let height = 60.0 * layout.rows as f32;
        areas.push((
            layout.id,
            BoundRect::new(400.0, y, 120.0 * layout.columns as f32, height),
        ));
        y += height + 10.0;
    }
    ZoneGeometry::collect(eng.layouts(), &areas)
}

fn check_invariants(eng: &PlacementEngine) -> Result<(), TestCaseError> {
    let capacity = total_capacity(eng.layouts().layouts());

    let mut seen_zones = BTreeSet::new();
    let mut seen_squares = BTreeSet::new();
    for (zone, square) in eng.placements().iter() {
        prop_assert!(zone < capacity, "zone {zone} outside capacity {capacity}");
        prop_assert!(seen_zones.insert(zone), "zone {zone} held twice");
        prop_assert!(seen_squares.insert(square), "square {square} placed twice");
    }

    for square in eng.squares().iter() {
        let placed = eng.placements().zone_of(square.id).is_some();
        prop_assert_eq!(
            square.is_used,
            placed,
            "square {} used flag out of sync",
            square.id
        );
    }
    Ok(())
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn invariants_hold_under_arbitrary_ops(
        seed in 0u64..1000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(seed));

        for op in ops {
            let squares: Vec<_> = eng.squares().iter().map(|s| s.id).collect();
            match op {
                Op::CreateSquare => {
                    eng.create_square();
                }
                Op::AddLayout(c, r) => {
                    let before: Vec<_> = eng.placements().iter().collect();
                    eng.add_layout(c, r).unwrap();
                    let after: Vec<_> = eng.placements().iter().collect();
                    prop_assert_eq!(before, after, "append must not move placements");
                }
                Op::RemoveLayout(i) => {
                    if let Some(layout) = eng.layouts().layouts().get(i).copied() {
                        eng.remove_layout(layout.id).unwrap();
                        prop_assert!(eng.placements().is_empty(), "removal must reset");
                    }
                }
                Op::MoveLayout(f, t) => {
                    if eng.layouts().can_move(f, t) {
                        eng.move_layout(f, t).unwrap();
                        prop_assert!(eng.placements().is_empty(), "reorder must reset");
                    }
                }
                Op::Drop(s, z) => {
                    if let Some(&id) = squares.get(s % squares.len().max(1)) {
                        let geometry = geometry_of(&eng);
                        if !geometry.is_empty() {
                            let target = geometry.rects()[z % geometry.len()];
                            let rect = BoundRect::from_size(20.0, 20.0)
                                .centered_at(target.rect.center());
                            eng.drop_at(id, &rect, &geometry, None);
                        }
                    }
                }
                Op::Eject(s) => {
                    if let Some(&id) = squares.get(s % squares.len().max(1)) {
                        eng.remove_from_zone(id);
                    }
                }
                Op::DeleteSquare(s) => {
                    if let Some(&id) = squares.get(s % squares.len().max(1)) {
                        eng.delete_square(id).unwrap();
                    }
                }
            }
            check_invariants(&eng)?;
        }
    }

    #[test]
    fn rerendering_geometry_changes_no_state(
        seed in 0u64..1000,
        cols in 1u32..=3,
    ) {
        let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(seed));
        eng.add_layout(cols, 1).unwrap();
        let id = eng.create_square();

        let geometry = geometry_of(&eng);
        let rect = BoundRect::from_size(20.0, 20.0)
            .centered_at(geometry.rects()[0].rect.center());
        prop_assert!(eng.drop_at(id, &rect, &geometry, None).is_placed());

        let before = eng.snapshot();
        for _ in 0..3 {
            let _ = geometry_of(&eng);
        }
        prop_assert_eq!(eng.snapshot(), before);
    }
}

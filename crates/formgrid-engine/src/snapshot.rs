#![forbid(unsafe_code)]

//! Builder-state snapshots.
//!
//! A [`DragSnapshot`] captures the full builder state (squares, layouts,
//! committed placements) as plain serializable data. Saved forms carry
//! one alongside the exported schema so the builder can be reopened for
//! editing later.
//!
//! Restore validates before mutating: a snapshot that references unknown
//! squares, out-of-range zones, or assigns two squares to one zone is
//! rejected whole, leaving the engine untouched.

use serde::{Deserialize, Serialize};

use formgrid_core::field::{Square, SquareId};
use formgrid_core::registry::SquareRegistry;
use formgrid_layout::{GridLayout, LayoutRegistry, ZoneIndex, total_capacity};

use crate::engine::PlacementEngine;
use crate::placement::PlacementMap;

/// Errors from [`PlacementEngine::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreError {
    /// A placement references a square not present in the snapshot.
    UnknownSquare(SquareId),
    /// A placement's zone index is outside the snapshot's capacity.
    ZoneOutOfRange {
        /// The offending zone index.
        zone: ZoneIndex,
        /// Total capacity of the snapshot's layouts.
        capacity: usize,
    },
    /// Two placements claim the same zone or the same square.
    Conflict(ZoneIndex),
}

impl std::fmt::Display for RestoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreError::UnknownSquare(id) => {
                write!(f, "placement references unknown square {id}")
            }
            RestoreError::ZoneOutOfRange { zone, capacity } => {
                write!(f, "zone {zone} out of range (capacity {capacity})")
            }
            RestoreError::Conflict(zone) => write!(f, "conflicting placement for zone {zone}"),
        }
    }
}

impl std::error::Error for RestoreError {}

/// Serializable capture of the whole builder state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSnapshot {
    /// All squares, in creation order.
    pub squares: Vec<Square>,
    /// All layouts, in render order.
    pub layouts: Vec<GridLayout>,
    /// Committed `(zone, square)` pairs, in zone order.
    pub placements: Vec<(ZoneIndex, SquareId)>,
}

impl PlacementEngine {
    /// Capture the current builder state.
    #[must_use]
    pub fn snapshot(&self) -> DragSnapshot {
        DragSnapshot {
            squares: self.squares().iter().cloned().collect(),
            layouts: self.layouts().layouts().to_vec(),
            placements: self.placements().iter().collect(),
        }
    }

    /// Replace the builder state with a snapshot.
    ///
    /// Validates the snapshot first; on error the engine is unchanged.
    pub fn restore(&mut self, snapshot: DragSnapshot) -> Result<(), RestoreError> {
        let capacity = total_capacity(&snapshot.layouts);
        let mut map = PlacementMap::new();
        for &(zone, square) in &snapshot.placements {
            if !snapshot.squares.iter().any(|s| s.id == square) {
                return Err(RestoreError::UnknownSquare(square));
            }
            if zone >= capacity {
                return Err(RestoreError::ZoneOutOfRange { zone, capacity });
            }
            if map.is_occupied(zone) || map.zone_of(square).is_some() {
                return Err(RestoreError::Conflict(zone));
            }
            // Cannot fail after the occupancy checks above.
            let _ = map.commit(square, zone);
        }

        let mut squares = SquareRegistry::restore(snapshot.squares);
        let ids: Vec<SquareId> = squares.iter().map(|s| s.id).collect();
        for id in ids {
            // Used flags follow the placements, whatever the snapshot said.
            let _ = if map.zone_of(id).is_some() {
                squares.mark_used(id)
            } else {
                squares.mark_unused(id)
            };
        }
        self.replace_state(squares, LayoutRegistry::restore(snapshot.layouts), map);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::handle::ZoneGeometry;
    use formgrid_core::geometry::BoundRect;

    fn built_engine() -> PlacementEngine {
        let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(1));
        let layout = eng.add_layout(2, 1).unwrap();
        let id = eng.create_square();
        eng.squares_mut().update_label(id, "Name").unwrap();
        let geometry = ZoneGeometry::collect(
            eng.layouts(),
            &[(layout, BoundRect::new(300.0, 0.0, 200.0, 80.0))],
        );
        let rect = BoundRect::from_size(20.0, 20.0)
            .centered_at(geometry.rect_of(0).unwrap().center());
        assert!(eng.drop_at(id, &rect, &geometry, None).is_placed());
        eng.create_square();
        eng
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let eng = built_engine();
        let snapshot = eng.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DragSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn restore_rebuilds_identical_state() {
        let eng = built_engine();
        let snapshot = eng.snapshot();

        let mut fresh = PlacementEngine::new(EngineConfig::default().with_seed(2));
        fresh.restore(snapshot.clone()).unwrap();

        assert_eq!(fresh.snapshot(), snapshot);
        let placed = snapshot.placements[0].1;
        assert!(fresh.squares().get(placed).unwrap().is_used);
    }

    #[test]
    fn restored_engine_allocates_fresh_ids() {
        let eng = built_engine();
        let snapshot = eng.snapshot();
        let max_square = snapshot.squares.iter().map(|s| s.id).max().unwrap();

        let mut fresh = PlacementEngine::default();
        fresh.restore(snapshot).unwrap();
        let new_square = fresh.create_square();
        assert!(new_square > max_square);
    }

    #[test]
    fn restore_rejects_unknown_square() {
        let mut snapshot = built_engine().snapshot();
        snapshot.placements.push((1, SquareId(999)));

        let mut eng = PlacementEngine::default();
        assert_eq!(
            eng.restore(snapshot),
            Err(RestoreError::UnknownSquare(SquareId(999)))
        );
        assert!(eng.squares().is_empty());
    }

    #[test]
    fn restore_rejects_out_of_range_zone() {
        let mut snapshot = built_engine().snapshot();
        let some_square = snapshot.squares[0].id;
        snapshot.placements = vec![(99, some_square)];

        let mut eng = PlacementEngine::default();
        assert_eq!(
            eng.restore(snapshot),
            Err(RestoreError::ZoneOutOfRange {
                zone: 99,
                capacity: 2
            })
        );
    }

    #[test]
    fn restore_rejects_conflicting_placements() {
        let mut snapshot = built_engine().snapshot();
        let a = snapshot.squares[0].id;
        let b = snapshot.squares[1].id;
        snapshot.placements = vec![(0, a), (0, b)];

        let mut eng = PlacementEngine::default();
        assert_eq!(eng.restore(snapshot), Err(RestoreError::Conflict(0)));
    }
}

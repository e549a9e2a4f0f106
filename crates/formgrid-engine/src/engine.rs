#![forbid(unsafe_code)]

//! The drag placement engine.
//!
//! Owns the square registry, the layout registry, and the committed
//! placement map, and is the only mutation path that keeps the three
//! consistent. Every transition runs to completion on the caller's single
//! logical thread; a new drag cannot begin until the previous drop handler
//! has returned.
//!
//! # State machine (per square)
//!
//! ```text
//!            begin_drag                drop_at (hit, zone free)
//!   Free ───────────────▶ Dragging ─────────────────────────▶ Placed
//!    ▲                        │                                  │
//!    │   drop_at (no hit /    │                                  │
//!    │   occupied / palette)  │            remove_from_zone /    │
//!    └────────────────────────┘◀──── structural layout edit ─────┘
//! ```
//!
//! `Dragging` is ephemeral and UI-only: the engine tracks the position but
//! commits nothing until the drop.
//!
//! # Failure modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Stale square id | Square deleted mid-gesture | Drop is a no-op ([`DropOutcome::Ignored`]) |
//! | Zone occupied | Another square holds every hit zone | Square reverts to free-floating |
//! | Drop over palette | Center inside the unplace region | Square reverts (unplaced if it was placed) |
//! | Structural layout edit | remove/move layout | Every placement cleared, squares rescattered |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use formgrid_core::field::{Square, SquareId};
use formgrid_core::geometry::{BoundRect, Point};
use formgrid_core::registry::{RegistryResult, SquareRegistry};
use formgrid_layout::{GridLayout, LayoutId, LayoutRegistry, LayoutResult, ZoneIndex};

use crate::handle::{DraggableHandle, ZoneGeometry};
use crate::placement::PlacementMap;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Region in which reverted/ejected squares are rescattered, so they
    /// reappear in the palette area without stacking on one spot.
    pub scatter_region: BoundRect,
    /// Seed for the scatter generator. `None` seeds from entropy; tests pin
    /// a seed for reproducible positions.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scatter_region: BoundRect::new(0.0, 0.0, 280.0, 400.0),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the scatter region.
    #[must_use]
    pub fn with_scatter_region(mut self, region: BoundRect) -> Self {
        self.scatter_region = region;
        self
    }

    /// Pin the scatter seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ---------------------------------------------------------------------------
// Drop outcomes
// ---------------------------------------------------------------------------

/// Why a drop reverted the square to free-floating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertReason {
    /// The drop center hit no rendered zone.
    NoZoneHit,
    /// Every zone the center hit already holds a different square.
    Occupied,
    /// The drop center was inside the palette (unplace) region.
    PaletteRegion,
}

impl std::fmt::Display for RevertReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RevertReason::NoZoneHit => "no zone hit",
            RevertReason::Occupied => "zone occupied",
            RevertReason::PaletteRegion => "palette region",
        };
        f.write_str(s)
    }
}

/// Result of [`PlacementEngine::drop_at`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// Committed to a zone. `snap` is the zone's center, for the view to
    /// animate toward; the state of record is the zone index, not pixels.
    Placed {
        /// The committed zone.
        zone: ZoneIndex,
        /// Cosmetic snap position (zone center).
        snap: Point,
    },
    /// Reverted to free-floating at `position`.
    Reverted {
        /// Why the drop did not commit.
        reason: RevertReason,
        /// The square's new free-floating position.
        position: Point,
    },
    /// The square no longer exists; the gesture had no effect.
    Ignored,
}

impl DropOutcome {
    /// True if the drop committed a placement.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        matches!(self, DropOutcome::Placed { .. })
    }
}

// ---------------------------------------------------------------------------
// PlacementEngine
// ---------------------------------------------------------------------------

/// The interactive core: squares, layouts, and committed placements.
#[derive(Debug)]
pub struct PlacementEngine {
    squares: SquareRegistry,
    layouts: LayoutRegistry,
    placements: PlacementMap,
    active_drag: Option<SquareId>,
    rng: StdRng,
    config: EngineConfig,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PlacementEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            squares: SquareRegistry::new(),
            layouts: LayoutRegistry::new(),
            placements: PlacementMap::new(),
            active_drag: None,
            rng,
            config,
        }
    }

    /// The square registry.
    #[must_use]
    pub fn squares(&self) -> &SquareRegistry {
        &self.squares
    }

    /// Mutable access to the square registry for field edits (label, kind,
    /// placeholder, options). Structural deletes must go through
    /// [`Self::delete_square`] so the vacated zone is freed with them.
    pub fn squares_mut(&mut self) -> &mut SquareRegistry {
        &mut self.squares
    }

    /// The layout registry. All mutations go through the engine so the
    /// global-reset invariant cannot be skipped.
    #[must_use]
    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// The committed placement map.
    #[must_use]
    pub fn placements(&self) -> &PlacementMap {
        &self.placements
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- squares ------------------------------------------------------------

    /// Create a new square at a scattered palette position.
    pub fn create_square(&mut self) -> SquareId {
        let position = self.scatter_position();
        self.squares.create_at(position).id
    }

    /// Delete a square, vacating any zone it holds in the same transaction.
    pub fn delete_square(&mut self, id: SquareId) -> RegistryResult<Square> {
        self.placements.vacate_square(id);
        if self.active_drag == Some(id) {
            self.active_drag = None;
        }
        self.squares.delete(id)
    }

    // -- layouts ------------------------------------------------------------

    /// Append a layout. Pure append: committed placements survive.
    pub fn add_layout(&mut self, columns: u32, rows: u32) -> LayoutResult<LayoutId> {
        self.layouts.add_layout(columns, rows)
    }

    /// Remove a layout.
    ///
    /// Zone indices are positional offsets, so this invalidates every index
    /// in the system: all placements are cleared and every placed square is
    /// rescattered before the structural edit lands.
    pub fn remove_layout(&mut self, id: LayoutId) -> LayoutResult<GridLayout> {
        if self.layouts.get(id).is_none() {
            return Err(formgrid_layout::LayoutError::NotFound(id));
        }
        self.clear_placements();
        self.layouts.remove_layout(id)
    }

    /// Reorder layouts. Same global reset as [`Self::remove_layout`].
    pub fn move_layout(&mut self, from: usize, to: usize) -> LayoutResult<()> {
        if !self.layouts.can_move(from, to) {
            let len = self.layouts.len();
            let index = if from >= len { from } else { to };
            return Err(formgrid_layout::LayoutError::IndexOutOfBounds { index, len });
        }
        self.clear_placements();
        self.layouts.move_layout(from, to)
    }

    /// Clear every committed placement, reverting all placed squares to
    /// free-floating at fresh scatter positions.
    pub fn clear_placements(&mut self) {
        let freed = self.placements.clear();
        #[cfg(feature = "tracing")]
        if !freed.is_empty() {
            tracing::debug!(count = freed.len(), "clearing all placements");
        }
        for id in freed {
            let _ = self.squares.mark_unused(id);
            let position = self.scatter_position();
            let _ = self.squares.set_position(id, position);
        }
    }

    // -- drag gestures ------------------------------------------------------

    /// Begin a drag. Returns false (and tracks nothing) for a stale id.
    pub fn begin_drag(&mut self, id: SquareId) -> bool {
        if self.squares.get(id).is_none() {
            return false;
        }
        self.active_drag = Some(id);
        true
    }

    /// The square currently being dragged, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<SquareId> {
        self.active_drag
    }

    /// Track the free-floating position during a drag. No commitment.
    pub fn drag_to(&mut self, id: SquareId, position: Point) -> bool {
        self.squares.set_position(id, position).is_ok()
    }

    /// End a drag: hit-test and commit or revert.
    ///
    /// The dragged element's bounding-box center is tested against each
    /// rendered zone rectangle in render order; the first match wins (ties
    /// between overlapping zones are not otherwise adjudicated). Zones held
    /// by a different square are excluded from candidacy regardless of
    /// geometry. A center inside `palette` never places; that region drags
    /// squares back out of the grid.
    pub fn drop_at(
        &mut self,
        id: SquareId,
        handle: &dyn DraggableHandle,
        zones: &ZoneGeometry,
        palette: Option<BoundRect>,
    ) -> DropOutcome {
        self.active_drag = None;
        if self.squares.get(id).is_none() {
            return DropOutcome::Ignored;
        }

        let drag_rect = handle.bounding_box();
        let center = drag_rect.center();
        if let Some(region) = palette {
            if region.contains(center) {
                return self.revert(id, drag_rect, RevertReason::PaletteRegion);
            }
        }

        let mut saw_occupied = false;
        for target in zones.rects() {
            if !target.rect.contains(center) {
                continue;
            }
            match self.placements.occupant(target.zone) {
                Some(by) if by != id => {
                    saw_occupied = true;
                    continue;
                }
                _ => {
                    // Cannot fail: the zone is free or already ours.
                    let _ = self.placements.commit(id, target.zone);
                    let _ = self.squares.mark_used(id);
                    let snap = target.rect.center();
                    #[cfg(feature = "tracing")]
                    tracing::debug!(square = id.0, zone = target.zone, "placement committed");
                    return DropOutcome::Placed {
                        zone: target.zone,
                        snap,
                    };
                }
            }
        }

        let reason = if saw_occupied {
            RevertReason::Occupied
        } else {
            RevertReason::NoZoneHit
        };
        self.revert(id, drag_rect, reason)
    }

    /// Explicitly eject a square from its zone, returning the freed zone.
    ///
    /// The square is marked unused and rescattered so it reappears in the
    /// palette without stacking on other free squares.
    pub fn remove_from_zone(&mut self, id: SquareId) -> Option<ZoneIndex> {
        let zone = self.placements.vacate_square(id)?;
        let _ = self.squares.mark_unused(id);
        let position = self.scatter_position();
        let _ = self.squares.set_position(id, position);
        #[cfg(feature = "tracing")]
        tracing::debug!(square = id.0, zone, "square ejected from zone");
        Some(zone)
    }

    // -- internals ----------------------------------------------------------

    /// Swap in fully validated state (snapshot restore).
    pub(crate) fn replace_state(
        &mut self,
        squares: SquareRegistry,
        layouts: LayoutRegistry,
        placements: PlacementMap,
    ) {
        self.squares = squares;
        self.layouts = layouts;
        self.placements = placements;
        self.active_drag = None;
    }

    /// Revert a square to free-floating.
    ///
    /// A square that was placed is rescattered into the palette region; a
    /// square that was already free stays where the drag left it.
    fn revert(&mut self, id: SquareId, drag_rect: BoundRect, reason: RevertReason) -> DropOutcome {
        let was_placed = self.placements.vacate_square(id).is_some();
        let position = if was_placed {
            let _ = self.squares.mark_unused(id);
            self.scatter_position()
        } else {
            Point::new(drag_rect.x, drag_rect.y)
        };
        let _ = self.squares.set_position(id, position);
        #[cfg(feature = "tracing")]
        tracing::debug!(square = id.0, %reason, "drop reverted");
        DropOutcome::Reverted { reason, position }
    }

    /// A fresh random position inside the scatter region.
    fn scatter_position(&mut self) -> Point {
        let region = self.config.scatter_region;
        if region.is_empty() {
            return Point::new(region.x, region.y);
        }
        Point::new(
            self.rng.gen_range(region.x..region.right()),
            self.rng.gen_range(region.y..region.bottom()),
        )
    }
}

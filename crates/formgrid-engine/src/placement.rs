#![forbid(unsafe_code)]

//! The committed square-to-zone assignment map.
//!
//! # Invariants
//!
//! 1. At most one square per zone, at most one zone per square (bijection
//!    over the committed pairs).
//! 2. Committing a square to a new zone implicitly vacates its old zone in
//!    the same operation; there is no intermediate state in which a square
//!    holds two zones.
//! 3. Iteration order is zone order, so downstream projections (schema
//!    export) are deterministic.

use std::collections::BTreeMap;

use formgrid_core::field::SquareId;
use formgrid_layout::ZoneIndex;

/// Errors from placement commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The zone already holds a different square.
    Occupied {
        /// The contested zone.
        zone: ZoneIndex,
        /// The square currently holding it.
        by: SquareId,
    },
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::Occupied { zone, by } => {
                write!(f, "zone {zone} already occupied by square {by}")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Bidirectional map of committed placements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementMap {
    by_zone: BTreeMap<ZoneIndex, SquareId>,
    by_square: BTreeMap<SquareId, ZoneIndex>,
}

impl PlacementMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_zone.len()
    }

    /// True if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_zone.is_empty()
    }

    /// The square holding a zone, if any.
    #[must_use]
    pub fn occupant(&self, zone: ZoneIndex) -> Option<SquareId> {
        self.by_zone.get(&zone).copied()
    }

    /// The zone a square holds, if any.
    #[must_use]
    pub fn zone_of(&self, square: SquareId) -> Option<ZoneIndex> {
        self.by_square.get(&square).copied()
    }

    /// True if some square holds the zone.
    #[must_use]
    pub fn is_occupied(&self, zone: ZoneIndex) -> bool {
        self.by_zone.contains_key(&zone)
    }

    /// Commit `square -> zone`, vacating the square's previous zone.
    ///
    /// Re-committing a square to the zone it already holds is a no-op.
    /// Fails without mutating if a different square holds the zone.
    pub fn commit(&mut self, square: SquareId, zone: ZoneIndex) -> Result<(), PlacementError> {
        match self.occupant(zone) {
            Some(by) if by != square => return Err(PlacementError::Occupied { zone, by }),
            Some(_) => return Ok(()),
            None => {}
        }
        if let Some(old) = self.by_square.insert(square, zone) {
            self.by_zone.remove(&old);
        }
        self.by_zone.insert(zone, square);
        Ok(())
    }

    /// Release whatever zone a square holds, returning it.
    pub fn vacate_square(&mut self, square: SquareId) -> Option<ZoneIndex> {
        let zone = self.by_square.remove(&square)?;
        self.by_zone.remove(&zone);
        Some(zone)
    }

    /// Release a zone, returning the square that held it.
    pub fn vacate_zone(&mut self, zone: ZoneIndex) -> Option<SquareId> {
        let square = self.by_zone.remove(&zone)?;
        self.by_square.remove(&square);
        Some(square)
    }

    /// Drop every placement, returning the squares that were placed.
    pub fn clear(&mut self) -> Vec<SquareId> {
        let squares: Vec<SquareId> = self.by_zone.values().copied().collect();
        self.by_zone.clear();
        self.by_square.clear();
        squares
    }

    /// Committed `(zone, square)` pairs in zone order.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneIndex, SquareId)> + '_ {
        self.by_zone.iter().map(|(&z, &s)| (z, s))
    }
}

#![forbid(unsafe_code)]

//! Grid layouts and the zone index space.
//!
//! A [`GridLayout`] is a user-defined `columns x rows` grid that supplies
//! fixed-capacity drop slots ("zones"). Layouts carry a contiguous `order`,
//! and the flat zone index space is derived from that order: each layout owns
//! the index range starting at the sum of the capacities of every layout
//! before it (see [`zone`]).
//!
//! Because zone indices are positional offsets rather than stable ids, any
//! structural edit other than a pure append invalidates every committed
//! placement in the system. The registry itself holds no placements; the
//! placement engine owns them and performs the global reset around
//! [`LayoutRegistry::remove_layout`] and [`LayoutRegistry::move_layout`].

pub mod zone;

use serde::{Deserialize, Serialize};

pub use zone::{
    ZoneIndex, total_capacity, zone_offsets, zone_owner, zone_range, zone_rects,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from layout registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// No layout with the given id exists.
    NotFound(LayoutId),
    /// A move index was outside the current order sequence.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of layouts at the time of the call.
        len: usize,
    },
    /// Columns or rows was zero.
    ZeroDimension,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::NotFound(id) => write!(f, "layout {id} not found"),
            LayoutError::IndexOutOfBounds { index, len } => {
                write!(f, "layout index {index} out of bounds (len {len})")
            }
            LayoutError::ZeroDimension => write!(f, "layout dimensions must be positive"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Result type for layout registry operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

// ---------------------------------------------------------------------------
// GridLayout
// ---------------------------------------------------------------------------

/// Stable identifier for a [`GridLayout`] (creation-time monotonic token).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LayoutId(pub u64);

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-defined grid of drop zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Stable identifier.
    pub id: LayoutId,
    /// Column count. The UI offers 1-3; the model accepts any positive value.
    pub columns: u32,
    /// Row count. Observed usage fixes this at 1, but nothing requires it.
    pub rows: u32,
    /// Render / zone-offset sequence. Unique and contiguous at all times.
    pub order: usize,
}

impl GridLayout {
    /// Number of zones this layout supplies.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        (self.columns as usize) * (self.rows as usize)
    }
}

// ---------------------------------------------------------------------------
// LayoutRegistry
// ---------------------------------------------------------------------------

/// Ordered collection of grid layouts.
///
/// The backing vector is always sorted by `order`, and `order` values are
/// renumbered to `0..n` after every mutation.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: Vec<GridLayout>,
    next_id: u64,
}

impl LayoutRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously captured layouts.
    ///
    /// Layouts are re-sorted by their stored `order` and renumbered
    /// contiguously; id allocation resumes above the highest restored id.
    #[must_use]
    pub fn restore(mut layouts: Vec<GridLayout>) -> Self {
        layouts.sort_by_key(|l| l.order);
        let next_id = layouts.iter().map(|l| l.id.0 + 1).max().unwrap_or(0);
        let mut reg = Self { layouts, next_id };
        reg.renumber();
        reg
    }

    /// Number of layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// True if no layouts exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// All layouts, sorted by `order`.
    #[must_use]
    pub fn layouts(&self) -> &[GridLayout] {
        &self.layouts
    }

    /// Look up a layout by id.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&GridLayout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Total zone capacity across all layouts.
    #[must_use]
    pub fn total_capacity(&self) -> usize {
        zone::total_capacity(&self.layouts)
    }

    /// Append a layout with `order = len`.
    ///
    /// Appending never shifts existing zone offsets, so callers need not
    /// reset placements for this edit.
    pub fn add_layout(&mut self, columns: u32, rows: u32) -> LayoutResult<LayoutId> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::ZeroDimension);
        }
        let id = LayoutId(self.next_id);
        self.next_id += 1;
        let order = self.layouts.len();
        self.layouts.push(GridLayout {
            id,
            columns,
            rows,
            order,
        });
        Ok(id)
    }

    /// Remove a layout and renumber the remainder contiguously, preserving
    /// their prior relative order.
    ///
    /// This is a structural edit: the caller must clear every committed
    /// placement in the system before relying on zone indices again.
    pub fn remove_layout(&mut self, id: LayoutId) -> LayoutResult<GridLayout> {
        let idx = self
            .layouts
            .iter()
            .position(|l| l.id == id)
            .ok_or(LayoutError::NotFound(id))?;
        let removed = self.layouts.remove(idx);
        self.renumber();
        Ok(removed)
    }

    /// Reorder by removing the layout at `from` (in order sequence) and
    /// reinserting it at `to`, then renumbering.
    ///
    /// Structural edit; same caller obligation as [`Self::remove_layout`].
    pub fn move_layout(&mut self, from: usize, to: usize) -> LayoutResult<()> {
        let len = self.layouts.len();
        if from >= len {
            return Err(LayoutError::IndexOutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(LayoutError::IndexOutOfBounds { index: to, len });
        }
        let layout = self.layouts.remove(from);
        self.layouts.insert(to, layout);
        self.renumber();
        Ok(())
    }

    /// Validate a prospective [`Self::move_layout`] call without mutating.
    #[must_use]
    pub fn can_move(&self, from: usize, to: usize) -> bool {
        from < self.layouts.len() && to < self.layouts.len()
    }

    fn renumber(&mut self) {
        for (i, layout) in self.layouts.iter_mut().enumerate() {
            layout.order = i;
        }
    }
}

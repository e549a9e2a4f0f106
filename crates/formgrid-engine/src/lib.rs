#![forbid(unsafe_code)]

//! The formgrid drag placement engine.
//!
//! This crate is the interactive core of the form builder:
//!
//! - [`handle`] - view-side geometry seams ([`DraggableHandle`],
//!   [`ZoneGeometry`])
//! - [`placement`] - the committed square-to-zone map ([`PlacementMap`])
//! - [`engine`] - the [`PlacementEngine`] drop/revert/reset state machine
//! - [`snapshot`] - serializable capture and restore of builder state
//!
//! The engine owns the square and layout registries and is the only
//! mutation path that keeps placements consistent with structural layout
//! edits: removing or reordering a layout clears every placement in the
//! system, while a pure append leaves them intact.

pub mod engine;
pub mod handle;
pub mod placement;
pub mod snapshot;

pub use engine::{DropOutcome, EngineConfig, PlacementEngine, RevertReason};
pub use handle::{DraggableHandle, ZoneGeometry, ZoneRect};
pub use placement::{PlacementError, PlacementMap};
pub use snapshot::{DragSnapshot, RestoreError};

#![forbid(unsafe_code)]

//! Formgrid public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use formgrid_core::field::{
    FieldKind, FieldOption, OptionId, SelectMode, Square, SquareId,
};
pub use formgrid_core::geometry::{BoundRect, Point};
pub use formgrid_core::registry::{OptionPatch, RegistryError, SquareRegistry};

// --- Layout re-exports -----------------------------------------------------

pub use formgrid_layout::{
    GridLayout, LayoutError, LayoutId, LayoutRegistry, ZoneIndex, total_capacity, zone_offsets,
    zone_owner, zone_range, zone_rects,
};

// --- Engine re-exports -----------------------------------------------------

pub use formgrid_engine::{
    DragSnapshot, DraggableHandle, DropOutcome, EngineConfig, PlacementEngine, PlacementError,
    PlacementMap, RestoreError, RevertReason, ZoneGeometry, ZoneRect,
};

// --- Schema re-exports -----------------------------------------------------

pub use formgrid_schema::{
    ExportError, FieldConfig, FieldGroup, FormStructure, FormStructureBuilder, ValidationRules,
};

// --- Client re-exports -----------------------------------------------------

pub use formgrid_client::{
    ApiError, ChartDatum, ChartKind, ChartRenderer, DashboardConfig, DashboardConfigStore,
    FormId, FormRecord, FormResponsesApi, FormSummary, FormsApi, NewForm, QueueConfig,
    ReplayReport, ResponseQueue, ResponseSubmission, ResponseValue, SessionId, SessionStore,
    StorageError, SubmitOutcome,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for formgrid apps.
#[derive(Debug)]
pub enum Error {
    /// Square registry failure.
    Registry(RegistryError),
    /// Layout registry failure.
    Layout(LayoutError),
    /// Schema export failure.
    Export(ExportError),
    /// Snapshot restore failure.
    Restore(RestoreError),
    /// Remote API failure.
    Api(ApiError),
    /// Queue storage failure.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Restore(err) => write!(f, "{err}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Restore(err) => Some(err),
            Self::Api(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        Self::Export(err)
    }
}

impl From<RestoreError> for Error {
    fn from(err: RestoreError) -> Self {
        Self::Restore(err)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Standard result type for formgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoundRect, DropOutcome, EngineConfig, Error, FieldKind, FormStructure,
        FormStructureBuilder, GridLayout, LayoutRegistry, PlacementEngine, Point, Result,
        Square, SquareRegistry, ZoneGeometry,
    };

    pub use crate::{client, core, engine, layout, schema};
}

pub use formgrid_client as client;
pub use formgrid_core as core;
pub use formgrid_engine as engine;
pub use formgrid_layout as layout;
pub use formgrid_schema as schema;

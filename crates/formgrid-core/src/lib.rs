#![forbid(unsafe_code)]

//! Core model for the formgrid form builder.
//!
//! This crate provides the leaf types shared by every other formgrid crate:
//!
//! - [`geometry`] - continuous-coordinate points and rectangles
//! - [`field`] - the [`Square`] field definition and its closed kind enums
//! - [`registry`] - the [`SquareRegistry`] catalog of field definitions
//!
//! Nothing here knows about layouts, zones, or placement; those live in
//! `formgrid-layout` and `formgrid-engine`.

pub mod field;
pub mod geometry;
pub mod registry;

pub use field::{FieldKind, FieldOption, OptionId, SelectMode, Square, SquareId};
pub use geometry::{BoundRect, Point};
pub use registry::{OptionPatch, RegistryError, RegistryResult, SquareRegistry};

#![forbid(unsafe_code)]

//! Form schema export.
//!
//! [`FormStructureBuilder`] projects the current builder state (squares,
//! layouts, committed placements) into a serializable [`FormStructure`]:
//! one group per layout that holds at least one placed square, each group
//! mapping derived field keys to field configurations. The projection is
//! pure and deterministic; it never mutates the state it reads.
//!
//! Field keys are the slugified label (lowercased, whitespace removed) or
//! `field{id}` when the label is empty. Two squares whose labels slugify to
//! the same key collapse last-write-wins into the group map; callers that
//! care can ask [`FormStructureBuilder::key_collisions`] beforehand and
//! warn, but export never blocks on a collision.

pub mod builder;

pub use builder::{
    ExportError, ExportResult, FieldConfig, FieldGroup, FormStructure, FormStructureBuilder,
    ValidationRules, slugify,
};

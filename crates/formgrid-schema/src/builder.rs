#![forbid(unsafe_code)]

//! The form structure builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use formgrid_core::field::{FieldKind, FieldOption, SelectMode, Square};
use formgrid_core::registry::SquareRegistry;
use formgrid_layout::{GridLayout, LayoutId, LayoutRegistry, zone_range};
use formgrid_engine::placement::PlacementMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from schema export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportError {
    /// A layout's zones are only partially filled. Groups must be either
    /// empty or fully occupied to be export-ready.
    PartialRow {
        /// The offending layout.
        layout: LayoutId,
        /// Zones filled in that layout.
        filled: usize,
        /// The layout's capacity.
        capacity: usize,
    },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::PartialRow {
                layout,
                filled,
                capacity,
            } => write!(
                f,
                "layout {layout} is partially filled ({filled} of {capacity} zones)"
            ),
        }
    }
}

impl std::error::Error for ExportError {}

/// Result type for schema export.
pub type ExportResult<T> = Result<T, ExportError>;

// ---------------------------------------------------------------------------
// Exported model
// ---------------------------------------------------------------------------

/// Validation rules attached to every exported field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Whether the field must be answered.
    pub required: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self { required: true }
    }
}

/// One exported field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Display label.
    pub label: String,
    /// Input kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Placeholder text.
    pub placeholder: String,
    /// Option list; present only for select fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    /// Single/multiple choice; present only for select fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_mode: Option<SelectMode>,
    /// Validation rules.
    pub validate: ValidationRules,
    /// CSS-agnostic column-span token (`span-1`: one zone per field).
    pub class_name: String,
}

impl FieldConfig {
    fn from_square(square: &Square) -> Self {
        let is_select = square.kind.has_options();
        Self {
            label: square.label.clone(),
            kind: square.kind,
            placeholder: square.placeholder.clone(),
            options: is_select.then(|| square.options.clone()),
            select_mode: is_select.then_some(square.select_mode),
            validate: ValidationRules::default(),
            class_name: "span-1".to_string(),
        }
    }
}

/// One exported group: every filled field of one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    /// CSS-agnostic layout class token (`cols-{n}`).
    pub layout_class: String,
    /// Field key to configuration, in key order.
    pub fields: BTreeMap<String, FieldConfig>,
}

/// The exported, serializable form schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormStructure {
    /// Groups in layout order.
    pub groups: Vec<FieldGroup>,
}

impl FormStructure {
    /// True if no group was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

// ---------------------------------------------------------------------------
// Slug keys
// ---------------------------------------------------------------------------

/// Derive a field key from a label: lowercase, whitespace removed.
#[must_use]
pub fn slugify(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn field_key(square: &Square) -> String {
    let slug = slugify(&square.label);
    if slug.is_empty() {
        square.fallback_key()
    } else {
        slug
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Projects builder state into a [`FormStructure`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormStructureBuilder {
    validate_full_rows: bool,
}

impl FormStructureBuilder {
    /// Builder without the export validation pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the export validation pass: a layout whose zones are only
    /// partially filled rejects the whole export.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.validate_full_rows = true;
        self
    }

    /// Build the exported schema from the current state.
    ///
    /// Layouts contribute groups in `order`; fields inside a group come from
    /// placed squares whose zone falls in the layout's range. Layouts with
    /// no placed square are skipped entirely.
    pub fn build(
        &self,
        squares: &SquareRegistry,
        layouts: &LayoutRegistry,
        placements: &PlacementMap,
    ) -> ExportResult<FormStructure> {
        let mut groups = Vec::new();

        for layout in layouts.layouts() {
            let range = match zone_range(layouts.layouts(), layout.id) {
                Some(range) => range,
                None => continue,
            };

            let placed: Vec<&Square> = range
                .clone()
                .filter_map(|zone| placements.occupant(zone))
                .filter_map(|id| squares.get(id))
                .collect();

            if placed.is_empty() {
                continue;
            }
            if self.validate_full_rows && placed.len() < layout.capacity() {
                return Err(ExportError::PartialRow {
                    layout: layout.id,
                    filled: placed.len(),
                    capacity: layout.capacity(),
                });
            }

            let mut fields = BTreeMap::new();
            for square in placed {
                fields.insert(field_key(square), FieldConfig::from_square(square));
            }
            groups.push(FieldGroup {
                layout_class: layout_class(layout),
                fields,
            });
        }

        Ok(FormStructure { groups })
    }

    /// Field keys claimed by more than one placed square.
    ///
    /// Colliding keys collapse last-write-wins in [`Self::build`]; this
    /// surfaces them so a caller can warn before exporting.
    #[must_use]
    pub fn key_collisions(
        &self,
        squares: &SquareRegistry,
        placements: &PlacementMap,
    ) -> Vec<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (_, id) in placements.iter() {
            if let Some(square) = squares.get(id) {
                *counts.entry(field_key(square)).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(key, _)| key)
            .collect()
    }
}

fn layout_class(layout: &GridLayout) -> String {
    format!("cols-{}", layout.columns)
}

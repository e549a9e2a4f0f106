#![forbid(unsafe_code)]

//! Field definitions ("squares").
//!
//! A [`Square`] is a reusable, draggable definition of one form field. It
//! knows nothing about layouts or zones: while unplaced it floats at a
//! pixel [`Point`], and once committed to a zone the placement engine flips
//! [`Square::is_used`] and tracks the zone index on its side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Stable identifier for a [`Square`], unique within one registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SquareId(pub u64);

impl std::fmt::Display for SquareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one entry in a select field's option list.
///
/// Options may outlive the building session once a form is saved, so these
/// are real UUIDs rather than best-effort random tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionId(pub Uuid);

impl OptionId {
    /// Generate a fresh random option id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of input kinds a field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line free text.
    #[default]
    Text,
    /// Numeric input.
    Number,
    /// Selection from a fixed option list.
    Select,
    /// Calendar date.
    Date,
    /// Email address.
    Email,
    /// Telephone number.
    Tel,
}

impl FieldKind {
    /// All kinds in declaration order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Select,
        FieldKind::Date,
        FieldKind::Email,
        FieldKind::Tel,
    ];

    /// Wire/display label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::Date => "date",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
        }
    }

    /// True for kinds that carry an option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, FieldKind::Select)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a select field accepts one value or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// Exactly one choice.
    #[default]
    Single,
    /// Any number of choices.
    Multiple,
}

impl SelectMode {
    /// Wire/display label for this mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SelectMode::Single => "single",
            SelectMode::Multiple => "multiple",
        }
    }
}

/// One entry in a select field's option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stable option identifier.
    pub id: OptionId,
    /// Submitted value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FieldOption {
    /// Create an option with a freshly generated id.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: OptionId::generate(),
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A reusable, draggable form-field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    /// Stable identifier.
    pub id: SquareId,
    /// Last free-floating coordinate. Meaningful only while unplaced.
    pub position: Point,
    /// True once the square is committed to a zone.
    pub is_used: bool,
    /// Input kind.
    pub kind: FieldKind,
    /// Display label; also the source of the exported field key.
    pub label: String,
    /// Placeholder text.
    pub placeholder: String,
    /// Option list, populated only for [`FieldKind::Select`].
    pub options: Vec<FieldOption>,
    /// Single/multiple choice, relevant only for [`FieldKind::Select`].
    pub select_mode: SelectMode,
}

impl Square {
    pub(crate) fn new(id: SquareId, position: Point) -> Self {
        Self {
            id,
            position,
            is_used: false,
            kind: FieldKind::default(),
            label: String::new(),
            placeholder: String::new(),
            options: Vec::new(),
            select_mode: SelectMode::default(),
        }
    }

    /// Fallback field key used when the label is empty.
    #[must_use]
    pub fn fallback_key(&self) -> String {
        format!("field{}", self.id)
    }

    /// Look up an option by id.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&FieldOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_square_defaults() {
        let sq = Square::new(SquareId(7), Point::ZERO);
        assert_eq!(sq.kind, FieldKind::Text);
        assert!(!sq.is_used);
        assert!(sq.label.is_empty());
        assert!(sq.options.is_empty());
        assert_eq!(sq.select_mode, SelectMode::Single);
    }

    #[test]
    fn fallback_key_uses_id() {
        let sq = Square::new(SquareId(42), Point::ZERO);
        assert_eq!(sq.fallback_key(), "field42");
    }

    #[test]
    fn only_select_has_options() {
        assert!(FieldKind::Select.has_options());
        for kind in FieldKind::ALL {
            if kind != FieldKind::Select {
                assert!(!kind.has_options(), "{kind} should not carry options");
            }
        }
    }

    #[test]
    fn option_ids_are_distinct() {
        let a = FieldOption::new("a", "A");
        let b = FieldOption::new("a", "A");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&FieldKind::Email).unwrap();
        assert_eq!(json, "\"email\"");
    }
}

#![forbid(unsafe_code)]

//! The square registry.
//!
//! Owns the catalog of field definitions: create, mutate, delete, and the
//! used/unused flag. The registry has no knowledge of layouts or zones.
//! Deleting a square does *not* vacate the zone it may occupy; the placement
//! engine is responsible for doing both in one transaction.
//!
//! All operations run on a single logical thread and are atomic with respect
//! to the in-memory store.

use crate::field::{FieldKind, FieldOption, OptionId, SelectMode, Square, SquareId};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No square with the given id exists.
    NotFound(SquareId),
    /// The square exists but has no option with the given id.
    OptionNotFound {
        /// The square that was searched.
        square: SquareId,
        /// The missing option id.
        option: OptionId,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "square {id} not found"),
            RegistryError::OptionNotFound { square, option } => {
                write!(f, "square {square} has no option {option}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// Partial update applied to one option via [`SquareRegistry::update_option`].
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OptionPatch {
    /// New submitted value, if changing.
    pub value: Option<String>,
    /// New display label, if changing.
    pub label: Option<String>,
}

impl OptionPatch {
    /// Patch only the value.
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: None,
        }
    }

    /// Patch only the label.
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: Some(label.into()),
        }
    }

    /// Also patch the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ---------------------------------------------------------------------------
// SquareRegistry
// ---------------------------------------------------------------------------

/// Catalog of reusable draggable field definitions.
#[derive(Debug, Clone, Default)]
pub struct SquareRegistry {
    squares: Vec<Square>,
    next_id: u64,
}

impl SquareRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously captured squares.
    ///
    /// Id allocation resumes above the highest restored id, so squares
    /// created after a restore never collide with restored ones.
    #[must_use]
    pub fn restore(squares: Vec<Square>) -> Self {
        let next_id = squares.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);
        Self { squares, next_id }
    }

    /// Create a new square at the origin and return it for immediate binding.
    pub fn create(&mut self) -> &Square {
        self.create_at(Point::ZERO)
    }

    /// Create a new square at the given free-floating position.
    pub fn create_at(&mut self, position: Point) -> &Square {
        let id = SquareId(self.next_id);
        self.next_id += 1;
        self.squares.push(Square::new(id, position));
        self.squares
            .last()
            .unwrap_or_else(|| unreachable!("square was just pushed"))
    }

    /// Number of squares in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// True if the registry holds no squares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Look up a square by id.
    #[must_use]
    pub fn get(&self, id: SquareId) -> Option<&Square> {
        self.squares.iter().find(|s| s.id == id)
    }

    /// Look up a square mutably by id.
    pub fn get_mut(&mut self, id: SquareId) -> Option<&mut Square> {
        self.squares.iter_mut().find(|s| s.id == id)
    }

    /// All squares, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// Squares not currently placed in any zone, in creation order.
    pub fn list_available(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().filter(|s| !s.is_used)
    }

    fn resolve(&mut self, id: SquareId) -> RegistryResult<&mut Square> {
        self.squares
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Set the display label.
    pub fn update_label(&mut self, id: SquareId, label: impl Into<String>) -> RegistryResult<()> {
        self.resolve(id)?.label = label.into();
        Ok(())
    }

    /// Set the placeholder text.
    pub fn update_placeholder(
        &mut self,
        id: SquareId,
        placeholder: impl Into<String>,
    ) -> RegistryResult<()> {
        self.resolve(id)?.placeholder = placeholder.into();
        Ok(())
    }

    /// Change the input kind. Options are kept even when the new kind does
    /// not use them, so switching away from `Select` and back is lossless.
    pub fn update_kind(&mut self, id: SquareId, kind: FieldKind) -> RegistryResult<()> {
        self.resolve(id)?.kind = kind;
        Ok(())
    }

    /// Change single/multiple selection.
    pub fn update_select_mode(&mut self, id: SquareId, mode: SelectMode) -> RegistryResult<()> {
        self.resolve(id)?.select_mode = mode;
        Ok(())
    }

    /// Append an option to a square's option list, returning its id.
    pub fn add_option(&mut self, id: SquareId, option: FieldOption) -> RegistryResult<OptionId> {
        let square = self.resolve(id)?;
        let option_id = option.id;
        square.options.push(option);
        Ok(option_id)
    }

    /// Apply a partial update to one option.
    pub fn update_option(
        &mut self,
        id: SquareId,
        option_id: OptionId,
        patch: OptionPatch,
    ) -> RegistryResult<()> {
        let square = self.resolve(id)?;
        let option = square
            .options
            .iter_mut()
            .find(|o| o.id == option_id)
            .ok_or(RegistryError::OptionNotFound {
                square: id,
                option: option_id,
            })?;
        if let Some(value) = patch.value {
            option.value = value;
        }
        if let Some(label) = patch.label {
            option.label = label;
        }
        Ok(())
    }

    /// Remove one option from a square's option list.
    pub fn delete_option(&mut self, id: SquareId, option_id: OptionId) -> RegistryResult<()> {
        let square = self.resolve(id)?;
        let before = square.options.len();
        square.options.retain(|o| o.id != option_id);
        if square.options.len() == before {
            return Err(RegistryError::OptionNotFound {
                square: id,
                option: option_id,
            });
        }
        Ok(())
    }

    /// Remove a square entirely.
    ///
    /// The registry holds no zone knowledge: the caller must vacate any zone
    /// this square occupied, in the same logical transaction.
    pub fn delete(&mut self, id: SquareId) -> RegistryResult<Square> {
        let idx = self
            .squares
            .iter()
            .position(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(self.squares.remove(idx))
    }

    /// Flag the square as placed. Does not touch any zone assignment.
    pub fn mark_used(&mut self, id: SquareId) -> RegistryResult<()> {
        self.resolve(id)?.is_used = true;
        Ok(())
    }

    /// Flag the square as unplaced. Does not touch any zone assignment.
    pub fn mark_unused(&mut self, id: SquareId) -> RegistryResult<()> {
        self.resolve(id)?.is_used = false;
        Ok(())
    }

    /// Set the free-floating position.
    pub fn set_position(&mut self, id: SquareId, position: Point) -> RegistryResult<()> {
        self.resolve(id)?.position = position;
        Ok(())
    }
}

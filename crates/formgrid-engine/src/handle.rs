#![forbid(unsafe_code)]

//! View-side geometry handles.
//!
//! The engine never touches a widget tree or DOM node. Each square's view
//! owns a [`DraggableHandle`] that can report the element's current bounding
//! box, and each render pass contributes the zone rectangles it actually
//! drew via [`ZoneGeometry`]. Hit-testing consumes only these rectangles,
//! which keeps the engine independent of any particular drag library or
//! rendering stack.

use formgrid_core::geometry::BoundRect;
use formgrid_layout::{LayoutId, LayoutRegistry, ZoneIndex, zone_range, zone_rects};

/// A drag source's live geometry, owned one-to-one by the square's view.
pub trait DraggableHandle {
    /// Current bounding box of the dragged element, viewport coordinates.
    fn bounding_box(&self) -> BoundRect;
}

/// A plain rectangle is its own handle; convenient for tests and for views
/// that already track element bounds themselves.
impl DraggableHandle for BoundRect {
    fn bounding_box(&self) -> BoundRect {
        *self
    }
}

/// One rendered drop target: a flat zone index plus its on-screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    /// Flat zone index.
    pub zone: ZoneIndex,
    /// Rendered rectangle.
    pub rect: BoundRect,
}

/// The set of currently rendered drop targets, in render order.
///
/// Render order is the hit-testing tie-break order: when the drop point
/// falls inside several rectangles, the first one in this sequence wins.
/// Collecting geometry is a pure projection of layout state: rebuilding it
/// with unchanged inputs yields identical rectangles and never touches a
/// placement.
#[derive(Debug, Clone, Default)]
pub struct ZoneGeometry {
    rects: Vec<ZoneRect>,
}

impl ZoneGeometry {
    /// No drop targets.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build geometry from each layout's rendered area.
    ///
    /// `areas` maps layout ids to the rectangle the view drew that layout
    /// into; layouts without an entry contribute no targets (not rendered
    /// this frame). Zones appear in layout order, row-major within a layout,
    /// matching the flat zone index sequence.
    #[must_use]
    pub fn collect(layouts: &LayoutRegistry, areas: &[(LayoutId, BoundRect)]) -> Self {
        let mut rects = Vec::new();
        for layout in layouts.layouts() {
            let Some(&(_, area)) = areas.iter().find(|(id, _)| *id == layout.id) else {
                continue;
            };
            let Some(range) = zone_range(layouts.layouts(), layout.id) else {
                continue;
            };
            for (local, rect) in zone_rects(layout, area).into_iter().enumerate() {
                rects.push(ZoneRect {
                    zone: range.start + local,
                    rect,
                });
            }
        }
        Self { rects }
    }

    /// Add one target manually; keeps render order as insertion order.
    pub fn push(&mut self, zone: ZoneIndex, rect: BoundRect) {
        self.rects.push(ZoneRect { zone, rect });
    }

    /// All targets in render order.
    #[must_use]
    pub fn rects(&self) -> &[ZoneRect] {
        &self.rects
    }

    /// Rectangle of one zone, if it was rendered.
    #[must_use]
    pub fn rect_of(&self, zone: ZoneIndex) -> Option<BoundRect> {
        self.rects.iter().find(|z| z.zone == zone).map(|z| z.rect)
    }

    /// Number of rendered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// True if nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#![forbid(unsafe_code)]

//! The zone indexer.
//!
//! Pure functions mapping between layouts and the flat zone index space.
//! A zone is addressed by a single integer in `[0, total_capacity)`; the
//! layout with order `k` owns the contiguous range starting at the sum of
//! the capacities of layouts with order `< k` (an exclusive prefix sum).
//!
//! Every function takes the layout slice already sorted by `order`, which is
//! the invariant `LayoutRegistry` maintains on its backing vector.

use formgrid_core::geometry::BoundRect;

use crate::{GridLayout, LayoutId};

/// Flat index of one drop zone.
pub type ZoneIndex = usize;

/// Total zone capacity across all layouts.
#[must_use]
pub fn total_capacity(layouts: &[GridLayout]) -> usize {
    layouts.iter().map(GridLayout::capacity).sum()
}

/// Exclusive prefix sum of capacities: for each layout, the zone index at
/// which its range begins. Returned in layout order.
#[must_use]
pub fn zone_offsets(layouts: &[GridLayout]) -> Vec<(LayoutId, ZoneIndex)> {
    let mut offsets = Vec::with_capacity(layouts.len());
    let mut acc = 0;
    for layout in layouts {
        offsets.push((layout.id, acc));
        acc += layout.capacity();
    }
    offsets
}

/// The zone index range owned by one layout, or `None` if the id is unknown.
#[must_use]
pub fn zone_range(layouts: &[GridLayout], id: LayoutId) -> Option<std::ops::Range<ZoneIndex>> {
    let mut acc = 0;
    for layout in layouts {
        let end = acc + layout.capacity();
        if layout.id == id {
            return Some(acc..end);
        }
        acc = end;
    }
    None
}

/// Which layout owns the given zone index, or `None` if out of range.
#[must_use]
pub fn zone_owner(layouts: &[GridLayout], zone: ZoneIndex) -> Option<LayoutId> {
    let mut acc = 0;
    for layout in layouts {
        let end = acc + layout.capacity();
        if zone < end {
            return Some(layout.id);
        }
        acc = end;
    }
    None
}

/// Split a layout's rendered area into per-zone rectangles, row-major.
///
/// Zones tile the area in `columns x rows` equal cells; the rectangle at
/// local index `i` corresponds to zone `offset(layout) + i`. Splitting is a
/// pure projection of the input area: recomputing it for an unchanged area
/// yields identical rectangles and touches no placement state.
#[must_use]
pub fn zone_rects(layout: &GridLayout, area: BoundRect) -> Vec<BoundRect> {
    if area.is_empty() {
        return Vec::new();
    }
    let cols = layout.columns as usize;
    let rows = layout.rows as usize;
    let cell_w = area.width / layout.columns as f32;
    let cell_h = area.height / layout.rows as f32;

    let mut rects = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            rects.push(BoundRect::new(
                area.x + col as f32 * cell_w,
                area.y + row as f32 * cell_h,
                cell_w,
                cell_h,
            ));
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutRegistry;
    use formgrid_core::geometry::Point;

    fn layouts(capacities: &[(u32, u32)]) -> Vec<GridLayout> {
        let mut reg = LayoutRegistry::new();
        for &(c, r) in capacities {
            reg.add_layout(c, r).unwrap();
        }
        reg.layouts().to_vec()
    }

    #[test]
    fn offsets_are_exclusive_prefix_sums() {
        let ls = layouts(&[(2, 1), (1, 1), (3, 1)]);
        let offsets: Vec<usize> = zone_offsets(&ls).iter().map(|&(_, o)| o).collect();
        assert_eq!(offsets, vec![0, 2, 3]);
        assert_eq!(total_capacity(&ls), 6);
    }

    #[test]
    fn owner_inverts_offsets() {
        let ls = layouts(&[(2, 1), (1, 1), (3, 1)]);
        for (layout, (id, offset)) in ls.iter().zip(zone_offsets(&ls)) {
            assert_eq!(layout.id, id);
            for k in 0..layout.capacity() {
                assert_eq!(zone_owner(&ls, offset + k), Some(id));
            }
        }
        assert_eq!(zone_owner(&ls, 6), None);
    }

    #[test]
    fn range_matches_offset_and_capacity() {
        let ls = layouts(&[(2, 1), (3, 2)]);
        assert_eq!(zone_range(&ls, ls[0].id), Some(0..2));
        assert_eq!(zone_range(&ls, ls[1].id), Some(2..8));
        assert_eq!(zone_range(&ls, LayoutId(42)), None);
    }

    #[test]
    fn empty_layout_list() {
        assert_eq!(total_capacity(&[]), 0);
        assert!(zone_offsets(&[]).is_empty());
        assert_eq!(zone_owner(&[], 0), None);
    }

    #[test]
    fn rects_tile_row_major() {
        let ls = layouts(&[(2, 2)]);
        let area = BoundRect::new(10.0, 20.0, 100.0, 40.0);
        let rects = zone_rects(&ls[0], area);
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0], BoundRect::new(10.0, 20.0, 50.0, 20.0));
        assert_eq!(rects[1], BoundRect::new(60.0, 20.0, 50.0, 20.0));
        assert_eq!(rects[2], BoundRect::new(10.0, 40.0, 50.0, 20.0));
        assert_eq!(rects[3], BoundRect::new(60.0, 40.0, 50.0, 20.0));
    }

    #[test]
    fn rects_partition_every_interior_point() {
        let ls = layouts(&[(3, 1)]);
        let area = BoundRect::new(0.0, 0.0, 90.0, 30.0);
        let rects = zone_rects(&ls[0], area);
        let probe = Point::new(45.0, 15.0);
        let hits = rects.iter().filter(|r| r.contains(probe)).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn rects_of_empty_area() {
        let ls = layouts(&[(2, 1)]);
        assert!(zone_rects(&ls[0], BoundRect::default()).is_empty());
    }

    #[test]
    fn recomputing_rects_is_stable() {
        let ls = layouts(&[(3, 2)]);
        let area = BoundRect::new(5.0, 5.0, 120.0, 60.0);
        assert_eq!(zone_rects(&ls[0], area), zone_rects(&ls[0], area));
    }
}

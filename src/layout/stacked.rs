use glam::Vec2;

use crate::layout::align::cross_item_offset;
use crate::layout::strategy::aggregate_tracks;
use crate::layout::{Cell, CellStrategy, ChildSlot, Dim, DimExt, GridState};
use crate::style::ComputedStyle;

/// Every child shares cell (0, 0). Only the `stack_top` child sizes the
/// container; the others are laid out against the same box.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackedCells;

impl CellStrategy for StackedCells {
    fn assign_cells(&self, _style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState) {
        for child in children.iter_mut() {
            child.cell = Cell::default();
        }
        grid.cell_counts = Cell::new(1, 1);
        grid.wrap_breaks.clear();
    }

    fn aggregate_cells(&self, style: &ComputedStyle, children: &[ChildSlot], grid: &mut GridState) -> Vec2 {
        grid.init_sizes();
        if let Some(top) = children.get(style.stack_top) {
            aggregate_tracks(std::iter::once(top), Vec2::ZERO, grid);
        }
        Vec2::new(grid.track_sum(Dim::X), grid.track_sum(Dim::Y))
    }

    fn allocate(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState, content: Vec2) {
        self.aggregate_cells(style, children, grid);
        for child in children.iter_mut() {
            for dim in Dim::BOTH {
                let size = if child.fills(dim, dim) {
                    content.dim(dim)
                } else {
                    child.preferred.dim(dim)
                };
                child.alloc.set_dim(dim, size);
            }
        }
    }

    fn position(&self, _style: &ComputedStyle, children: &mut [ChildSlot], _grid: &GridState, content: Vec2) {
        for child in children.iter_mut() {
            child.rel_pos = Vec2::new(
                cross_item_offset(content.x, child.occupied.x, child.align),
                cross_item_offset(content.y, child.occupied.y, child.align),
            );
        }
    }
}

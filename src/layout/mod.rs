//! Layout passes and the per-display-mode cell strategies they delegate to.
//!
//! A layout cycle runs [`size_up`] once, [`size_down`] until it stops asking
//! for another round, then [`position`] and [`scene_pos`]. Only [`scene_pos`]
//! needs to run again after a pure scroll.

pub(crate) mod align;
mod axis;
mod cells;
mod flex;
mod grid;
mod position;
mod size_down;
mod size_up;
mod stacked;
mod strategy;

pub use align::{cross_item_offset, main_axis_start_and_gap};
pub(crate) use align::approx_eq_vec;
pub use axis::{Dim, DimExt, from_main_cross};
pub use cells::{Cell, CellAggregate, GridState};
pub use flex::{FlexCells, wrap_lines};
pub use grid::{GridCells, auto_columns};
pub use position::{position, scene_pos};
pub use size_down::{reserved_scroll_space, resolve_overflow, resolve_scrollbars, size_down};
pub use size_up::size_up;
pub use stacked::StackedCells;
pub use strategy::{CellStrategy, ChildSlot, strategy_for};

use crate::style::{Display, GridPlacement};
use crate::view::{LayoutTree, NodeId};

/// Snapshots `children` of `parent` for a strategy call. A child missing
/// from the tree shows up as a zero-sized slot.
pub(crate) fn child_slots(tree: &LayoutTree, parent: NodeId, children: &[NodeId]) -> Vec<ChildSlot> {
    let Some(parent) = tree.get(parent) else {
        return vec![ChildSlot::default(); children.len()];
    };
    let in_grid = parent.style.display == Display::Grid;
    children
        .iter()
        .map(|&child| match tree.get(child) {
            Some(node) => ChildSlot {
                preferred: node.layout.preferred.total,
                grow: node.style.grow,
                placement: if in_grid { node.style.grid } else { GridPlacement::default() },
                align: node.style.effective_align(&parent.style),
                cell: node.layout.cell,
                alloc: node.layout.alloc,
                occupied: node.layout.visible_total(),
                rel_pos: node.layout.rel_pos,
            },
            None => ChildSlot::default(),
        })
        .collect()
}

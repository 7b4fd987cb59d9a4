use glam::Vec2;

use crate::layout::{Cell, Dim, DimExt, FlexCells, GridCells, GridState, StackedCells};
use crate::style::{AlignItems, ComputedStyle, Display, GridPlacement};

/// What a container knows about one displayed child during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChildSlot {
    /// Preferred total size of the child.
    pub preferred: Vec2,
    pub grow: Vec2,
    pub placement: GridPlacement,
    /// Child's `align_self`, falling back to the container's `align_items`.
    pub align: AlignItems,
    pub cell: Cell,
    /// Total size handed to the child by [`CellStrategy::allocate`].
    pub alloc: Vec2,
    /// Extent the child actually occupies once sized; input to [`CellStrategy::position`].
    pub occupied: Vec2,
    /// Offset from the container's content origin, written by [`CellStrategy::position`].
    pub rel_pos: Vec2,
}

impl ChildSlot {
    pub fn new(preferred: Vec2, grow: Vec2) -> Self {
        Self {
            preferred,
            grow,
            occupied: preferred,
            ..Self::default()
        }
    }

    /// Whether the child takes its full cell extent along `dim` rather than its preferred size.
    pub fn fills(&self, dim: Dim, cross: Dim) -> bool {
        self.grow.dim(dim) > 0.0 || (dim == cross && self.align == AlignItems::Stretch)
    }
}

/// Per-display-mode cell logic. One implementation per [`Display`] variant.
///
/// `content` is always the container's content box, gaps included.
pub trait CellStrategy {
    /// Assigns `cell` on every child and sets `grid.cell_counts`.
    fn assign_cells(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState);

    /// Rebuilds the aggregates from the children's preferred sizes and returns
    /// the content size they need, gaps included.
    fn aggregate_cells(&self, style: &ComputedStyle, children: &[ChildSlot], grid: &mut GridState) -> Vec2;

    /// Distributes `content` among the children, writing each `alloc`.
    fn allocate(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState, content: Vec2);

    /// Writes each child's `rel_pos` from its `occupied` extent.
    fn position(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &GridState, content: Vec2);
}

/// Strategy for a container's display mode. `Display::None` never reaches a
/// pass and is treated like a single stacked cell.
pub fn strategy_for(display: Display) -> &'static dyn CellStrategy {
    match display {
        Display::Flex => &FlexCells,
        Display::Grid => &GridCells,
        Display::Stacked | Display::None => &StackedCells,
    }
}

/// Column/row aggregation shared by every strategy.
///
/// A column keeps the widest member and the summed member heights, a row the
/// mirror image. A child spanning several tracks contributes an even share of
/// its extent, minus inner gaps, to each of them.
pub(crate) fn aggregate_tracks<'a>(
    children: impl IntoIterator<Item = &'a ChildSlot>,
    gap: Vec2,
    grid: &mut GridState,
) {
    grid.init_sizes();
    for child in children {
        for dim in Dim::BOTH {
            let other = dim.other();
            let count = grid.cell_counts.get(dim);
            let start = child.cell.get(dim);
            if start >= count {
                continue;
            }
            let span = span_along(&child.placement, dim).min(count - start);
            let extent = (child.preferred.dim(dim) - gap.dim(dim) * (span - 1) as f32).max(0.0);
            let share = extent / span as f32;
            let grow_share = child.grow.dim(dim) / span as f32;
            for track in &mut grid.tracks_mut(dim)[start..start + span] {
                let widest = track.size.dim(dim).max(share);
                track.size.set_dim(dim, widest);
                track.size.add_dim(other, child.preferred.dim(other));
                track.grow_sum.add_dim(dim, grow_share);
                track.grow_sum.add_dim(other, child.grow.dim(other));
            }
        }
    }
    grid.set_gap_space(gap);
}

pub(crate) fn span_along(placement: &GridPlacement, dim: Dim) -> usize {
    match dim {
        Dim::X => placement.col_span(),
        Dim::Y => placement.row_span(),
    }
}

/// Splits `extra` across `weights` in proportion; zero total weight gives nothing.
pub(crate) fn grow_shares(extra: f32, weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    if extra <= 0.0 || total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|weight| extra * (weight / total)).collect()
}

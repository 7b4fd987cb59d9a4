use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::layout::align::{cross_item_offset, main_axis_start_and_gap};
use crate::layout::strategy::{aggregate_tracks, grow_shares, span_along};
use crate::layout::{Cell, CellStrategy, ChildSlot, Dim, DimExt, GridState};
use crate::style::{ComputedStyle, GridPlacement};

/// Row-major grid. Columns come from the style, or `ceil(sqrt(children))`
/// when unset; rows are as many as placement needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridCells;

/// Column count used for `children` items when the style leaves it at 0.
pub fn auto_columns(children: usize) -> usize {
    ((children as f32).sqrt().ceil() as usize).max(1)
}

#[derive(Default)]
struct Occupancy {
    taken: FxHashSet<(usize, usize)>,
}

impl Occupancy {
    fn fits(&self, cell: Cell, col_span: usize, row_span: usize) -> bool {
        (cell.col..cell.col.saturating_add(col_span)).all(|col| {
            (cell.row..cell.row.saturating_add(row_span)).all(|row| !self.taken.contains(&(col, row)))
        })
    }

    fn take(&mut self, cell: Cell, col_span: usize, row_span: usize) {
        for col in cell.col..cell.col.saturating_add(col_span) {
            for row in cell.row..cell.row.saturating_add(row_span) {
                self.taken.insert((col, row));
            }
        }
    }
}

/// Spans and explicit rows after clamping. Columns are bounded by the column
/// count, rows by the rows auto placement could ever need for the children.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    columns: usize,
    span_limit: usize,
    row_limit: usize,
}

impl Bounds {
    fn new(columns: usize, children: &[ChildSlot]) -> Self {
        let count = children.len().max(1);
        let max_row_span = children
            .iter()
            .map(|child| child.placement.row_span().min(count))
            .max()
            .unwrap_or(1);
        Self {
            columns,
            span_limit: count,
            row_limit: count.saturating_mul(max_row_span),
        }
    }

    fn spans(&self, placement: &GridPlacement) -> (usize, usize) {
        (
            placement.col_span().min(self.columns),
            placement.row_span().min(self.span_limit),
        )
    }

    fn row(&self, row: usize, row_span: usize) -> usize {
        row.min(self.row_limit.saturating_sub(row_span))
    }
}

impl GridCells {
    fn place(placement: &GridPlacement, bounds: &Bounds, cursor: &mut usize, occupancy: &Occupancy) -> Cell {
        let columns = bounds.columns;
        let (col_span, row_span) = bounds.spans(placement);
        let last_col = columns - col_span;
        match (placement.col, placement.row) {
            (Some(col), Some(row)) => Cell::new(col.min(last_col), bounds.row(row, row_span)),
            (Some(col), None) => {
                let col = col.min(last_col);
                let row = (0..)
                    .find(|&row| occupancy.fits(Cell::new(col, row), col_span, row_span))
                    .unwrap_or(0);
                Cell::new(col, row)
            }
            (None, Some(row)) => {
                let row = bounds.row(row, row_span);
                let col = (0..=last_col)
                    .find(|&col| occupancy.fits(Cell::new(col, row), col_span, row_span))
                    .unwrap_or(0);
                Cell::new(col, row)
            }
            (None, None) => {
                let mut index = *cursor;
                loop {
                    let cell = Cell::new(index % columns, index / columns);
                    if cell.col <= last_col && occupancy.fits(cell, col_span, row_span) {
                        *cursor = index + col_span;
                        break cell;
                    }
                    index += 1;
                }
            }
        }
    }
}

impl CellStrategy for GridCells {
    fn assign_cells(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState) {
        let columns = if style.columns > 0 {
            style.columns
        } else {
            auto_columns(children.len())
        };
        let bounds = Bounds::new(columns, children);
        let mut occupancy = Occupancy::default();
        let mut cursor = 0usize;
        let mut rows = 1usize;
        for child in children.iter_mut() {
            let cell = Self::place(&child.placement, &bounds, &mut cursor, &occupancy);
            let (col_span, row_span) = bounds.spans(&child.placement);
            occupancy.take(cell, col_span, row_span);
            rows = rows.max(cell.row.saturating_add(row_span));
            child.cell = cell;
        }
        grid.cell_counts = Cell::new(columns, rows);
        grid.wrap_breaks.clear();
    }

    fn aggregate_cells(&self, style: &ComputedStyle, children: &[ChildSlot], grid: &mut GridState) -> Vec2 {
        aggregate_tracks(children, style.gap, grid);
        Vec2::new(grid.track_sum(Dim::X), grid.track_sum(Dim::Y)) + grid.gap_space
    }

    fn allocate(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState, content: Vec2) {
        self.aggregate_cells(style, children, grid);
        let available = content - grid.gap_space;
        for dim in Dim::BOTH {
            let weights: Vec<f32> = grid.tracks(dim).iter().map(|track| track.grow_sum.dim(dim)).collect();
            let shares = grow_shares(available.dim(dim) - grid.track_sum(dim), &weights);
            for (track, share) in grid.tracks_mut(dim).iter_mut().zip(shares) {
                track.size.add_dim(dim, share);
            }
        }
        for child in children.iter_mut() {
            for dim in Dim::BOTH {
                let size = if child.fills(dim, dim) {
                    grid.span_extent(dim, child.cell.get(dim), span_along(&child.placement, dim), style.gap.dim(dim))
                } else {
                    child.preferred.dim(dim)
                };
                child.alloc.set_dim(dim, size);
            }
        }
    }

    fn position(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &GridState, content: Vec2) {
        let mut offsets: [Vec<f32>; 2] = Default::default();
        for dim in Dim::BOTH {
            let tracks = grid.tracks(dim);
            let gaps = style.gap.dim(dim) * tracks.len().saturating_sub(1) as f32;
            let justify = match dim {
                Dim::X => style.justify_content,
                Dim::Y => style.align_content,
            };
            let (mut cursor, between) = main_axis_start_and_gap(
                content.dim(dim),
                grid.track_sum(dim) + gaps,
                style.gap.dim(dim),
                tracks.len(),
                justify,
            );
            offsets[dim.index()] = tracks
                .iter()
                .map(|track| {
                    let at = cursor;
                    cursor += track.size.dim(dim) + between;
                    at
                })
                .collect();
        }
        for child in children.iter_mut() {
            for dim in Dim::BOTH {
                let start = child.cell.get(dim);
                let origin = offsets[dim.index()].get(start).copied().unwrap_or(0.0);
                let extent = grid.span_extent(dim, start, span_along(&child.placement, dim), style.gap.dim(dim));
                let offset = cross_item_offset(extent, child.occupied.dim(dim), child.align);
                child.rel_pos.set_dim(dim, origin + offset);
            }
        }
    }
}

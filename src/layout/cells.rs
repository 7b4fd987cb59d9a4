use glam::Vec2;

use crate::layout::{Dim, DimExt};

/// Logical (column, row) coordinate of a child within its parent's cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    pub fn get(&self, dim: Dim) -> usize {
        match dim {
            Dim::X => self.col,
            Dim::Y => self.row,
        }
    }

    pub fn set(&mut self, dim: Dim, value: usize) {
        match dim {
            Dim::X => self.col = value,
            Dim::Y => self.row = value,
        }
    }
}

/// Aggregated size of one column or row.
///
/// For a column, `size.x` is the widest member and `size.y` the sum of member
/// heights; a row is the mirror image. `grow_sum` adds up member grow weights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellAggregate {
    pub size: Vec2,
    pub grow_sum: Vec2,
}

/// Per-container cell bookkeeping, rebuilt on every pass that needs it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridState {
    /// Number of columns (`col`) and rows (`row`).
    pub cell_counts: Cell,
    /// Exclusive end index of each wrap line (Flex + Wrap only).
    pub wrap_breaks: Vec<usize>,
    /// Column aggregates in `[0]`, row aggregates in `[1]`.
    pub aggregates: [Vec<CellAggregate>; 2],
    /// Scrollbar gutters: `y` holds the horizontal bar, `x` the vertical one.
    pub scroll_space: Vec2,
    pub gap_space: Vec2,
}

impl GridState {
    /// Allocates fresh, zeroed aggregates for the current `cell_counts`.
    pub fn init_sizes(&mut self) {
        for dim in Dim::BOTH {
            self.aggregates[dim.index()] = vec![CellAggregate::default(); self.cell_counts.get(dim)];
        }
        self.gap_space = Vec2::ZERO;
    }

    pub fn columns(&self) -> &[CellAggregate] {
        &self.aggregates[0]
    }

    pub fn rows(&self) -> &[CellAggregate] {
        &self.aggregates[1]
    }

    /// Columns for `Dim::X`, rows for `Dim::Y`.
    pub fn tracks(&self, dim: Dim) -> &[CellAggregate] {
        &self.aggregates[dim.index()]
    }

    pub fn tracks_mut(&mut self, dim: Dim) -> &mut [CellAggregate] {
        &mut self.aggregates[dim.index()]
    }

    /// Gap between consecutive columns and rows.
    pub fn set_gap_space(&mut self, gap: Vec2) {
        let cols = self.cell_counts.col.saturating_sub(1) as f32;
        let rows = self.cell_counts.row.saturating_sub(1) as f32;
        self.gap_space = Vec2::new(gap.x * cols, gap.y * rows);
    }

    /// Sum of track extents along `dim` (sum of column widths, sum of row heights).
    pub fn track_sum(&self, dim: Dim) -> f32 {
        self.tracks(dim).iter().map(|track| track.size.dim(dim)).sum()
    }

    /// Largest cross-wise sum along `dim` (e.g. the widest row for `Dim::X`).
    pub fn max_line_sum(&self, dim: Dim) -> f32 {
        self.tracks(dim.other())
            .iter()
            .map(|track| track.size.dim(dim))
            .fold(0.0, f32::max)
    }

    pub fn grow_total(&self, dim: Dim) -> f32 {
        self.tracks(dim).iter().map(|track| track.grow_sum.dim(dim)).sum()
    }

    /// Extent covered by `span` tracks starting at `start`, including the gaps between them.
    pub fn span_extent(&self, dim: Dim, start: usize, span: usize, gap: f32) -> f32 {
        let tracks = self.tracks(dim);
        let end = start.saturating_add(span.max(1)).min(tracks.len());
        if start >= end {
            return 0.0;
        }
        let sum: f32 = tracks[start..end].iter().map(|track| track.size.dim(dim)).sum();
        sum + gap * (end - start - 1) as f32
    }

    /// Line index ranges derived from `wrap_breaks`.
    pub fn lines(&self) -> Vec<std::ops::Range<usize>> {
        let mut start = 0;
        self.wrap_breaks
            .iter()
            .map(|&end| {
                let line = start..end;
                start = end;
                line
            })
            .collect()
    }
}

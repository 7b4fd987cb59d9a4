use std::ops::Range;

use glam::Vec2;

use crate::layout::align::{cross_item_offset, main_axis_start_and_gap};
use crate::layout::strategy::{aggregate_tracks, grow_shares};
use crate::layout::{CellStrategy, ChildSlot, Dim, DimExt, GridState, from_main_cross};
use crate::style::ComputedStyle;

/// Row or column flow. Child `i` sits in main-axis cell `i`; its cross-axis
/// cell is the wrap line it landed on (always 0 without wrapping).
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexCells;

/// Greedy line breaking over main-axis sizes.
///
/// Returns the exclusive end index of every line, so three items of 10 with a
/// limit of 25 give `[2, 3]`. A line always holds at least one item.
pub fn wrap_lines(main_sizes: &[f32], gap: f32, limit: f32) -> Vec<usize> {
    let mut breaks = Vec::new();
    let mut line_main = 0.0;
    let mut line_len = 0usize;
    for (index, &size) in main_sizes.iter().enumerate() {
        let next = if line_len == 0 { size } else { line_main + gap + size };
        if line_len > 0 && next > limit + 0.0001 {
            breaks.push(index);
            line_main = size;
            line_len = 1;
        } else {
            line_main = next;
            line_len += 1;
        }
    }
    if !main_sizes.is_empty() {
        breaks.push(main_sizes.len());
    }
    breaks
}

impl FlexCells {
    fn line_ranges(grid: &GridState, count: usize) -> Vec<Range<usize>> {
        if grid.wrap_breaks.is_empty() {
            vec![0..count]
        } else {
            grid.lines()
        }
    }

    fn assign_lines(main: Dim, children: &mut [ChildSlot], grid: &mut GridState, breaks: Vec<usize>) {
        let cross = main.other();
        let mut start = 0;
        for (line, &end) in breaks.iter().enumerate() {
            for (index, child) in children.iter_mut().enumerate().take(end).skip(start) {
                child.cell.set(main, index);
                child.cell.set(cross, line);
            }
            start = end;
        }
        grid.cell_counts.set(main, children.len());
        grid.cell_counts.set(cross, breaks.len().max(1));
        grid.wrap_breaks = breaks;
    }

    fn breaks_for(style: &ComputedStyle, children: &[ChildSlot], limit: f32) -> Vec<usize> {
        let main = style.main_dim();
        if !style.is_wrapping() {
            return vec![children.len()];
        }
        let sizes: Vec<f32> = children.iter().map(|child| child.preferred.dim(main)).collect();
        wrap_lines(&sizes, style.gap.dim(main), limit)
    }
}

impl CellStrategy for FlexCells {
    fn assign_cells(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState) {
        let main = style.main_dim();
        // Before any allocation is known, wrap only against an explicit max.
        let max_main = style.max.dim(main);
        let limit = if max_main > 0.0 { max_main } else { f32::INFINITY };
        let breaks = Self::breaks_for(style, children, limit);
        Self::assign_lines(main, children, grid, breaks);
        if !style.is_wrapping() {
            grid.wrap_breaks.clear();
        }
    }

    fn aggregate_cells(&self, style: &ComputedStyle, children: &[ChildSlot], grid: &mut GridState) -> Vec2 {
        let main = style.main_dim();
        let cross = main.other();
        let gap = style.gap;
        aggregate_tracks(children, gap, grid);

        let lines = Self::line_ranges(grid, children.len());
        let mut main_needed = 0.0f32;
        let mut longest = 0usize;
        for line in &lines {
            let sum: f32 = children[line.clone()].iter().map(|child| child.preferred.dim(main)).sum();
            let gaps = gap.dim(main) * line.len().saturating_sub(1) as f32;
            main_needed = main_needed.max(sum + gaps);
            longest = longest.max(line.len());
        }
        grid.gap_space = from_main_cross(
            main,
            gap.dim(main) * longest.saturating_sub(1) as f32,
            gap.dim(cross) * lines.len().saturating_sub(1) as f32,
        );
        let cross_needed = grid.track_sum(cross) + grid.gap_space.dim(cross);
        if style.is_wrapping() {
            // Lines rewrap to whatever width the parent grants, so a wrapping
            // container only insists on its widest item.
            main_needed = children.iter().map(|child| child.preferred.dim(main)).fold(0.0, f32::max);
        }
        from_main_cross(main, main_needed, cross_needed)
    }

    fn allocate(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &mut GridState, content: Vec2) {
        let main = style.main_dim();
        let cross = main.other();
        let gap = style.gap;

        if style.is_wrapping() {
            let breaks = Self::breaks_for(style, children, content.dim(main));
            Self::assign_lines(main, children, grid, breaks);
        }
        self.aggregate_cells(style, children, grid);
        let lines = Self::line_ranges(grid, children.len());

        let mut line_cross: Vec<f32> = grid.tracks(cross).iter().map(|line| line.size.dim(cross)).collect();
        line_cross.resize(lines.len(), 0.0);
        if lines.len() == 1 {
            line_cross[0] = content.dim(cross);
        } else {
            let used: f32 = line_cross.iter().sum::<f32>() + grid.gap_space.dim(cross);
            let weights: Vec<f32> = grid.tracks(cross).iter().map(|line| line.grow_sum.dim(cross)).collect();
            for (extent, share) in line_cross.iter_mut().zip(grow_shares(content.dim(cross) - used, &weights)) {
                *extent += share;
            }
        }

        for (index, line) in lines.iter().enumerate() {
            let members = &mut children[line.clone()];
            let used: f32 = members.iter().map(|child| child.preferred.dim(main)).sum::<f32>()
                + gap.dim(main) * members.len().saturating_sub(1) as f32;
            let weights: Vec<f32> = members.iter().map(|child| child.grow.dim(main)).collect();
            let shares = grow_shares(content.dim(main) - used, &weights);
            let mut line_main = used;
            for (child, share) in members.iter_mut().zip(shares) {
                let along = child.preferred.dim(main) + share;
                let across = if child.fills(cross, cross) {
                    line_cross[index]
                } else {
                    child.preferred.dim(cross)
                };
                child.alloc = from_main_cross(main, along, across);
                line_main += share;
            }
            if let Some(track) = grid.tracks_mut(cross).get_mut(index) {
                track.size = from_main_cross(main, line_main, line_cross[index]);
            }
        }
        for (track, child) in grid.tracks_mut(main).iter_mut().zip(children.iter()) {
            track.size.set_dim(main, child.alloc.dim(main));
        }
    }

    fn position(&self, style: &ComputedStyle, children: &mut [ChildSlot], grid: &GridState, content: Vec2) {
        let main = style.main_dim();
        let cross = main.other();
        let gap = style.gap;
        let lines = Self::line_ranges(grid, children.len());

        let line_cross: Vec<f32> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let tallest = children[line.clone()]
                    .iter()
                    .map(|child| child.occupied.dim(cross))
                    .fold(0.0, f32::max);
                grid.tracks(cross)
                    .get(index)
                    .map_or(tallest, |track| track.size.dim(cross))
            })
            .collect();
        let occupied_cross =
            line_cross.iter().sum::<f32>() + gap.dim(cross) * lines.len().saturating_sub(1) as f32;
        let (mut cursor_cross, between_lines) = main_axis_start_and_gap(
            content.dim(cross),
            occupied_cross,
            gap.dim(cross),
            lines.len(),
            style.align_content,
        );

        for (index, line) in lines.iter().enumerate() {
            let members = &mut children[line.clone()];
            let occupied_main = members.iter().map(|child| child.occupied.dim(main)).sum::<f32>()
                + gap.dim(main) * members.len().saturating_sub(1) as f32;
            let (mut cursor_main, between) = main_axis_start_and_gap(
                content.dim(main),
                occupied_main,
                gap.dim(main),
                members.len(),
                style.justify_content,
            );
            for child in members.iter_mut() {
                let offset = cross_item_offset(line_cross[index], child.occupied.dim(cross), child.align);
                child.rel_pos = from_main_cross(main, cursor_main, cursor_cross + offset);
                cursor_main += child.occupied.dim(main) + between;
            }
            cursor_cross += line_cross[index] + between_lines;
        }
    }
}

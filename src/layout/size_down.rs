use glam::Vec2;

use crate::config::{LayoutConfig, TraceFlags};
use crate::layout::align::approx_eq_vec;
use crate::layout::{Dim, DimExt, GridState, child_slots, strategy_for};
use crate::style::{ComputedStyle, Overflow, ScrollbarFlags, SizeRecord, clamp_to_max};
use crate::view::{LayoutNode, LayoutTree, NodeId};

/// Scrollbar gutters that `Overflow::Scroll` reserves regardless of content.
/// A horizontal bar takes vertical space and vice versa.
pub fn reserved_scroll_space(style: &ComputedStyle) -> Vec2 {
    Vec2::new(
        if style.overflow_y == Overflow::Scroll { style.scrollbar_width } else { 0.0 },
        if style.overflow_x == Overflow::Scroll { style.scrollbar_width } else { 0.0 },
    )
}

/// Which scrollbars an element shows given the content it needs (box
/// spacing excluded) and the total it was allocated.
///
/// `Auto` bars are re-evaluated once the other axis has reserved its own,
/// and a bar once shown stays for the rest of the evaluation.
pub fn resolve_scrollbars(style: &ComputedStyle, needed: Vec2, alloc: Vec2) -> ScrollbarFlags {
    let box_size = style.box_space().size();
    let mut bars = ScrollbarFlags::empty();
    if style.overflow_x == Overflow::Scroll {
        bars |= ScrollbarFlags::HORIZONTAL;
    }
    if style.overflow_y == Overflow::Scroll {
        bars |= ScrollbarFlags::VERTICAL;
    }
    for _ in 0..2 {
        let space = gutters(bars, style.scrollbar_width);
        let visible = alloc - box_size - space;
        let mut next = bars;
        if style.overflow_x == Overflow::Auto && needed.x > visible.x + 0.0001 {
            next |= ScrollbarFlags::HORIZONTAL;
        }
        if style.overflow_y == Overflow::Auto && needed.y > visible.y + 0.0001 {
            next |= ScrollbarFlags::VERTICAL;
        }
        if next == bars {
            break;
        }
        bars = next;
    }
    bars
}

fn gutters(bars: ScrollbarFlags, width: f32) -> Vec2 {
    Vec2::new(
        if bars.contains(ScrollbarFlags::VERTICAL) { width } else { 0.0 },
        if bars.contains(ScrollbarFlags::HORIZONTAL) { width } else { 0.0 },
    )
}

/// Resolves the element's own size for an allocated total.
///
/// Returns the new size and the scrollbar gutters. `Hidden` axes take the
/// allocation exactly, every other policy never drops below what the content
/// needs.
pub fn resolve_overflow(style: &ComputedStyle, needed: Vec2, alloc: Vec2) -> (SizeRecord, ScrollbarFlags, Vec2) {
    let box_size = style.box_space().size();
    let bars = resolve_scrollbars(style, needed, alloc);
    let space = gutters(bars, style.scrollbar_width);
    let mut size = SizeRecord::default();
    for dim in Dim::BOTH {
        let total = match style.overflow(dim) {
            Overflow::Hidden => alloc.dim(dim),
            _ => (needed.dim(dim) + box_size.dim(dim) + space.dim(dim)).max(alloc.dim(dim)),
        };
        size.total.set_dim(dim, total);
    }
    size.set_content_from_total(box_size + space);
    size.content = clamp_to_max(size.content, style.max);
    size.set_total_from_content(box_size + space);
    (size, bars, space)
}

/// Top-down pass: sizes `id` for the allocated `alloc` total, grows its
/// children and recurses into them.
///
/// Returns `true` when another iteration is needed because an allocation or
/// a preferred size moved since the previous one.
pub fn size_down(tree: &mut LayoutTree, id: NodeId, alloc: Vec2, config: &LayoutConfig) -> bool {
    let children = tree.displayed_children(id);
    let mut slots = child_slots(tree, id, &children);
    let Some(node) = tree.get_mut(id) else {
        return false;
    };
    let LayoutNode {
        name,
        style,
        layout,
        grid,
        ..
    } = node;

    let (size, bars, space) = resolve_overflow(style, layout.preferred.content, alloc);
    layout.size = size;
    layout.alloc = alloc;
    layout.scrollbars = bars;
    layout.clip_x = style.overflow_x.clips();
    layout.clip_y = style.overflow_y.clips();
    layout.scroll_offset = layout.scroll_offset.clamp(Vec2::ZERO, layout.max_scroll());
    grid.scroll_space = space;

    if config.traces(TraceFlags::SIZE_DOWN) {
        tracing::debug!(
            node = %name,
            alloc = ?alloc,
            content = ?layout.size.content,
            total = ?layout.size.total,
            scrollbars = ?bars,
            "size_down"
        );
    }

    if slots.is_empty() {
        return false;
    }

    let style = style.clone();
    let content = layout.size.content;
    let previous_preferred = layout.preferred;
    let strategy = strategy_for(style.display);
    strategy.allocate(&style, &mut slots, grid, content);

    let mut redo = false;
    for (&child, slot) in children.iter().zip(&slots) {
        let previous = tree.get(child).map_or(Vec2::ZERO, |node| node.layout.alloc);
        if !approx_eq_vec(previous, slot.alloc) {
            redo = true;
        }
        if let Some(node) = tree.get_mut(child) {
            node.layout.cell = slot.cell;
        }
        redo |= size_down(tree, child, slot.alloc, config);
    }

    // Refresh the preferred size from what the children now prefer, against
    // the lines chosen for this allocation.
    let refreshed = child_slots(tree, id, &children);
    let Some(node) = tree.get_mut(id) else {
        return redo;
    };
    let mut scratch = GridState {
        cell_counts: node.grid.cell_counts,
        wrap_breaks: node.grid.wrap_breaks.clone(),
        ..GridState::default()
    };
    let needed = strategy.aggregate_cells(&style, &refreshed, &mut scratch);
    let mut preferred = SizeRecord::default();
    preferred.set_content_max(style.min, style.max);
    preferred.set_content_to_fit(needed, style.max);
    preferred.set_total_from_content(style.box_space().size() + reserved_scroll_space(&style));
    if !approx_eq_vec(preferred.total, previous_preferred.total) {
        node.layout.preferred = preferred;
        redo = true;
    }
    redo
}

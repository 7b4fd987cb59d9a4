use glam::Vec2;

use crate::config::{LayoutConfig, TraceFlags};
use crate::layout::{DimExt, GridState, child_slots, reserved_scroll_space, strategy_for};
use crate::style::ComputedStyle;
use crate::view::{LayoutNode, LayoutTree, NodeId};

/// Bottom-up pass: gathers the preferred size of `id` and its whole subtree.
///
/// Children finish before their parent aggregates them. Non-displayed
/// children are reset to an empty, invisible state and take no cell.
pub fn size_up(tree: &mut LayoutTree, id: NodeId, config: &LayoutConfig) {
    let children = tree.displayed_children(id);
    for &child in &children {
        size_up(tree, child, config);
    }
    for child in tree.hidden_children(id) {
        tree.hide_subtree(child);
    }

    let mut slots = child_slots(tree, id, &children);
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    let LayoutNode {
        name,
        style,
        intrinsic,
        layout,
        grid,
        ..
    } = node;

    layout.reset();
    *grid = GridState::default();
    if slots.is_empty() {
        layout.size.set_content_max(leaf_content(style, *intrinsic), style.max);
    } else {
        let strategy = strategy_for(style.display);
        strategy.assign_cells(style, &mut slots, grid);
        let needed = strategy.aggregate_cells(style, &slots, grid);
        layout.size.set_content_max(style.min, style.max);
        layout.size.set_content_to_fit(needed, style.max);
    }
    grid.scroll_space = reserved_scroll_space(style);
    layout.size.set_total_from_content(style.box_space().size() + grid.scroll_space);
    layout.preferred = layout.size;
    layout.alloc = layout.size.total;

    if config.traces(TraceFlags::SIZE_UP) {
        tracing::debug!(
            node = %name,
            content = ?layout.size.content,
            total = ?layout.size.total,
            cells = ?grid.cell_counts,
            "size_up"
        );
    }

    for (child, slot) in children.iter().zip(&slots) {
        if let Some(node) = tree.get_mut(*child) {
            node.layout.cell = slot.cell;
        }
    }
}

/// Style min per axis, or the intrinsic extent where min is unset.
fn leaf_content(style: &ComputedStyle, intrinsic: Option<Vec2>) -> Vec2 {
    let mut content = style.min;
    if let Some(intrinsic) = intrinsic {
        for dim in crate::layout::Dim::BOTH {
            if style.min.dim(dim) <= 0.0 {
                content.set_dim(dim, intrinsic.dim(dim).max(0.0));
            }
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::leaf_content;
    use crate::config::LayoutConfig;
    use crate::layout::{Cell, size_up};
    use crate::style::{ComputedStyle, Display, EdgeInsets, Overflow};
    use crate::view::LayoutTree;
    use glam::Vec2;

    #[test]
    fn leaf_prefers_min_then_intrinsic() {
        let style = ComputedStyle::leaf(20.0, 0.0);
        assert_eq!(leaf_content(&style, None), Vec2::new(20.0, 0.0));
        assert_eq!(leaf_content(&style, Some(Vec2::new(50.0, 12.0))), Vec2::new(20.0, 12.0));
    }

    #[test]
    fn leaf_intrinsic_is_limited_by_max() {
        let mut tree = LayoutTree::new();
        let leaf = tree.insert(ComputedStyle::default().with_max(30.0, 0.0));
        tree.set_intrinsic_size(leaf, Some(Vec2::new(80.0, 14.0))).unwrap();
        size_up(&mut tree, leaf, &LayoutConfig::default());
        assert_eq!(tree.layout(leaf).unwrap().preferred.content, Vec2::new(30.0, 14.0));
    }

    #[test]
    fn row_sums_children_and_adds_box_space() {
        let mut tree = LayoutTree::new();
        let row = tree.insert(
            ComputedStyle::flex_row()
                .with_gap(5.0, 0.0)
                .with_padding(EdgeInsets::uniform(2.0)),
        );
        let a = tree.insert(ComputedStyle::leaf(10.0, 8.0));
        let b = tree.insert(ComputedStyle::leaf(20.0, 4.0));
        tree.append_child(row, a).unwrap();
        tree.append_child(row, b).unwrap();
        size_up(&mut tree, row, &LayoutConfig::default());

        let layout = tree.layout(row).unwrap();
        assert_eq!(layout.size.content, Vec2::new(35.0, 8.0));
        assert_eq!(layout.size.total, Vec2::new(39.0, 12.0));
        assert_eq!(layout.preferred, layout.size);
        assert_eq!(tree.layout(b).unwrap().cell, Cell::new(1, 0));
        assert_eq!(tree.grid_state(row).unwrap().cell_counts, Cell::new(2, 1));
    }

    #[test]
    fn container_min_and_max_bound_the_aggregate() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(ComputedStyle::flex_column().with_min(50.0, 0.0).with_max(0.0, 15.0));
        for _ in 0..3 {
            let leaf = tree.insert(ComputedStyle::leaf(10.0, 10.0));
            tree.append_child(column, leaf).unwrap();
        }
        size_up(&mut tree, column, &LayoutConfig::default());
        assert_eq!(tree.layout(column).unwrap().size.content, Vec2::new(50.0, 15.0));
    }

    #[test]
    fn hidden_children_take_no_space() {
        let mut tree = LayoutTree::new();
        let row = tree.insert(ComputedStyle::flex_row());
        let shown = tree.insert(ComputedStyle::leaf(10.0, 10.0));
        let hidden = tree.insert(ComputedStyle::leaf(90.0, 90.0).with_display(Display::None));
        tree.append_child(row, hidden).unwrap();
        tree.append_child(row, shown).unwrap();
        size_up(&mut tree, row, &LayoutConfig::default());

        assert_eq!(tree.layout(row).unwrap().size.total, Vec2::new(10.0, 10.0));
        assert_eq!(tree.layout(shown).unwrap().cell, Cell::new(0, 0));
        let hidden = tree.layout(hidden).unwrap();
        assert_eq!(hidden.size.total, Vec2::ZERO);
        assert!(!hidden.visible);
    }

    #[test]
    fn scroll_overflow_reserves_gutter_in_preferred_size() {
        let mut tree = LayoutTree::new();
        let pane = tree.insert(
            ComputedStyle::leaf(40.0, 40.0)
                .with_overflow(Overflow::Scroll, Overflow::Auto)
                .with_scrollbar_width(12.0),
        );
        size_up(&mut tree, pane, &LayoutConfig::default());
        assert_eq!(tree.layout(pane).unwrap().preferred.total, Vec2::new(40.0, 52.0));
        assert_eq!(tree.grid_state(pane).unwrap().scroll_space, Vec2::new(0.0, 12.0));
    }
}

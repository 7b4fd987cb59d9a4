use glam::Vec2;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::{position, scene_pos, size_down, size_up};
use crate::view::{LayoutTree, NodeId};

/// Outcome of one [`Viewport::layout`] cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutReport {
    pub size_down_iterations: usize,
    /// `false` when the iteration cap was hit while a pass still asked for more.
    pub converged: bool,
}

/// Drives the layout passes for a tree rendered into a fixed-size surface.
#[derive(Debug, Clone)]
pub struct Viewport {
    size: Vec2,
    config: LayoutConfig,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: surface_size(width, height),
            config: LayoutConfig::default(),
        }
    }

    /// Uses `config` for every pass, e.g. [`LayoutConfig::from_env`].
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = surface_size(width, height);
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Full layout of the tree's root against the viewport size.
    pub fn layout(&self, tree: &mut LayoutTree) -> LayoutReport {
        let Some(root) = tree.root() else {
            return LayoutReport {
                size_down_iterations: 0,
                converged: true,
            };
        };
        if !tree.get(root).is_some_and(|node| node.style().is_displayed()) {
            tree.hide_subtree(root);
            return LayoutReport {
                size_down_iterations: 0,
                converged: true,
            };
        }

        size_up(tree, root, &self.config);
        let mut report = LayoutReport::default();
        while report.size_down_iterations < self.config.max_size_down_iterations {
            report.size_down_iterations += 1;
            if !size_down(tree, root, self.size, &self.config) {
                report.converged = true;
                break;
            }
        }
        if !report.converged {
            tracing::warn!(
                iterations = report.size_down_iterations,
                "size_down did not settle, keeping the last iteration"
            );
        }
        position(tree, root, &self.config);
        scene_pos(tree, root, &self.config);
        report
    }

    /// Scrolls `id` and refreshes scene positions of its subtree only.
    pub fn scroll_by(&self, tree: &mut LayoutTree, id: NodeId, delta: Vec2) -> Result<bool> {
        let changed = tree.scroll_by(id, delta)?;
        if changed {
            scene_pos(tree, id, &self.config);
        }
        Ok(changed)
    }

    pub fn set_scroll_offset(&self, tree: &mut LayoutTree, id: NodeId, offset: Vec2) -> Result<bool> {
        let changed = tree.set_scroll_offset(id, offset)?;
        if changed {
            scene_pos(tree, id, &self.config);
        }
        Ok(changed)
    }

    /// Scrolls the deepest element under `point` that can move by `delta`,
    /// bubbling up through its ancestors. Returns the element that scrolled.
    pub fn scroll_at(&self, tree: &mut LayoutTree, point: Vec2, delta: Vec2) -> Option<NodeId> {
        let mut current = tree.hit_test(point);
        while let Some(id) = current {
            if self.scroll_by(tree, id, delta).unwrap_or(false) {
                return Some(id);
            }
            current = tree.parent(id);
        }
        None
    }
}

/// Negative and non-finite extents collapse to zero.
fn surface_size(width: f32, height: f32) -> Vec2 {
    let size = Vec2::new(width, height);
    if !size.is_finite() {
        tracing::warn!(width, height, "non-finite viewport size, using zero");
    }
    Vec2::new(
        if width.is_finite() { width.max(0.0) } else { 0.0 },
        if height.is_finite() { height.max(0.0) } else { 0.0 },
    )
}

/// Scroll offsets keyed by node name, carried across a tree rebuild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollSnapshot {
    offsets: FxHashMap<SmolStr, Vec2>,
}

impl ScrollSnapshot {
    /// Records every named node that is scrolled away from the origin.
    pub fn capture(tree: &LayoutTree) -> Self {
        let offsets = tree
            .iter()
            .filter(|(_, node)| !node.name().is_empty() && node.layout().scroll_offset != Vec2::ZERO)
            .map(|(_, node)| (node.name.clone(), node.layout().scroll_offset))
            .collect();
        Self { offsets }
    }

    /// Writes the saved offsets back onto nodes with matching names and
    /// returns how many were restored. The next layout clamps them.
    pub fn restore(&self, tree: &mut LayoutTree) -> usize {
        let targets: Vec<(NodeId, Vec2)> = tree
            .iter()
            .filter_map(|(id, node)| self.offsets.get(node.name()).map(|&offset| (id, offset)))
            .collect();
        for &(id, offset) in &targets {
            if let Some(node) = tree.get_mut(id) {
                node.layout.scroll_offset = offset;
            }
        }
        targets.len()
    }

    pub fn get(&self, name: &str) -> Option<Vec2> {
        self.offsets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutReport, ScrollSnapshot, Viewport};
    use crate::config::LayoutConfig;
    use crate::layout::align::approx_eq;
    use crate::layout::{Cell, Dim, DimExt};
    use crate::style::{AlignItems, ComputedStyle, EdgeInsets, GridPlacement, Overflow, Rect, ScrollbarFlags};
    use crate::view::{LayoutTree, NodeId};
    use glam::Vec2;

    fn row_of(tree: &mut LayoutTree, style: ComputedStyle, leaves: &[ComputedStyle]) -> (NodeId, Vec<NodeId>) {
        let root = tree.insert(style);
        let children = leaves
            .iter()
            .map(|leaf| {
                let id = tree.insert(leaf.clone());
                tree.append_child(root, id).unwrap();
                id
            })
            .collect();
        (root, children)
    }

    fn total(tree: &LayoutTree, id: NodeId) -> Vec2 {
        tree.layout(id).unwrap().size.total
    }

    #[test]
    fn equal_growth_splits_extra_space() {
        let mut tree = LayoutTree::new();
        let leaf = ComputedStyle::leaf(10.0, 10.0).with_grow(1.0, 0.0);
        let (_, children) = row_of(&mut tree, ComputedStyle::flex_row(), &[leaf.clone(), leaf.clone(), leaf]);
        let report = Viewport::new(100.0, 10.0).layout(&mut tree);

        assert!(report.converged);
        for &child in &children {
            assert!(approx_eq(total(&tree, child).x, 10.0 + 70.0 / 3.0));
        }
        assert!(approx_eq(tree.layout(children[2]).unwrap().rel_pos.x, 2.0 * (10.0 + 70.0 / 3.0)));
    }

    #[test]
    fn unequal_growth_is_proportional() {
        let mut tree = LayoutTree::new();
        let (_, children) = row_of(
            &mut tree,
            ComputedStyle::flex_row(),
            &[
                ComputedStyle::leaf(10.0, 10.0).with_grow(1.0, 0.0),
                ComputedStyle::leaf(10.0, 10.0).with_grow(3.0, 0.0),
            ],
        );
        Viewport::new(100.0, 10.0).layout(&mut tree);
        assert!(approx_eq(total(&tree, children[0]).x, 30.0));
        assert!(approx_eq(total(&tree, children[1]).x, 70.0));
    }

    #[test]
    fn flex_children_and_gaps_fit_the_content_box() {
        let mut tree = LayoutTree::new();
        let style = ComputedStyle::flex_row()
            .with_gap(6.0, 0.0)
            .with_padding(EdgeInsets::uniform(3.0));
        let leaves = [
            ComputedStyle::leaf(10.0, 10.0),
            ComputedStyle::leaf(25.0, 5.0),
            ComputedStyle::leaf(5.0, 12.0),
        ];
        let (root, children) = row_of(&mut tree, style, &leaves);

        // Allocated exactly the preferred size: equality.
        Viewport::new(58.0, 18.0).layout(&mut tree);
        let used: f32 = children.iter().map(|&child| total(&tree, child).x).sum::<f32>() + 12.0;
        let content = tree.layout(root).unwrap().size.content;
        assert_eq!(tree.layout(root).unwrap().preferred.total, Vec2::new(58.0, 18.0));
        assert!(approx_eq(used, content.x));

        // Room to spare and nothing grows: strictly less.
        Viewport::new(200.0, 18.0).layout(&mut tree);
        let content = tree.layout(root).unwrap().size.content;
        assert!(used < content.x);
    }

    #[test]
    fn layout_is_idempotent() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(ComputedStyle::flex_column().with_overflow(Overflow::Hidden, Overflow::Auto));
        let grid = tree.insert(ComputedStyle::grid(0).with_gap(2.0, 2.0).with_grow(1.0, 0.0));
        tree.append_child(root, grid).unwrap();
        for index in 0..7 {
            let cell = tree.insert(ComputedStyle::leaf(10.0 + index as f32, 12.0).with_grow(1.0, 1.0));
            tree.append_child(grid, cell).unwrap();
        }
        let wrap = tree.insert(ComputedStyle::flex_row().with_wrap().with_align_self(AlignItems::Stretch));
        tree.append_child(root, wrap).unwrap();
        for _ in 0..5 {
            let chip = tree.insert(ComputedStyle::leaf(30.0, 8.0));
            tree.append_child(wrap, chip).unwrap();
        }

        let viewport = Viewport::new(80.0, 40.0);
        viewport.layout(&mut tree);
        let first: Vec<_> = tree.iter().map(|(id, node)| (id, *node.layout(), node.grid().clone())).collect();
        viewport.layout(&mut tree);
        let second: Vec<_> = tree.iter().map(|(id, node)| (id, *node.layout(), node.grid().clone())).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn grid_falls_back_to_square_layout() {
        let mut tree = LayoutTree::new();
        let leaves = vec![ComputedStyle::leaf(10.0, 10.0); 9];
        let (root, children) = row_of(&mut tree, ComputedStyle::grid(0), &leaves);
        Viewport::new(30.0, 30.0).layout(&mut tree);

        assert_eq!(tree.grid_state(root).unwrap().cell_counts, Cell::new(3, 3));
        for (index, &child) in children.iter().enumerate() {
            let layout = tree.layout(child).unwrap();
            assert_eq!(layout.cell, Cell::new(index % 3, index / 3));
            assert_eq!(layout.scene_pos, Vec2::new((index % 3) as f32 * 10.0, (index / 3) as f32 * 10.0));
        }
    }

    #[test]
    fn scroll_axis_reserves_gutter_and_clips_bbox() {
        let mut tree = LayoutTree::new();
        let (root, _) = row_of(
            &mut tree,
            ComputedStyle::flex_row()
                .with_overflow(Overflow::Scroll, Overflow::Visible)
                .with_scrollbar_width(12.0),
            &[ComputedStyle::leaf(200.0, 20.0)],
        );
        Viewport::new(100.0, 32.0).layout(&mut tree);

        let layout = tree.layout(root).unwrap();
        assert_eq!(tree.grid_state(root).unwrap().scroll_space.y, 12.0);
        assert_eq!(layout.size.content.x, 200.0);
        assert_eq!(layout.bbox.width, 100.0);
        assert_eq!(layout.content_bbox, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(layout.scrollbars, ScrollbarFlags::HORIZONTAL);
        assert_eq!(layout.max_scroll(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn stacked_size_ignores_hidden_panes() {
        let mut tree = LayoutTree::new();
        let (root, panes) = row_of(
            &mut tree,
            ComputedStyle::stacked(1),
            &[
                ComputedStyle::leaf(10.0, 10.0),
                ComputedStyle::leaf(20.0, 20.0),
                ComputedStyle::leaf(30.0, 30.0),
            ],
        );
        let viewport = Viewport::new(0.0, 0.0);
        viewport.layout(&mut tree);
        assert_eq!(total(&tree, root), Vec2::new(20.0, 20.0));

        tree.set_style(panes[0], ComputedStyle::leaf(300.0, 5.0)).unwrap();
        tree.set_style(panes[2], ComputedStyle::leaf(4.0, 400.0)).unwrap();
        viewport.layout(&mut tree);
        assert_eq!(total(&tree, root), Vec2::new(20.0, 20.0));
        assert_eq!(tree.layout(root).unwrap().preferred.total, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn wrap_breaks_follow_the_allocated_width() {
        let mut tree = LayoutTree::new();
        let leaves = vec![ComputedStyle::leaf(10.0, 10.0); 3];
        let (root, children) = row_of(&mut tree, ComputedStyle::flex_row().with_wrap(), &leaves);
        let report = Viewport::new(25.0, 100.0).layout(&mut tree);

        assert!(report.converged);
        assert_eq!(tree.grid_state(root).unwrap().wrap_breaks, vec![2, 3]);
        assert_eq!(tree.layout(children[2]).unwrap().rel_pos, Vec2::new(0.0, 10.0));
        assert_eq!(tree.layout(root).unwrap().preferred.content, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn wrapping_child_grows_taller_inside_a_clipped_parent() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(
            ComputedStyle::flex_column()
                .with_overflow(Overflow::Hidden, Overflow::Visible)
                .with_align_items(AlignItems::Stretch),
        );
        let wrap = tree.insert(ComputedStyle::flex_row().with_wrap());
        tree.append_child(root, wrap).unwrap();
        for _ in 0..4 {
            let chip = tree.insert(ComputedStyle::leaf(20.0, 10.0));
            tree.append_child(wrap, chip).unwrap();
        }
        let report = Viewport::new(50.0, 10.0).layout(&mut tree);

        assert!(report.converged);
        assert_eq!(tree.grid_state(wrap).unwrap().wrap_breaks, vec![2, 4]);
        assert_eq!(total(&tree, wrap), Vec2::new(50.0, 20.0));
        assert_eq!(total(&tree, root).dim(Dim::Y), 20.0);
    }

    #[test]
    fn wrap_row_rewraps_under_plain_stretched_columns() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(
            ComputedStyle::flex_column()
                .with_overflow(Overflow::Hidden, Overflow::Auto)
                .with_align_items(AlignItems::Stretch),
        );
        let outer = tree.insert(ComputedStyle::flex_column().with_align_items(AlignItems::Stretch));
        let inner = tree.insert(ComputedStyle::flex_column().with_align_items(AlignItems::Stretch));
        let wrap = tree.insert(ComputedStyle::flex_row().with_wrap());
        tree.append_child(root, outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.append_child(inner, wrap).unwrap();
        for _ in 0..6 {
            let chip = tree.insert(ComputedStyle::leaf(30.0, 10.0));
            tree.append_child(wrap, chip).unwrap();
        }
        let report = Viewport::new(70.0, 100.0).layout(&mut tree);

        assert!(report.converged);
        assert_eq!(tree.grid_state(wrap).unwrap().wrap_breaks, vec![2, 4, 6]);
        assert_eq!(total(&tree, wrap), Vec2::new(70.0, 30.0));
        assert_eq!(total(&tree, outer), Vec2::new(70.0, 30.0));
        assert!(tree.layout(root).unwrap().scrollbars.is_empty());
    }

    #[test]
    fn grid_row_far_past_the_children_lays_out() {
        let mut tree = LayoutTree::new();
        let (root, children) = row_of(
            &mut tree,
            ComputedStyle::grid(2),
            &[ComputedStyle::leaf(10.0, 10.0).with_placement(GridPlacement::at(0, usize::MAX))],
        );
        let report = Viewport::new(40.0, 40.0).layout(&mut tree);

        assert!(report.converged);
        assert_eq!(tree.layout(children[0]).unwrap().cell, Cell::new(0, 0));
        assert_eq!(tree.grid_state(root).unwrap().cell_counts, Cell::new(2, 1));
    }

    #[test]
    fn non_finite_viewport_collapses_to_zero() {
        let mut viewport = Viewport::new(f32::INFINITY, 50.0);
        assert_eq!(viewport.size(), Vec2::new(0.0, 50.0));
        viewport.set_size(30.0, f32::NAN);
        assert_eq!(viewport.size(), Vec2::new(30.0, 0.0));

        let mut tree = LayoutTree::new();
        let leaf = ComputedStyle::leaf(10.0, 10.0).with_grow(1.0, 0.0);
        let (_, children) = row_of(&mut tree, ComputedStyle::flex_row(), &[leaf]);
        let report = Viewport::new(f32::INFINITY, 10.0).layout(&mut tree);
        assert!(report.converged);
        assert_eq!(total(&tree, children[0]), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let mut tree = LayoutTree::new();
        let leaf = ComputedStyle::leaf(10.0, 10.0).with_grow(1.0, 0.0);
        row_of(&mut tree, ComputedStyle::flex_row(), &[leaf]);
        let viewport = Viewport::new(100.0, 10.0).with_config(LayoutConfig::default().with_max_iterations(1));
        assert_eq!(
            viewport.layout(&mut tree),
            LayoutReport {
                size_down_iterations: 1,
                converged: false,
            }
        );
        let report = Viewport::new(100.0, 10.0).layout(&mut tree);
        assert_eq!(report.size_down_iterations, 2);
        assert!(report.converged);
    }

    #[test]
    fn scroll_at_bubbles_to_the_scrollable_ancestor() {
        let mut tree = LayoutTree::new();
        let leaves = vec![ComputedStyle::leaf(50.0, 40.0); 5];
        let (root, children) = row_of(
            &mut tree,
            ComputedStyle::flex_column().with_overflow(Overflow::Hidden, Overflow::Auto),
            &leaves,
        );
        let viewport = Viewport::new(60.0, 100.0);
        viewport.layout(&mut tree);
        assert_eq!(tree.hit_test(Vec2::new(5.0, 45.0)), Some(children[1]));

        assert_eq!(viewport.scroll_at(&mut tree, Vec2::new(5.0, 45.0), Vec2::new(0.0, 30.0)), Some(root));
        assert_eq!(tree.layout(children[1]).unwrap().scene_pos, Vec2::new(0.0, 10.0));
        assert_eq!(viewport.scroll_at(&mut tree, Vec2::new(5.0, 5.0), Vec2::new(0.0, 500.0)), Some(root));
        assert_eq!(tree.layout(root).unwrap().scroll_offset, Vec2::new(0.0, 100.0));
        assert_eq!(viewport.scroll_at(&mut tree, Vec2::new(5.0, 5.0), Vec2::new(0.0, 10.0)), None);
        assert_eq!(tree.hit_test(Vec2::new(55.0, 5.0)), Some(root));
    }

    #[test]
    fn snapshot_restores_offsets_after_rebuild() {
        fn build() -> (LayoutTree, NodeId) {
            let mut tree = LayoutTree::new();
            let pane = tree.insert_named(
                "list",
                ComputedStyle::flex_column().with_overflow(Overflow::Hidden, Overflow::Scroll),
            );
            for _ in 0..10 {
                let item = tree.insert(ComputedStyle::leaf(20.0, 20.0));
                tree.append_child(pane, item).unwrap();
            }
            (tree, pane)
        }

        let viewport = Viewport::new(50.0, 50.0);
        let (mut tree, pane) = build();
        viewport.layout(&mut tree);
        viewport.set_scroll_offset(&mut tree, pane, Vec2::new(0.0, 60.0)).unwrap();
        let snapshot = ScrollSnapshot::capture(&tree);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("list"), Some(Vec2::new(0.0, 60.0)));

        let (mut rebuilt, pane) = build();
        assert_eq!(snapshot.restore(&mut rebuilt), 1);
        viewport.layout(&mut rebuilt);
        assert_eq!(rebuilt.layout(pane).unwrap().scroll_offset, Vec2::new(0.0, 60.0));
        let first = rebuilt.children(pane)[0];
        assert_eq!(rebuilt.layout(first).unwrap().scene_pos, Vec2::new(0.0, -60.0));
    }

    #[test]
    fn hidden_root_lays_out_nothing() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(ComputedStyle::leaf(10.0, 10.0).with_display(crate::style::Display::None));
        let report = Viewport::new(10.0, 10.0).layout(&mut tree);
        assert_eq!(report.size_down_iterations, 0);
        assert!(!tree.layout(root).unwrap().visible);
        assert_eq!(tree.hit_test(Vec2::new(1.0, 1.0)), None);
    }
}

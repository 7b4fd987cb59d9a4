use glam::Vec2;
use slotmap::SlotMap;
use smol_str::SmolStr;

use crate::error::{LayoutError, Result};
use crate::layout::{GridState, approx_eq_vec};
use crate::style::{ComputedStyle, LayoutState};

slotmap::new_key_type! {
    /// Handle to an element in a [`LayoutTree`].
    pub struct NodeId;
}

/// One element: its style input and the layout output the passes write.
#[derive(Debug, Clone, Default)]
pub struct LayoutNode {
    pub(crate) name: SmolStr,
    pub(crate) style: ComputedStyle,
    pub(crate) intrinsic: Option<Vec2>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layout: LayoutState,
    pub(crate) grid: GridState,
}

impl LayoutNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &ComputedStyle {
        &self.style
    }

    pub fn intrinsic_size(&self) -> Option<Vec2> {
        self.intrinsic
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }
}

/// Arena of elements. Parents own their child order; every node has at most
/// one parent.
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: SlotMap<NodeId, LayoutNode>,
    root: Option<NodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node. The first node inserted becomes the root.
    pub fn insert(&mut self, style: ComputedStyle) -> NodeId {
        self.insert_named("", style)
    }

    /// Adds a detached node with a name, used to key scroll snapshots.
    pub fn insert_named(&mut self, name: impl Into<SmolStr>, style: ComputedStyle) -> NodeId {
        let name = name.into();
        let style = sanitize_style(&name, style);
        let id = self.nodes.insert(LayoutNode {
            name,
            style,
            ..LayoutNode::default()
        });
        self.root.get_or_insert(id);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.root = Some(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id)
    }

    fn node(&self, id: NodeId) -> Result<&LayoutNode> {
        self.nodes.get(id).ok_or(LayoutError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut LayoutNode> {
        self.nodes.get_mut(id).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LayoutNode)> {
        self.nodes.iter()
    }

    /// Appends `child` under `parent`. Adopting the current root moves the
    /// root up to the top of `parent`'s tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(LayoutError::AlreadyAttached { child });
        }
        self.check_cycle(parent, child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        if self.root == Some(child) {
            self.root = Some(self.top_of(parent));
        }
        Ok(())
    }

    fn check_cycle(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(LayoutError::WouldCycle { parent, child });
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        Ok(())
    }

    fn top_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Detaches `id` from its parent, keeping its subtree.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.node_mut(id)?.parent.take()
            && let Some(parent) = self.nodes.get_mut(parent)
        {
            parent.children.retain(|&child| child != id);
        }
        Ok(())
    }

    /// Removes `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children in order; empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn displayed_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.nodes.get(child).is_some_and(|node| node.style.is_displayed()))
            .collect()
    }

    pub(crate) fn hidden_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.nodes.get(child).is_some_and(|node| !node.style.is_displayed()))
            .collect()
    }

    /// Clears the layout output of a non-displayed subtree.
    pub(crate) fn hide_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next) {
                node.layout.reset();
                node.grid = GridState::default();
                pending.extend(node.children.iter().copied());
            }
        }
    }

    pub fn style(&self, id: NodeId) -> Option<&ComputedStyle> {
        self.nodes.get(id).map(|node| &node.style)
    }

    /// Replaces the style. Non-finite or negative values are clamped to 0
    /// and logged.
    pub fn set_style(&mut self, id: NodeId, style: ComputedStyle) -> Result<()> {
        let node = self.node_mut(id)?;
        node.style = sanitize_style(&node.name, style);
        Ok(())
    }

    /// Replaces the style, rejecting non-finite values instead of clamping them.
    pub fn try_set_style(&mut self, id: NodeId, style: ComputedStyle) -> Result<()> {
        style.validate()?;
        self.node_mut(id)?.style = style.sanitized().0;
        Ok(())
    }

    /// Sets the measured content size of a leaf, such as shaped text extent.
    pub fn set_intrinsic_size(&mut self, id: NodeId, size: Option<Vec2>) -> Result<()> {
        if let Some(size) = size
            && !size.is_finite()
        {
            return Err(LayoutError::NonFinite {
                field: "intrinsic",
                value: if size.x.is_finite() { size.y } else { size.x },
            });
        }
        self.node_mut(id)?.intrinsic = size.map(|size| size.max(Vec2::ZERO));
        Ok(())
    }

    pub fn layout(&self, id: NodeId) -> Option<&LayoutState> {
        self.nodes.get(id).map(|node| &node.layout)
    }

    pub fn grid_state(&self, id: NodeId) -> Option<&GridState> {
        self.nodes.get(id).map(|node| &node.grid)
    }

    /// Scrolls along the axes whose overflow scrolls. Returns whether the
    /// offset moved. Scene positions are stale until the next ScenePos.
    pub fn scroll_by(&mut self, id: NodeId, delta: Vec2) -> Result<bool> {
        let node = self.node_mut(id)?;
        let mut delta = delta;
        if !node.style.overflow_x.scrolls() {
            delta.x = 0.0;
        }
        if !node.style.overflow_y.scrolls() {
            delta.y = 0.0;
        }
        let target = node.layout.scroll_offset + delta;
        Ok(apply_scroll(node, target))
    }

    /// Sets the scroll offset, clamped to the scrollable range.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: Vec2) -> Result<bool> {
        let node = self.node_mut(id)?;
        Ok(apply_scroll(node, offset))
    }

    /// Deepest visible node whose bbox contains `point`, front-most child first.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        fn find(tree: &LayoutTree, id: NodeId, point: Vec2) -> Option<NodeId> {
            let node = tree.nodes.get(id)?;
            let bbox = node.layout.bbox;
            if !node.style.is_displayed() || !node.layout.visible || !bbox.contains(point.x, point.y) {
                return None;
            }
            let clipped_out = node
                .layout
                .child_clip
                .is_some_and(|clip| !clip.contains(point.x, point.y));
            if !clipped_out {
                for &child in node.children.iter().rev() {
                    if let Some(hit) = find(tree, child, point) {
                        return Some(hit);
                    }
                }
            }
            Some(id)
        }

        find(self, self.root?, point)
    }
}

fn apply_scroll(node: &mut LayoutNode, target: Vec2) -> bool {
    let next = target.clamp(Vec2::ZERO, node.layout.max_scroll());
    let changed = !approx_eq_vec(next, node.layout.scroll_offset);
    node.layout.scroll_offset = next;
    changed
}

fn sanitize_style(name: &str, style: ComputedStyle) -> ComputedStyle {
    let (clean, changed) = style.sanitized();
    if !changed.is_empty() {
        tracing::warn!(node = name, fields = ?changed, "clamped invalid style values");
    }
    clean
}

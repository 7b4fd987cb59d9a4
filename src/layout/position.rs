use glam::Vec2;

use crate::config::{LayoutConfig, TraceFlags};
use crate::layout::{child_slots, strategy_for};
use crate::style::{Display, Rect};
use crate::view::{LayoutNode, LayoutTree, NodeId};

/// Half extent of the clip rect along axes that do not clip.
const UNBOUNDED: f32 = 1_000_000_000.0;

/// Writes `rel_pos` for every displayed descendant of `id`, relative to its
/// parent's content origin. Sizes are final by now and are not touched.
pub fn position(tree: &mut LayoutTree, id: NodeId, config: &LayoutConfig) {
    let children = tree.displayed_children(id);
    if children.is_empty() {
        return;
    }
    let mut slots = child_slots(tree, id, &children);
    let Some(node) = tree.get(id) else {
        return;
    };
    strategy_for(node.style.display).position(&node.style, &mut slots, &node.grid, node.layout.size.content);

    for (&child, slot) in children.iter().zip(&slots) {
        if let Some(node) = tree.get_mut(child) {
            node.layout.rel_pos = slot.rel_pos;
            if config.traces(TraceFlags::POSITION) {
                tracing::debug!(node = %node.name, rel_pos = ?slot.rel_pos, "position");
            }
        }
        position(tree, child, config);
    }
}

/// Converts relative offsets of `id` and its subtree into scene coordinates.
///
/// Cheap enough to rerun on its own after a scroll: it reads the parent's
/// current scene position, scroll offset and clip.
pub fn scene_pos(tree: &mut LayoutTree, id: NodeId, config: &LayoutConfig) {
    let (origin, scroll, clip) = match tree.parent(id).and_then(|parent| tree.get(parent)) {
        Some(parent) => (
            parent.layout.scene_pos + parent.style.box_space().top_left(),
            parent.layout.scroll_offset,
            parent.layout.child_clip,
        ),
        None => (Vec2::ZERO, Vec2::ZERO, None),
    };
    let shown = !behind_stack_top(tree, id);
    place(tree, id, origin, scroll, clip, shown, config);
}

/// Whether `id` or one of its ancestors is a non-top pane of a stacked container.
fn behind_stack_top(tree: &LayoutTree, id: NodeId) -> bool {
    let mut current = id;
    while let Some(parent) = tree.parent(current) {
        if let Some(node) = tree.get(parent)
            && node.style.display == Display::Stacked
            && tree.displayed_children(parent).iter().position(|&child| child == current)
                != Some(node.style.stack_top)
        {
            return true;
        }
        current = parent;
    }
    false
}

fn place(
    tree: &mut LayoutTree,
    id: NodeId,
    origin: Vec2,
    scroll: Vec2,
    clip: Option<Rect>,
    shown: bool,
    config: &LayoutConfig,
) {
    let children = tree.displayed_children(id);
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    let LayoutNode {
        name,
        style,
        layout,
        grid,
        ..
    } = node;

    let box_space = style.box_space();
    let visible_total = layout.visible_total();
    layout.scene_pos = origin + layout.rel_pos - scroll;
    layout.bbox = Rect::from_pos_size(layout.scene_pos, visible_total);
    layout.content_bbox = Rect::from_pos_size(
        layout.scene_pos + box_space.top_left(),
        visible_total - box_space.size() - grid.scroll_space,
    );
    layout.visible = shown && clip.is_none_or(|clip| layout.bbox.intersects(&clip));

    let child_clip = if layout.clip_x || layout.clip_y {
        let content = layout.content_bbox;
        let own = Rect::new(
            if layout.clip_x { content.x } else { -UNBOUNDED },
            if layout.clip_y { content.y } else { -UNBOUNDED },
            if layout.clip_x { content.width } else { 2.0 * UNBOUNDED },
            if layout.clip_y { content.height } else { 2.0 * UNBOUNDED },
        );
        Some(clip.map_or(own, |clip| clip.intersection(&own)))
    } else {
        clip
    };
    layout.child_clip = child_clip;

    if config.traces(TraceFlags::SCENE_POS) {
        tracing::debug!(
            node = %name,
            scene_pos = ?layout.scene_pos,
            bbox = ?layout.bbox,
            visible = layout.visible,
            "scene_pos"
        );
    }

    let child_origin = layout.scene_pos + box_space.top_left();
    let child_scroll = layout.scroll_offset;
    let stack_top = (style.display == Display::Stacked).then_some(style.stack_top);
    for (index, child) in children.into_iter().enumerate() {
        let shown = shown && stack_top.is_none_or(|top| top == index);
        place(tree, child, child_origin, child_scroll, child_clip, shown, config);
    }
}

use bitflags::bitflags;
use glam::Vec2;

use crate::layout::Cell;

/// Content and total size of an element.
///
/// `total = content + box spacing (+ scrollbar gutters)`, `content` is never
/// negative and never exceeds a positive `max`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeRecord {
    pub content: Vec2,
    pub total: Vec2,
}

impl SizeRecord {
    /// Sets the content to `size`, limited by `max` on axes where it is positive.
    pub fn set_content_max(&mut self, size: Vec2, max: Vec2) {
        self.content = clamp_to_max(size.max(Vec2::ZERO), max);
    }

    /// Grows the content to fit `size`, limited by `max` on axes where it is positive.
    pub fn set_content_to_fit(&mut self, size: Vec2, max: Vec2) {
        self.content = clamp_to_max(self.content.max(size).max(Vec2::ZERO), max);
    }

    pub fn set_total_from_content(&mut self, space: Vec2) {
        self.total = self.content + space;
    }

    pub fn set_content_from_total(&mut self, space: Vec2) {
        self.content = (self.total - space).max(Vec2::ZERO);
    }
}

pub(crate) fn clamp_to_max(size: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        if max.x > 0.0 { size.x.min(max.x) } else { size.x },
        if max.y > 0.0 { size.y.min(max.y) } else { size.y },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x.max(0.0), size.y.max(0.0))
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && py >= self.y && px <= self.x + self.width && py <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        Rect::from_pos_size(min, max - min)
    }
}

bitflags! {
    /// Scrollbars an element shows after SizeDown.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScrollbarFlags: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

/// Per-element layout output, rewritten on every layout cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutState {
    /// Final size after SizeDown.
    pub size: SizeRecord,
    /// Size gathered bottom-up, before any growth.
    pub preferred: SizeRecord,
    /// Total size most recently allocated by the parent.
    pub alloc: Vec2,
    pub cell: Cell,
    /// Position relative to the parent's content origin.
    pub rel_pos: Vec2,
    pub scroll_offset: Vec2,
    pub scene_pos: Vec2,
    pub bbox: Rect,
    pub content_bbox: Rect,
    pub scrollbars: ScrollbarFlags,
    /// Overflow clips on this axis (anything but `Visible`).
    pub clip_x: bool,
    pub clip_y: bool,
    /// Whether the bbox intersects every clipping ancestor.
    pub visible: bool,
    /// Clip rect in effect for this element's descendants.
    pub child_clip: Option<Rect>,
}

impl LayoutState {
    /// Resets everything a layout cycle recomputes. Scroll offsets survive.
    pub fn reset(&mut self) {
        *self = LayoutState {
            scroll_offset: self.scroll_offset,
            ..LayoutState::default()
        };
    }

    /// How far the content can scroll on each axis.
    pub fn max_scroll(&self) -> Vec2 {
        (self.size.total - self.visible_total()).max(Vec2::ZERO)
    }

    /// Extent actually shown: the allocation on clipped axes, the total otherwise.
    pub fn visible_total(&self) -> Vec2 {
        Vec2::new(
            if self.clip_x { self.alloc.x.min(self.size.total.x) } else { self.size.total.x },
            if self.clip_y { self.alloc.y.min(self.size.total.y) } else { self.size.total.y },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, SizeRecord};
    use glam::Vec2;

    #[test]
    fn content_respects_positive_max_only() {
        let mut size = SizeRecord::default();
        size.set_content_max(Vec2::new(50.0, 80.0), Vec2::new(30.0, 0.0));
        assert_eq!(size.content, Vec2::new(30.0, 80.0));

        size.set_content_to_fit(Vec2::new(10.0, 120.0), Vec2::new(30.0, 100.0));
        assert_eq!(size.content, Vec2::new(30.0, 100.0));
    }

    #[test]
    fn content_from_total_never_negative() {
        let mut size = SizeRecord {
            content: Vec2::ZERO,
            total: Vec2::new(4.0, 20.0),
        };
        size.set_content_from_total(Vec2::new(10.0, 6.0));
        assert_eq!(size.content, Vec2::new(0.0, 14.0));
    }

    #[test]
    fn rect_intersection_and_containment() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(80.0, 40.0, 40.0, 40.0);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Rect::new(80.0, 40.0, 20.0, 10.0));
        assert!(a.contains(100.0, 50.0));
        assert!(!a.intersects(&Rect::new(100.0, 0.0, 10.0, 10.0)));
    }
}

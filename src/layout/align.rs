use glam::Vec2;

use crate::style::{AlignItems, JustifyContent};

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.0001
}

pub(crate) fn approx_eq_vec(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Leading offset and spacing for `item_count` items occupying `occupied`
/// (gaps included) out of `limit`.
pub fn main_axis_start_and_gap(
    limit: f32,
    occupied: f32,
    base_gap: f32,
    item_count: usize,
    justify: JustifyContent,
) -> (f32, f32) {
    let free = (limit - occupied).max(0.0);
    match justify {
        JustifyContent::Start => (0.0, base_gap),
        JustifyContent::Center => (free * 0.5, base_gap),
        JustifyContent::End => (free, base_gap),
        JustifyContent::SpaceBetween => {
            if item_count > 1 {
                (0.0, base_gap + free / ((item_count - 1) as f32))
            } else {
                (0.0, base_gap)
            }
        }
        JustifyContent::SpaceAround => {
            if item_count > 0 {
                let space = free / (item_count as f32);
                (space * 0.5, base_gap + space)
            } else {
                (0.0, base_gap)
            }
        }
        JustifyContent::SpaceEvenly => {
            let space = free / ((item_count + 1) as f32);
            (space, base_gap + space)
        }
    }
}

pub fn cross_item_offset(line_cross: f32, item_cross: f32, align: AlignItems) -> f32 {
    let free = (line_cross - item_cross).max(0.0);
    match align {
        AlignItems::Start | AlignItems::Stretch => 0.0,
        AlignItems::Center => free * 0.5,
        AlignItems::End => free,
    }
}

use glam::Vec2;

use crate::error::LayoutError;
use crate::layout::Dim;
use crate::style::values::{
    AlignItems, Axis, Display, EdgeInsets, FlowWrap, GridPlacement, JustifyContent, Overflow,
};

pub const DEFAULT_SCROLLBAR_WIDTH: f32 = 10.0;

/// Style values already resolved to absolute units by the host's style system.
///
/// Sizes follow the convention that a `max` of 0 means unconstrained. Values
/// must be finite; see [`ComputedStyle::validate`] and
/// [`ComputedStyle::sanitized`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub main_axis: Axis,
    pub flow_wrap: FlowWrap,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub min: Vec2,
    pub max: Vec2,
    pub grow: Vec2,
    pub gap: Vec2,
    pub grid: GridPlacement,
    /// Grid column count, 0 = `ceil(sqrt(children))`.
    pub columns: usize,
    pub margin: EdgeInsets,
    pub border: EdgeInsets,
    pub padding: EdgeInsets,
    pub scrollbar_width: f32,
    pub justify_content: JustifyContent,
    pub align_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_self: Option<AlignItems>,
    /// Index of the visible child of a [`Display::Stacked`] container.
    pub stack_top: usize,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            main_axis: Axis::Horizontal,
            flow_wrap: FlowWrap::NoWrap,
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            min: Vec2::ZERO,
            max: Vec2::ZERO,
            grow: Vec2::ZERO,
            gap: Vec2::ZERO,
            grid: GridPlacement::default(),
            columns: 0,
            margin: EdgeInsets::ZERO,
            border: EdgeInsets::ZERO,
            padding: EdgeInsets::ZERO,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            justify_content: JustifyContent::Start,
            align_content: JustifyContent::Start,
            align_items: AlignItems::Start,
            align_self: None,
            stack_top: 0,
        }
    }
}

impl ComputedStyle {
    pub fn flex_row() -> Self {
        Self::default()
    }

    pub fn flex_column() -> Self {
        Self {
            main_axis: Axis::Vertical,
            ..Self::default()
        }
    }

    pub fn grid(columns: usize) -> Self {
        Self {
            display: Display::Grid,
            columns,
            ..Self::default()
        }
    }

    pub fn stacked(stack_top: usize) -> Self {
        Self {
            display: Display::Stacked,
            stack_top,
            ..Self::default()
        }
    }

    pub fn leaf(width: f32, height: f32) -> Self {
        Self::default().with_min(width, height)
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn with_wrap(mut self) -> Self {
        self.flow_wrap = FlowWrap::Wrap;
        self
    }

    pub fn with_overflow(mut self, x: Overflow, y: Overflow) -> Self {
        self.overflow_x = x;
        self.overflow_y = y;
        self
    }

    pub fn with_min(mut self, width: f32, height: f32) -> Self {
        self.min = Vec2::new(width, height);
        self
    }

    pub fn with_max(mut self, width: f32, height: f32) -> Self {
        self.max = Vec2::new(width, height);
        self
    }

    pub fn with_grow(mut self, x: f32, y: f32) -> Self {
        self.grow = Vec2::new(x, y);
        self
    }

    pub fn with_gap(mut self, x: f32, y: f32) -> Self {
        self.gap = Vec2::new(x, y);
        self
    }

    pub fn with_margin(mut self, margin: EdgeInsets) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_border(mut self, border: EdgeInsets) -> Self {
        self.border = border;
        self
    }

    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_scrollbar_width(mut self, width: f32) -> Self {
        self.scrollbar_width = width;
        self
    }

    pub fn with_placement(mut self, placement: GridPlacement) -> Self {
        self.grid = placement;
        self
    }

    pub fn with_justify_content(mut self, justify: JustifyContent) -> Self {
        self.justify_content = justify;
        self
    }

    pub fn with_align_content(mut self, align: JustifyContent) -> Self {
        self.align_content = align;
        self
    }

    pub fn with_align_items(mut self, align: AlignItems) -> Self {
        self.align_items = align;
        self
    }

    pub fn with_align_self(mut self, align: AlignItems) -> Self {
        self.align_self = Some(align);
        self
    }

    /// Padding + border + margin.
    pub fn box_space(&self) -> EdgeInsets {
        self.padding.add(&self.border).add(&self.margin)
    }

    pub fn main_dim(&self) -> Dim {
        match self.main_axis {
            Axis::Horizontal => Dim::X,
            Axis::Vertical => Dim::Y,
        }
    }

    pub fn overflow(&self, dim: Dim) -> Overflow {
        match dim {
            Dim::X => self.overflow_x,
            Dim::Y => self.overflow_y,
        }
    }

    pub fn is_wrapping(&self) -> bool {
        self.display == Display::Flex && self.flow_wrap == FlowWrap::Wrap
    }

    pub fn is_displayed(&self) -> bool {
        self.display != Display::None
    }

    /// Alignment used for this element inside its parent's cell.
    pub fn effective_align(&self, parent: &ComputedStyle) -> AlignItems {
        self.align_self.unwrap_or(parent.align_items)
    }

    /// Rejects NaN and infinite values.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut first_bad = None;
        self.clone().for_each_value(|field, value| {
            if first_bad.is_none() && !value.is_finite() {
                first_bad = Some(LayoutError::NonFinite {
                    field,
                    value: *value,
                });
            }
        });
        match first_bad {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Copy with non-finite values replaced by 0 and negatives clamped to 0,
    /// along with the names of the fields that were changed.
    pub fn sanitized(&self) -> (ComputedStyle, Vec<&'static str>) {
        let mut style = self.clone();
        let mut changed = Vec::new();
        style.for_each_value(|field, value| {
            let fixed = if value.is_finite() { value.max(0.0) } else { 0.0 };
            if fixed != *value || value.is_nan() {
                changed.push(field);
                *value = fixed;
            }
        });
        (style, changed)
    }

    fn for_each_value(&mut self, mut f: impl FnMut(&'static str, &mut f32)) {
        f("min.x", &mut self.min.x);
        f("min.y", &mut self.min.y);
        f("max.x", &mut self.max.x);
        f("max.y", &mut self.max.y);
        f("grow.x", &mut self.grow.x);
        f("grow.y", &mut self.grow.y);
        f("gap.x", &mut self.gap.x);
        f("gap.y", &mut self.gap.y);
        f("scrollbar_width", &mut self.scrollbar_width);
        for (name, insets) in [
            ("margin", &mut self.margin),
            ("border", &mut self.border),
            ("padding", &mut self.padding),
        ] {
            f(name, &mut insets.top);
            f(name, &mut insets.right);
            f(name, &mut insets.bottom);
            f(name, &mut insets.left);
        }
    }
}

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Simplified CSS flex: children flow along `main_axis`, optionally wrapping.
    #[default]
    Flex,
    /// Children overlap in one cell; only the `stack_top` child sizes the container.
    Stacked,
    /// Row-major grid with `columns` columns.
    Grid,
    /// Not displayed and skipped by every layout pass.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowWrap {
    #[default]
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Never smaller than the content, never scrolls.
    #[default]
    Visible,
    /// Exactly the allocated size, content is clipped.
    Hidden,
    /// Scrollbar only when the content does not fit.
    Auto,
    /// Scrollbar space is always reserved.
    Scroll,
}

impl Overflow {
    pub fn clips(self) -> bool {
        !matches!(self, Overflow::Visible)
    }

    pub fn scrolls(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Combined horizontal and vertical thickness.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.left + self.right, self.top + self.bottom)
    }

    pub fn add(&self, other: &EdgeInsets) -> EdgeInsets {
        EdgeInsets {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

/// Explicit grid placement. `None` positions follow the auto-placement cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub col: Option<usize>,
    pub row: Option<usize>,
    pub col_span: usize,
    pub row_span: usize,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            col: None,
            row: None,
            col_span: 1,
            row_span: 1,
        }
    }
}

impl GridPlacement {
    pub const fn at(col: usize, row: usize) -> Self {
        Self {
            col: Some(col),
            row: Some(row),
            col_span: 1,
            row_span: 1,
        }
    }

    pub const fn span(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }

    pub fn col_span(&self) -> usize {
        self.col_span.max(1)
    }

    pub fn row_span(&self) -> usize {
        self.row_span.max(1)
    }
}

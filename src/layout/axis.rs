use glam::Vec2;

/// One of the two layout dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    X,
    Y,
}

impl Dim {
    pub const BOTH: [Dim; 2] = [Dim::X, Dim::Y];

    pub const fn other(self) -> Dim {
        match self {
            Dim::X => Dim::Y,
            Dim::Y => Dim::X,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Dim::X => 0,
            Dim::Y => 1,
        }
    }
}

/// Per-dimension access to a `Vec2`.
pub trait DimExt {
    fn dim(&self, dim: Dim) -> f32;
    fn set_dim(&mut self, dim: Dim, value: f32);

    fn add_dim(&mut self, dim: Dim, value: f32) {
        let current = self.dim(dim);
        self.set_dim(dim, current + value);
    }
}

impl DimExt for Vec2 {
    fn dim(&self, dim: Dim) -> f32 {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
        }
    }

    fn set_dim(&mut self, dim: Dim, value: f32) {
        match dim {
            Dim::X => self.x = value,
            Dim::Y => self.y = value,
        }
    }
}

/// Builds a `Vec2` from main and cross components.
pub fn from_main_cross(main_dim: Dim, main: f32, cross: f32) -> Vec2 {
    match main_dim {
        Dim::X => Vec2::new(main, cross),
        Dim::Y => Vec2::new(cross, main),
    }
}

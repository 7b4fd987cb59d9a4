mod tree;
pub mod viewport;

pub use tree::*;
pub use viewport::*;

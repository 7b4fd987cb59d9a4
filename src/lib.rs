//! Multi-pass constraint layout for trees of styled elements.
//!
//! Build a [`LayoutTree`] of [`ComputedStyle`]d nodes, then call
//! [`Viewport::layout`] each frame. Results land in each node's
//! [`LayoutState`].

pub mod config;
pub mod error;
pub mod layout;
pub mod style;
pub mod view;

pub use config::{LayoutConfig, TraceFlags};
pub use error::{LayoutError, Result};
pub use style::*;
pub use view::*;

//! Layout error types.

use thiserror::Error;

use crate::view::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("node {child:?} already has a parent")]
    AlreadyAttached { child: NodeId },

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    #[error("style value {field} is not finite: {value}")]
    NonFinite { field: &'static str, value: f32 },
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The node is not present in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    /// The widget is already borrowed by a handler further up the call stack.
    #[error("widget for {0:?} is already borrowed")]
    ReentrantWidgetBorrow(NodeId),
    /// The node already has a parent.
    #[error("node {0:?} is already attached")]
    AlreadyAttached(NodeId),
    /// Attaching would create a cycle.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },
    /// The node does not carry a navigation stack.
    #[error("node {0:?} is not a navigation view")]
    NotNavigation(NodeId),
    /// The widget stored at a node is not of the expected type.
    #[error("expected widget type {0}")]
    WidgetType(&'static str),
    /// Operation rejected by a structural rule.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A host key code outside the known range.
    #[error("unknown key code: {0}")]
    UnknownKey(u8),
    /// A host touch kind outside the known range.
    #[error("unknown touch kind: {0}")]
    UnknownTouchKind(u32),
    /// The host session is already running.
    #[error("session already initialized")]
    AlreadyInitialized,
    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

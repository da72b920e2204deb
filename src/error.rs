//! Error types for the layout linking queue.

use std::fmt::Debug;
use thiserror::Error;

/// Caller errors rejected by a strict queue.
///
/// A rejected operation leaves the queue exactly as it was before the call,
/// except [`QueueError::MissingLinks`]: the queue keeps the offered link and
/// goes on waiting for the missing children.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError<Id: Debug> {
    #[error("Node {0:?} is already pending")]
    DuplicateNode(Id),

    #[error("Node {node:?} lists child {child:?} more than once")]
    RepeatedChild { node: Id, child: Id },

    #[error("Child {child:?} is already awaited by {waiting:?}, cannot also be awaited by {requested:?}")]
    AlreadyAwaited { child: Id, waiting: Id, requested: Id },

    #[error("Link for {child:?} is reserved for {owner:?}, cannot also be used by {requested:?}")]
    AlreadyClaimed { child: Id, owner: Id, requested: Id },

    #[error("Link for {0:?} was already supplied")]
    DuplicateLink(Id),

    #[error("Node {node:?} cannot be linked, links for {missing:?} are gone")]
    MissingLinks { node: Id, missing: Vec<Id> },
}

/// Errors raised while loading configuration or initializing logging.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

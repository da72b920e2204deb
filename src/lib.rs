//! Layout Queue: order-preserving linking of file DAG layouts
//!
//! A file is imported as a Merkle DAG: leaves are encoded chunks, branches list
//! their children's links in a fixed order. Chunks finish encoding in whatever
//! order the workers happen to complete them, so branches cannot be encoded as
//! soon as they are planned. The [`queue::Queue`] keeps track of which branch
//! waits on which child and hands out each branch as a [`types::LinkedNode`]
//! once every child link is known, with the links in declared order.
//!
//! Encoding, hashing and tree shape are the caller's business; the queue only
//! resolves dependencies.

pub mod config;
pub mod error;
pub mod logging;
pub mod observer;
pub mod queue;
pub mod shared;
pub mod types;

pub use error::{QueueError, SetupError};
pub use queue::{empty, mutable, InPlaceQueue, PersistentQueue, Queue, QueueSnapshot};
pub use types::{Branch, ContentId, FileLink, Leaf, LinkedNode, Node, NodeID, PendingChildren};

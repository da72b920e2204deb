//! Shared queue handle for multi-producer drivers.
//!
//! The queue holds no lock of its own. When leaf encoders running on several
//! threads report links directly, they go through a [`SharedQueue`], which
//! serializes every operation behind one mutex.

use crate::error::QueueError;
use crate::queue::{InPlaceQueue, Queue};
use crate::types::{Branch, FileLink, LinkValue, LinkedNode, Node, NodeID, NodeKey};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cloneable, thread-safe handle to one in-place queue.
#[derive(Debug)]
pub struct SharedQueue<Id: NodeKey = NodeID, L: LinkValue = FileLink> {
    inner: Arc<Mutex<InPlaceQueue<Id, L>>>,
}

impl<Id: NodeKey, L: LinkValue> Clone for SharedQueue<Id, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Id: NodeKey, L: LinkValue> Default for SharedQueue<Id, L> {
    fn default() -> Self {
        Self::new(Queue::new())
    }
}

impl<Id: NodeKey, L: LinkValue> SharedQueue<Id, L> {
    pub fn new(queue: InPlaceQueue<Id, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    pub fn add(&self, node: Node<Id, L>) -> Result<(), QueueError<Id>> {
        self.inner.lock().add(node)
    }

    pub fn add_node(&self, node: Branch<Id>) -> Result<(), QueueError<Id>> {
        self.inner.lock().add_node(node)
    }

    pub fn add_link(&self, id: Id, link: L) -> Result<(), QueueError<Id>> {
        self.inner.lock().add_link(id, link)
    }

    /// Add a link and hand back whatever became linked, in one critical section.
    pub fn add_link_and_drain(
        &self,
        id: Id,
        link: L,
    ) -> Result<Vec<LinkedNode<Id, L>>, QueueError<Id>> {
        let mut queue = self.inner.lock();
        queue.add_link(id, link)?;
        Ok(queue.drain_linked())
    }

    #[instrument(skip(self))]
    pub fn drain_linked(&self) -> Vec<LinkedNode<Id, L>> {
        let linked = self.inner.lock().drain_linked();
        debug!(count = linked.len(), "Drained linked nodes");
        linked
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    /// Run `f` with exclusive access to the queue.
    pub fn with<R>(&self, f: impl FnOnce(&mut InPlaceQueue<Id, L>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Recover the queue if this is the last handle.
    pub fn into_inner(self) -> Result<InPlaceQueue<Id, L>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

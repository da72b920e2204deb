//! Queue observers
//!
//! The queue itself never logs. Callers that want to see what it does inject an
//! observer, which receives every state transition as it happens.

use crate::error::QueueError;
use crate::types::LinkedNode;
use parking_lot::Mutex;
use std::fmt::Debug;
use tracing::{debug, trace, warn};

/// Receives queue transitions. Every hook defaults to doing nothing.
pub trait QueueObserver<Id: Debug, L>: Send + Sync {
    /// A branch was registered and waits on `awaiting` children.
    fn node_pending(&self, _node: &Id, _awaiting: usize) {}

    /// A link arrived that no pending branch waits on yet.
    fn link_stashed(&self, _id: &Id) {}

    /// A link satisfied one of the children `node` waits on.
    fn link_consumed(&self, _id: &Id, _node: &Id, _remaining: usize) {}

    fn node_linked(&self, _node: &LinkedNode<Id, L>) {}

    fn rejected(&self, _error: &QueueError<Id>) {}
}

/// Forwards queue transitions to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<Id: Debug, L> QueueObserver<Id, L> for TracingObserver {
    fn node_pending(&self, node: &Id, awaiting: usize) {
        debug!(node = ?node, awaiting, "Node pending");
    }

    fn link_stashed(&self, id: &Id) {
        trace!(link = ?id, "Link stashed");
    }

    fn link_consumed(&self, id: &Id, node: &Id, remaining: usize) {
        trace!(link = ?id, node = ?node, remaining, "Link consumed");
    }

    fn node_linked(&self, node: &LinkedNode<Id, L>) {
        debug!(node = ?node.id, links = node.links.len(), "Node linked");
    }

    fn rejected(&self, error: &QueueError<Id>) {
        warn!(error = %error, "Queue operation rejected");
    }
}

/// Transition recorded by an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent<Id: Debug> {
    Pending { node: Id, awaiting: usize },
    Stashed { link: Id },
    Consumed { link: Id, node: Id, remaining: usize },
    Linked { node: Id, links: usize },
    Rejected(QueueError<Id>),
}

/// Observer that keeps every transition in memory.
#[derive(Debug, Default)]
pub struct EventLog<Id: Debug> {
    events: Mutex<Vec<QueueEvent<Id>>>,
}

impl<Id: Clone + Debug> EventLog<Id> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<QueueEvent<Id>> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<QueueEvent<Id>> {
        std::mem::take(&mut *self.events.lock())
    }

    fn record(&self, event: QueueEvent<Id>) {
        self.events.lock().push(event);
    }
}

impl<Id, L> QueueObserver<Id, L> for EventLog<Id>
where
    Id: Clone + Debug + Send,
{
    fn node_pending(&self, node: &Id, awaiting: usize) {
        self.record(QueueEvent::Pending {
            node: node.clone(),
            awaiting,
        });
    }

    fn link_stashed(&self, id: &Id) {
        self.record(QueueEvent::Stashed { link: id.clone() });
    }

    fn link_consumed(&self, id: &Id, node: &Id, remaining: usize) {
        self.record(QueueEvent::Consumed {
            link: id.clone(),
            node: node.clone(),
            remaining,
        });
    }

    fn node_linked(&self, node: &LinkedNode<Id, L>) {
        self.record(QueueEvent::Linked {
            node: node.id.clone(),
            links: node.links.len(),
        });
    }

    fn rejected(&self, error: &QueueError<Id>) {
        self.record(QueueEvent::Rejected(error.clone()));
    }
}

//! Layout Linking Queue
//!
//! Tracks branches of a file layout that wait on the links of their children and
//! emits each branch as a [`LinkedNode`] exactly once, as soon as every child
//! link is known. Links may arrive in any order, before or after the branch
//! that needs them; the emitted links always follow the branch's declared
//! child order.
//!
//! Queues come in two modes (see [`mode`]). Both expose the same `&mut self`
//! operations; persistent queues additionally offer `with_*` forms that return
//! a new queue and leave the receiver untouched.

pub mod collect;
mod delta;
pub mod mode;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::observer::{QueueObserver, TracingObserver};
use crate::types::{Branch, FileLink, LinkValue, LinkedNode, Node, NodeID, NodeKey, PendingChildren};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

pub use collect::{collect, Collected};
use delta::{Delta, State};
pub use mode::{InPlace, Mode, Persistent, Sequence, Table};

/// Queue whose clones are cheap, independent snapshots.
pub type PersistentQueue<Id = NodeID, L = FileLink> = Queue<Id, L, Persistent>;

/// Queue updated destructively by its single owner.
pub type InPlaceQueue<Id = NodeID, L = FileLink> = Queue<Id, L, InPlace>;

/// Create an empty persistent queue.
pub fn empty<Id: NodeKey, L: LinkValue>() -> PersistentQueue<Id, L> {
    Queue::new()
}

/// Create an empty in-place queue.
pub fn mutable<Id: NodeKey, L: LinkValue>() -> InPlaceQueue<Id, L> {
    Queue::new()
}

/// Layout linking queue.
pub struct Queue<Id: NodeKey = NodeID, L: LinkValue = FileLink, M: Mode = Persistent> {
    state: State<Id, L, M>,
    strict: bool,
    observer: Option<Arc<dyn QueueObserver<Id, L>>>,
}

/// Plain copy of a queue's collections, for comparisons and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot<Id: Ord, L> {
    pub mutable: bool,
    pub needs: BTreeMap<Id, Id>,
    pub nodes: BTreeMap<Id, PendingChildren<Id>>,
    pub links: BTreeMap<Id, L>,
    pub linked: Vec<LinkedNode<Id, L>>,
}

impl<Id: Ord, L> QueueSnapshot<Id, L> {
    /// Snapshot with no pending work and no output.
    pub fn empty(mutable: bool) -> Self {
        Self {
            mutable,
            needs: BTreeMap::new(),
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            linked: Vec::new(),
        }
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> Queue<Id, L, M> {
    /// Create an empty strict queue without an observer.
    pub fn new() -> Self {
        Self {
            state: State::new(),
            strict: true,
            observer: None,
        }
    }

    /// Create an empty queue configured from `config`.
    pub fn with_config(config: &QueueConfig) -> Self {
        let queue = Self::new().strict(config.strict);
        if config.trace_events {
            queue.with_observer(Arc::new(TracingObserver))
        } else {
            queue
        }
    }

    /// Enable or disable rejection of caller errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn QueueObserver<Id, L>>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_mutable(&self) -> bool {
        M::MUTABLE
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Add a branch or an already resolved leaf.
    pub fn add(&mut self, node: Node<Id, L>) -> Result<(), QueueError<Id>> {
        match node {
            Node::Branch(branch) => self.add_node(branch),
            Node::Leaf(leaf) => self.add_link(leaf.id, leaf.link),
        }
    }

    /// Register a branch.
    ///
    /// If links for all of its children are already stashed, the branch is
    /// linked right away and those links are consumed. Otherwise it waits until
    /// the missing links are added; links already present stay stashed and are
    /// collected when the branch resolves.
    pub fn add_node(&mut self, node: Branch<Id>) -> Result<(), QueueError<Id>> {
        if self.strict {
            self.check_node(&node).map_err(|e| self.reject(e))?;
        }

        let collected = collect(&node.children, &self.state.links);
        if collected.is_complete() {
            let linked = LinkedNode::new(node.id, collected.ready);
            self.notify(|o| o.node_linked(&linked));
            self.state
                .patch(Delta::new().consume(&collected.has).emit(linked));
        } else {
            let count = collected.wants.len();
            self.notify(|o| o.node_pending(&node.id, count));
            self.state.patch(
                Delta::new()
                    .need_all(&collected.wants, &node.id)
                    .claim_all(&collected.has, &node.id)
                    .pending(node.id, PendingChildren::new(node.children, count)),
            );
        }
        Ok(())
    }

    /// Register branches left to right, stopping at the first rejected one.
    pub fn add_nodes<I>(&mut self, nodes: I) -> Result<(), QueueError<Id>>
    where
        I: IntoIterator<Item = Branch<Id>>,
    {
        for node in nodes {
            self.add_node(node)?;
        }
        Ok(())
    }

    /// Add the link for child `id`.
    ///
    /// When a branch waits on `id` its wait count drops, and if this was the
    /// last missing child the branch is linked. When nobody waits on `id` the
    /// link is stashed for a branch registered later.
    pub fn add_link(&mut self, id: Id, link: L) -> Result<(), QueueError<Id>> {
        let waiting = self
            .state
            .needs
            .get(&id)
            .and_then(|parent| self.state.nodes.get(parent).map(|pending| (parent, pending)));

        let delta = match waiting {
            None => {
                if self.strict && self.state.links.contains_key(&id) {
                    return Err(self.reject(QueueError::DuplicateLink(id)));
                }
                self.notify(|o| o.link_stashed(&id));
                Delta::new().stash(id, link)
            }
            Some((parent, pending)) if pending.count > 1 => {
                let parent = parent.clone();
                let remaining = pending.count - 1;
                self.notify(|o| o.link_consumed(&id, &parent, remaining));
                Delta::new()
                    .satisfy(id.clone())
                    .stash(id, link)
                    .decrement(parent)
            }
            Some((parent, pending)) => {
                let parent = parent.clone();
                let collected = collect::collect_with(&pending.children, &self.state.links, (&id, &link));
                if self.strict && !collected.is_complete() {
                    let children = pending.children.clone();
                    return Err(self.rearm(parent, children, collected, id, link));
                }
                let linked = LinkedNode::new(parent.clone(), collected.ready);
                self.notify(|o| {
                    o.link_consumed(&id, &parent, 0);
                    o.node_linked(&linked);
                });
                // `id` itself is in `has` but was never stashed; removing it is a no-op.
                Delta::new()
                    .satisfy(id)
                    .consume(&collected.has)
                    .resolve(parent)
                    .emit(linked)
            }
        };

        self.state.patch(delta);
        Ok(())
    }

    /// Add links in order, stopping at the first rejected one.
    pub fn add_links<I>(&mut self, entries: I) -> Result<(), QueueError<Id>>
    where
        I: IntoIterator<Item = (Id, L)>,
    {
        for (id, link) in entries {
            self.add_link(id, link)?;
        }
        Ok(())
    }

    /// True when no branch is pending and no link is stashed.
    ///
    /// Linked nodes that were not drained yet do not count as pending work.
    pub fn is_empty(&self) -> bool {
        self.state.nodes.is_empty() && self.state.links.is_empty()
    }

    /// Linked nodes in the order they resolved, without draining them.
    pub fn linked(&self) -> impl Iterator<Item = &LinkedNode<Id, L>> {
        self.state.linked.items()
    }

    pub fn linked_count(&self) -> usize {
        self.state.linked.len()
    }

    /// Take every linked node, oldest first.
    pub fn drain_linked(&mut self) -> Vec<LinkedNode<Id, L>> {
        self.state.linked.take()
    }

    pub fn pending(&self, id: &Id) -> Option<&PendingChildren<Id>> {
        self.state.nodes.get(id)
    }

    /// Branch currently waiting on `child`, if any.
    pub fn awaiting(&self, child: &Id) -> Option<&Id> {
        self.state.needs.get(child)
    }

    pub fn stashed(&self, id: &Id) -> Option<&L> {
        self.state.links.get(id)
    }

    /// Pending branch that will collect the stashed link for `id`, if any.
    pub fn claimed_by(&self, id: &Id) -> Option<&Id> {
        self.state.claims.get(id)
    }

    pub fn pending_count(&self) -> usize {
        self.state.nodes.len()
    }

    pub fn stashed_count(&self) -> usize {
        self.state.links.len()
    }

    pub fn snapshot(&self) -> QueueSnapshot<Id, L> {
        QueueSnapshot {
            mutable: M::MUTABLE,
            needs: self
                .state
                .needs
                .entries()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            nodes: self
                .state
                .nodes
                .entries()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            links: self
                .state
                .links
                .entries()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            linked: self.state.linked.items().cloned().collect(),
        }
    }

    fn check_node(&self, node: &Branch<Id>) -> Result<(), QueueError<Id>> {
        if self.state.nodes.contains_key(&node.id) {
            return Err(QueueError::DuplicateNode(node.id.clone()));
        }

        let mut seen = BTreeSet::new();
        for child in &node.children {
            if !seen.insert(child) {
                return Err(QueueError::RepeatedChild {
                    node: node.id.clone(),
                    child: child.clone(),
                });
            }
            if let Some(waiting) = self.state.needs.get(child) {
                return Err(QueueError::AlreadyAwaited {
                    child: child.clone(),
                    waiting: waiting.clone(),
                    requested: node.id.clone(),
                });
            }
            if let Some(owner) = self.state.claims.get(child) {
                return Err(QueueError::AlreadyClaimed {
                    child: child.clone(),
                    owner: owner.clone(),
                    requested: node.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Keep `parent` pending on the children whose links are gone.
    ///
    /// The incoming link is stashed for `parent` instead of being dropped, and
    /// the wait count is reset to the number of children still missing.
    fn rearm(
        &mut self,
        parent: Id,
        children: Vec<Id>,
        collected: Collected<Id, L>,
        id: Id,
        link: L,
    ) -> QueueError<Id> {
        let missing = collected.wants;
        self.state.patch(
            Delta::new()
                .satisfy(id.clone())
                .stash(id, link)
                .claim_all(&collected.has, &parent)
                .need_all(&missing, &parent)
                .pending(parent.clone(), PendingChildren::new(children, missing.len())),
        );
        self.reject(QueueError::MissingLinks {
            node: parent,
            missing,
        })
    }

    fn notify(&self, f: impl FnOnce(&dyn QueueObserver<Id, L>)) {
        if let Some(observer) = &self.observer {
            f(observer.as_ref());
        }
    }

    fn reject(&self, error: QueueError<Id>) -> QueueError<Id> {
        self.notify(|o| o.rejected(&error));
        error
    }
}

impl<Id: NodeKey, L: LinkValue> Queue<Id, L, Persistent> {
    /// Queue with `node` added; `self` stays as it was.
    pub fn with_node(&self, node: Branch<Id>) -> Result<Self, QueueError<Id>> {
        let mut next = self.clone();
        next.add_node(node)?;
        Ok(next)
    }

    /// Queue with all `nodes` added, or the first rejection.
    pub fn with_nodes<I>(&self, nodes: I) -> Result<Self, QueueError<Id>>
    where
        I: IntoIterator<Item = Branch<Id>>,
    {
        let mut next = self.clone();
        next.add_nodes(nodes)?;
        Ok(next)
    }

    pub fn with_link(&self, id: Id, link: L) -> Result<Self, QueueError<Id>> {
        let mut next = self.clone();
        next.add_link(id, link)?;
        Ok(next)
    }

    pub fn with_links<I>(&self, entries: I) -> Result<Self, QueueError<Id>>
    where
        I: IntoIterator<Item = (Id, L)>,
    {
        let mut next = self.clone();
        next.add_links(entries)?;
        Ok(next)
    }

    pub fn with_entry(&self, node: Node<Id, L>) -> Result<Self, QueueError<Id>> {
        let mut next = self.clone();
        next.add(node)?;
        Ok(next)
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> Default for Queue<Id, L, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> Clone for Queue<Id, L, M> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            strict: self.strict,
            observer: self.observer.clone(),
        }
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> fmt::Debug for Queue<Id, L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("state", &self.state)
            .field("strict", &self.strict)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

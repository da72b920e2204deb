//! Batched state edits
//!
//! Every queue operation computes a [`Delta`] first and then patches the
//! state with it in one step. For persistent modes the patched maps share
//! structure with any snapshot still holding the previous version; for
//! in-place modes the maps are edited destructively.

use crate::queue::mode::{Mode, Sequence, Table};
use crate::types::{LinkValue, LinkedNode, NodeKey, PendingChildren};
use std::fmt;

/// Edit of a single pending branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeEdit<Id> {
    Insert(PendingChildren<Id>),
    /// One more child arrived; only the wait count changes.
    Decrement,
    Remove,
}

/// Set of insertions (`Some`) and removals (`None`) plus output appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Delta<Id, L> {
    pub needs: Vec<(Id, Option<Id>)>,
    pub nodes: Vec<(Id, NodeEdit<Id>)>,
    pub links: Vec<(Id, Option<L>)>,
    pub claims: Vec<(Id, Option<Id>)>,
    pub linked: Vec<LinkedNode<Id, L>>,
}

impl<Id, L> Default for Delta<Id, L> {
    fn default() -> Self {
        Self {
            needs: Vec::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            claims: Vec::new(),
            linked: Vec::new(),
        }
    }
}

impl<Id: Clone, L> Delta<Id, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `parent` as the waiter of every id in `children`.
    pub fn need_all(mut self, children: &[Id], parent: &Id) -> Self {
        self.needs.extend(
            children
                .iter()
                .map(|child| (child.clone(), Some(parent.clone()))),
        );
        self
    }

    /// Reserve the stashed links in `ids` for `parent`.
    pub fn claim_all(mut self, ids: &[Id], parent: &Id) -> Self {
        self.claims
            .extend(ids.iter().map(|id| (id.clone(), Some(parent.clone()))));
        self
    }

    pub fn satisfy(mut self, child: Id) -> Self {
        self.needs.push((child, None));
        self
    }

    pub fn pending(mut self, id: Id, pending: PendingChildren<Id>) -> Self {
        self.nodes.push((id, NodeEdit::Insert(pending)));
        self
    }

    pub fn decrement(mut self, id: Id) -> Self {
        self.nodes.push((id, NodeEdit::Decrement));
        self
    }

    pub fn resolve(mut self, id: Id) -> Self {
        self.nodes.push((id, NodeEdit::Remove));
        self
    }

    pub fn stash(mut self, id: Id, link: L) -> Self {
        self.links.push((id, Some(link)));
        self
    }

    /// Remove every id in `ids` from the stashed links, releasing any claim.
    pub fn consume(mut self, ids: &[Id]) -> Self {
        self.links.extend(ids.iter().map(|id| (id.clone(), None)));
        self.claims.extend(ids.iter().map(|id| (id.clone(), None)));
        self
    }

    pub fn emit(mut self, node: LinkedNode<Id, L>) -> Self {
        self.linked.push(node);
        self
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
            && self.nodes.is_empty()
            && self.links.is_empty()
            && self.claims.is_empty()
            && self.linked.is_empty()
    }
}

/// The four collections a queue keeps, stored according to `M`.
pub(crate) struct State<Id: NodeKey, L: LinkValue, M: Mode> {
    /// Child id -> id of the branch awaiting it
    pub needs: M::Map<Id, Id>,
    /// Branch id -> children it still waits on
    pub nodes: M::Map<Id, PendingChildren<Id>>,
    /// Links that arrived but were not consumed yet
    pub links: M::Map<Id, L>,
    /// Stashed link id -> pending branch that will collect it
    pub claims: M::Map<Id, Id>,
    /// Linked nodes not yet drained
    pub linked: M::Buffer<LinkedNode<Id, L>>,
}

impl<Id: NodeKey, L: LinkValue, M: Mode> State<Id, L, M> {
    pub fn new() -> Self {
        Self {
            needs: Default::default(),
            nodes: Default::default(),
            links: Default::default(),
            claims: Default::default(),
            linked: Default::default(),
        }
    }

    /// Apply `delta` in order: needs, nodes, links, claims, then output.
    pub fn patch(&mut self, delta: Delta<Id, L>) {
        patch_table(&mut self.needs, delta.needs);
        for (id, edit) in delta.nodes {
            match edit {
                NodeEdit::Insert(pending) => self.nodes.insert(id, pending),
                NodeEdit::Decrement => {
                    if let Some(pending) = self.nodes.get_mut(&id) {
                        pending.count = pending.count.saturating_sub(1);
                    }
                }
                NodeEdit::Remove => {
                    self.nodes.remove(&id);
                }
            }
        }
        patch_table(&mut self.links, delta.links);
        patch_table(&mut self.claims, delta.claims);
        for node in delta.linked {
            self.linked.push(node);
        }
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> Default for State<Id, L, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> Clone for State<Id, L, M> {
    fn clone(&self) -> Self {
        Self {
            needs: self.needs.clone(),
            nodes: self.nodes.clone(),
            links: self.links.clone(),
            claims: self.claims.clone(),
            linked: self.linked.clone(),
        }
    }
}

impl<Id: NodeKey, L: LinkValue, M: Mode> fmt::Debug for State<Id, L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("mutable", &M::MUTABLE)
            .field("needs", &self.needs)
            .field("nodes", &self.nodes)
            .field("links", &self.links)
            .field("claims", &self.claims)
            .field("linked", &self.linked)
            .finish()
    }
}

fn patch_table<K, V, T>(table: &mut T, edits: Vec<(K, Option<V>)>)
where
    T: Table<K, V>,
{
    for (key, value) in edits {
        match value {
            Some(value) => table.insert(key, value),
            None => {
                table.remove(&key);
            }
        }
    }
}

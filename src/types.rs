//! Core value types shared by the linking queue and its callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Default node identifier, assigned by the layout planner per construction session.
pub type NodeID = u64;

/// Bounds every node identifier has to satisfy.
///
/// Identifiers are opaque to the queue: it only compares, orders and clones them.
pub trait NodeKey: Clone + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> NodeKey for T where T: Clone + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

/// Bounds every resolved link has to satisfy.
pub trait LinkValue: Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> LinkValue for T where T: Clone + fmt::Debug + Send + Sync + 'static {}

/// Opaque content identifier produced by an external encoder.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentId(Vec<u8>);

impl ContentId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ContentId(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(ContentId)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.to_hex())
    }
}

impl From<Vec<u8>> for ContentId {
    fn from(bytes: Vec<u8>) -> Self {
        ContentId(bytes)
    }
}

impl From<&[u8]> for ContentId {
    fn from(bytes: &[u8]) -> Self {
        ContentId(bytes.to_vec())
    }
}

/// Resolved reference to a child node, embeddable in the parent's encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLink {
    /// Content identifier of the child block
    pub target: ContentId,
    /// Size of the whole encoded subtree in bytes
    pub total_size: u64,
    /// Size of the file content covered by the subtree
    pub content_size: u64,
}

impl FileLink {
    pub fn new(target: ContentId, total_size: u64, content_size: u64) -> Self {
        Self {
            target,
            total_size,
            content_size,
        }
    }
}

/// Internal node waiting on the links of its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch<Id = NodeID> {
    pub id: Id,
    /// Child order is the order links appear in once the branch is linked.
    pub children: Vec<Id>,
}

impl<Id> Branch<Id> {
    pub fn new(id: Id, children: Vec<Id>) -> Self {
        Self { id, children }
    }
}

/// Node whose link is already known, e.g. an encoded chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf<Id = NodeID, L = FileLink> {
    pub id: Id,
    pub link: L,
}

impl<Id, L> Leaf<Id, L> {
    pub fn new(id: Id, link: L) -> Self {
        Self { id, link }
    }
}

/// Anything a layout driver can hand to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node<Id = NodeID, L = FileLink> {
    Branch(Branch<Id>),
    Leaf(Leaf<Id, L>),
}

impl<Id, L> Node<Id, L> {
    pub fn id(&self) -> &Id {
        match self {
            Node::Branch(branch) => &branch.id,
            Node::Leaf(leaf) => &leaf.id,
        }
    }
}

impl<Id, L> From<Branch<Id>> for Node<Id, L> {
    fn from(branch: Branch<Id>) -> Self {
        Node::Branch(branch)
    }
}

impl<Id, L> From<Leaf<Id, L>> for Node<Id, L> {
    fn from(leaf: Leaf<Id, L>) -> Self {
        Node::Leaf(leaf)
    }
}

/// Bookkeeping for a branch that still waits on some of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChildren<Id = NodeID> {
    /// The branch's original child list
    pub children: Vec<Id>,
    /// Number of children whose links have not arrived yet
    pub count: usize,
}

impl<Id> PendingChildren<Id> {
    pub fn new(children: Vec<Id>, count: usize) -> Self {
        Self { children, count }
    }
}

/// Fully resolved branch, ready for the DAG encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedNode<Id = NodeID, L = FileLink> {
    pub id: Id,
    /// Links in the branch's declared child order
    pub links: Vec<L>,
}

impl<Id, L> LinkedNode<Id, L> {
    pub fn new(id: Id, links: Vec<L>) -> Self {
        Self { id, links }
    }
}

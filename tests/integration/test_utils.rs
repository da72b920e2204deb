//! Shared helpers for integration tests

use layout_queue::queue::Mode;
use layout_queue::{Branch, ContentId, FileLink, LinkedNode, NodeID, Queue, QueueError};

/// Fake content identifier derived from `name`.
pub fn create_cid(name: &str) -> ContentId {
    ContentId::new(blake3::hash(name.as_bytes()).as_bytes().to_vec())
}

/// Link to a 120 byte chunk named `name`.
pub fn create_link(name: &str) -> FileLink {
    create_link_sized(name, 120)
}

pub fn create_link_sized(name: &str, size: u64) -> FileLink {
    let dag_size = size + (size * 15) / 100;
    FileLink::new(create_cid(name), dag_size, size)
}

pub fn create_node(id: NodeID, links: Vec<FileLink>) -> LinkedNode {
    LinkedNode::new(id, links)
}

/// Links for the given names, in order.
pub fn links(names: &[&str]) -> Vec<FileLink> {
    names.iter().map(|name| create_link(name)).collect()
}

#[derive(Debug, Clone)]
pub enum Op {
    AddNode(Branch),
    AddLink(NodeID, FileLink),
}

impl Op {
    pub fn node(id: NodeID, children: &[NodeID]) -> Self {
        Op::AddNode(Branch::new(id, children.to_vec()))
    }

    pub fn link(id: NodeID, name: &str) -> Self {
        Op::AddLink(id, create_link(name))
    }

    pub fn title(&self) -> String {
        match self {
            Op::AddNode(branch) => format!("addNode({})", branch.id),
            Op::AddLink(id, _) => format!("addLink({})", id),
        }
    }
}

pub fn apply<M: Mode>(
    queue: &mut Queue<NodeID, FileLink, M>,
    op: &Op,
) -> Result<(), QueueError<NodeID>> {
    match op {
        Op::AddNode(branch) => queue.add_node(branch.clone()),
        Op::AddLink(id, link) => queue.add_link(*id, link.clone()),
    }
}

/// Every order obtained by moving a single element of `ops` to another
/// position, plus the original order.
pub fn shuffle<T: Clone>(ops: &[T]) -> Vec<Vec<T>> {
    let mut out = vec![ops.to_vec()];
    for offset in 0..ops.len() {
        let mut rest = ops.to_vec();
        let item = rest.remove(offset);
        for n in 0..=rest.len() {
            if n == offset {
                continue;
            }
            let mut order = rest.clone();
            order.insert(n, item.clone());
            out.push(order);
        }
    }
    out
}

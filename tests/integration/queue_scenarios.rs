//! Reference scenarios, run against both queue modes

use super::test_utils::{create_link, create_node, links};
use layout_queue::queue::{InPlace, Mode, Persistent};
use layout_queue::{Branch, FileLink, NodeID, PendingChildren, Queue, QueueSnapshot};
use std::collections::BTreeMap;

type TestQueue<M> = Queue<NodeID, FileLink, M>;

fn snapshot(
    mutable: bool,
    needs: &[(NodeID, NodeID)],
    nodes: &[(NodeID, PendingChildren)],
    stashed: &[(NodeID, &str)],
) -> QueueSnapshot<NodeID, FileLink> {
    QueueSnapshot {
        mutable,
        needs: needs.iter().copied().collect(),
        nodes: nodes.iter().cloned().collect(),
        links: stashed
            .iter()
            .map(|(id, name)| (*id, create_link(name)))
            .collect::<BTreeMap<_, _>>(),
        linked: Vec::new(),
    }
}

fn pending(children: &[NodeID], count: usize) -> PendingChildren {
    PendingChildren::new(children.to_vec(), count)
}

fn has_several_links<M: Mode>() {
    let mut queue = TestQueue::<M>::new();
    queue
        .add_links([
            (1, create_link("a")),
            (2, create_link("b")),
            (3, create_link("c")),
        ])
        .unwrap();
    queue.add_node(Branch::new(0, vec![1, 2, 3])).unwrap();

    let mut expected = QueueSnapshot::empty(M::MUTABLE);
    expected.linked = vec![create_node(0, links(&["a", "b", "c"]))];
    assert_eq!(queue.snapshot(), expected);
}

#[test]
fn test_has_several_links_persistent() {
    has_several_links::<Persistent>();
}

#[test]
fn test_has_several_links_in_place() {
    has_several_links::<InPlace>();
}

fn queue_then_link<M: Mode>() {
    let m = M::MUTABLE;
    let mut queue = TestQueue::<M>::new();
    queue
        .add_links([(2, create_link("b")), (4, create_link("d"))])
        .unwrap();

    queue.add_node(Branch::new(9, vec![1, 2, 3, 4, 5])).unwrap();
    assert_eq!(
        queue.snapshot(),
        snapshot(
            m,
            &[(1, 9), (3, 9), (5, 9)],
            &[(9, pending(&[1, 2, 3, 4, 5], 3))],
            &[(2, "b"), (4, "d")],
        ),
        "adds node to the queue"
    );

    queue.add_link(1, create_link("a")).unwrap();
    assert_eq!(
        queue.snapshot(),
        snapshot(
            m,
            &[(3, 9), (5, 9)],
            &[(9, pending(&[1, 2, 3, 4, 5], 2))],
            &[(1, "a"), (2, "b"), (4, "d")],
        ),
        "removes first dependency"
    );

    queue.add_link(5, create_link("e")).unwrap();
    assert_eq!(
        queue.snapshot(),
        snapshot(
            m,
            &[(3, 9)],
            &[(9, pending(&[1, 2, 3, 4, 5], 1))],
            &[(1, "a"), (2, "b"), (4, "d"), (5, "e")],
        ),
        "removes last dependency"
    );

    queue.add_link(3, create_link("c")).unwrap();
    let mut expected = QueueSnapshot::empty(m);
    expected.linked = vec![create_node(9, links(&["a", "b", "c", "d", "e"]))];
    assert_eq!(queue.snapshot(), expected, "moves to linked");
    assert!(queue.is_empty());
}

#[test]
fn test_queue_then_link_persistent() {
    queue_then_link::<Persistent>();
}

#[test]
fn test_queue_then_link_in_place() {
    queue_then_link::<InPlace>();
}

fn links_ahead<M: Mode>() {
    let m = M::MUTABLE;
    let mut queue = TestQueue::<M>::new();
    queue
        .add_links([(2, create_link("b")), (5, create_link("d"))])
        .unwrap();

    queue.add_node(Branch::new(9, vec![1, 2, 3, 5, 4])).unwrap();
    assert_eq!(
        queue.snapshot(),
        snapshot(
            m,
            &[(1, 9), (3, 9), (4, 9)],
            &[(9, pending(&[1, 2, 3, 5, 4], 3))],
            &[(2, "b"), (5, "d")],
        )
    );

    queue.add_link(1, create_link("a")).unwrap();
    queue.add_link(4, create_link("e")).unwrap();
    assert_eq!(
        queue.snapshot(),
        snapshot(
            m,
            &[(3, 9)],
            &[(9, pending(&[1, 2, 3, 5, 4], 1))],
            &[(1, "a"), (2, "b"), (4, "e"), (5, "d")],
        )
    );

    queue.add_link(3, create_link("c")).unwrap();
    let mut expected = QueueSnapshot::empty(m);
    expected.linked = vec![create_node(9, links(&["a", "b", "c", "d", "e"]))];
    assert_eq!(queue.snapshot(), expected);
}

#[test]
fn test_links_ahead_persistent() {
    links_ahead::<Persistent>();
}

#[test]
fn test_links_ahead_in_place() {
    links_ahead::<InPlace>();
}

#[test]
fn test_add_nodes_later_nodes_see_earlier_effects() {
    let mut queue = layout_queue::mutable::<NodeID, FileLink>();
    queue.add_link(1, create_link("a")).unwrap();
    queue
        .add_nodes([
            Branch::new(10, vec![1, 2]),
            Branch::new(11, vec![]),
            Branch::new(12, vec![3]),
        ])
        .unwrap();

    assert_eq!(queue.awaiting(&2), Some(&10));
    assert_eq!(queue.awaiting(&3), Some(&12));
    assert_eq!(queue.pending_count(), 2);
    assert_eq!(queue.drain_linked(), vec![create_node(11, vec![])]);
}

#[test]
fn test_batch_stops_at_first_rejection() {
    let mut queue = layout_queue::mutable::<NodeID, FileLink>();
    let result = queue.add_nodes([
        Branch::new(1, vec![5]),
        Branch::new(2, vec![5]),
        Branch::new(3, vec![6]),
    ]);

    assert!(result.is_err());
    assert_eq!(queue.pending(&1).map(|p| p.count), Some(1));
    assert_eq!(queue.pending(&2), None);
    assert_eq!(queue.pending(&3), None);
}

#[test]
fn test_emptiness_tracks_pending_work() {
    let mut queue = layout_queue::empty::<NodeID, FileLink>();
    assert!(queue.is_empty());

    queue.add_node(Branch::new(1, vec![2, 3])).unwrap();
    assert!(!queue.is_empty());

    queue.add_link(2, create_link("b")).unwrap();
    assert!(!queue.is_empty());

    queue.add_link(3, create_link("c")).unwrap();
    assert!(queue.is_empty());
    assert_eq!(queue.linked_count(), 1, "undrained output is not pending work");
}

//! Update modes
//!
//! A queue's mode decides which collections back its state. Persistent queues
//! keep their maps in `im` structures, so cloning a queue is O(1) and a clone
//! is a snapshot that later operations never touch. In-place queues use std
//! collections and are edited destructively by their single owner.

use crate::types::{LinkValue, NodeKey};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Keyed collection the queue state is stored in.
pub trait Table<K, V>: Clone + Default + Debug {
    fn get(&self, key: &K) -> Option<&V>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    fn insert(&mut self, key: K, value: V);

    fn remove(&mut self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in key order.
    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;
}

/// Append-only output buffer of the queue.
pub trait Sequence<T>: Clone + Default + Debug {
    fn push(&mut self, item: T);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;

    /// Remove and return every item, oldest first.
    fn take(&mut self) -> Vec<T>;
}

/// Update discipline of a queue.
pub trait Mode: Copy + Default + Debug + Send + Sync + 'static {
    /// Whether updates are applied destructively.
    const MUTABLE: bool;

    type Map<K: NodeKey, V: LinkValue>: Table<K, V>;
    type Buffer<T: LinkValue>: Sequence<T>;
}

/// Structurally shared state; clones are independent snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Persistent;

/// Destructively updated state owned by a single handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InPlace;

impl Mode for Persistent {
    const MUTABLE: bool = false;

    type Map<K: NodeKey, V: LinkValue> = im::OrdMap<K, V>;
    type Buffer<T: LinkValue> = im::Vector<T>;
}

impl Mode for InPlace {
    const MUTABLE: bool = true;

    type Map<K: NodeKey, V: LinkValue> = BTreeMap<K, V>;
    type Buffer<T: LinkValue> = Vec<T>;
}

impl<K, V> Table<K, V> for BTreeMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) {
        BTreeMap::insert(self, key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.iter()
    }
}

impl<K, V> Table<K, V> for im::OrdMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    fn get(&self, key: &K) -> Option<&V> {
        im::OrdMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        im::OrdMap::contains_key(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        im::OrdMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) {
        im::OrdMap::insert(self, key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        im::OrdMap::remove(self, key)
    }

    fn len(&self) -> usize {
        im::OrdMap::len(self)
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.iter()
    }
}

impl<T: Clone + Debug> Sequence<T> for Vec<T> {
    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn take(&mut self) -> Vec<T> {
        std::mem::take(self)
    }
}

impl<T: Clone + Debug> Sequence<T> for im::Vector<T> {
    fn push(&mut self, item: T) {
        self.push_back(item);
    }

    fn len(&self) -> usize {
        im::Vector::len(self)
    }

    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn take(&mut self) -> Vec<T> {
        std::mem::take(self).into_iter().collect()
    }
}

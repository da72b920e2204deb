//! Dependency collector: splits a branch's children into available and awaited.

use crate::queue::mode::Table;

/// Result of scanning a branch's children against the available links.
///
/// All three sequences keep the branch's declared child order, and `ready[i]`
/// is the link for `has[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<Id, L> {
    pub has: Vec<Id>,
    pub wants: Vec<Id>,
    pub ready: Vec<L>,
}

impl<Id, L> Collected<Id, L> {
    pub fn is_complete(&self) -> bool {
        self.wants.is_empty()
    }
}

/// Partition `children` into ids with a link in `source` and ids still awaited.
pub fn collect<Id, L, T>(children: &[Id], source: &T) -> Collected<Id, L>
where
    Id: Clone,
    L: Clone,
    T: Table<Id, L>,
{
    let mut has = Vec::new();
    let mut wants = Vec::new();
    let mut ready = Vec::new();

    for child in children {
        match source.get(child) {
            Some(link) => {
                has.push(child.clone());
                ready.push(link.clone());
            }
            None => wants.push(child.clone()),
        }
    }

    Collected { has, wants, ready }
}

/// Like [`collect`], but treats `extra` as if it were already in `source`.
///
/// Used when the last awaited link arrives, so it does not have to be stashed
/// just to be removed again.
pub fn collect_with<Id, L, T>(children: &[Id], source: &T, extra: (&Id, &L)) -> Collected<Id, L>
where
    Id: Clone + PartialEq,
    L: Clone,
    T: Table<Id, L>,
{
    let mut has = Vec::new();
    let mut wants = Vec::new();
    let mut ready = Vec::new();

    for child in children {
        let link = if child == extra.0 {
            Some(extra.1)
        } else {
            source.get(child)
        };
        match link {
            Some(link) => {
                has.push(child.clone());
                ready.push(link.clone());
            }
            None => wants.push(child.clone()),
        }
    }

    Collected { has, wants, ready }
}

use std::collections::BTreeSet;

use crate::event::Edge;

/// Canonical set of `(from, to, role)` triples with exact set
/// difference. Equal triples coalesce; materialization order is the
/// derived `Edge` ordering, so it is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeDeltaSet {
    set: BTreeSet<Edge>,
}

impl EdgeDeltaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge: Edge) -> bool {
        self.set.insert(edge)
    }

    pub fn remove(&mut self, edge: &Edge) -> bool {
        self.set.remove(edge)
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.set.contains(edge)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Elements of `self` not in `rhs`.
    pub fn diff(&self, rhs: &Self) -> Self {
        Self {
            set: self.set.difference(&rhs.set).copied().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.set.iter()
    }

    pub fn into_vec(self) -> Vec<Edge> {
        self.set.into_iter().collect()
    }
}

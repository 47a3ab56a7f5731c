//! Colored node sets and the per-level subnetwork index.
//!
//! A candidate subnetwork is a set of (gene, color) pairs. Sets are kept in
//! a `BTreeSet` so that two sets built via different join paths compare and
//! hash equal; the derived `Hash` combines both fields of every element.

use std::collections::{
    hash_map::Entry::{Occupied, Vacant},
    BTreeSet, HashMap,
};

use petgraph::graph::NodeIndex;

use crate::{catalog::ColorId, network::Index};

/// One gene of a candidate subnetwork together with its required
/// alteration color (1-based; see [`ColorId`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColoredNode {
    pub gene: NodeIndex<Index>,
    pub color: ColorId,
}

impl ColoredNode {
    pub fn new(gene: NodeIndex<Index>, color: ColorId) -> Self {
        debug_assert!(color >= 1, "color ids are 1-based");
        Self { gene, color }
    }
}

/// Canonically ordered set of colored nodes. A set at growth level k holds
/// exactly k + 2 nodes, with pairwise-distinct genes.
pub type ColoredNodeSet = BTreeSet<ColoredNode>;

/// `true` iff no gene appears twice in the set.
pub fn genes_are_distinct(set: &ColoredNodeSet) -> bool {
    // The set is ordered by (gene, color), so duplicates are adjacent.
    set.iter()
        .zip(set.iter().skip(1))
        .all(|(a, b)| a.gene != b.gene)
}

/// One growth level: colored node sets mapped to their owned support
/// payload (a `PatientBitmask` for the exact enumerator, a mismatch
/// profile for the tolerant variant).
///
/// Insertion is first-writer-wins: a set derived a second time via another
/// join path is rejected and its freshly computed payload dropped.
#[derive(Debug, Clone)]
pub struct Level<M> {
    ids: HashMap<ColoredNodeSet, usize>,
    payloads: Vec<M>,
}

impl<M> Default for Level<M> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            payloads: Vec::new(),
        }
    }
}

impl<M> Level<M> {
    /// Insert `set` with its payload unless an equal set is already
    /// present. Returns whether the entry was inserted.
    pub fn insert(&mut self, set: ColoredNodeSet, payload: M) -> bool {
        match self.ids.entry(set) {
            Occupied(_) => false,
            Vacant(slot) => {
                slot.insert(self.payloads.len());
                self.payloads.push(payload);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColoredNodeSet, &M)> {
        self.ids.iter().map(|(set, &id)| (set, &self.payloads[id]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(gene: u32, color: ColorId) -> ColoredNode {
        ColoredNode::new(NodeIndex::new(gene as usize), color)
    }

    #[test]
    fn sets_compare_equal_across_construction_orders() {
        let forward: ColoredNodeSet = [node(0, 1), node(1, 2), node(2, 1)].into_iter().collect();
        let backward: ColoredNodeSet = [node(2, 1), node(0, 1), node(1, 2)].into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn color_distinguishes_nodes() {
        let a: ColoredNodeSet = [node(0, 1), node(1, 1)].into_iter().collect();
        let b: ColoredNodeSet = [node(0, 1), node(1, 2)].into_iter().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_gene_check() {
        let good: ColoredNodeSet = [node(0, 1), node(1, 1)].into_iter().collect();
        let bad: ColoredNodeSet = [node(0, 1), node(0, 2), node(1, 1)].into_iter().collect();
        assert!(genes_are_distinct(&good));
        assert!(!genes_are_distinct(&bad));
    }

    #[test]
    fn first_insertion_wins() {
        let mut level = Level::<u32>::default();
        let set: ColoredNodeSet = [node(0, 1), node(1, 2)].into_iter().collect();
        assert!(level.insert(set.clone(), 7));
        // Same set via a different derivation: rejected, payload dropped.
        let same: ColoredNodeSet = [node(1, 2), node(0, 1)].into_iter().collect();
        assert!(!level.insert(same, 9));
        assert_eq!(level.len(), 1);
        assert_eq!(level.iter().next().unwrap().1, &7);
    }
}

//! Undirected gene-interaction network.
//!
//! Genes are nodes, interactions are undirected edges. Node ids are dense
//! and assigned in first-seen order over the deduplicated edge stream, so
//! they double as row indices into the per-gene alteration tables.

use std::collections::{HashMap, HashSet};

use bit_set::BitSet;
use petgraph::{
    graph::{Graph, NodeIndex},
    Undirected,
};

pub(crate) type Index = u32;
pub(crate) type GeneGraph = Graph<String, (), Undirected, Index>;

/// Immutable gene-interaction graph plus the name→node lookup.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: GeneGraph,
    indices: HashMap<String, NodeIndex<Index>>,
}

impl Network {
    /// Build a network from a stream of node-name pairs.
    ///
    /// Self-loops are discarded and undirected duplicates (in either
    /// orientation) collapse to one edge, canonicalized by the ordered pair
    /// of endpoint names.
    pub fn from_edges<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut network = Network::default();
        let mut seen = HashSet::<(String, String)>::new();
        for (u, v) in pairs {
            let (mut a, mut b) = (u.as_ref(), v.as_ref());
            if a == b {
                continue;
            }
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            if seen.insert((a.to_string(), b.to_string())) {
                let ia = network.intern(a);
                let ib = network.intern(b);
                network.graph.add_edge(ia, ib, ());
            }
        }
        network
    }

    fn intern(&mut self, name: &str) -> NodeIndex<Index> {
        if let Some(ix) = self.indices.get(name) {
            *ix
        } else {
            let ix = self.graph.add_node(name.to_string());
            self.indices.insert(name.to_string(), ix);
            ix
        }
    }

    pub fn graph(&self) -> &GeneGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node id of the given gene, if it appears in the network.
    pub fn node_index(&self, name: &str) -> Option<NodeIndex<Index>> {
        self.indices.get(name).copied()
    }

    pub fn gene_name(&self, node: NodeIndex<Index>) -> &str {
        &self.graph[node]
    }

    pub fn neighbors(&self, node: NodeIndex<Index>) -> impl Iterator<Item = NodeIndex<Index>> + '_ {
        self.graph.neighbors(node)
    }

    /// Label each node with its connected component, iteratively.
    pub fn connected_components(&self) -> ComponentLabeling {
        let mut labels = vec![0usize; self.node_count()];
        let mut sizes = Vec::new();
        let mut visited = BitSet::with_capacity(self.node_count());
        let mut stack = Vec::new();
        for start in self.graph.node_indices() {
            if visited.contains(start.index()) {
                continue;
            }
            let component = sizes.len();
            sizes.push(0);
            visited.insert(start.index());
            stack.push(start);
            while let Some(node) = stack.pop() {
                labels[node.index()] = component;
                sizes[component] += 1;
                for neighbor in self.graph.neighbors(node) {
                    if visited.insert(neighbor.index()) {
                        stack.push(neighbor);
                    }
                }
            }
        }
        ComponentLabeling { labels, sizes }
    }
}

/// Result of connected-component labeling.
#[derive(Debug, Clone)]
pub struct ComponentLabeling {
    /// Component id per node, indexed by node id.
    pub labels: Vec<usize>,
    /// Node count per component, indexed by component id.
    pub sizes: Vec<usize>,
}

impl ComponentLabeling {
    pub fn count(&self) -> usize {
        self.sizes.len()
    }
}

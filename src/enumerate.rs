//! Level-wise enumeration of recurrently altered colored subnetworks.
//!
//! Level 0 holds every colored edge whose joint patient support meets the
//! threshold. Each later level k is built by joining every level-(k-1) set
//! with every seed and keeping the unions that add exactly one new node and
//! still meet the threshold (an Apriori-style closure: every subset of a
//! supported set is itself supported). The process stops at the first empty
//! level; the previous one holds the maximal subnetworks.
//!
//! Candidate counts have no bound other than threshold pruning, so runtime
//! is data-dependent and exponential in the worst case.

use bit_set::BitSet;
use log::info;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::{
    bitmask::PatientBitmask,
    catalog::{AlterationCatalog, ColorId},
    error::MotifError,
    network::{Index, Network},
    subnetwork::{genes_are_distinct, ColoredNode, ColoredNodeSet, Level},
};

/// Colorfulness requirement applied to candidates during growth. Level-0
/// seeds are exempt, as in the exhaustive baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRule {
    /// Accept any combination of colors.
    Any,
    /// Require at least two distinct colors (no monochromatic subnetworks).
    Colorful,
    /// Between one and two nodes may carry a color other than the
    /// designated background color.
    BackgroundExclusive { background: ColorId },
}

impl ColorRule {
    fn admits(&self, set: &ColoredNodeSet) -> bool {
        match self {
            ColorRule::Any => true,
            ColorRule::Colorful => {
                let first = set.iter().next().map(|n| n.color);
                set.iter().any(|n| Some(n.color) != first)
            }
            ColorRule::BackgroundExclusive { background } => {
                let foreground = set.iter().filter(|n| n.color != *background).count();
                (1..=2).contains(&foreground)
            }
        }
    }
}

/// Per-gene, per-color support counts thresholded at the minimum patient
/// support.
#[derive(Debug, Clone)]
pub struct SupportTable {
    /// `counts[node][alt]` = samples where the node carries alteration
    /// `alt` (0-based).
    pub counts: Vec<Vec<u32>>,
    qualified_genes: BitSet,
    min_support: usize,
}

impl SupportTable {
    pub fn new(catalog: &AlterationCatalog, min_support: usize) -> Self {
        let counts = catalog.support_counts();
        let mut qualified_genes = BitSet::with_capacity(counts.len());
        for (node, per_color) in counts.iter().enumerate() {
            if per_color.iter().any(|&c| c as usize >= min_support) {
                qualified_genes.insert(node);
            }
        }
        Self {
            counts,
            qualified_genes,
            min_support,
        }
    }

    /// `true` iff at least one color of this gene meets the threshold.
    pub fn gene_qualifies(&self, node: NodeIndex<Index>) -> bool {
        self.qualified_genes.contains(node.index())
    }

    pub fn qualified_gene_count(&self) -> usize {
        self.qualified_genes.len()
    }

    /// 1-based ids of this gene's qualified colors.
    pub fn qualified_colors(&self, node: NodeIndex<Index>) -> impl Iterator<Item = ColorId> + '_ {
        self.counts[node.index()]
            .iter()
            .enumerate()
            .filter(move |(_, &count)| count as usize >= self.min_support)
            .map(|(alt, _)| alt as ColorId + 1)
    }
}

/// Per-node sample masks for every qualified (gene, color) pair, computed
/// once so seeding does not rebuild them per edge.
fn qualified_masks(
    catalog: &AlterationCatalog,
    network: &Network,
    support: &SupportTable,
) -> Vec<Vec<(ColorId, PatientBitmask)>> {
    network
        .graph()
        .node_indices()
        .map(|node| {
            if !support.gene_qualifies(node) {
                return Vec::new();
            }
            support
                .qualified_colors(node)
                .map(|color| (color, catalog.sample_mask(node, color)))
                .collect()
        })
        .collect()
}

/// Undirected edges with endpoints ordered by node id, restricted to edges
/// between qualified genes.
fn qualified_edges(
    network: &Network,
    support: &SupportTable,
) -> Vec<(NodeIndex<Index>, NodeIndex<Index>)> {
    network
        .graph()
        .edge_indices()
        .filter_map(|edge| {
            let (a, b) = network.graph().edge_endpoints(edge)?;
            let (lo, hi) = if a.index() < b.index() { (a, b) } else { (b, a) };
            (support.gene_qualifies(lo) && support.gene_qualifies(hi)).then_some((lo, hi))
        })
        .collect()
}

fn pair_set(
    g1: NodeIndex<Index>,
    c1: ColorId,
    g2: NodeIndex<Index>,
    c2: ColorId,
) -> ColoredNodeSet {
    [ColoredNode::new(g1, c1), ColoredNode::new(g2, c2)]
        .into_iter()
        .collect()
}

/// Build level 0: one entry per colored edge with joint support at or above
/// the threshold.
///
/// Seeding is parallel over edges; every (edge, color pair) triple derives
/// a distinct set, so the sequential reduction never sees a duplicate and
/// first-writer-wins semantics are preserved.
pub fn seed_level(
    catalog: &AlterationCatalog,
    network: &Network,
    support: &SupportTable,
    min_support: usize,
) -> Level<PatientBitmask> {
    let masks = qualified_masks(catalog, network, support);
    let masks = &masks;
    let seeds: Vec<(ColoredNodeSet, PatientBitmask)> = qualified_edges(network, support)
        .par_iter()
        .flat_map_iter(|&(g1, g2)| {
            masks[g1.index()].iter().flat_map(move |(c1, m1)| {
                masks[g2.index()].iter().filter_map(move |(c2, m2)| {
                    let mut joint = m1.clone();
                    joint.intersect_with(m2);
                    (joint.len() >= min_support).then(|| (pair_set(g1, *c1, g2, *c2), joint))
                })
            })
        })
        .collect();

    let mut level = Level::default();
    for (set, mask) in seeds {
        level.insert(set, mask);
    }
    level
}

/// The single colored node `seed` would contribute to `base`, if the union
/// is a legitimate one-node extension.
///
/// Rejected: unions adding zero or two nodes, and unions whose new node
/// re-uses a gene already in `base` under another color (gene indices in a
/// set must stay pairwise distinct).
fn single_node_extension(base: &ColoredNodeSet, seed: &ColoredNodeSet) -> Option<ColoredNode> {
    let mut fresh = seed.iter().filter(|n| !base.contains(n));
    let added = *fresh.next()?;
    if fresh.next().is_some() {
        return None;
    }
    if base.iter().any(|n| n.gene == added.gene) {
        return None;
    }
    Some(added)
}

/// Run the exact enumerator; returns every level built, the last of which
/// holds the maximal subnetworks.
pub fn enumerate_exact(
    catalog: &AlterationCatalog,
    network: &Network,
    min_support: usize,
    rule: &ColorRule,
) -> Vec<Level<PatientBitmask>> {
    let support = SupportTable::new(catalog, min_support);
    info!(
        "{} of {} nodes have a color altered in at least {} samples",
        support.qualified_gene_count(),
        network.node_count(),
        min_support
    );

    let seeds = seed_level(catalog, network, &support, min_support);
    info!(
        "level 0: {} colored edges with joint support >= {}",
        seeds.len(),
        min_support
    );
    if seeds.is_empty() {
        return vec![seeds];
    }

    let mut levels = vec![seeds];
    loop {
        let mut next = Level::default();
        {
            let current = levels.last().unwrap();
            let seeds = &levels[0];
            for (base, base_mask) in current.iter() {
                for (seed, seed_mask) in seeds.iter() {
                    if single_node_extension(base, seed).is_none() {
                        continue;
                    }
                    let mut candidate = base.clone();
                    candidate.extend(seed.iter().copied());
                    debug_assert!(genes_are_distinct(&candidate));
                    // Copy-then-intersect: growth paths sharing a prefix
                    // must not corrupt each other's mask.
                    let mut mask = base_mask.clone();
                    mask.intersect_with(seed_mask);
                    if mask.len() >= min_support && rule.admits(&candidate) {
                        next.insert(candidate, mask);
                    }
                }
            }
        }
        if next.is_empty() {
            info!("maximum subnetwork size is {}", levels.len() + 1);
            break;
        }
        info!(
            "level {}: {} subnetworks of {} nodes",
            levels.len(),
            next.len(),
            levels.len() + 2
        );
        levels.push(next);
    }
    levels
}

/// Supporting samples of a mismatch-tolerant candidate, tiered by how many
/// of the candidate's nodes each sample fails to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchProfile {
    // tiers[d] = samples mismatching exactly d nodes, d <= delta.
    tiers: Vec<PatientBitmask>,
}

impl MismatchProfile {
    /// Samples with at most `delta` mismatches.
    pub fn support(&self) -> usize {
        self.tiers.iter().map(PatientBitmask::len).sum()
    }

    /// Union of all tiers, for output.
    pub fn union(&self) -> PatientBitmask {
        let mut all = self.tiers[0].clone();
        for tier in &self.tiers[1..] {
            all.union_with(tier);
        }
        all
    }

    /// Samples matching the candidate exactly.
    pub fn exact(&self) -> &PatientBitmask {
        &self.tiers[0]
    }

    /// Fold one more node's single-node sample mask into the profile:
    /// a sample stays in tier d if it matches the new node, and moves up
    /// from tier d - 1 if it does not.
    fn extend_with(&self, single: &PatientBitmask) -> MismatchProfile {
        let mut tiers = Vec::with_capacity(self.tiers.len());
        for (d, tier) in self.tiers.iter().enumerate() {
            let mut next = tier.clone();
            next.intersect_with(single);
            if d > 0 {
                let mut carried = self.tiers[d - 1].clone();
                carried.difference_with(single);
                next.union_with(&carried);
            }
            tiers.push(next);
        }
        MismatchProfile { tiers }
    }
}

fn seed_profile(
    catalog: &AlterationCatalog,
    m1: &PatientBitmask,
    m2: &PatientBitmask,
    delta: u32,
) -> MismatchProfile {
    let mut exact = m1.clone();
    exact.intersect_with(m2);
    let mut either = m1.clone();
    either.union_with(m2);
    let mut one = either.clone();
    one.difference_with(&exact);
    let mut tiers = vec![exact, one];
    if delta == 2 {
        let mut neither = catalog.full_cohort_mask();
        neither.difference_with(&either);
        tiers.push(neither);
    }
    MismatchProfile { tiers }
}

/// Run the mismatch-tolerant enumerator: a sample supports a candidate if
/// it fails the color requirement on at most `delta` of its nodes.
pub fn enumerate_mismatch(
    catalog: &AlterationCatalog,
    network: &Network,
    min_support: usize,
    delta: u32,
) -> Result<Vec<Level<MismatchProfile>>, MotifError> {
    if !(1..=2).contains(&delta) {
        return Err(MotifError::BadDelta(delta));
    }

    let support = SupportTable::new(catalog, min_support);
    info!(
        "{} of {} nodes have a color altered in at least {} samples",
        support.qualified_gene_count(),
        network.node_count(),
        min_support
    );

    let masks = qualified_masks(catalog, network, &support);
    let masks = &masks;
    let seeded: Vec<(ColoredNodeSet, MismatchProfile)> = qualified_edges(network, &support)
        .par_iter()
        .flat_map_iter(|&(g1, g2)| {
            masks[g1.index()].iter().flat_map(move |(c1, m1)| {
                masks[g2.index()].iter().filter_map(move |(c2, m2)| {
                    let profile = seed_profile(catalog, m1, m2, delta);
                    (profile.support() >= min_support)
                        .then(|| (pair_set(g1, *c1, g2, *c2), profile))
                })
            })
        })
        .collect();

    let mut seeds = Level::default();
    for (set, profile) in seeded {
        seeds.insert(set, profile);
    }
    info!(
        "level 0: {} colored edges with <= {} mismatches and support >= {}",
        seeds.len(),
        delta,
        min_support
    );
    if seeds.is_empty() {
        return Ok(vec![seeds]);
    }

    let mut levels = vec![seeds];
    loop {
        let mut next = Level::default();
        {
            let current = levels.last().unwrap();
            let seeds = &levels[0];
            for (base, base_profile) in current.iter() {
                for (seed, _) in seeds.iter() {
                    let Some(added) = single_node_extension(base, seed) else {
                        continue;
                    };
                    let mut candidate = base.clone();
                    candidate.extend(seed.iter().copied());
                    debug_assert!(genes_are_distinct(&candidate));
                    // The contributed node's own sample mask drives the
                    // tier bookkeeping, not the seed's pair mask.
                    let single = catalog.sample_mask(added.gene, added.color);
                    let profile = base_profile.extend_with(&single);
                    if profile.support() >= min_support {
                        next.insert(candidate, profile);
                    }
                }
            }
        }
        if next.is_empty() {
            info!("maximum subnetwork size is {}", levels.len() + 1);
            break;
        }
        info!(
            "level {}: {} subnetworks of {} nodes",
            levels.len(),
            next.len(),
            levels.len() + 2
        );
        levels.push(next);
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(gene: u32, color: ColorId) -> ColoredNode {
        ColoredNode::new(NodeIndex::new(gene as usize), color)
    }

    #[test]
    fn monochromatic_sets_fail_colorful_rule() {
        let mono: ColoredNodeSet = [node(0, 1), node(1, 1), node(2, 1)].into_iter().collect();
        let mixed: ColoredNodeSet = [node(0, 1), node(1, 2), node(2, 1)].into_iter().collect();
        assert!(!ColorRule::Colorful.admits(&mono));
        assert!(ColorRule::Colorful.admits(&mixed));
        assert!(ColorRule::Any.admits(&mono));
    }

    #[test]
    fn background_rule_bounds_foreground_nodes() {
        let rule = ColorRule::BackgroundExclusive { background: 1 };
        let all_background: ColoredNodeSet = [node(0, 1), node(1, 1)].into_iter().collect();
        let one: ColoredNodeSet = [node(0, 1), node(1, 2)].into_iter().collect();
        let two: ColoredNodeSet = [node(0, 2), node(1, 3), node(2, 1)].into_iter().collect();
        let three: ColoredNodeSet = [node(0, 2), node(1, 3), node(2, 2)].into_iter().collect();
        assert!(!rule.admits(&all_background));
        assert!(rule.admits(&one));
        assert!(rule.admits(&two));
        assert!(!rule.admits(&three));
    }

    #[test]
    fn extension_must_add_exactly_one_node() {
        let base: ColoredNodeSet = [node(0, 1), node(1, 1)].into_iter().collect();
        // Shares one node, adds one: valid.
        let grows: ColoredNodeSet = [node(1, 1), node(2, 2)].into_iter().collect();
        assert_eq!(single_node_extension(&base, &grows), Some(node(2, 2)));
        // Identical to a subset of base: nothing added.
        assert!(single_node_extension(&base, &base).is_none());
        // Disjoint edge: would add two nodes.
        let disjoint: ColoredNodeSet = [node(2, 1), node(3, 1)].into_iter().collect();
        assert!(single_node_extension(&base, &disjoint).is_none());
        // New node re-colors a gene already present.
        let recolored: ColoredNodeSet = [node(1, 1), node(0, 2)].into_iter().collect();
        assert!(single_node_extension(&base, &recolored).is_none());
    }

    #[test]
    fn mismatch_profile_tiers_move_on_extension() {
        // Cohort of 4 samples; profile over two nodes both matched by
        // samples 0 and 1, only one matched by sample 2, neither by 3.
        let mut exact = PatientBitmask::new(4);
        exact.set_bit(0, true);
        exact.set_bit(1, true);
        let mut one = PatientBitmask::new(4);
        one.set_bit(2, true);
        let profile = MismatchProfile {
            tiers: vec![exact, one],
        };
        assert_eq!(profile.support(), 3);

        // New node matched only by samples 0 and 2.
        let mut single = PatientBitmask::new(4);
        single.set_bit(0, true);
        single.set_bit(2, true);
        let extended = profile.extend_with(&single);
        // Sample 0 stays exact; sample 1 moves to one mismatch; sample 2
        // stays at one mismatch (it matches the new node).
        assert_eq!(extended.tiers[0].iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(extended.tiers[1].iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(extended.support(), 3);
    }
}

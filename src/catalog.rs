//! Name catalogs and per-gene alteration color masks.
//!
//! Samples, genes and alteration types each get a dense 0-based id in order
//! of first appearance in the alteration stream. Per (gene, sample) the
//! catalog keeps a bitmask with one bit per alteration type observed for
//! that pair; with at most [`MAX_ALTERATION_TYPES`] types these fit a `u32`.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::{
    bitmask::PatientBitmask,
    error::MotifError,
    network::{Index, Network},
};

/// Upper bound on distinct alteration types (one bit each in a color mask).
pub const MAX_ALTERATION_TYPES: usize = 32;

/// OR of alteration-type bits observed for one (gene, sample) pair.
pub type ColorMask = u32;

/// 1-based alteration-type id as attached to subnetwork nodes; 0 is the
/// "no qualifying color" sentinel.
pub type ColorId = u32;

/// One `sample gene alterationType` record from the alteration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterationRow {
    pub sample: String,
    pub gene: String,
    pub alteration: String,
}

/// Bidirectional name↔dense-id mapping, ids in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct NameCatalog {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl NameCatalog {
    /// Id of `name`, assigning the next dense id on first sight.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(ix) = self.indices.get(name) {
            *ix
        } else {
            let ix = self.names.len();
            self.names.push(name.to_string());
            self.indices.insert(name.to_string(), ix);
            ix
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name(&self, ix: usize) -> &str {
        &self.names[ix]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Immutable alteration context the enumerator reads from.
#[derive(Debug, Clone, Default)]
pub struct AlterationCatalog {
    pub samples: NameCatalog,
    pub genes: NameCatalog,
    pub alterations: NameCatalog,
    // Color mask per sample, one map per network node id.
    gene_alterations: Vec<HashMap<usize, ColorMask>>,
}

impl AlterationCatalog {
    /// Build the catalogs and the per-(gene, sample) color table.
    ///
    /// Rows whose gene is absent from the network are skipped silently;
    /// they are data to ignore, not errors.
    pub fn build(rows: &[AlterationRow], network: &Network) -> Result<Self, MotifError> {
        let mut catalog = AlterationCatalog {
            gene_alterations: vec![HashMap::new(); network.node_count()],
            ..Default::default()
        };
        for row in rows {
            let Some(node) = network.node_index(&row.gene) else {
                continue;
            };
            let sample = catalog.samples.intern(&row.sample);
            catalog.genes.intern(&row.gene);
            let alteration = catalog.alterations.intern(&row.alteration);
            if alteration >= MAX_ALTERATION_TYPES {
                return Err(MotifError::TooManyAlterations(row.alteration.clone()));
            }
            *catalog.gene_alterations[node.index()]
                .entry(sample)
                .or_insert(0) |= 1 << alteration;
        }
        Ok(catalog)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn alteration_count(&self) -> usize {
        self.alterations.len()
    }

    /// Color mask of `node` in `sample`; 0 if the pair was never altered.
    pub fn color_mask(&self, node: NodeIndex<Index>, sample: usize) -> ColorMask {
        self.gene_alterations[node.index()]
            .get(&sample)
            .copied()
            .unwrap_or(0)
    }

    /// `true` iff `node` carries color `color` in `sample`.
    pub fn has_color(&self, node: NodeIndex<Index>, sample: usize, color: ColorId) -> bool {
        debug_assert!(color >= 1);
        self.color_mask(node, sample) & (1 << (color - 1)) != 0
    }

    /// `support[node][alt]` = number of samples whose mask for `node` has
    /// bit `alt` (0-based) set. A sample with several colors on one gene
    /// counts once per color.
    pub fn support_counts(&self) -> Vec<Vec<u32>> {
        let alterations = self.alteration_count();
        self.gene_alterations
            .iter()
            .map(|per_sample| {
                let mut counts = vec![0u32; alterations];
                for mask in per_sample.values() {
                    for (alt, count) in counts.iter_mut().enumerate() {
                        if mask & (1 << alt) != 0 {
                            *count += 1;
                        }
                    }
                }
                counts
            })
            .collect()
    }

    /// Fresh mask of all samples where `node` carries `color`.
    pub fn sample_mask(&self, node: NodeIndex<Index>, color: ColorId) -> PatientBitmask {
        let mut mask = PatientBitmask::new(self.sample_count());
        for (&sample, &colors) in &self.gene_alterations[node.index()] {
            if colors & (1 << (color - 1)) != 0 {
                mask.set_bit(sample, true);
            }
        }
        mask
    }

    /// Mask with every sample of the cohort set.
    pub fn full_cohort_mask(&self) -> PatientBitmask {
        let mut mask = PatientBitmask::new(self.sample_count());
        for sample in 0..self.sample_count() {
            mask.set_bit(sample, true);
        }
        mask
    }
}

//! Tab-separated serialization of terminal-level subnetworks.
//!
//! One row per subnetwork of the last non-empty level, with colon-separated
//! multi-value fields. Position i of `Nodes` corresponds to position i of
//! `Color`; `SampleID` lists supporting samples in ascending sample-index
//! order.

use std::{fs::File, io, path::Path};

use csv::WriterBuilder;
use log::info;

use crate::{
    bitmask::PatientBitmask,
    catalog::AlterationCatalog,
    error::MotifError,
    network::Network,
    subnetwork::Level,
};

/// Serializer for enumerator results; borrows the immutable context to
/// translate node ids, color ids and sample indices back to names.
pub struct SolutionWriter<'a> {
    network: &'a Network,
    catalog: &'a AlterationCatalog,
}

impl<'a> SolutionWriter<'a> {
    pub fn new(network: &'a Network, catalog: &'a AlterationCatalog) -> Self {
        Self { network, catalog }
    }

    /// Write one level to `path`. `samples_of` extracts the supporting
    /// sample set from a level payload (the mask itself for the exact
    /// enumerator, the tier union for the mismatch-tolerant one).
    pub fn write_level<M>(
        &self,
        level: &Level<M>,
        samples_of: impl Fn(&M) -> PatientBitmask,
        path: &Path,
    ) -> Result<(), MotifError> {
        let to_io_error = |source: io::Error| MotifError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(to_io_error)?;
        let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
        writer
            .write_record(["Solution", "Nodes", "Color", "SampleID"])
            .map_err(|e| to_io_error(io::Error::other(e)))?;

        for (i, (set, payload)) in level.iter().enumerate() {
            let nodes = set
                .iter()
                .map(|n| self.network.gene_name(n.gene))
                .collect::<Vec<_>>()
                .join(":");
            let colors = set
                .iter()
                .map(|n| self.catalog.alterations.name(n.color as usize - 1))
                .collect::<Vec<_>>()
                .join(":");
            let samples = samples_of(payload)
                .iter()
                .map(|s| self.catalog.samples.name(s))
                .collect::<Vec<_>>()
                .join(":");
            writer
                .write_record([format!("Solution_{}", i + 1), nodes, colors, samples])
                .map_err(|e| to_io_error(io::Error::other(e)))?;
        }
        writer.flush().map_err(to_io_error)?;
        info!("wrote {} solutions to {}", level.len(), path.display());
        Ok(())
    }
}

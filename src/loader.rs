//! Parsing of network and alteration-profile inputs.
//!
//! Both inputs are plain whitespace-separated token streams: node-name
//! pairs for the network, `sample gene alterationType` triples for the
//! alteration profiles. A trailing unmatched token is ignored.

use std::{fs, path::Path};

use log::info;

use crate::{
    catalog::{AlterationCatalog, AlterationRow},
    error::MotifError,
    network::Network,
};

/// Build a [`Network`] from whitespace-separated node-name pairs.
pub fn parse_network_str(text: &str) -> Network {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    Network::from_edges(tokens.chunks_exact(2).map(|pair| (pair[0], pair[1])))
}

/// Split whitespace-separated `sample gene alterationType` triples.
pub fn parse_alterations_str(text: &str) -> Vec<AlterationRow> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens
        .chunks_exact(3)
        .map(|triple| AlterationRow {
            sample: triple[0].to_string(),
            gene: triple[1].to_string(),
            alteration: triple[2].to_string(),
        })
        .collect()
}

/// Read and parse the `-n` network file.
pub fn load_network(path: &Path) -> Result<Network, MotifError> {
    let text = fs::read_to_string(path).map_err(|source| MotifError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let network = parse_network_str(&text);
    if network.edge_count() == 0 {
        return Err(MotifError::EmptyNetwork);
    }
    info!(
        "input network contains {} nodes and {} undirected edges",
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

/// Read and parse the `-l` alteration-profile file against an existing
/// network; rows naming genes outside the network are skipped.
pub fn load_alterations(path: &Path, network: &Network) -> Result<AlterationCatalog, MotifError> {
    let text = fs::read_to_string(path).map_err(|source| MotifError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = AlterationCatalog::build(&parse_alterations_str(&text), network)?;
    info!(
        "{} samples, {} genes, {} distinct alteration types",
        catalog.sample_count(),
        catalog.genes.len(),
        catalog.alteration_count()
    );
    Ok(catalog)
}

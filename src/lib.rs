// Patient-support bitmask
pub mod bitmask;

// Name catalogs and per-gene alteration colors
pub mod catalog;

// Gene-interaction graph
pub mod network;

// Colored node sets and the per-level index
pub mod subnetwork;

// The hard bit: level-wise subnetwork enumeration
pub mod enumerate;

// Data IO
pub mod loader;

// Solution TSV output
pub mod solution;

// External MIP collaborator interface
pub mod flow;

// Crate errors and exit codes
pub mod error;

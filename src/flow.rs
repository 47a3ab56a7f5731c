//! Interface to the external flow-based MIP collaborator.
//!
//! The alternative solution path formulates subnetwork selection as a
//! mixed-integer program: maximize the number of selected nodes subject to
//! at least `min_support` sample indicators, per-node sample/color
//! consistency, exactly one seed node, and a unit-capacity single-source
//! flow structure forcing connectivity from the seed to every selected
//! node. Solving is delegated to an external backend; this crate defines
//! the data handed over and the outcome contract only.

use std::time::Duration;

use anyhow::{bail, Result};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::{
    catalog::AlterationCatalog,
    enumerate::SupportTable,
    error::MotifError,
    network::{Index, Network},
};

/// Wall-clock budget granted to one backend solve.
pub const SOLVE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Everything the flow formulation consumes.
pub struct FlowProblem<'a> {
    pub network: &'a Network,
    /// Per-node, per-color support counts; nodes with no qualified color
    /// are fixed to zero in the model.
    pub support: SupportTable,
    pub min_support: usize,
}

impl<'a> FlowProblem<'a> {
    pub fn new(network: &'a Network, catalog: &AlterationCatalog, min_support: usize) -> Self {
        Self {
            network,
            support: SupportTable::new(catalog, min_support),
            min_support,
        }
    }
}

/// Outcome of a backend solve.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// Optimal connected subnetwork: selected nodes, supporting samples,
    /// and the nonzero flow per edge.
    Optimal {
        nodes: Vec<NodeIndex<Index>>,
        samples: Vec<usize>,
        flows: Vec<(EdgeIndex<Index>, f64)>,
    },
    Infeasible,
    TimedOut,
}

/// A backend able to solve the single-commodity-flow model within
/// [`SOLVE_TIMEOUT`], parallelizing internally over `threads`.
pub trait FlowSolver {
    fn solve(&self, problem: &FlowProblem<'_>, threads: usize) -> Result<SolveOutcome>;
}

/// Placeholder backend used when no solver is linked in.
pub struct NoBackend;

impl FlowSolver for NoBackend {
    fn solve(&self, _problem: &FlowProblem<'_>, _threads: usize) -> Result<SolveOutcome> {
        bail!("no flow solver backend is built in")
    }
}

/// Run a backend, converting any construction or solve failure into the
/// crate error type. Failures here are non-fatal to the process state but
/// fatal to producing a solution file.
pub fn solve(
    solver: &dyn FlowSolver,
    problem: &FlowProblem<'_>,
    threads: usize,
) -> Result<SolveOutcome, MotifError> {
    solver
        .solve(problem, threads)
        .map_err(MotifError::Solver)
}

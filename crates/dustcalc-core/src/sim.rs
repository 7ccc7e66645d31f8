//! The three-stage pipeline: build, order, trace.
//!
//! [`simulate`] runs [`GraphBuilder`], [`OrderCalculator`] and
//! [`PropagationTracer`] in sequence and hands back the graph (with final
//! powers) together with the trace.

use crate::description::CircuitDescription;
use crate::graph::{CircuitError, CircuitGraph, GraphBuilder};
use crate::order::{NotifyOrder, OrderCalculator};
use crate::trace::{PropagationTracer, Trace, TraceConfig, TraceError};

/// Errors from any pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid circuit: {0}")]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Pipeline settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    pub notify_order: NotifyOrder,
    pub trace: TraceConfig,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// The graph with upstream and downstream edges; powers are final.
    pub graph: CircuitGraph,
    pub trace: Trace,
}

/// Build the graph, compute notify order, then trace propagation.
pub fn simulate(
    description: &CircuitDescription,
    config: SimulationConfig,
) -> Result<Simulation, SimulationError> {
    let mut graph = GraphBuilder::build(description)?;
    OrderCalculator::new(config.notify_order).apply(&mut graph);
    let trace = PropagationTracer::new(config.trace).run(&mut graph)?;
    Ok(Simulation { graph, trace })
}

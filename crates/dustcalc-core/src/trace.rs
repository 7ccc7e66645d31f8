//! Power propagation tracing.
//!
//! Push/pull model: a change is *pushed* to downstream wires as a bare
//! notification, and each notified wire *pulls* its new power from the live
//! powers of all its upstream influencers (`max - 1`, floored at 0). Only a
//! wire whose power actually changes is logged and notifies further.
//!
//! The walk is depth-first. It runs on an explicit LIFO stack: downstream
//! targets are pushed in reverse so they pop in list order, and each wire is
//! evaluated at pop time, which yields exactly the recursive visiting order.

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;
use crate::graph::CircuitGraph;
use crate::id::{NodeId, Origin};

/// Default ceiling on wire evaluations per run.
pub const DEFAULT_MAX_EVALUATIONS: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("propagation did not converge within {evaluations} evaluations")]
    DidNotConverge { evaluations: u64 },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tracer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Abort once this many wires have been evaluated. `None` never aborts,
    /// so a non-converging circuit runs forever.
    pub max_evaluations: Option<u64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_evaluations: Some(DEFAULT_MAX_EVALUATIONS),
        }
    }
}

impl TraceConfig {
    pub fn unbounded() -> Self {
        Self {
            max_evaluations: None,
        }
    }

    pub fn with_max_evaluations(max: u64) -> Self {
        Self {
            max_evaluations: Some(max),
        }
    }
}

// ---------------------------------------------------------------------------
// Trace log
// ---------------------------------------------------------------------------

/// One recorded power change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub from: Origin,
    pub to: NodeId,
    pub coord: Coordinate,
    pub power: u8,
}

/// The ordered log of a run plus the powers the wires started from.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    entries: Vec<TraceEntry>,
    wires: Vec<NodeId>,
    initial_powers: Vec<u8>,
    evaluations: u64,
}

impl Trace {
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire handles indexing the power vectors, in graph wire order.
    pub fn wire_ids(&self) -> &[NodeId] {
        &self.wires
    }

    /// Wire powers before the run, in wire order.
    pub fn initial_powers(&self) -> &[u8] {
        &self.initial_powers
    }

    /// How many wires were evaluated, changed or not.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Every wire's power after each entry, one vector per entry.
    pub fn snapshots(&self) -> Vec<Vec<u8>> {
        let mut current = self.initial_powers.clone();
        self.entries
            .iter()
            .map(|entry| {
                if let Some(slot) = self.wires.iter().position(|&w| w == entry.to) {
                    current[slot] = entry.power;
                }
                current.clone()
            })
            .collect()
    }

    /// Wire powers after the last entry.
    pub fn final_powers(&self) -> Vec<u8> {
        self.snapshots()
            .pop()
            .unwrap_or_else(|| self.initial_powers.clone())
    }
}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Drives propagation from the power source and records every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagationTracer {
    config: TraceConfig,
}

struct Walk {
    stack: Vec<(Origin, NodeId)>,
    entries: Vec<TraceEntry>,
    evaluations: u64,
}

impl PropagationTracer {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Seed each enabled source direction in canonical order, resolving each
    /// to quiescence before the next. Wire powers in `graph` are updated.
    pub fn run(&self, graph: &mut CircuitGraph) -> Result<Trace, TraceError> {
        let wires = graph.wire_ids().to_vec();
        let initial_powers = graph.powers();
        let origin = graph.source().coord;

        let mut walk = Walk {
            stack: Vec::new(),
            entries: Vec::new(),
            evaluations: 0,
        };

        for dir in graph.source_mask().enabled() {
            let Some(first) = graph.wire_at(origin.neighbor(dir)) else {
                continue;
            };
            let before = walk.entries.len();
            walk.stack.push((Origin::Source, first));
            self.drain(graph, &mut walk)?;
            log::trace!(
                target: "dustcalc::trace",
                "source {} resolved with {} changes",
                dir,
                walk.entries.len() - before
            );
        }

        log::debug!(
            target: "dustcalc::trace",
            "trace finished: {} changes, {} evaluations",
            walk.entries.len(),
            walk.evaluations
        );

        Ok(Trace {
            entries: walk.entries,
            wires,
            initial_powers,
            evaluations: walk.evaluations,
        })
    }

    fn drain(&self, graph: &mut CircuitGraph, walk: &mut Walk) -> Result<(), TraceError> {
        while let Some((from, node)) = walk.stack.pop() {
            if let Some(max) = self.config.max_evaluations {
                if walk.evaluations >= max {
                    return Err(TraceError::DidNotConverge { evaluations: max });
                }
            }
            walk.evaluations += 1;

            let candidate = pulled_power(graph, node);
            if candidate == graph.power(node) {
                continue;
            }

            let Some(wire) = graph.node_mut(node) else {
                continue;
            };
            if !wire.set_wire_power(candidate) {
                continue;
            }
            let coord = wire.coord;
            log::trace!(
                target: "dustcalc::trace",
                "{:?} -> ({}) power {}",
                from,
                coord,
                candidate
            );
            walk.entries.push(TraceEntry {
                from,
                to: node,
                coord,
                power: candidate,
            });

            let downstream = graph.downstream(node);
            walk.stack
                .extend(downstream.iter().rev().map(|&d| (Origin::Wire(node), d)));
        }
        Ok(())
    }
}

/// `max(upstream power) - 1`, floored at 0. A wire with no upstream pulls 0.
pub fn pulled_power(graph: &CircuitGraph, wire: NodeId) -> u8 {
    graph
        .upstream(wire)
        .iter()
        .map(|&u| graph.power(u))
        .max()
        .unwrap_or(0)
        .saturating_sub(1)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Direction;
    use crate::description::{CircuitDescription, SourceSpec, WireSpec};
    use crate::graph::GraphBuilder;
    use crate::node::DirectionMask;
    use crate::order::{NotifyOrder, OrderCalculator};

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    fn prepared(power: i64, mask: DirectionMask, wires: &[(Coordinate, i64)]) -> CircuitGraph {
        let mut desc = CircuitDescription::new(SourceSpec {
            coord: c(0, 0, 0),
            power,
            mask: mask.as_array().to_vec(),
        });
        desc.wires = wires
            .iter()
            .map(|&(coord, power)| WireSpec { coord, power })
            .collect();
        let mut graph = GraphBuilder::build(&desc).unwrap();
        OrderCalculator::new(NotifyOrder::Literal).apply(&mut graph);
        graph
    }

    /// (from coordinate or None for the source, to coordinate, power)
    fn summary(graph: &CircuitGraph, trace: &Trace) -> Vec<(Option<Coordinate>, Coordinate, u8)> {
        trace
            .entries()
            .iter()
            .map(|e| (e.from.wire().and_then(|w| graph.coord(w)), e.coord, e.power))
            .collect()
    }

    #[test]
    fn single_wire_next_to_source() {
        let mut graph = prepared(15, DirectionMask::ALL, &[(c(1, 0, 0), 0)]);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();

        assert_eq!(summary(&graph, &trace), vec![(None, c(1, 0, 0), 14)]);
        assert_eq!(trace.initial_powers(), &[0]);
        assert_eq!(graph.powers(), vec![14]);
    }

    #[test]
    fn chained_wires_decay_by_one() {
        let mask = DirectionMask::only(&[Direction::West, Direction::East]);
        let mut graph = prepared(15, mask, &[(c(1, 0, 0), 0), (c(2, 0, 0), 0)]);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();

        assert_eq!(
            summary(&graph, &trace),
            vec![
                (None, c(1, 0, 0), 14),
                (Some(c(1, 0, 0)), c(2, 0, 0), 13),
            ]
        );
        assert_eq!(trace.snapshots(), vec![vec![14, 0], vec![14, 13]]);
        assert_eq!(trace.final_powers(), vec![14, 13]);
    }

    #[test]
    fn earlier_direction_can_power_later_neighbor() {
        // The west arm's notify order reaches (1,0,0) before the source
        // gets to EAST, so EAST finds nothing left to change.
        let wires = [
            (c(-1, 0, 0), 0),
            (c(-2, 0, 0), 0),
            (c(1, 0, 0), 0),
            (c(2, 0, 0), 0),
        ];
        let mut graph = prepared(15, DirectionMask::ALL, &wires);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();

        assert_eq!(
            summary(&graph, &trace),
            vec![
                (None, c(-1, 0, 0), 14),
                (Some(c(-1, 0, 0)), c(-2, 0, 0), 13),
                (Some(c(-1, 0, 0)), c(1, 0, 0), 14),
                (Some(c(1, 0, 0)), c(2, 0, 0), 13),
            ]
        );
    }

    #[test]
    fn unpowered_source_drains_existing_power() {
        let mut graph = prepared(0, DirectionMask::ALL, &[(c(1, 0, 0), 5), (c(2, 0, 0), 9)]);
        let trace = PropagationTracer::new(TraceConfig::unbounded())
            .run(&mut graph)
            .unwrap();

        let powers: Vec<u8> = trace.entries().iter().map(|e| e.power).collect();
        assert_eq!(powers, vec![8, 7, 6, 5, 4, 3, 2, 1, 0, 0]);
        assert_eq!(graph.powers(), vec![0, 0]);
    }

    #[test]
    fn evaluation_budget_aborts() {
        let mut graph = prepared(0, DirectionMask::ALL, &[(c(1, 0, 0), 5), (c(2, 0, 0), 9)]);
        let err = PropagationTracer::new(TraceConfig::with_max_evaluations(3))
            .run(&mut graph)
            .unwrap_err();
        assert!(matches!(err, TraceError::DidNotConverge { evaluations: 3 }));
        assert_eq!(
            err.to_string(),
            "propagation did not converge within 3 evaluations"
        );
    }

    #[test]
    fn no_entry_when_power_already_correct() {
        let mut graph = prepared(15, DirectionMask::ALL, &[(c(1, 0, 0), 14)]);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.evaluations(), 1);
        assert_eq!(trace.final_powers(), vec![14]);
    }

    #[test]
    fn disabled_directions_are_skipped() {
        let mask = DirectionMask::only(&[Direction::Up]);
        let mut graph = prepared(15, mask, &[(c(1, 0, 0), 0)]);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.evaluations(), 0);
    }

    #[test]
    fn wire_without_upstream_pulls_zero() {
        let graph = prepared(15, DirectionMask::NONE, &[(c(5, 5, 5), 7)]);
        let wire = graph.wire_ids()[0];
        assert_eq!(pulled_power(&graph, wire), 0);
    }

    #[test]
    fn logged_power_always_differs_from_prior() {
        let wires: Vec<_> = (1..8).map(|x| (c(x, 0, 0), (x as i64 * 3) % 16)).collect();
        let mut graph = prepared(15, DirectionMask::ALL, &wires);
        let trace = PropagationTracer::default().run(&mut graph).unwrap();

        let mut prior = trace.initial_powers().to_vec();
        for entry in trace.entries() {
            let slot = trace.wire_ids().iter().position(|&w| w == entry.to).unwrap();
            assert_ne!(prior[slot], entry.power);
            assert!(entry.power <= 15);
            prior[slot] = entry.power;
        }
    }
}

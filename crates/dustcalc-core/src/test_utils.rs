//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::coord::Coordinate;
use crate::description::{CircuitDescription, Marker, SourceSpec, WireSpec};
use crate::graph::CircuitGraph;
use crate::id::Origin;
use crate::node::DirectionMask;
use crate::sim::{Simulation, SimulationConfig, simulate};

// ===========================================================================
// Builders
// ===========================================================================

pub fn c(x: i32, y: i32, z: i32) -> Coordinate {
    Coordinate::new(x, y, z)
}

/// A full-power source at `at` driving the directions in `mask`.
pub fn source(at: Coordinate, mask: DirectionMask) -> SourceSpec {
    SourceSpec {
        coord: at,
        power: 15,
        mask: mask.as_array().to_vec(),
    }
}

pub fn wire(at: Coordinate, power: i64) -> WireSpec {
    WireSpec { coord: at, power }
}

pub fn marker(at: Coordinate, block_type: &str) -> Marker {
    Marker {
        coord: at,
        block_type: block_type.to_string(),
    }
}

/// A description with unpowered wires at each coordinate.
pub fn circuit(source: SourceSpec, wires: &[Coordinate]) -> CircuitDescription {
    let mut desc = CircuitDescription::new(source);
    desc.wires = wires.iter().map(|&at| wire(at, 0)).collect();
    desc
}

/// A straight eastward line of `len` unpowered wires starting next to a
/// full-power source at the origin.
pub fn east_line(len: i32) -> CircuitDescription {
    let wires: Vec<_> = (1..=len).map(|x| c(x, 0, 0)).collect();
    circuit(source(Coordinate::ORIGIN, DirectionMask::ALL), &wires)
}

/// A `size` x `size` flat grid of unpowered wires with its corner next to a
/// full-power source at the origin.
pub fn flat_grid(size: i32) -> CircuitDescription {
    let mut wires = Vec::new();
    for x in 1..=size {
        for z in 0..size {
            wires.push(c(x, 0, z));
        }
    }
    circuit(source(Coordinate::ORIGIN, DirectionMask::ALL), &wires)
}

// ===========================================================================
// Running and inspecting
// ===========================================================================

/// Run the full pipeline with default settings, panicking on failure.
pub fn run(desc: &CircuitDescription) -> Simulation {
    simulate(desc, SimulationConfig::default()).expect("simulation should succeed")
}

/// Trace entries as `(from coordinate or None for SOURCE, to, power)`.
pub fn trace_summary(sim: &Simulation) -> Vec<(Option<Coordinate>, Coordinate, u8)> {
    sim.trace
        .entries()
        .iter()
        .map(|e| (origin_coord(&sim.graph, e.from), e.coord, e.power))
        .collect()
}

pub fn origin_coord(graph: &CircuitGraph, origin: Origin) -> Option<Coordinate> {
    origin.wire().and_then(|w| graph.coord(w))
}

/// Upstream coordinates of the wire at `at` (the source shows as its own
/// coordinate).
pub fn upstream_at(graph: &CircuitGraph, at: Coordinate) -> Vec<Coordinate> {
    let id = graph.wire_at(at).expect("wire should exist");
    graph
        .upstream(id)
        .iter()
        .filter_map(|&u| graph.coord(u))
        .collect()
}

/// Downstream coordinates of the wire at `at`.
pub fn downstream_at(graph: &CircuitGraph, at: Coordinate) -> Vec<Coordinate> {
    let id = graph.wire_at(at).expect("wire should exist");
    graph
        .downstream(id)
        .iter()
        .filter_map(|&d| graph.coord(d))
        .collect()
}

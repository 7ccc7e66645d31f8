//! Text and JSON rendering of a finished run.

use std::collections::HashMap;
use std::fmt::{self, Write};

use dustcalc_core::coord::Coordinate;
use dustcalc_core::description::CircuitDescription;
use dustcalc_core::graph::CircuitGraph;
use dustcalc_core::id::{NodeId, Origin};
use dustcalc_core::sim::Simulation;
use serde::Serialize;

// ===========================================================================
// Trace IDs
// ===========================================================================

/// Sequential display ids, 1..=n in wire insertion order.
#[derive(Debug, Clone, Default)]
pub struct TraceIds {
    ids: HashMap<NodeId, usize>,
}

impl TraceIds {
    pub fn new(graph: &CircuitGraph) -> Self {
        let ids = graph
            .wire_ids()
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, i + 1))
            .collect();
        Self { ids }
    }

    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.ids.get(&node).copied()
    }
}

fn label(ids: &TraceIds, graph: &CircuitGraph, node: NodeId) -> String {
    match (ids.get(node), graph.coord(node)) {
        (Some(id), Some(at)) => format!("[{id}] ({at})"),
        _ => "[?]".to_string(),
    }
}

fn origin_label(ids: &TraceIds, graph: &CircuitGraph, origin: Origin) -> String {
    match origin {
        Origin::Source => "[SOURCE]".to_string(),
        Origin::Wire(w) => label(ids, graph, w),
    }
}

fn bracketed<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

// ===========================================================================
// Text
// ===========================================================================

/// The five-section plain-text report.
pub fn render_text(desc: &CircuitDescription, sim: &Simulation) -> Result<String, fmt::Error> {
    let graph = &sim.graph;
    let ids = TraceIds::new(graph);
    let mut out = String::new();

    writeln!(out, "=== Loaded Instance ===")?;
    writeln!(out, "Power source: {}", desc.source)?;
    writeln!(out, "Dust blocks: {}", bracketed(&desc.wires))?;
    writeln!(out, "Transparent blocks: {}", bracketed(&desc.transparent))?;
    writeln!(out, "Blocking blocks: {}", bracketed(&desc.blocking))?;

    writeln!(out, "=== Connectivity Graph ===")?;
    for &w in graph.wire_ids() {
        adjacency_line(&mut out, graph, w, graph.upstream(w))?;
    }

    writeln!(out, "=== Update Order Graph ===")?;
    for &w in graph.wire_ids() {
        adjacency_line(&mut out, graph, w, graph.downstream(w))?;
    }

    writeln!(out, "=== Trace IDs ===")?;
    for &w in graph.wire_ids() {
        if let (Some(id), Some(at)) = (ids.get(w), graph.coord(w)) {
            writeln!(out, "[ID={id}] @ ({}, {}, {})", at.x, at.y, at.z)?;
        }
    }

    writeln!(out, "=== Trace Log ===")?;
    for (i, (entry, snapshot)) in sim
        .trace
        .entries()
        .iter()
        .zip(sim.trace.snapshots())
        .enumerate()
    {
        writeln!(
            out,
            "{i}:\t{:<20}\t→\t{:<16}\t@ power={:02}    {}",
            origin_label(&ids, graph, entry.from),
            label(&ids, graph, entry.to),
            entry.power,
            bracketed(&snapshot)
        )?;
    }

    Ok(out)
}

fn adjacency_line(
    out: &mut String,
    graph: &CircuitGraph,
    node: NodeId,
    targets: &[NodeId],
) -> fmt::Result {
    let at = graph.coord(node).map(|c| c.to_string()).unwrap_or_default();
    let joined: Vec<String> = targets
        .iter()
        .filter_map(|&t| graph.coord(t))
        .map(|c| c.to_string())
        .collect();
    writeln!(out, "{at:<12} -> {}", joined.join(" | "))
}

// ===========================================================================
// JSON
// ===========================================================================

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub source: JsonSource,
    pub nodes: Vec<JsonNode>,
    pub trace: Vec<JsonTraceEntry>,
    pub evaluations: u64,
}

#[derive(Debug, Serialize)]
pub struct JsonSource {
    pub coord: Coordinate,
    pub power: u8,
    pub mask: [bool; 6],
}

#[derive(Debug, Serialize)]
pub struct JsonNode {
    pub id: usize,
    pub coord: Coordinate,
    pub initial_power: u8,
    pub final_power: u8,
    /// Whether the source is among this wire's influencers.
    pub fed_by_source: bool,
    pub upstream: Vec<usize>,
    pub downstream: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct JsonTraceEntry {
    pub index: usize,
    /// `None` when the source drove the change.
    pub from: Option<usize>,
    pub to: usize,
    pub power: u8,
    pub snapshot: Vec<u8>,
}

impl JsonReport {
    pub fn new(sim: &Simulation) -> Self {
        let graph = &sim.graph;
        let ids = TraceIds::new(graph);
        let source_id = graph.source_id();
        let to_ids = |list: &[NodeId]| -> Vec<usize> {
            list.iter().filter_map(|&n| ids.get(n)).collect()
        };

        let initial = sim.trace.initial_powers();
        let nodes = graph
            .wire_ids()
            .iter()
            .enumerate()
            .map(|(slot, &w)| JsonNode {
                id: slot + 1,
                coord: graph.coord(w).unwrap_or(Coordinate::ORIGIN),
                initial_power: initial.get(slot).copied().unwrap_or(0),
                final_power: graph.power(w),
                fed_by_source: graph.upstream(w).contains(&source_id),
                upstream: to_ids(graph.upstream(w)),
                downstream: to_ids(graph.downstream(w)),
            })
            .collect();

        let trace = sim
            .trace
            .entries()
            .iter()
            .zip(sim.trace.snapshots())
            .enumerate()
            .map(|(index, (entry, snapshot))| JsonTraceEntry {
                index,
                from: entry.from.wire().and_then(|w| ids.get(w)),
                to: ids.get(entry.to).unwrap_or(0),
                power: entry.power,
                snapshot,
            })
            .collect();

        let source = graph.source();
        Self {
            source: JsonSource {
                coord: source.coord,
                power: source.power(),
                mask: graph.source_mask().as_array(),
            },
            nodes,
            trace,
            evaluations: sim.trace.evaluations(),
        }
    }
}

pub fn render_json(sim: &Simulation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport::new(sim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dustcalc_core::node::DirectionMask;
    use dustcalc_core::test_utils::*;

    #[test]
    fn trace_ids_follow_insertion_order() {
        let desc = circuit(
            source(c(0, 0, 0), DirectionMask::ALL),
            &[c(3, 0, 0), c(1, 0, 0), c(2, 0, 0)],
        );
        let sim = run(&desc);
        let ids = TraceIds::new(&sim.graph);
        let wires = sim.graph.wire_ids();
        assert_eq!(ids.get(wires[0]), Some(1));
        assert_eq!(ids.get(wires[2]), Some(3));
        assert_eq!(ids.get(sim.graph.source_id()), None);
    }

    #[test]
    fn text_report_single_wire() {
        let desc = east_line(1);
        let sim = run(&desc);
        let text = render_text(&desc, &sim).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "=== Loaded Instance ===",
                "Power source: PowerSource[x=0, y=0, z=0, power=15, mask=[true, true, true, true, true, true]]",
                "Dust blocks: [Wire[x=1, y=0, z=0, power=0]]",
                "Transparent blocks: []",
                "Blocking blocks: []",
                "=== Connectivity Graph ===",
                "1,0,0        -> 0,0,0",
                "=== Update Order Graph ===",
                "1,0,0        -> 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0",
                "=== Trace IDs ===",
                "[ID=1] @ (1, 0, 0)",
                "=== Trace Log ===",
                "0:\t[SOURCE]            \t→\t[1] (1,0,0)     \t@ power=14    [14]",
            ]
        );
    }

    #[test]
    fn text_report_names_wire_origins() {
        let desc = east_line(2);
        let sim = run(&desc);
        let text = render_text(&desc, &sim).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(
            last,
            "1:\t[1] (1,0,0)         \t→\t[2] (2,0,0)     \t@ power=13    [14, 13]"
        );
    }

    #[test]
    fn json_report_shape() {
        let sim = run(&east_line(2));
        let value: serde_json::Value = serde_json::from_str(&render_json(&sim).unwrap()).unwrap();

        assert_eq!(value["evaluations"], sim.trace.evaluations());
        assert_eq!(value["source"]["power"], 15);
        assert_eq!(value["nodes"][0]["id"], 1);
        assert_eq!(value["nodes"][0]["coord"]["x"], 1);
        assert_eq!(value["nodes"][0]["fed_by_source"], true);
        assert_eq!(value["nodes"][0]["upstream"], serde_json::json!([2]));
        assert_eq!(value["nodes"][1]["final_power"], 13);
        assert_eq!(value["trace"][0]["from"], serde_json::Value::Null);
        assert_eq!(value["trace"][1]["from"], 1);
        assert_eq!(value["trace"][1]["snapshot"], serde_json::json!([14, 13]));
    }
}

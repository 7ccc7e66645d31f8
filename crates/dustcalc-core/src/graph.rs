//! The circuit graph and its builder.
//!
//! Nodes live in a `SlotMap` and refer to each other by [`NodeId`]. A wire
//! can legitimately list a neighbor as both upstream influencer and
//! downstream notify target, so edges are handle lists rather than owning
//! references.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::coord::Coordinate;
use crate::description::{CircuitDescription, Marker};
use crate::id::NodeId;
use crate::node::{DirectionMask, PowerNode};
use crate::spatial::SpatialIndex;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while constructing a circuit graph.
#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    #[error("power source mask must have exactly 6 entries, got {len}")]
    InvalidMaskLength { len: usize },
    #[error("power {power} at ({coord}) is outside 0..=15")]
    PowerOutOfRange { coord: Coordinate, power: i64 },
}

// ---------------------------------------------------------------------------
// CircuitGraph
// ---------------------------------------------------------------------------

/// Wire nodes, the power source, and a coordinate index over the wires.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    nodes: SlotMap<NodeId, PowerNode>,
    index: SpatialIndex,
    /// Wires in first-insertion order.
    wires: Vec<NodeId>,
    source: NodeId,
}

impl CircuitGraph {
    fn with_source(source: PowerNode) -> Self {
        let mut nodes = SlotMap::with_key();
        let source = nodes.insert(source);
        Self {
            nodes,
            index: SpatialIndex::new(),
            wires: Vec::new(),
            source,
        }
    }

    pub fn source_id(&self) -> NodeId {
        self.source
    }

    pub fn source(&self) -> &PowerNode {
        &self.nodes[self.source]
    }

    /// The source's direction mask.
    pub fn source_mask(&self) -> DirectionMask {
        self.source().mask().unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<&PowerNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut PowerNode> {
        self.nodes.get_mut(id)
    }

    /// Wire handles in first-insertion order.
    pub fn wire_ids(&self) -> &[NodeId] {
        &self.wires
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// The wire occupying `coord`, if any. The source is never returned.
    pub fn wire_at(&self, coord: Coordinate) -> Option<NodeId> {
        self.index.node_at(coord)
    }

    pub fn spatial(&self) -> &SpatialIndex {
        &self.index
    }

    /// Current power of any node; `0` for an unknown handle.
    pub fn power(&self, id: NodeId) -> u8 {
        self.nodes.get(id).map_or(0, PowerNode::power)
    }

    pub fn coord(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(id).map(|n| n.coord)
    }

    /// Upstream influencers of a wire. Empty for the source or unknown ids.
    pub fn upstream(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .and_then(PowerNode::links)
            .map(|l| l.upstream.as_slice())
            .unwrap_or(&[])
    }

    /// Downstream notify targets of a wire. Empty for the source or unknown ids.
    pub fn downstream(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .and_then(PowerNode::links)
            .map(|l| l.downstream.as_slice())
            .unwrap_or(&[])
    }

    /// Every wire's power, in wire order.
    pub fn powers(&self) -> Vec<u8> {
        self.wires.iter().map(|&id| self.power(id)).collect()
    }

    /// Total number of upstream edges across all wires.
    pub fn upstream_edge_count(&self) -> usize {
        self.wires.iter().map(|&id| self.upstream(id).len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Occlusion
// ---------------------------------------------------------------------------

/// Blocking and transparent marker positions, as lookup sets.
#[derive(Debug, Clone, Default)]
pub struct Occlusion {
    blocking: BTreeSet<Coordinate>,
    transparent: BTreeSet<Coordinate>,
}

impl Occlusion {
    pub fn new(blocking: &[Marker], transparent: &[Marker]) -> Self {
        Self {
            blocking: blocking.iter().map(|m| m.coord).collect(),
            transparent: transparent.iter().map(|m| m.coord).collect(),
        }
    }

    /// Whether the wire at `a` has the wire at `b` as an upstream influencer.
    ///
    /// Horizontal neighbors always connect. Staircase neighbors connect both
    /// ways unless a blocking marker caps the lower wire (no connection) or a
    /// transparent marker fills the corner under the higher wire (only the
    /// higher wire is influenced).
    pub fn is_affected_by(&self, a: Coordinate, b: Coordinate) -> bool {
        let dx = i64::from(b.x) - i64::from(a.x);
        let dy = i64::from(b.y) - i64::from(a.y);
        let dz = i64::from(b.z) - i64::from(a.z);
        let horizontal = dx.abs() + dz.abs();

        if dy == 0 && horizontal == 1 {
            return true;
        }
        if dy.abs() != 1 || horizontal != 1 {
            return false;
        }

        let (lower, higher) = if a.y < b.y { (a, b) } else { (b, a) };
        if self.blocking.contains(&lower.above()) {
            return false;
        }
        if self.transparent.contains(&higher.below()) {
            return a == higher;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Neighborhood searched for wire-to-wire influence: four horizontal steps,
/// then the eight staircase steps.
pub const WIRE_NEIGHBORHOOD: [(i32, i32, i32); 12] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
    (1, 1, 0),
    (1, -1, 0),
    (-1, 1, 0),
    (-1, -1, 0),
    (0, 1, 1),
    (0, 1, -1),
    (0, -1, 1),
    (0, -1, -1),
];

/// Builds a [`CircuitGraph`] with populated upstream edges.
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn build(description: &CircuitDescription) -> Result<CircuitGraph, CircuitError> {
        let spec = &description.source;
        let source = PowerNode::source(spec.coord, spec.power, &spec.mask)?;
        let mask = source.mask().unwrap_or_default();
        let mut graph = CircuitGraph::with_source(source);

        for wire in &description.wires {
            let node = PowerNode::wire(wire.coord, wire.power)?;
            match graph.index.node_at(wire.coord) {
                Some(existing) => {
                    log::warn!(
                        target: "dustcalc::graph",
                        "duplicate wire at ({}); keeping power {}",
                        wire.coord,
                        wire.power
                    );
                    graph.nodes[existing] = node;
                }
                None => {
                    let id = graph.nodes.insert(node);
                    graph.index.insert(wire.coord, id);
                    graph.wires.push(id);
                }
            }
        }

        let occlusion = Occlusion::new(&description.blocking, &description.transparent);
        let mut links: Vec<(NodeId, NodeId)> = Vec::new();
        for &a in &graph.wires {
            let a_pos = graph.nodes[a].coord;
            for offset in WIRE_NEIGHBORHOOD {
                let b_pos = a_pos.offset(offset);
                if let Some(b) = graph.index.node_at(b_pos) {
                    if occlusion.is_affected_by(a_pos, b_pos) {
                        links.push((a, b));
                    }
                }
            }
        }

        for dir in mask.enabled() {
            if let Some(wire) = graph.index.node_at(spec.coord.neighbor(dir)) {
                links.push((wire, graph.source));
            }
        }

        for (node, influencer) in links {
            if let Some(l) = graph.nodes[node].links_mut() {
                l.upstream.push(influencer);
            }
        }

        log::debug!(
            target: "dustcalc::graph",
            "built graph: {} wires, {} upstream edges",
            graph.wire_count(),
            graph.upstream_edge_count()
        );
        Ok(graph)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

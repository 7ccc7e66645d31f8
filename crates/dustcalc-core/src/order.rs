//! Downstream notify order for every wire.
//!
//! When a wire changes it notifies its six neighbors once directly and again
//! through each of those neighbors' own six neighbors. The seven "centers"
//! (the wire itself plus its six neighbors) are visited in an order perturbed
//! by a coordinate hash, so the *set* of notified cells is fixed but the
//! *order* varies with position. Propagation order depends on it whenever
//! several neighbors would otherwise change at once, so it must match
//! exactly.
//!
//! The order depends only on the wire's coordinate and on which coordinates
//! hold wires. Power levels and upstream edges are never consulted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coord::{Coordinate, Direction};
use crate::graph::CircuitGraph;
use crate::id::NodeId;

/// The seven second-order centers, in canonical slot order:
/// origin, -X, +X, -Y, +Y, -Z, +Z.
pub const SECOND_ORDER_OFFSETS: [(i32, i32, i32); 7] = [
    (0, 0, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Slot priority among centers whose perturbation index ties.
const TIE_BREAK_ORDER: [usize; 7] = [0, 3, 4, 5, 6, 1, 2];

/// Number of raw candidates generated per wire (7 centers x 6 neighbors).
pub const CANDIDATE_COUNT: usize = SECOND_ORDER_OFFSETS.len() * Direction::ALL.len();

/// How repeated candidates are treated when filling downstream lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyOrder {
    /// Keep every occurrence; a wire may be notified several times per change.
    #[default]
    Literal,
    /// Keep only the first occurrence of each wire.
    Deduplicated,
}

/// Hash-derived ordering key in `0..=15` for a coordinate.
///
/// `K = x + 31y + 961z` in wrapping `i32`, folded as `K ^ (K >>> 16)`
/// (logical shift), low four bits.
pub fn perturbation_index(c: Coordinate) -> u8 {
    let k = c
        .x
        .wrapping_add(c.y.wrapping_mul(31))
        .wrapping_add(c.z.wrapping_mul(961)) as u32;
    ((k ^ (k >> 16)) & 0xF) as u8
}

fn tie_rank(slot: usize) -> usize {
    TIE_BREAK_ORDER
        .iter()
        .position(|&s| s == slot)
        .unwrap_or(TIE_BREAK_ORDER.len())
}

/// The seven second-order offsets for a wire at `c`, sorted by the
/// perturbation index of `c + offset` with ties broken by slot priority.
pub fn second_order_offsets(c: Coordinate) -> [(i32, i32, i32); 7] {
    let mut slots: [usize; 7] = std::array::from_fn(|i| i);
    slots.sort_by_key(|&slot| {
        let center = c.offset(SECOND_ORDER_OFFSETS[slot]);
        (perturbation_index(center), tie_rank(slot))
    });
    slots.map(|slot| SECOND_ORDER_OFFSETS[slot])
}

/// All 42 raw notify candidates for a wire at `c`, before filtering.
///
/// For each sorted center, its six neighbors in canonical direction order.
/// Entries repeat: `c` itself appears six times.
pub fn candidate_positions(c: Coordinate) -> Vec<Coordinate> {
    let mut out = Vec::with_capacity(CANDIDATE_COUNT);
    for offset in second_order_offsets(c) {
        let center = c.offset(offset);
        out.extend(Direction::ALL.iter().map(|&dir| center.neighbor(dir)));
    }
    out
}

/// Fills every wire's downstream list.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCalculator {
    mode: NotifyOrder,
}

impl OrderCalculator {
    pub fn new(mode: NotifyOrder) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> NotifyOrder {
        self.mode
    }

    /// Notify targets for one wire, computed from coordinates alone.
    pub fn notify_targets(&self, graph: &CircuitGraph, wire: NodeId) -> Vec<NodeId> {
        let Some(coord) = graph.coord(wire) else {
            return Vec::new();
        };
        let hits = candidate_positions(coord)
            .into_iter()
            .filter_map(|p| graph.wire_at(p));

        match self.mode {
            NotifyOrder::Literal => hits.collect(),
            NotifyOrder::Deduplicated => {
                let mut seen = HashSet::new();
                hits.filter(|id| seen.insert(*id)).collect()
            }
        }
    }

    /// Clear and recompute the downstream list of every wire.
    pub fn apply(&self, graph: &mut CircuitGraph) {
        let computed: Vec<(NodeId, Vec<NodeId>)> = graph
            .wire_ids()
            .iter()
            .map(|&id| (id, self.notify_targets(graph, id)))
            .collect();

        let mut total = 0;
        for (id, targets) in computed {
            total += targets.len();
            if let Some(links) = graph.node_mut(id).and_then(|n| n.links_mut()) {
                links.downstream = targets;
            }
        }

        log::debug!(
            target: "dustcalc::order",
            "computed {:?} notify order: {} downstream entries over {} wires",
            self.mode,
            total,
            graph.wire_count()
        );
    }
}

//! Coordinate lookup for wire nodes.
//!
//! Every other component answers "is there a wire here, and which one?"
//! through [`SpatialIndex`]. Only wires are indexed; the power source is
//! held separately by the graph.

use std::collections::BTreeMap;

use crate::coord::Coordinate;
use crate::id::NodeId;

/// Maps voxel coordinates to the wire node occupying them.
///
/// Backed by an ordered map so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cells: BTreeMap<Coordinate, NodeId>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` at `coord`. Returns the node previously stored there.
    pub fn insert(&mut self, coord: Coordinate, node: NodeId) -> Option<NodeId> {
        self.cells.insert(coord, node)
    }

    /// Get the node at a coordinate.
    pub fn node_at(&self, coord: Coordinate) -> Option<NodeId> {
        self.cells.get(&coord).copied()
    }

    /// Check if a coordinate holds a node.
    pub fn is_occupied(&self, coord: Coordinate) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate `(coordinate, node)` pairs in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, NodeId)> + '_ {
        self.cells.iter().map(|(&c, &n)| (c, n))
    }
}

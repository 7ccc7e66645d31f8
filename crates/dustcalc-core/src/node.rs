//! Node records: wire cells and the fixed power source.
//!
//! Both share a position and a power level, so they are a single
//! [`PowerNode`] record tagged by [`NodeKind`]. Only the wire variant
//! carries graph edges; only the source variant carries a direction mask.

use serde::{Deserialize, Serialize};

use crate::coord::{Coordinate, Direction};
use crate::graph::CircuitError;
use crate::id::NodeId;

/// Highest power level a wire or source can hold.
pub const MAX_POWER: u8 = 15;

/// Validate a power level against `[0, MAX_POWER]`.
pub fn check_power(coord: Coordinate, power: i64) -> Result<u8, CircuitError> {
    if (0..=i64::from(MAX_POWER)).contains(&power) {
        Ok(power as u8)
    } else {
        Err(CircuitError::PowerOutOfRange { coord, power })
    }
}

// ---------------------------------------------------------------------------
// Direction mask
// ---------------------------------------------------------------------------

/// Which of the six cardinal neighbors the source actively drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionMask([bool; 6]);

impl DirectionMask {
    pub const ALL: DirectionMask = DirectionMask([true; 6]);
    pub const NONE: DirectionMask = DirectionMask([false; 6]);

    /// Build a mask from a list ordered WEST, EAST, DOWN, UP, NORTH, SOUTH.
    ///
    /// Fails unless the list has exactly six entries.
    pub fn from_slice(flags: &[bool]) -> Result<Self, CircuitError> {
        let array: [bool; 6] = flags
            .try_into()
            .map_err(|_| CircuitError::InvalidMaskLength { len: flags.len() })?;
        Ok(Self(array))
    }

    /// A mask enabling only the listed directions.
    pub fn only(directions: &[Direction]) -> Self {
        let mut flags = [false; 6];
        for dir in directions {
            flags[dir.index()] = true;
        }
        Self(flags)
    }

    pub fn is_enabled(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    /// Enabled directions in canonical order.
    pub fn enabled(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.is_enabled(*dir))
    }

    pub fn as_array(&self) -> [bool; 6] {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Graph edges of a wire node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLinks {
    /// Nodes whose power is read to compute this wire's power.
    pub upstream: Vec<NodeId>,
    /// Wires to notify when this wire changes. Order matters; repeats allowed.
    pub downstream: Vec<NodeId>,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Wire(WireLinks),
    Source { mask: DirectionMask },
}

/// A positioned node holding a power level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerNode {
    pub coord: Coordinate,
    power: u8,
    pub kind: NodeKind,
}

impl PowerNode {
    /// A wire with no edges yet.
    pub fn wire(coord: Coordinate, power: i64) -> Result<Self, CircuitError> {
        Ok(Self {
            coord,
            power: check_power(coord, power)?,
            kind: NodeKind::Wire(WireLinks::default()),
        })
    }

    /// The fixed power source. The mask must hold exactly six flags.
    pub fn source(coord: Coordinate, power: i64, mask: &[bool]) -> Result<Self, CircuitError> {
        let mask = DirectionMask::from_slice(mask)?;
        Ok(Self {
            coord,
            power: check_power(coord, power)?,
            kind: NodeKind::Source { mask },
        })
    }

    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn is_source(&self) -> bool {
        matches!(self.kind, NodeKind::Source { .. })
    }

    pub fn links(&self) -> Option<&WireLinks> {
        match &self.kind {
            NodeKind::Wire(links) => Some(links),
            NodeKind::Source { .. } => None,
        }
    }

    pub fn links_mut(&mut self) -> Option<&mut WireLinks> {
        match &mut self.kind {
            NodeKind::Wire(links) => Some(links),
            NodeKind::Source { .. } => None,
        }
    }

    pub fn mask(&self) -> Option<DirectionMask> {
        match self.kind {
            NodeKind::Source { mask } => Some(mask),
            NodeKind::Wire(_) => None,
        }
    }

    /// Overwrite a wire's power. The source's power is fixed, so this is a
    /// no-op returning `false` for it.
    pub(crate) fn set_wire_power(&mut self, power: u8) -> bool {
        debug_assert!(power <= MAX_POWER);
        if self.is_source() {
            return false;
        }
        self.power = power;
        true
    }
}

//! The typed, in-memory circuit description handed to the graph builder.
//!
//! Loaders produce these records; nothing here is validated yet. Mask
//! length and power ranges are checked when the graph is built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// The single fixed power source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub coord: Coordinate,
    pub power: i64,
    /// Flags ordered WEST, EAST, DOWN, UP, NORTH, SOUTH.
    pub mask: Vec<bool>,
}

/// One wire cell and its initial power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpec {
    pub coord: Coordinate,
    pub power: i64,
}

/// An occlusion marker. The block type is carried for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub coord: Coordinate,
    pub block_type: String,
}

/// Everything the graph builder consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub source: SourceSpec,
    pub wires: Vec<WireSpec>,
    /// Markers turning a staircase connection one-way.
    pub transparent: Vec<Marker>,
    /// Markers cutting a staircase connection entirely.
    pub blocking: Vec<Marker>,
}

impl CircuitDescription {
    pub fn new(source: SourceSpec) -> Self {
        Self {
            source,
            wires: Vec::new(),
            transparent: Vec::new(),
            blocking: Vec::new(),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PowerSource[x={}, y={}, z={}, power={}, mask={:?}]",
            self.coord.x, self.coord.y, self.coord.z, self.power, self.mask
        )
    }
}

impl fmt::Display for WireSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wire[x={}, y={}, z={}, power={}]",
            self.coord.x, self.coord.y, self.coord.z, self.power
        )
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Marker[x={}, y={}, z={}, type={}]",
            self.coord.x, self.coord.y, self.coord.z, self.block_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let src = SourceSpec {
            coord: Coordinate::new(0, 1, 2),
            power: 15,
            mask: vec![true, false, true, false, true, false],
        };
        assert_eq!(
            src.to_string(),
            "PowerSource[x=0, y=1, z=2, power=15, mask=[true, false, true, false, true, false]]"
        );

        let wire = WireSpec {
            coord: Coordinate::new(-3, 0, 0),
            power: 4,
        };
        assert_eq!(wire.to_string(), "Wire[x=-3, y=0, z=0, power=4]");

        let marker = Marker {
            coord: Coordinate::new(1, 1, 1),
            block_type: "glass".into(),
        };
        assert_eq!(marker.to_string(), "Marker[x=1, y=1, z=1, type=glass]");
    }

    #[test]
    fn new_description_is_empty() {
        let desc = CircuitDescription::new(SourceSpec {
            coord: Coordinate::ORIGIN,
            power: 15,
            mask: vec![true; 6],
        });
        assert!(desc.wires.is_empty());
        assert!(desc.transparent.is_empty());
        assert!(desc.blocking.is_empty());
    }
}

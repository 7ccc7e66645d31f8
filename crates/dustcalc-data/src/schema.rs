//! Serde structs for circuit and run-configuration files.
//!
//! Circuit files use camelCase keys (`powerSource`, `dustBlocks`, ...) with
//! snake_case aliases, so the same layout reads naturally from JSON, RON and
//! TOML. These structs are converted into core types by the loader.

use dustcalc_core::coord::Coordinate;
use dustcalc_core::description::{CircuitDescription, Marker, SourceSpec, WireSpec};
use dustcalc_core::order::NotifyOrder;
use serde::Deserialize;

// ===========================================================================
// Circuit files
// ===========================================================================

/// Top-level circuit file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitFile {
    #[serde(alias = "power_source")]
    pub power_source: PowerSourceData,
    #[serde(alias = "dust_blocks")]
    pub dust_blocks: Vec<DustBlockData>,
    #[serde(default, alias = "transparent_blocks")]
    pub transparent_blocks: Vec<TransparentBlockData>,
    #[serde(default, alias = "blocking_blocks")]
    pub blocking_blocks: Vec<BlockingBlockData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSourceData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(alias = "final_power")]
    pub final_power: i64,
    /// WEST, EAST, DOWN, UP, NORTH, SOUTH.
    #[serde(alias = "power_mask")]
    pub power_mask: Vec<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DustBlockData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub power: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransparentBlockData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default, rename = "blockID", alias = "block_id")]
    pub block_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingBlockData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default, alias = "block_type")]
    pub block_type: String,
}

impl From<CircuitFile> for CircuitDescription {
    fn from(file: CircuitFile) -> Self {
        let src = file.power_source;
        CircuitDescription {
            source: SourceSpec {
                coord: Coordinate::new(src.x, src.y, src.z),
                power: src.final_power,
                mask: src.power_mask,
            },
            wires: file
                .dust_blocks
                .into_iter()
                .map(|d| WireSpec {
                    coord: Coordinate::new(d.x, d.y, d.z),
                    power: d.power,
                })
                .collect(),
            transparent: file
                .transparent_blocks
                .into_iter()
                .map(|t| Marker {
                    coord: Coordinate::new(t.x, t.y, t.z),
                    block_type: t.block_id,
                })
                .collect(),
            blocking: file
                .blocking_blocks
                .into_iter()
                .map(|b| Marker {
                    coord: Coordinate::new(b.x, b.y, b.z),
                    block_type: b.block_type,
                })
                .collect(),
        }
    }
}

// ===========================================================================
// Run configuration files
// ===========================================================================

/// How the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Raw run configuration. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfigData {
    pub notify_order: Option<NotifyOrder>,
    pub max_evaluations: Option<u64>,
    pub unbounded: Option<bool>,
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_json_converts() {
        let json = r#"{
            "powerSource": {"x": 0, "y": 1, "z": 2, "finalPower": 15,
                            "powerMask": [true, false, true, true, true, true]},
            "dustBlocks": [{"x": 1, "y": 1, "z": 2, "power": 3}],
            "transparentBlocks": [{"x": 5, "y": 5, "z": 5, "blockID": "glass"}],
            "blockingBlocks": [{"x": 6, "y": 6, "z": 6, "blockType": "stone"}]
        }"#;
        let file: CircuitFile = serde_json::from_str(json).unwrap();
        let desc = CircuitDescription::from(file);

        assert_eq!(desc.source.coord, Coordinate::new(0, 1, 2));
        assert_eq!(desc.source.power, 15);
        assert!(!desc.source.mask[1]);
        assert_eq!(desc.wires.len(), 1);
        assert_eq!(desc.wires[0].power, 3);
        assert_eq!(desc.transparent[0].block_type, "glass");
        assert_eq!(desc.blocking[0].coord, Coordinate::new(6, 6, 6));
        assert_eq!(desc.blocking[0].block_type, "stone");
    }

    #[test]
    fn snake_case_aliases_accepted() {
        let json = r#"{
            "power_source": {"x": 0, "y": 0, "z": 0, "final_power": 7,
                             "power_mask": [true, true, true, true, true, true]},
            "dust_blocks": [],
            "transparent_blocks": [{"x": 1, "y": 1, "z": 1, "block_id": "ice"}]
        }"#;
        let file: CircuitFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.power_source.final_power, 7);
        assert_eq!(file.transparent_blocks[0].block_id, "ice");
        assert!(file.blocking_blocks.is_empty());
    }

    #[test]
    fn wire_power_is_required() {
        let json = r#"{
            "powerSource": {"x": 0, "y": 0, "z": 0, "finalPower": 15,
                            "powerMask": [true, true, true, true, true, true]},
            "dustBlocks": [{"x": 1, "y": 0, "z": 0}]
        }"#;
        let err = serde_json::from_str::<CircuitFile>(json).unwrap_err();
        assert!(err.to_string().contains("power"));
    }

    #[test]
    fn run_config_keys_are_optional() {
        let data: RunConfigData = serde_json::from_str("{}").unwrap();
        assert!(data.notify_order.is_none());
        assert!(data.format.is_none());

        let data: RunConfigData =
            serde_json::from_str(r#"{"notify_order": "deduplicated", "format": "json"}"#)
                .unwrap();
        assert_eq!(data.notify_order, Some(NotifyOrder::Deduplicated));
        assert_eq!(data.format, Some(OutputFormat::Json));
    }

    #[test]
    fn run_config_rejects_unknown_keys() {
        assert!(serde_json::from_str::<RunConfigData>(r#"{"notify": "literal"}"#).is_err());
    }
}

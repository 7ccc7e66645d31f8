use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node (a wire cell or the power source) in the circuit graph.
    pub struct NodeId;
}

/// Who caused a power change recorded in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The fixed power source seeded the change.
    Source,
    /// A wire node notified its downstream neighbor.
    Wire(NodeId),
}

impl Origin {
    pub fn is_source(&self) -> bool {
        matches!(self, Origin::Source)
    }

    /// The notifying wire, if any.
    pub fn wire(&self) -> Option<NodeId> {
        match self {
            Origin::Source => None,
            Origin::Wire(id) => Some(*id),
        }
    }
}

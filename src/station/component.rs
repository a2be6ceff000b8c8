use serde::{Deserialize, Serialize};

/// One element visited along a station path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentItem {
    Segment { node: usize, section: usize, length: f32 },
    Junction { node: usize, entry_pin: usize },
    Buffer { node: usize },
    /// A segment carrying the connector the path leaves the station through
    Connector { label: String, node: usize, section: usize, length: f32 },
}

impl ComponentItem {
    #[must_use]
    pub fn length(&self) -> f32 {
        match self {
            ComponentItem::Segment { length, .. } | ComponentItem::Connector { length, .. } => *length,
            ComponentItem::Junction { .. } | ComponentItem::Buffer { .. } => 0.0,
        }
    }
}

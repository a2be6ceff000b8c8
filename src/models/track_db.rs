mod items;
mod junctions;
mod nodes;

pub use items::Items;
pub use junctions::Junctions;
pub use nodes::Nodes;

use serde::{Deserialize, Serialize};
use crate::error::{Result, RouteError};
use super::section::SectionTable;
use super::track_item::{TrackItem, TrackItemKind};
use super::track_node::{JunctionNode, TrPin, TrackNode, TrackNodeKind, TravelDirection, VectorNode, VectorSection};

/// End of a vector node used when wiring the graph by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorEnd {
    Start,
    End,
}

/// Track database: node table (slot 0 reserved), item table indexed by id, section geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDb {
    pub nodes: Vec<Option<TrackNode>>,
    pub items: Vec<TrackItem>,
    #[serde(default)]
    pub sections: SectionTable,
}

impl TrackDb {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![None],
            items: Vec::new(),
            sections: SectionTable::new(),
        }
    }

    #[must_use]
    pub fn with_sections(sections: SectionTable) -> Self {
        Self { sections, ..Self::new() }
    }

    /// Check the structural shape every engine relies on
    ///
    /// # Errors
    ///
    /// Returns `RouteError::EmptyTrackDatabase` if the node table lacks its reserved slot 0
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RouteError::EmptyTrackDatabase);
        }
        Ok(())
    }

    /// Add a vector node with unconnected ends, returns its index
    pub fn add_vector_node(&mut self, sections: Vec<VectorSection>) -> usize {
        let index = self.nodes.len();
        let unlinked = TrPin { link: 0, direction: TravelDirection::Forward };
        self.nodes.push(Some(TrackNode {
            index,
            pins: vec![unlinked, unlinked],
            kind: TrackNodeKind::Vector(VectorNode { sections, item_refs: Vec::new() }),
        }));
        index
    }

    /// Add a junction node; its first connection becomes the trunk, later ones the legs
    pub fn add_junction_node(&mut self, selected_route: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Some(TrackNode {
            index,
            pins: Vec::new(),
            kind: TrackNodeKind::Junction(JunctionNode { selected_route }),
        }));
        index
    }

    /// Add an end node (buffer position)
    pub fn add_end_node(&mut self) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Some(TrackNode {
            index,
            pins: Vec::new(),
            kind: TrackNodeKind::End,
        }));
        index
    }

    /// Connect one end of a vector node to a junction or end node.
    ///
    /// The reciprocal pin is appended to `other`, so junction trunks must be
    /// connected before their legs. Returns false if either node is missing or
    /// `vector` is not a vector node.
    pub fn connect(&mut self, vector: usize, end: VectorEnd, other: usize) -> bool {
        if !self.node(vector).is_some_and(TrackNode::is_vector) || self.node(other).is_none() {
            return false;
        }

        let (pin_slot, entry) = match end {
            VectorEnd::Start => (0, TravelDirection::Forward),
            VectorEnd::End => (1, TravelDirection::Backward),
        };

        if let Some(node) = self.nodes.get_mut(vector).and_then(Option::as_mut) {
            node.pins[pin_slot] = TrPin { link: other, direction: TravelDirection::Forward };
        }
        if let Some(node) = self.nodes.get_mut(other).and_then(Option::as_mut) {
            node.pins.push(TrPin { link: vector, direction: entry });
        }
        true
    }

    /// Add a track item hosted by a vector node, returns its id
    pub fn add_item(&mut self, node: usize, location: f32, kind: TrackItemKind) -> usize {
        let id = self.items.len();
        self.items.push(TrackItem {
            id,
            location,
            kind,
        });
        if let Some(vector) = self.nodes.get_mut(node).and_then(Option::as_mut).and_then(TrackNode::as_vector_mut) {
            vector.item_refs.push(id);
        }
        id
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for TrackDb {
    fn default() -> Self {
        Self::new()
    }
}

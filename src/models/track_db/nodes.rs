use super::TrackDb;
use crate::models::track_node::{TrackNode, VectorNode};

/// Extension trait for node and section lookups on `TrackDb`
pub trait Nodes {
    /// Get a track node by index; `None` for slot 0 and dangling indices
    fn node(&self, index: usize) -> Option<&TrackNode>;

    /// Get the vector payload of a node
    fn vector_node(&self, index: usize) -> Option<&VectorNode>;

    /// Length of one section of a vector node
    fn section_length(&self, node: usize, section: usize) -> Option<f32>;

    /// Distance from the start of a vector node to the start of one of its sections
    fn section_start_offset(&self, node: usize, section: usize) -> Option<f32>;

    /// Total length of a vector node
    fn node_length(&self, node: usize) -> Option<f32>;

    /// All vector nodes in index order
    fn vector_nodes(&self) -> Vec<(usize, &VectorNode)>;
}

impl Nodes for TrackDb {
    fn node(&self, index: usize) -> Option<&TrackNode> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    fn vector_node(&self, index: usize) -> Option<&VectorNode> {
        self.node(index).and_then(TrackNode::as_vector)
    }

    fn section_length(&self, node: usize, section: usize) -> Option<f32> {
        let vector = self.vector_node(node)?;
        let vs = vector.sections.get(section)?;
        Some(self.sections.length(vs.section_index))
    }

    fn section_start_offset(&self, node: usize, section: usize) -> Option<f32> {
        let vector = self.vector_node(node)?;
        if section >= vector.sections.len() {
            return None;
        }
        Some(
            vector.sections[..section]
                .iter()
                .map(|vs| self.sections.length(vs.section_index))
                .sum(),
        )
    }

    fn node_length(&self, node: usize) -> Option<f32> {
        let vector = self.vector_node(node)?;
        Some(vector.sections.iter().map(|vs| self.sections.length(vs.section_index)).sum())
    }

    fn vector_nodes(&self) -> Vec<(usize, &VectorNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.as_ref().and_then(TrackNode::as_vector).map(|v| (idx, v)))
            .collect()
    }
}

use super::{Nodes, TrackDb};
use crate::models::track_node::{JunctionNode, TrPin, TrackNode, TravelDirection};

/// Extension trait for junction-related operations on `TrackDb`
pub trait Junctions {
    /// Get junction by node index
    fn get_junction(&self, index: usize) -> Option<&JunctionNode>;

    /// Check if a node is a junction
    fn is_junction(&self, index: usize) -> bool;

    /// Number of diverging legs (all pins except the trunk)
    fn leg_count(&self, index: usize) -> usize;

    /// Currently configured route of a junction
    fn selected_route(&self, index: usize) -> Option<usize>;

    /// Set the selected route of a junction, returning the previous one.
    ///
    /// Returns `None` (and changes nothing) if the node is not a junction or
    /// the route does not name one of its legs.
    fn switch_junction(&mut self, index: usize, route: usize) -> Option<usize>;

    /// Pin of the junction a traveller arrives on when leaving `from_node`
    /// travelling in `leaving`.
    ///
    /// Two pins can link the same vector node (a loop between two legs), so the
    /// pin's entry direction must match the reverse of the travel direction.
    fn entry_pin(&self, junction: usize, from_node: usize, leaving: TravelDirection) -> Option<usize>;

    /// Pin leading onto the leg named by the junction's selected route
    fn selected_leg_pin(&self, index: usize) -> Option<usize>;

    /// Pin of a junction by position
    fn junction_pin(&self, index: usize, pin: usize) -> Option<TrPin>;
}

impl Junctions for TrackDb {
    fn get_junction(&self, index: usize) -> Option<&JunctionNode> {
        self.node(index).and_then(TrackNode::as_junction)
    }

    fn is_junction(&self, index: usize) -> bool {
        self.node(index).is_some_and(TrackNode::is_junction)
    }

    fn leg_count(&self, index: usize) -> usize {
        self.node(index)
            .filter(|n| n.is_junction())
            .map_or(0, |n| n.pins.len().saturating_sub(1))
    }

    fn selected_route(&self, index: usize) -> Option<usize> {
        self.get_junction(index).map(|j| j.selected_route)
    }

    fn switch_junction(&mut self, index: usize, route: usize) -> Option<usize> {
        if route >= self.leg_count(index) {
            return None;
        }
        let junction = self
            .nodes
            .get_mut(index)
            .and_then(Option::as_mut)
            .and_then(TrackNode::as_junction_mut)?;
        let previous = junction.selected_route;
        junction.selected_route = route;
        Some(previous)
    }

    fn entry_pin(&self, junction: usize, from_node: usize, leaving: TravelDirection) -> Option<usize> {
        let node = self.node(junction).filter(|n| n.is_junction())?;
        let expected = leaving.reverse();
        node.pins
            .iter()
            .position(|pin| pin.link == from_node && pin.direction == expected)
            .or_else(|| node.pins.iter().position(|pin| pin.link == from_node))
    }

    fn selected_leg_pin(&self, index: usize) -> Option<usize> {
        let route = self.selected_route(index)?;
        let pin = route + 1;
        (route < self.leg_count(index)).then_some(pin)
    }

    fn junction_pin(&self, index: usize, pin: usize) -> Option<TrPin> {
        self.node(index).filter(|n| n.is_junction()).and_then(|n| n.pins.get(pin).copied())
    }
}

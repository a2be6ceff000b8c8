use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelDirection {
    Forward,    // Increasing distance from the node start
    Backward,
}

impl TravelDirection {
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            TravelDirection::Forward => TravelDirection::Backward,
            TravelDirection::Backward => TravelDirection::Forward,
        }
    }

    /// TDB encoding: 0 = forward, 1 = backward
    #[must_use]
    pub fn from_tdb(value: u8) -> Self {
        if value == 0 { TravelDirection::Forward } else { TravelDirection::Backward }
    }
}

/// Link from one track node to a neighbour.
///
/// `direction` is the direction in which the linked node is entered:
/// `Forward` enters it at its start, `Backward` at its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrPin {
    pub link: usize,
    pub direction: TravelDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSection {
    pub section_index: u32,
    pub tile_x: i32,
    pub tile_z: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub pitch: f32,
    /// Rotation about Y in radians; forward travel heads along (sin, cos) in (x, z)
    #[serde(default)]
    pub heading: f32,
}

impl VectorSection {
    /// Straight section starting at a tile-relative position
    #[must_use]
    pub fn new(section_index: u32, x: f32, z: f32, heading: f32) -> Self {
        Self {
            section_index,
            tile_x: 0,
            tile_z: 0,
            x,
            y: 0.0,
            z,
            pitch: 0.0,
            heading,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorNode {
    pub sections: Vec<VectorSection>,
    #[serde(default)]
    pub item_refs: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JunctionNode {
    /// Index into the diverging legs (`pins[1..]`) of the owning node
    #[serde(default)]
    pub selected_route: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackNodeKind {
    Vector(VectorNode),
    Junction(JunctionNode),
    End,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackNode {
    pub index: usize,
    #[serde(default)]
    pub pins: Vec<TrPin>,
    pub kind: TrackNodeKind,
}

impl TrackNode {
    #[must_use]
    pub fn as_vector(&self) -> Option<&VectorNode> {
        match &self.kind {
            TrackNodeKind::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut VectorNode> {
        match &mut self.kind {
            TrackNodeKind::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_junction(&self) -> Option<&JunctionNode> {
        match &self.kind {
            TrackNodeKind::Junction(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_junction_mut(&mut self) -> Option<&mut JunctionNode> {
        match &mut self.kind {
            TrackNodeKind::Junction(j) => Some(j),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_vector(&self) -> bool {
        matches!(self.kind, TrackNodeKind::Vector(_))
    }

    #[must_use]
    pub fn is_junction(&self) -> bool {
        matches!(self.kind, TrackNodeKind::Junction(_))
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self.kind, TrackNodeKind::End)
    }

    /// Pin a vector node is left through when travelling in `direction`
    #[must_use]
    pub fn exit_pin(&self, direction: TravelDirection) -> Option<&TrPin> {
        match direction {
            TravelDirection::Forward => self.pins.get(1),
            TravelDirection::Backward => self.pins.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_direction_reverse() {
        assert_eq!(TravelDirection::Forward.reverse(), TravelDirection::Backward);
        assert_eq!(TravelDirection::Backward.reverse(), TravelDirection::Forward);
    }

    #[test]
    fn test_travel_direction_from_tdb() {
        assert_eq!(TravelDirection::from_tdb(0), TravelDirection::Forward);
        assert_eq!(TravelDirection::from_tdb(1), TravelDirection::Backward);
    }

    #[test]
    fn test_node_kind_accessors() {
        let node = TrackNode {
            index: 3,
            pins: vec![],
            kind: TrackNodeKind::Junction(JunctionNode::default()),
        };
        assert!(node.is_junction());
        assert!(!node.is_vector());
        assert!(node.as_vector().is_none());
        assert_eq!(node.as_junction().map(|j| j.selected_route), Some(0));
    }

    #[test]
    fn test_exit_pin() {
        let node = TrackNode {
            index: 1,
            pins: vec![
                TrPin { link: 2, direction: TravelDirection::Backward },
                TrPin { link: 3, direction: TravelDirection::Forward },
            ],
            kind: TrackNodeKind::Vector(VectorNode::default()),
        };
        assert_eq!(node.exit_pin(TravelDirection::Forward).map(|p| p.link), Some(3));
        assert_eq!(node.exit_pin(TravelDirection::Backward).map(|p| p.link), Some(2));
    }
}

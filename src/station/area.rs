use serde::{Deserialize, Serialize};
use crate::error::{Result, RouteError};
use crate::geometry::{distance, point_in_polygon, polygon_centroid};
use crate::models::{Nodes, TrackDb, TravelDirection};
use crate::traveller::Traveller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorDirection {
    In,
    Out,
    InOut,
}

impl ConnectorDirection {
    #[must_use]
    pub fn allows_entry(self) -> bool {
        matches!(self, ConnectorDirection::In | ConnectorDirection::InOut)
    }

    #[must_use]
    pub fn allows_exit(self) -> bool {
        matches!(self, ConnectorDirection::Out | ConnectorDirection::InOut)
    }
}

/// Where a connector sits on the track graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectorAnchor {
    /// A vector section crossing the station boundary
    Segment { node: usize, section: usize },
    /// A buffer (end node) inside the station
    Buffer { node: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConnector {
    pub label: String,
    pub anchor: ConnectorAnchor,
    /// `None` until the route author configures the connector
    #[serde(default)]
    pub direction: Option<ConnectorDirection>,
}

impl StationConnector {
    #[must_use]
    pub fn new(label: impl Into<String>, anchor: ConnectorAnchor, direction: Option<ConnectorDirection>) -> Self {
        Self { label: label.into(), anchor, direction }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.direction.is_some()
    }

    #[must_use]
    pub fn allows_entry(&self) -> bool {
        self.direction.is_some_and(ConnectorDirection::allows_entry)
    }

    #[must_use]
    pub fn allows_exit(&self) -> bool {
        self.direction.is_some_and(ConnectorDirection::allows_exit)
    }

    #[must_use]
    pub fn is_on_segment(&self, node: usize, section: usize) -> bool {
        self.anchor == ConnectorAnchor::Segment { node, section }
    }

    #[must_use]
    pub fn is_on_buffer(&self, node: usize) -> bool {
        self.anchor == ConnectorAnchor::Buffer { node }
    }
}

/// Station outline in world (x, z) coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationArea {
    pub polygon: Vec<(f32, f32)>,
}

impl StationArea {
    #[must_use]
    pub fn new(polygon: Vec<(f32, f32)>) -> Self {
        Self { polygon }
    }

    #[must_use]
    pub fn contains(&self, point: (f32, f32)) -> bool {
        point_in_polygon(point, &self.polygon)
    }

    /// Traveller placed on a connector's anchor, pointing into the station.
    ///
    /// A segment anchor is travelled towards whichever end of its section lies
    /// inside the area (the end nearer the area's centroid when both or neither
    /// do). A buffer anchor is left through its only link.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::InvalidStart` if the anchor does not lead onto a vector node
    pub fn seed_traveller(&self, db: &TrackDb, anchor: ConnectorAnchor) -> Result<Traveller> {
        match anchor {
            ConnectorAnchor::Segment { node, section } => self.seed_on_segment(db, node, section),
            ConnectorAnchor::Buffer { node } => seed_at_buffer(db, node),
        }
    }

    fn seed_on_segment(&self, db: &TrackDb, node: usize, section: usize) -> Result<Traveller> {
        let invalid = RouteError::InvalidStart { node };
        let (Some(forward), Some(backward)) = (
            Traveller::at_section_start(db, node, section, TravelDirection::Forward),
            Traveller::at_section_start(db, node, section, TravelDirection::Backward),
        ) else {
            return Err(invalid);
        };

        // Forward starts at the section's start point, backward at its end point
        let start = forward.world_position(db);
        let end = backward.world_position(db);

        let towards_end = match (self.contains(start), self.contains(end)) {
            (false, true) => true,
            (true, false) => false,
            _ => polygon_centroid(&self.polygon).map_or(true, |centre| distance(end, centre) <= distance(start, centre)),
        };

        Ok(if towards_end { forward } else { backward })
    }
}

fn seed_at_buffer(db: &TrackDb, node: usize) -> Result<Traveller> {
    let invalid = RouteError::InvalidStart { node };
    let Some(pin) = db.node(node).filter(|n| n.is_end()).and_then(|n| n.pins.first()).copied() else {
        return Err(invalid);
    };
    let Some(sections) = db.vector_node(pin.link).map(|v| v.sections.len()).filter(|&n| n > 0) else {
        return Err(invalid);
    };
    let section = match pin.direction {
        TravelDirection::Forward => 0,
        TravelDirection::Backward => sections - 1,
    };
    Traveller::at_section_start(db, pin.link, section, pin.direction).ok_or(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SectionShape, SectionTable, VectorEnd, VectorSection};

    fn db() -> (TrackDb, usize, usize) {
        let mut sections = SectionTable::new();
        sections.insert(1, SectionShape::straight(100.0));
        let mut db = TrackDb::with_sections(sections);
        let buffer = db.add_end_node();
        let track = db.add_vector_node(vec![
            VectorSection::new(1, 0.0, 0.0, 0.0),
            VectorSection::new(1, 0.0, 100.0, 0.0),
        ]);
        db.connect(track, VectorEnd::End, buffer);
        (db, track, buffer)
    }

    fn area(z_min: f32, z_max: f32) -> StationArea {
        StationArea::new(vec![(-20.0, z_min), (20.0, z_min), (20.0, z_max), (-20.0, z_max)])
    }

    #[test]
    fn test_connector_direction_rules() {
        assert!(ConnectorDirection::In.allows_entry());
        assert!(!ConnectorDirection::In.allows_exit());
        assert!(ConnectorDirection::Out.allows_exit());
        assert!(ConnectorDirection::InOut.allows_entry() && ConnectorDirection::InOut.allows_exit());

        let unconfigured = StationConnector::new("West", ConnectorAnchor::Buffer { node: 3 }, None);
        assert!(!unconfigured.is_configured());
        assert!(!unconfigured.allows_exit());
        assert!(unconfigured.is_on_buffer(3));
    }

    #[test]
    fn test_seed_points_into_area() {
        let (db, track, _) = db();

        // Station covers the far end of the first section
        let inside_far = area(60.0, 300.0);
        let seed = inside_far.seed_traveller(&db, ConnectorAnchor::Segment { node: track, section: 0 }).expect("seed");
        assert_eq!(seed.direction(), TravelDirection::Forward);

        // Station lies behind the start of the second section
        let inside_near = area(-50.0, 120.0);
        let seed = inside_near.seed_traveller(&db, ConnectorAnchor::Segment { node: track, section: 1 }).expect("seed");
        assert_eq!(seed.direction(), TravelDirection::Backward);
        assert!((seed.section_offset() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_seed_both_ends_inside_uses_centroid() {
        let (db, track, _) = db();
        let seed = area(-10.0, 1000.0)
            .seed_traveller(&db, ConnectorAnchor::Segment { node: track, section: 0 })
            .expect("seed");
        assert_eq!(seed.direction(), TravelDirection::Forward);
    }

    #[test]
    fn test_seed_at_buffer_leaves_through_link() {
        let (db, track, buffer) = db();
        let seed = area(0.0, 200.0).seed_traveller(&db, ConnectorAnchor::Buffer { node: buffer }).expect("seed");
        assert_eq!(seed.node(), track);
        assert_eq!(seed.section(), 1);
        assert_eq!(seed.direction(), TravelDirection::Backward);
    }

    #[test]
    fn test_seed_rejects_non_vector_anchor() {
        let (db, track, buffer) = db();
        let area = area(0.0, 200.0);
        assert!(matches!(
            area.seed_traveller(&db, ConnectorAnchor::Segment { node: buffer, section: 0 }),
            Err(RouteError::InvalidStart { node }) if node == buffer
        ));
        assert!(area.seed_traveller(&db, ConnectorAnchor::Buffer { node: track }).is_err());
    }
}

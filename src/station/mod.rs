//! Station path search.
//!
//! A station is a polygon with connectors on its boundary (track segments
//! crossing the outline) and buffers inside it. Exploring from each entry
//! connector enumerates the paths a train can take through the station and
//! measures the platforms, sidings and passing yards along them.

mod area;
mod component;
mod explorer;
mod helper;
mod path;

pub use area::{ConnectorAnchor, ConnectorDirection, StationArea, StationConnector};
pub use component::ComponentItem;
pub use explorer::{explore, StationPaths};
pub use helper::{PathGroup, StationPathsHelper};
pub use path::{PathState, StationPath};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::config::RouteConfig;
use crate::debug_log;
use crate::error::{Result, RouteError};
use crate::models::TrackDb;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationItem {
    pub name: String,
    pub area: StationArea,
    pub connectors: Vec<StationConnector>,
    /// Entry connector label -> explored paths
    #[serde(default)]
    pub paths: IndexMap<String, StationPaths>,
    #[serde(default)]
    pub max_passing_yard: f32,
    #[serde(default)]
    pub short_passing_yard: f32,
}

impl StationItem {
    #[must_use]
    pub fn new(name: impl Into<String>, area: StationArea, connectors: Vec<StationConnector>) -> Self {
        Self {
            name: name.into(),
            area,
            connectors,
            ..Self::default()
        }
    }

    /// Rebuild the paths of every connector that allows entry and refresh the
    /// passing yard aggregates. Returns the number of retained paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the track database is unusable or a connector's
    /// anchor does not lead onto track
    pub fn search_for_paths(&mut self, db: &mut TrackDb, config: &RouteConfig) -> Result<usize> {
        db.validate()?;
        self.paths.clear();

        let entries: Vec<String> = self
            .connectors
            .iter()
            .filter(|c| c.allows_entry())
            .map(|c| c.label.clone())
            .collect();

        for label in entries {
            let paths = self.explore_from(db, config, &label)?;
            self.paths.insert(label, paths);
        }
        self.update_passing_yards();

        let retained = self.paths.values().map(|p| p.paths.len()).sum();
        debug_log!("Station '{}': {} paths from {} entries", self.name, retained, self.paths.len());
        Ok(retained)
    }

    /// Explore from a single connector on demand, replacing its previous paths
    ///
    /// # Errors
    ///
    /// Returns `RouteError::UnknownConnector` if no connector has this label
    pub fn explore_connector(&mut self, db: &mut TrackDb, config: &RouteConfig, label: &str) -> Result<&StationPaths> {
        let paths = self.explore_from(db, config, label)?;
        self.paths.insert(label.to_string(), paths);
        self.update_passing_yards();
        self.get_paths(label)
    }

    /// Paths found from a connector by the last exploration
    ///
    /// # Errors
    ///
    /// Returns `RouteError::UnknownConnector` if nothing was explored from this label
    pub fn get_paths(&self, label: &str) -> Result<&StationPaths> {
        self.paths.get(label).ok_or_else(|| RouteError::UnknownConnector(label.to_string()))
    }

    pub fn helper(&self) -> StationPathsHelper<'_> {
        StationPathsHelper::new(self.paths.values())
    }

    fn explore_from(&self, db: &mut TrackDb, config: &RouteConfig, label: &str) -> Result<StationPaths> {
        let connector = self
            .connectors
            .iter()
            .find(|c| c.label == label)
            .ok_or_else(|| RouteError::UnknownConnector(label.to_string()))?;
        let start = self.area.seed_traveller(db, connector.anchor)?;
        explore(db, start, label, &self.connectors, config)
    }

    fn update_passing_yards(&mut self) {
        let yards: Vec<f32> = self.paths.values().flat_map(StationPaths::passing_yards).collect();
        self.max_passing_yard = yards.iter().copied().fold(0.0, f32::max);
        self.short_passing_yard = yards.iter().copied().reduce(f32::min).unwrap_or(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logger;
    use crate::models::{Junctions, SectionShape, SectionTable, SidingItem, TrackItemKind, VectorEnd, VectorSection};

    /// Station around a junction: the entry track runs north from the
    /// boundary, leg A holds the "Goods" siding and ends at a configured
    /// buffer, leg B leaves towards the open line and an unconfigured buffer.
    fn station() -> (TrackDb, StationItem, usize) {
        let mut sections = SectionTable::new();
        sections.insert(1, SectionShape::straight(100.0));
        sections.insert(2, SectionShape::straight(200.0));
        sections.insert(3, SectionShape::straight(400.0));
        let mut db = TrackDb::with_sections(sections);

        let outside = db.add_end_node();
        let track = db.add_vector_node(vec![VectorSection::new(1, 0.0, -50.0, 0.0)]);
        let junction = db.add_junction_node(0);
        let leg_a = db.add_vector_node(vec![VectorSection::new(2, 0.0, 50.0, 0.0)]);
        let leg_b = db.add_vector_node(vec![VectorSection::new(3, 0.0, 50.0, 0.2)]);
        let yard_end = db.add_end_node();
        let line_end = db.add_end_node();

        db.connect(track, VectorEnd::Start, outside);
        db.connect(track, VectorEnd::End, junction);
        db.connect(leg_a, VectorEnd::Start, junction);
        db.connect(leg_b, VectorEnd::Start, junction);
        db.connect(leg_a, VectorEnd::End, yard_end);
        db.connect(leg_b, VectorEnd::End, line_end);
        for (location, linked) in [(30.0, 1), (170.0, 0)] {
            db.add_item(
                leg_a,
                location,
                TrackItemKind::Siding(SidingItem { name: "Goods".to_string(), linked_item: Some(linked) }),
            );
        }

        let area = StationArea::new(vec![(-60.0, 0.0), (60.0, 0.0), (60.0, 300.0), (-60.0, 300.0)]);
        let station = StationItem::new(
            "Hillside",
            area,
            vec![
                StationConnector::new(
                    "South",
                    ConnectorAnchor::Segment { node: track, section: 0 },
                    Some(ConnectorDirection::InOut),
                ),
                StationConnector::new("Yard", ConnectorAnchor::Buffer { node: yard_end }, Some(ConnectorDirection::Out)),
            ],
        );
        (db, station, junction)
    }

    #[test]
    fn test_search_from_entry_connector() {
        init_test_logger();
        let (mut db, mut station, junction) = station();

        let retained = station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");
        assert_eq!(retained, 1);
        assert_eq!(station.paths.len(), 1);

        let south = station.get_paths("South").expect("paths");
        assert_eq!(south.explored, 2);
        assert_eq!(south.discarded, 1);
        assert_eq!(south.paths.len(), 1);
        assert_eq!(south.paths[0].path_name, "Goods");
        assert_eq!(south.paths[0].out_label, "Yard");
        assert_eq!(db.selected_route(junction), Some(0));

        // Out-only connectors are not explored from
        assert!(matches!(station.get_paths("Yard"), Err(RouteError::UnknownConnector(_))));
    }

    #[test]
    fn test_search_is_rebuilt_each_time() {
        let (mut db, mut station, _) = station();
        station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");
        station.connectors[1].direction = None;

        let retained = station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");
        assert_eq!(retained, 0);
        assert!(station.get_paths("South").expect("paths").paths.is_empty());
    }

    #[test]
    fn test_explore_connector_on_demand() {
        let (mut db, mut station, _) = station();
        let paths = station.explore_connector(&mut db, &RouteConfig::default(), "South").expect("explore");
        assert_eq!(paths.paths.len(), 1);
        assert!(matches!(
            station.explore_connector(&mut db, &RouteConfig::default(), "North"),
            Err(RouteError::UnknownConnector(label)) if label == "North"
        ));
    }

    #[test]
    fn test_station_serializes_path_projection() {
        let (mut db, mut station, _) = station();
        station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");

        let json = serde_json::to_value(&station).expect("serialize");
        let path = &json["paths"]["South"]["paths"][0];
        assert_eq!(path["path_name"], "Goods");
        assert_eq!(path["nbr_siding"], 1);
        assert!(path.get("components").is_none());
    }

    #[test]
    fn test_helper_files_defined_paths() {
        let (mut db, mut station, _) = station();
        station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");

        let helper = station.helper();
        let group = helper.group("South", "Yard").expect("group");
        assert_eq!(group.defined.len(), 1);
        assert!(group.undefined.is_empty());
    }

    #[test]
    fn test_passing_yard_aggregates_default_to_zero() {
        let (mut db, mut station, _) = station();
        station.search_for_paths(&mut db, &RouteConfig::default()).expect("search");
        assert_eq!(station.max_passing_yard, 0.0);
        assert_eq!(station.short_passing_yard, 0.0);
    }
}

//! Per-node chartable track items: platforms, speed limits and mileposts
//! positioned by section and offset.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use serde::{Deserialize, Serialize};
use crate::geometry::angle_difference;
use crate::models::{Items, Nodes, SpeedPostItem, TrackDb, TrackItem, TrackItemKind, TravelDirection};
use crate::traveller::Traveller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Station,
    SpeedLimitForward,
    SpeedLimitReverse,
    MilePost,
}

impl ItemKind {
    /// The kind seen when travelling the node backwards
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            ItemKind::SpeedLimitForward => ItemKind::SpeedLimitReverse,
            ItemKind::SpeedLimitReverse => ItemKind::SpeedLimitForward,
            ItemKind::Station | ItemKind::MilePost => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartableTrackItem {
    pub item_id: usize,
    pub kind: ItemKind,
    /// Station name, speed value or milepost distance
    pub text: String,
    pub height: f32,
    /// Position of the hosting section within the vector node
    pub section_index: usize,
    /// Distance from the start of the hosting section
    pub section_offset: f32,
}

/// Memoizing lookup of chartable items per vector node
pub struct TrackItemManager<'a> {
    db: &'a TrackDb,
    cache: HashMap<usize, Vec<ChartableTrackItem>>,
}

impl<'a> TrackItemManager<'a> {
    #[must_use]
    pub fn new(db: &'a TrackDb) -> Self {
        Self { db, cache: HashMap::new() }
    }

    /// Chartable items of a vector node ordered by (section, offset).
    ///
    /// The result is computed once per node and cached for the lifetime of the
    /// manager. Non-vector nodes have no items.
    pub fn get_items_in_tracknode(&mut self, node: usize) -> &[ChartableTrackItem] {
        let db = self.db;
        self.cache.entry(node).or_insert_with(|| collect_items(db, node))
    }

    /// Items in the order met when travelling the node in `direction`.
    ///
    /// Backward travel reverses the order, flips directional kinds and
    /// measures offsets from the other end of each section.
    pub fn items_along(&mut self, node: usize, direction: TravelDirection) -> Vec<ChartableTrackItem> {
        let db = self.db;
        let items = self.get_items_in_tracknode(node);
        match direction {
            TravelDirection::Forward => items.to_vec(),
            TravelDirection::Backward => items
                .iter()
                .rev()
                .map(|item| {
                    let length = db.section_length(node, item.section_index).unwrap_or(0.0);
                    ChartableTrackItem {
                        kind: item.kind.flipped(),
                        section_offset: (length - item.section_offset).max(0.0),
                        ..item.clone()
                    }
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn cached_nodes(&self) -> usize {
        self.cache.len()
    }
}

fn collect_items(db: &TrackDb, node: usize) -> Vec<ChartableTrackItem> {
    let Some(vector) = db.vector_node(node) else {
        return Vec::new();
    };

    let mut items: Vec<ChartableTrackItem> = vector
        .item_refs
        .iter()
        .filter_map(|&id| db.item(id))
        .filter_map(|item| chartable(db, node, item))
        .collect();

    items.sort_by(|a, b| {
        a.section_index
            .cmp(&b.section_index)
            .then(a.section_offset.total_cmp(&b.section_offset))
    });
    items
}

fn chartable(db: &TrackDb, node: usize, item: &TrackItem) -> Option<ChartableTrackItem> {
    let mut traveller = Traveller::at_location(db, node, item.location, TravelDirection::Forward)?;

    let (kind, text) = match &item.kind {
        TrackItemKind::Platform(platform) => (ItemKind::Station, platform.station.clone()),
        TrackItemKind::SpeedPost(post) if post.is_limit() => {
            (speed_limit_kind(post, traveller.heading(db)), format_value(post.speed))
        }
        TrackItemKind::SpeedPost(post) if post.is_milepost() => (ItemKind::MilePost, format_value(post.speed)),
        _ => return None,
    };

    let height = traveller.height(db);
    let at_item = traveller.node_offset(db);
    traveller.rewind_to_section_start();
    let section_offset = at_item - traveller.node_offset(db);

    Some(ChartableTrackItem {
        item_id: item.id,
        kind,
        text,
        height,
        section_index: traveller.section(),
        section_offset,
    })
}

/// A post faces forward when its face normal is within 90 degrees of the
/// forward direction of travel.
fn speed_limit_kind(post: &SpeedPostItem, track_heading: f32) -> ItemKind {
    let facing = FRAC_PI_2 - post.angle;
    if angle_difference(track_heading, facing) < FRAC_PI_2 {
        ItemKind::SpeedLimitForward
    } else {
        ItemKind::SpeedLimitReverse
    }
}

fn format_value(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use crate::models::{PlatformItem, SectionShape, SectionTable, SidingItem, SpeedPostFlags, VectorSection};

    fn db() -> (TrackDb, usize) {
        let mut sections = SectionTable::new();
        sections.insert(1, SectionShape::straight(100.0));
        let mut db = TrackDb::with_sections(sections);
        let node = db.add_vector_node(vec![
            VectorSection::new(1, 0.0, 0.0, 0.0),
            VectorSection::new(1, 0.0, 100.0, 0.0),
        ]);
        (db, node)
    }

    fn speedpost(flags: SpeedPostFlags, speed: f32, angle: f32) -> TrackItemKind {
        TrackItemKind::SpeedPost(SpeedPostItem {
            flags,
            speed,
            direction: TravelDirection::Forward,
            angle,
            sig_obj: None,
        })
    }

    #[test]
    fn test_flipped_is_total_and_involutive() {
        for kind in [ItemKind::Station, ItemKind::SpeedLimitForward, ItemKind::SpeedLimitReverse, ItemKind::MilePost] {
            assert_eq!(kind.flipped().flipped(), kind);
        }
        assert_eq!(ItemKind::SpeedLimitForward.flipped(), ItemKind::SpeedLimitReverse);
        assert_eq!(ItemKind::Station.flipped(), ItemKind::Station);
    }

    #[test]
    fn test_items_sorted_by_section_and_offset() {
        let (mut db, node) = db();
        db.add_item(node, 150.0, speedpost(SpeedPostFlags::MILEPOST, 12.0, 0.0));
        db.add_item(
            node,
            30.0,
            TrackItemKind::Platform(PlatformItem {
                station: "Hillside".to_string(),
                platform_name: "1".to_string(),
                linked_item: None,
            }),
        );
        db.add_item(node, 120.0, speedpost(SpeedPostFlags::LIMIT, 80.0, PI / 2.0));

        let mut manager = TrackItemManager::new(&db);
        let items = manager.get_items_in_tracknode(node);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, ItemKind::Station);
        assert_eq!(items[0].text, "Hillside");
        assert_eq!(items[0].section_index, 0);
        assert!((items[0].section_offset - 30.0).abs() < 1e-4);
        assert_eq!(items[1].section_index, 1);
        assert!((items[1].section_offset - 20.0).abs() < 1e-4);
        assert_eq!(items[1].text, "80");
        assert_eq!(items[2].kind, ItemKind::MilePost);
        assert!((items[2].section_offset - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_items_outside_allow_list_are_hidden() {
        let (mut db, node) = db();
        db.add_item(
            node,
            40.0,
            TrackItemKind::Siding(SidingItem { name: "Goods".to_string(), linked_item: None }),
        );
        db.add_item(node, 50.0, TrackItemKind::Crossover);

        let mut manager = TrackItemManager::new(&db);
        assert!(manager.get_items_in_tracknode(node).is_empty());
    }

    #[test]
    fn test_speed_limit_direction_from_post_angle() {
        let (mut db, node) = db();
        // Track heads along +Z (heading 0); a post angle of pi/2 faces it
        db.add_item(node, 10.0, speedpost(SpeedPostFlags::LIMIT, 60.0, PI / 2.0));
        db.add_item(node, 20.0, speedpost(SpeedPostFlags::LIMIT, 40.0, -PI / 2.0));

        let mut manager = TrackItemManager::new(&db);
        let items = manager.get_items_in_tracknode(node);
        assert_eq!(items[0].kind, ItemKind::SpeedLimitForward);
        assert_eq!(items[1].kind, ItemKind::SpeedLimitReverse);
    }

    #[test]
    fn test_results_are_cached_per_node() {
        let (mut db, node) = db();
        db.add_item(node, 10.0, speedpost(SpeedPostFlags::MILEPOST, 1.5, 0.0));

        let mut manager = TrackItemManager::new(&db);
        assert_eq!(manager.get_items_in_tracknode(node)[0].text, "1.5");
        assert!(manager.get_items_in_tracknode(999).is_empty());
        assert_eq!(manager.get_items_in_tracknode(node).len(), 1);
        assert_eq!(manager.cached_nodes(), 2);
    }

    #[test]
    fn test_items_along_backward() {
        let (mut db, node) = db();
        db.add_item(node, 10.0, speedpost(SpeedPostFlags::LIMIT, 60.0, PI / 2.0));
        db.add_item(node, 170.0, speedpost(SpeedPostFlags::MILEPOST, 3.0, 0.0));

        let mut manager = TrackItemManager::new(&db);
        let along = manager.items_along(node, TravelDirection::Backward);
        assert_eq!(along[0].kind, ItemKind::MilePost);
        assert_eq!(along[0].section_index, 1);
        assert!((along[0].section_offset - 30.0).abs() < 1e-4);
        assert_eq!(along[1].kind, ItemKind::SpeedLimitReverse);
        assert!((along[1].section_offset - 90.0).abs() < 1e-4);

        let forward = manager.items_along(node, TravelDirection::Forward);
        assert_eq!(forward[0].kind, ItemKind::SpeedLimitForward);
    }
}

use super::{Nodes, TrackDb};
use crate::constants::LOCATION_TOLERANCE;
use crate::models::track_item::TrackItem;

/// Extension trait for track item lookups on `TrackDb`
pub trait Items {
    /// Get a track item by id
    fn item(&self, id: usize) -> Option<&TrackItem>;

    /// Get a mutable track item by id
    fn item_mut(&mut self, id: usize) -> Option<&mut TrackItem>;

    /// Ids of the items referenced by a vector node that lie within one of its sections.
    ///
    /// An item exactly on a section boundary belongs to the later section. Items just
    /// before the node start (within the location tolerance) belong to the first
    /// section and items past the node end to the last.
    fn items_in_section(&self, node: usize, section: usize) -> Vec<usize>;

    /// Length of a platform or siding marker pair.
    ///
    /// Returns 0 when the partner is missing or hosted by another node.
    fn marker_length(&self, node: usize, id: usize) -> f32;
}

impl Items for TrackDb {
    fn item(&self, id: usize) -> Option<&TrackItem> {
        self.items.get(id)
    }

    fn item_mut(&mut self, id: usize) -> Option<&mut TrackItem> {
        self.items.get_mut(id)
    }

    fn items_in_section(&self, node: usize, section: usize) -> Vec<usize> {
        let Some(vector) = self.vector_node(node) else {
            return Vec::new();
        };
        let (Some(start), Some(length)) = (self.section_start_offset(node, section), self.section_length(node, section)) else {
            return Vec::new();
        };
        let is_last = section + 1 == vector.sections.len();
        let end = start + length;
        let lower = if section == 0 { start - LOCATION_TOLERANCE } else { start };

        vector
            .item_refs
            .iter()
            .copied()
            .filter(|&id| {
                self.item(id).is_some_and(|item| {
                    item.location >= lower && (item.location < end || is_last)
                })
            })
            .collect()
    }

    fn marker_length(&self, node: usize, id: usize) -> f32 {
        let Some((_, Some(linked))) = self.item(id).and_then(TrackItem::marker) else {
            return 0.0;
        };
        let hosted_here = self
            .vector_node(node)
            .is_some_and(|v| v.item_refs.contains(&id) && v.item_refs.contains(&linked));
        if !hosted_here {
            return 0.0;
        }
        match (self.item(id), self.item(linked)) {
            (Some(a), Some(b)) => (a.location - b.location).abs(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::{SectionShape, SectionTable};
    use crate::models::track_item::{SidingItem, TrackItemKind};
    use crate::models::track_node::VectorSection;

    fn two_section_db() -> (TrackDb, usize) {
        let mut sections = SectionTable::new();
        sections.insert(1, SectionShape::straight(50.0));
        let mut db = TrackDb::with_sections(sections);
        let node = db.add_vector_node(vec![
            VectorSection::new(1, 0.0, 0.0, 0.0),
            VectorSection::new(1, 0.0, 50.0, 0.0),
        ]);
        (db, node)
    }

    fn siding(name: &str, linked: Option<usize>) -> TrackItemKind {
        TrackItemKind::Siding(SidingItem { name: name.to_string(), linked_item: linked })
    }

    #[test]
    fn test_items_in_section_boundaries() {
        let (mut db, node) = two_section_db();
        let a = db.add_item(node, 10.0, TrackItemKind::Crossover);
        let b = db.add_item(node, 50.0, TrackItemKind::Crossover);
        let c = db.add_item(node, 100.2, TrackItemKind::Crossover);

        assert_eq!(db.items_in_section(node, 0), vec![a]);
        assert_eq!(db.items_in_section(node, 1), vec![b, c]);
        assert!(db.items_in_section(node, 2).is_empty());
    }

    #[test]
    fn test_items_just_before_node_start_belong_to_first_section() {
        let (mut db, node) = two_section_db();
        let marker = db.add_item(node, -0.3, siding("Coal", None));
        db.add_item(node, -2.0, TrackItemKind::Crossover);

        assert_eq!(db.items_in_section(node, 0), vec![marker]);
        assert!(db.items_in_section(node, 1).is_empty());
    }

    #[test]
    fn test_marker_length_of_linked_pair() {
        let (mut db, node) = two_section_db();
        let first = db.add_item(node, 10.0, siding("Coal", Some(1)));
        db.add_item(node, 90.0, siding("Coal", Some(first)));
        assert_eq!(db.marker_length(node, first), 80.0);
    }

    #[test]
    fn test_marker_length_without_partner() {
        let (mut db, node) = two_section_db();
        let lone = db.add_item(node, 10.0, siding("Lone", None));
        let dangling = db.add_item(node, 20.0, siding("Dangling", Some(42)));
        assert_eq!(db.marker_length(node, lone), 0.0);
        assert_eq!(db.marker_length(node, dangling), 0.0);
    }
}

//! Directional position on the track database, moved one vector section at a time.

use std::f32::consts::PI;
use crate::constants::{LOCATION_TOLERANCE, TILE_SIZE};
use crate::geometry::wrap_angle;
use crate::models::{Junctions, Nodes, TrPin, TrackDb, TrackNodeKind, TravelDirection, VectorSection};

/// Outcome of moving a traveller past the end of its current section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Now on another vector section
    Section,
    /// Arrived at a junction node through `entry_pin`
    Junction { node: usize, entry_pin: usize },
    /// Arrived at an end node (buffer)
    EndNode { node: usize },
    /// The link leads to a missing node
    Dangling { link: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Traveller {
    node: usize,
    section: usize,
    // Distance from the section start, measured in the node's forward sense
    offset: f32,
    direction: TravelDirection,
}

impl Traveller {
    /// Place a traveller on a vector node by distance from the node start.
    ///
    /// Returns `None` if the node is not a vector node, has no sections, or the
    /// location lies outside the node by more than the location tolerance.
    #[must_use]
    pub fn at_location(db: &TrackDb, node: usize, location: f32, direction: TravelDirection) -> Option<Self> {
        let vector = db.vector_node(node)?;
        if vector.sections.is_empty() {
            return None;
        }
        let length = db.node_length(node)?;
        if location < -LOCATION_TOLERANCE || location > length + LOCATION_TOLERANCE {
            return None;
        }
        let location = location.clamp(0.0, length);

        let mut start = 0.0;
        let last = vector.sections.len() - 1;
        for (section, vs) in vector.sections.iter().enumerate() {
            let section_length = db.sections.length(vs.section_index);
            if location < start + section_length || section == last {
                return Some(Self {
                    node,
                    section,
                    offset: (location - start).min(section_length),
                    direction,
                });
            }
            start += section_length;
        }
        None
    }

    /// Place a traveller at the end of a section where travel in `direction` enters it
    #[must_use]
    pub fn at_section_start(db: &TrackDb, node: usize, section: usize, direction: TravelDirection) -> Option<Self> {
        let length = db.section_length(node, section)?;
        let offset = match direction {
            TravelDirection::Forward => 0.0,
            TravelDirection::Backward => length,
        };
        Some(Self { node, section, offset, direction })
    }

    #[must_use]
    pub fn node(&self) -> usize {
        self.node
    }

    #[must_use]
    pub fn section(&self) -> usize {
        self.section
    }

    #[must_use]
    pub fn direction(&self) -> TravelDirection {
        self.direction
    }

    /// Distance from the start of the current section (node-forward sense)
    #[must_use]
    pub fn section_offset(&self) -> f32 {
        self.offset
    }

    /// Distance from the start of the current vector node
    #[must_use]
    pub fn node_offset(&self, db: &TrackDb) -> f32 {
        db.section_start_offset(self.node, self.section).unwrap_or(0.0) + self.offset
    }

    pub fn rewind_to_section_start(&mut self) {
        self.offset = 0.0;
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.reverse();
    }

    fn vector_section<'a>(&self, db: &'a TrackDb) -> Option<&'a VectorSection> {
        db.vector_node(self.node)?.sections.get(self.section)
    }

    /// Heading in the direction of travel, wrapped to (-π, π]
    #[must_use]
    pub fn heading(&self, db: &TrackDb) -> f32 {
        let Some(vs) = self.vector_section(db) else {
            return 0.0;
        };
        let mut heading = vs.heading;
        if let Some(curve) = db.sections.get(vs.section_index).and_then(|s| s.curve) {
            let length = curve.radius * curve.angle.abs();
            if length > 0.0 {
                heading += curve.angle * (self.offset / length);
            }
        }
        if self.direction == TravelDirection::Backward {
            heading += PI;
        }
        wrap_angle(heading)
    }

    /// Height above the section's start point, following its pitch
    #[must_use]
    pub fn height(&self, db: &TrackDb) -> f32 {
        self.vector_section(db).map_or(0.0, |vs| vs.y + self.offset * vs.pitch.sin())
    }

    /// Absolute (x, z) world position
    #[must_use]
    pub fn world_position(&self, db: &TrackDb) -> (f32, f32) {
        let Some(vs) = self.vector_section(db) else {
            return (0.0, 0.0);
        };
        #[allow(clippy::cast_precision_loss)]
        let origin = (vs.tile_x as f32 * TILE_SIZE + vs.x, vs.tile_z as f32 * TILE_SIZE + vs.z);

        let (chord, chord_heading) = match db.sections.get(vs.section_index).and_then(|s| s.curve) {
            Some(curve) if curve.radius > 0.0 && curve.angle != 0.0 => {
                let turned = curve.angle * self.offset / (curve.radius * curve.angle.abs());
                let chord = 2.0 * curve.radius * (turned.abs() / 2.0).sin();
                (chord, vs.heading + turned / 2.0)
            }
            _ => (self.offset, vs.heading),
        };
        (origin.0 + chord * chord_heading.sin(), origin.1 + chord * chord_heading.cos())
    }

    /// Move to the next section in the direction of travel, crossing into the
    /// linked node at a node boundary.
    pub fn next_section(&mut self, db: &TrackDb) -> Step {
        let Some(vector) = db.vector_node(self.node) else {
            return Step::Dangling { link: self.node };
        };

        match self.direction {
            TravelDirection::Forward if self.section + 1 < vector.sections.len() => {
                self.section += 1;
                self.offset = 0.0;
                return Step::Section;
            }
            TravelDirection::Backward if self.section > 0 => {
                self.section -= 1;
                self.offset = db.section_length(self.node, self.section).unwrap_or(0.0);
                return Step::Section;
            }
            _ => {}
        }

        let Some(pin) = db.node(self.node).and_then(|n| n.exit_pin(self.direction)).copied() else {
            return Step::Dangling { link: 0 };
        };
        let leaving = self.direction;
        let from = self.node;
        self.enter(db, pin, from, leaving)
    }

    /// Leave the junction the traveller stands on through one of its pins
    pub fn leave_junction(&mut self, db: &TrackDb, pin: usize) -> Step {
        let junction = self.node;
        let Some(link) = db.junction_pin(junction, pin) else {
            return Step::Dangling { link: junction };
        };
        self.enter(db, link, junction, link.direction)
    }

    fn enter(&mut self, db: &TrackDb, pin: TrPin, from: usize, leaving: TravelDirection) -> Step {
        let Some(target) = db.node(pin.link) else {
            return Step::Dangling { link: pin.link };
        };

        match &target.kind {
            TrackNodeKind::Vector(vector) => {
                if vector.sections.is_empty() {
                    return Step::Dangling { link: pin.link };
                }
                let section = match pin.direction {
                    TravelDirection::Forward => 0,
                    TravelDirection::Backward => vector.sections.len() - 1,
                };
                match Self::at_section_start(db, pin.link, section, pin.direction) {
                    Some(entered) => {
                        *self = entered;
                        Step::Section
                    }
                    None => Step::Dangling { link: pin.link },
                }
            }
            TrackNodeKind::Junction(_) => {
                let Some(entry_pin) = db.entry_pin(pin.link, from, leaving) else {
                    return Step::Dangling { link: pin.link };
                };
                self.node = pin.link;
                self.section = 0;
                self.offset = 0.0;
                Step::Junction { node: pin.link, entry_pin }
            }
            TrackNodeKind::End => {
                self.node = pin.link;
                self.section = 0;
                self.offset = 0.0;
                Step::EndNode { node: pin.link }
            }
        }
    }
}

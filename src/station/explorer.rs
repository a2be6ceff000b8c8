//! Branching walk of the track graph from one station connector.
//!
//! Paths are kept in a FIFO worklist. A path follows each junction's selected
//! route; every other leg of a facing junction spawns a sibling that resumes
//! at that junction once the earlier paths are finished. A path ends at a
//! buffer, at a connector of the station, or when it runs back into track it
//! already covered.

use serde::{Deserialize, Serialize};
use crate::config::RouteConfig;
use crate::debug_log;
use crate::error::{Result, RouteError};
use crate::models::{Items, Junctions, Nodes, TrackDb, TravelDirection};
use crate::traveller::{Step, Traveller};
use super::area::{ConnectorAnchor, StationConnector};
use super::component::ComponentItem;
use super::path::{PathState, StationPath, Visit};

/// Result of exploring from one connector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationPaths {
    pub label: String,
    /// Completed paths and branches that ended in a loop
    pub paths: Vec<StationPath>,
    /// Number of paths created, including discarded ones
    pub explored: usize,
    pub discarded: usize,
}

impl StationPaths {
    pub fn complete_paths(&self) -> impl Iterator<Item = &StationPath> {
        self.paths.iter().filter(|p| p.is_complete())
    }

    /// Passing yard lengths of the retained paths that have one
    pub fn passing_yards(&self) -> impl Iterator<Item = f32> + '_ {
        self.paths.iter().filter(|p| p.nbr_passing_yard > 0).map(|p| p.passing_yard)
    }

    #[must_use]
    pub fn max_passing_yard(&self) -> f32 {
        self.passing_yards().fold(0.0, f32::max)
    }

    #[must_use]
    pub fn short_passing_yard(&self) -> f32 {
        self.passing_yards().reduce(f32::min).unwrap_or(0.0)
    }
}

struct Explorer<'a> {
    db: &'a mut TrackDb,
    entry_label: &'a str,
    connectors: &'a [StationConnector],
    max_paths: usize,
    paths: Vec<StationPath>,
}

/// Explore every path leaving the connector `entry_label` from `start`.
///
/// Junction switches are read as currently configured. Alternate legs are
/// walked by switching the junction and restoring it straight after, so the
/// database's selected routes are unchanged when this returns.
///
/// # Errors
///
/// Returns `RouteError::InvalidStart` if `start` is not on a vector node
pub fn explore(
    db: &mut TrackDb,
    start: Traveller,
    entry_label: &str,
    connectors: &[StationConnector],
    config: &RouteConfig,
) -> Result<StationPaths> {
    db.validate()?;
    if db.vector_node(start.node()).is_none() {
        return Err(RouteError::InvalidStart { node: start.node() });
    }

    let origin = connectors
        .iter()
        .find(|c| c.label == entry_label)
        .and_then(|c| match c.anchor {
            ConnectorAnchor::Buffer { node } => Some(ComponentItem::Buffer { node }),
            ConnectorAnchor::Segment { .. } => None,
        });

    let mut explorer = Explorer {
        db,
        entry_label,
        connectors,
        max_paths: config.max_station_paths.max(1),
        paths: vec![StationPath::seed(entry_label, start, origin)],
    };

    let mut current = 0;
    while current < explorer.paths.len() {
        explorer.walk(current);
        current += 1;
    }

    let explored = explorer.paths.len();
    let (discarded, retained): (Vec<_>, Vec<_>) = explorer
        .paths
        .into_iter()
        .partition(|p| p.state() == PathState::Discarded);

    debug_log!(
        "Station connector '{}': {} paths explored, {} retained, {} discarded",
        entry_label,
        explored,
        retained.len(),
        discarded.len()
    );

    Ok(StationPaths {
        label: entry_label.to_string(),
        paths: retained,
        explored,
        discarded: discarded.len(),
    })
}

impl Explorer<'_> {
    fn walk(&mut self, index: usize) {
        let Some(mut traveller) = self.paths[index].traveller.take() else {
            self.paths[index].state = PathState::Discarded;
            return;
        };

        let mut step = match self.paths[index].pending_leg.take() {
            Some((junction, leg)) => self.take_leg(&mut traveller, junction, leg),
            None => Step::Section,
        };

        loop {
            match step {
                Step::Section => {
                    if !self.enter_section(index, &traveller) {
                        break;
                    }
                    step = traveller.next_section(self.db);
                }
                Step::Junction { node, entry_pin } => match self.pass_junction(index, &mut traveller, node, entry_pin) {
                    Some(next) => step = next,
                    None => break,
                },
                Step::EndNode { node } => {
                    self.finish_at_buffer(index, node);
                    break;
                }
                Step::Dangling { link } => {
                    log::warn!("Station path from '{}' runs onto missing track node {link}", self.entry_label);
                    self.paths[index].state = PathState::Discarded;
                    break;
                }
            }
        }

        self.paths[index].traveller = Some(traveller);
    }

    /// Walk a forked leg: switch the junction, step through, restore the switch
    fn take_leg(&mut self, traveller: &mut Traveller, junction: usize, leg: usize) -> Step {
        let Some(previous) = self.db.switch_junction(junction, leg) else {
            return Step::Dangling { link: junction };
        };
        let step = match self.db.selected_leg_pin(junction) {
            Some(pin) => traveller.leave_junction(self.db, pin),
            None => Step::Dangling { link: junction },
        };
        self.db.switch_junction(junction, previous);
        step
    }

    /// Record the section the traveller stands on. Returns false once the path has ended.
    fn enter_section(&mut self, index: usize, traveller: &Traveller) -> bool {
        let (node, section, direction) = (traveller.node(), traveller.section(), traveller.direction());
        let db: &TrackDb = self.db;
        let path = &mut self.paths[index];

        if !path.visit(Visit::Section { node, section, direction }) {
            path.state = PathState::Forked;
            return false;
        }

        // Back on the entry connector's section, heading out of the station
        let leaving_by_entry = self.connectors.iter().any(|c| c.label == self.entry_label && c.is_on_segment(node, section))
            && path.visited.contains(&Visit::Section { node, section, direction: direction.reverse() });
        if leaving_by_entry {
            let length = db.section_length(node, section).unwrap_or(0.0);
            path.components.push(ComponentItem::Connector { label: self.entry_label.to_string(), node, section, length });
            path.state = PathState::Forked;
            return false;
        }

        let mut items = db.items_in_section(node, section);
        if direction == TravelDirection::Backward {
            items.reverse();
        }
        for id in items {
            let Some(item) = db.item(id) else {
                continue;
            };
            if let Some((name, linked)) = item.marker() {
                path.add_marker(id, linked, name, db.marker_length(node, id), item.is_platform());
            }
        }

        let length = db.section_length(node, section).unwrap_or(0.0);
        path.yard_run.length += length;

        let exit = self
            .connectors
            .iter()
            .find(|c| c.label != self.entry_label && c.is_on_segment(node, section));

        match exit {
            None => {
                path.components.push(ComponentItem::Segment { node, section, length });
                true
            }
            Some(connector) => {
                path.components.push(ComponentItem::Connector {
                    label: connector.label.clone(),
                    node,
                    section,
                    length,
                });
                if connector.allows_exit() {
                    path.complete(&connector.label);
                } else {
                    path.state = PathState::Discarded;
                }
                false
            }
        }
    }

    fn pass_junction(&mut self, index: usize, traveller: &mut Traveller, node: usize, entry_pin: usize) -> Option<Step> {
        let path = &mut self.paths[index];
        path.components.push(ComponentItem::Junction { node, entry_pin });

        if path.last_common_track == Some(node) || !path.visit(Visit::JunctionPin { node, pin: entry_pin }) {
            path.state = PathState::Forked;
            return None;
        }
        path.close_run_at_junction();

        // Trailing movement always leaves through the trunk
        if entry_pin != 0 {
            return Some(traveller.leave_junction(self.db, 0));
        }

        path.last_common_track = Some(node);
        let selected = self.db.selected_route(node).unwrap_or(0);
        for leg in (0..self.db.leg_count(node)).filter(|&leg| leg != selected) {
            if self.paths.len() >= self.max_paths {
                debug_log!("Station path limit {} reached at junction {}", self.max_paths, node);
                break;
            }
            let mut sibling = self.paths[index].fork(node, leg);
            sibling.traveller = Some(traveller.clone());
            self.paths.push(sibling);
        }

        let step = match self.db.selected_leg_pin(node) {
            Some(pin) => traveller.leave_junction(self.db, pin),
            None => Step::Dangling { link: node },
        };
        Some(step)
    }

    fn finish_at_buffer(&mut self, index: usize, node: usize) {
        let path = &mut self.paths[index];
        path.components.push(ComponentItem::Buffer { node });

        let exit = self
            .connectors
            .iter()
            .find(|c| c.label != self.entry_label && c.is_on_buffer(node))
            .filter(|c| c.allows_exit());

        match exit {
            Some(connector) => path.complete(&connector.label),
            None => path.state = PathState::Discarded,
        }
    }
}

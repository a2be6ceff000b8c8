use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::models::TravelDirection;
use crate::traveller::Traveller;
use super::component::ComponentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathState {
    #[default]
    Exploring,
    /// Ended by returning into track the branch already covered
    Forked,
    Completed,
    Discarded,
}

/// Track position already covered by a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Visit {
    Section { node: usize, section: usize, direction: TravelDirection },
    JunctionPin { node: usize, pin: usize },
}

/// Track run since the last junction, used to find passing yards
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct YardRun {
    pub from_junction: bool,
    pub length: f32,
    pub has_marker: bool,
}

/// One branch from a station connector to where it leaves the station.
///
/// Only the summary fields are serialized; the component list and traversal
/// state are rebuilt by every exploration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationPath {
    /// Label of the connector the path starts from
    pub label: String,
    pub out_label: String,
    pub path_name: String,
    pub platform: f32,
    pub nbr_platform: usize,
    pub siding: f32,
    pub nbr_siding: usize,
    pub passing_yard: f32,
    pub nbr_passing_yard: usize,
    pub is_main_path: bool,

    #[serde(skip)]
    pub(super) components: Vec<ComponentItem>,
    #[serde(skip)]
    pub(super) state: PathState,
    #[serde(skip)]
    pub(super) step_in: bool,
    #[serde(skip)]
    pub(super) traveller: Option<Traveller>,
    #[serde(skip)]
    pub(super) last_common_track: Option<usize>,
    /// Junction and leg a forked path still has to take
    #[serde(skip)]
    pub(super) pending_leg: Option<(usize, usize)>,
    #[serde(skip)]
    pub(super) visited: HashSet<Visit>,
    #[serde(skip)]
    pub(super) counted_markers: HashSet<usize>,
    #[serde(skip)]
    pub(super) yard_run: YardRun,
}

impl StationPath {
    pub(super) fn seed(label: &str, traveller: Traveller, origin: Option<ComponentItem>) -> Self {
        let step_in = matches!(origin, Some(ComponentItem::Buffer { .. }));
        Self {
            label: label.to_string(),
            is_main_path: true,
            components: origin.into_iter().collect(),
            step_in,
            traveller: Some(traveller),
            ..Self::default()
        }
    }

    /// Sibling that resumes at `junction` through `leg`
    pub(super) fn fork(&self, junction: usize, leg: usize) -> Self {
        Self {
            is_main_path: false,
            state: PathState::Exploring,
            last_common_track: Some(junction),
            pending_leg: Some((junction, leg)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentItem] {
        &self.components
    }

    #[must_use]
    pub fn state(&self) -> PathState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == PathState::Completed
    }

    /// Path starts at a buffer inside the station
    #[must_use]
    pub fn is_step_in(&self) -> bool {
        self.step_in
    }

    /// Has at least one platform, siding or passing yard
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.nbr_platform > 0 || self.nbr_siding > 0 || self.nbr_passing_yard > 0
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        self.components.iter().map(ComponentItem::length).sum()
    }

    pub(super) fn complete(&mut self, out_label: &str) {
        self.out_label = out_label.to_string();
        self.state = PathState::Completed;
    }

    /// Returns false if the position was already covered
    pub(super) fn visit(&mut self, visit: Visit) -> bool {
        self.visited.insert(visit)
    }

    /// Count a platform or siding marker pair once, whichever end is met first
    pub(super) fn add_marker(&mut self, id: usize, linked: Option<usize>, name: &str, length: f32, is_platform: bool) {
        let key = linked.map_or(id, |other| other.min(id));
        if !self.counted_markers.insert(key) {
            return;
        }
        if is_platform {
            self.platform += length;
            self.nbr_platform += 1;
        } else {
            self.siding += length;
            self.nbr_siding += 1;
        }
        if self.path_name.is_empty() {
            self.path_name = name.to_string();
        }
        self.yard_run.has_marker = true;
    }

    /// Close the track run at a junction; a marker-free run between two
    /// junctions is a passing yard.
    pub(super) fn close_run_at_junction(&mut self) {
        let run = self.yard_run;
        if run.from_junction && !run.has_marker && run.length > 0.0 {
            self.nbr_passing_yard += 1;
            self.passing_yard = self.passing_yard.max(run.length);
        }
        self.yard_run = YardRun { from_junction: true, ..YardRun::default() };
    }
}

//! Core types produced by the signal builder.

use std::collections::HashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::models::{Junctions, Nodes, SignalItem, TrackDb, TravelDirection};
use crate::traveller::Traveller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalFunction {
    Normal,
    Distance,
    Repeater,
    Shunting,
    Info,
    Speed,
}

/// World-file metadata of one signal shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSignal {
    /// TDB index of each head -> head slot in the shape
    pub heads: IndexMap<usize, u32>,
    /// Head slots mounted facing the opposite way
    #[serde(default)]
    pub backfacing: Vec<u32>,
}

impl WorldSignal {
    /// TDB indices of the heads whose slot is flagged backfacing
    #[must_use]
    pub fn backfacing_tdb_indices(&self) -> HashSet<usize> {
        self.heads
            .iter()
            .filter(|(_, slot)| self.backfacing.contains(slot))
            .map(|(&tdb, _)| tdb)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHead {
    pub tdb_index: usize,
    pub function: SignalFunction,
    pub signal_type: String,
    /// Node named by the item's first junction link
    pub junction_main_node: Option<usize>,
    pub junction_path: Option<u32>,
    /// Junction reached from the host node in the signal's direction
    pub track_junction_node: Option<usize>,
}

impl SignalHead {
    pub(crate) fn for_signal(db: &TrackDb, tdb_index: usize, item: &SignalItem, function: SignalFunction, host_node: usize) -> Self {
        let link = item.junction_links.first();
        Self {
            tdb_index,
            function,
            signal_type: item.signal_type.clone(),
            junction_main_node: link.map(|l| l.track_node),
            junction_path: link.map(|l| l.link_lr_path),
            track_junction_node: facing_junction(db, host_node, item.direction),
        }
    }

    pub(crate) fn for_speedpost(tdb_index: usize) -> Self {
        Self {
            tdb_index,
            function: SignalFunction::Speed,
            signal_type: "SpeedPost".to_string(),
            junction_main_node: None,
            junction_path: None,
            track_junction_node: None,
        }
    }
}

fn facing_junction(db: &TrackDb, node: usize, direction: TravelDirection) -> Option<usize> {
    db.node(node)
        .and_then(|n| n.exit_pin(direction))
        .map(|pin| pin.link)
        .filter(|&link| db.is_junction(link))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalObject {
    /// Index of this object in the signal array
    pub this_ref: usize,
    pub track_node: usize,
    /// Position of the first head's item in the host node's item references
    pub tr_ref_index: usize,
    pub direction: TravelDirection,
    /// False for speedpost objects
    pub is_signal: bool,
    pub heads: Vec<SignalHead>,
    pub tdb_traveller: Traveller,
    pub world_object: Option<WorldSignal>,
}

impl SignalObject {
    #[must_use]
    pub fn head_tdb_indices(&self) -> Vec<usize> {
        self.heads.iter().map(|h| h.tdb_index).collect()
    }

    #[must_use]
    pub fn has_head(&self, tdb_index: usize) -> bool {
        self.heads.iter().any(|h| h.tdb_index == tdb_index)
    }
}

/// Result of building the signal list
#[derive(Debug, Clone, Default)]
pub struct SignalList {
    pub signals: Vec<SignalObject>,
    /// Platform and siding item id -> host node
    pub platforms: IndexMap<usize, usize>,
    /// Speedpost items that are mileposts only
    pub mileposts: Vec<usize>,
}

impl SignalList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    #[must_use]
    pub fn get(&self, this_ref: usize) -> Option<&SignalObject> {
        self.signals.get(this_ref)
    }

    /// Signal object owning the head for a track item
    #[must_use]
    pub fn signal_for_item(&self, tdb_index: usize) -> Option<&SignalObject> {
        self.signals.iter().find(|s| s.has_head(tdb_index))
    }
}

use std::collections::HashMap;
use indexmap::IndexMap;
use crate::config::RouteConfig;
use crate::debug_log;
use crate::error::Result;
use crate::models::{Items, Nodes, TrackDb, TrackItemKind};
use crate::traveller::Traveller;
use super::types::{SignalHead, SignalList, SignalObject, WorldSignal};

#[derive(Clone, Copy)]
enum ScanAction {
    Signal,
    SpeedLimit,
    Milepost,
    Platform,
    Skip,
}

impl ScanAction {
    fn of(kind: &TrackItemKind) -> Self {
        match kind {
            TrackItemKind::Signal(_) => ScanAction::Signal,
            TrackItemKind::SpeedPost(post) if post.is_limit() => ScanAction::SpeedLimit,
            TrackItemKind::SpeedPost(post) if post.is_milepost() => ScanAction::Milepost,
            TrackItemKind::Platform(_) | TrackItemKind::Siding(_) => ScanAction::Platform,
            _ => ScanAction::Skip,
        }
    }
}

/// Builds the signal object array from a track database.
///
/// The builder owns all intermediate state (slot array, head index, platform map)
/// and borrows the track database mutably so it can write each head item's
/// owning signal reference back into the item table.
pub struct SignalBuilder<'a> {
    pub(super) db: &'a mut TrackDb,
    config: &'a RouteConfig,
    world_signals: &'a [WorldSignal],
    pub(super) signal_objects: Vec<Option<SignalObject>>,
    found_signals: usize,
    // TDB index -> signal ref
    head_index: HashMap<usize, usize>,
    platforms: IndexMap<usize, usize>,
    mileposts: Vec<usize>,
}

impl<'a> SignalBuilder<'a> {
    pub fn new(db: &'a mut TrackDb, config: &'a RouteConfig, world_signals: &'a [WorldSignal]) -> Self {
        Self {
            db,
            config,
            world_signals,
            signal_objects: Vec::new(),
            found_signals: 0,
            head_index: HashMap::new(),
            platforms: IndexMap::new(),
            mileposts: Vec::new(),
        }
    }

    /// Run all passes and return the compacted signal list
    ///
    /// # Errors
    ///
    /// Returns an error if the track database is structurally unusable
    pub fn build(mut self) -> Result<SignalList> {
        self.db.validate()?;

        let count = self.count_signal_items();
        self.signal_objects = (0..count).map(|_| None).collect();

        self.scan_nodes();
        self.compact();

        if self.group_world_heads() > 0 {
            self.compact();
        }

        self.split_backfacing();
        self.compact();

        debug_log!(
            "Built {} signal objects ({} platform/siding markers, {} mileposts)",
            self.signal_objects.len(),
            self.platforms.len(),
            self.mileposts.len()
        );

        Ok(SignalList {
            signals: self.signal_objects.into_iter().flatten().collect(),
            platforms: self.platforms,
            mileposts: self.mileposts,
        })
    }

    /// Signal items plus speedposts that are speed limits
    fn count_signal_items(&self) -> usize {
        self.db
            .items
            .iter()
            .filter(|item| match &item.kind {
                TrackItemKind::Signal(_) => true,
                TrackItemKind::SpeedPost(post) => post.is_limit(),
                _ => false,
            })
            .count()
    }

    fn scan_nodes(&mut self) {
        for item in &mut self.db.items {
            item.set_sig_obj(None);
        }

        let work: Vec<(usize, Vec<usize>)> = self
            .db
            .vector_nodes()
            .into_iter()
            .map(|(index, vector)| (index, vector.item_refs.clone()))
            .collect();

        for (node, item_refs) in work {
            for (ref_index, tdb_ref) in item_refs.into_iter().enumerate() {
                let Some(item) = self.db.item(tdb_ref) else {
                    log::warn!("Reference to missing track item {tdb_ref} in node {node}");
                    continue;
                };

                match ScanAction::of(&item.kind) {
                    ScanAction::Signal => self.add_signal(node, ref_index, tdb_ref),
                    ScanAction::SpeedLimit => self.add_speed(node, ref_index, tdb_ref),
                    ScanAction::Milepost => self.mileposts.push(tdb_ref),
                    ScanAction::Platform => self.add_platform(node, tdb_ref),
                    ScanAction::Skip => {}
                }
            }
        }
    }

    fn add_platform(&mut self, node: usize, tdb_ref: usize) {
        match self.platforms.get(&tdb_ref) {
            Some(&first) if first != node => {
                log::warn!("Double reference to platform ID {tdb_ref} in nodes {first} and {node}");
            }
            Some(_) => {}
            None => {
                self.platforms.insert(tdb_ref, node);
            }
        }
    }

    fn add_signal(&mut self, node: usize, ref_index: usize, tdb_ref: usize) {
        let Some(item) = self.db.item(tdb_ref) else {
            return;
        };
        let Some(signal_item) = item.as_signal() else {
            return;
        };

        if self.head_index.contains_key(&tdb_ref) {
            log::warn!("Invalid double TDB reference {tdb_ref} in node {node}");
            return;
        }

        let Some(traveller) = Traveller::at_location(self.db, node, item.location, signal_item.direction) else {
            log::warn!("Reference to invalid track node {node} for signal {tdb_ref}");
            return;
        };

        let Some(function) = self.config.signal_function(&signal_item.signal_type) else {
            log::warn!("Unknown signal type '{}' for signal {tdb_ref} in node {node}", signal_item.signal_type);
            return;
        };

        let head = SignalHead::for_signal(self.db, tdb_ref, signal_item, function, node);
        let signal = SignalObject {
            this_ref: self.found_signals,
            track_node: node,
            tr_ref_index: ref_index,
            direction: signal_item.direction,
            is_signal: true,
            heads: vec![head],
            tdb_traveller: traveller,
            world_object: None,
        };
        self.place(tdb_ref, signal);
    }

    fn add_speed(&mut self, node: usize, ref_index: usize, tdb_ref: usize) {
        let Some(item) = self.db.item(tdb_ref) else {
            return;
        };
        let Some(post) = item.as_speedpost() else {
            return;
        };

        if self.head_index.contains_key(&tdb_ref) {
            log::warn!("Invalid double TDB reference {tdb_ref} in node {node}");
            return;
        }

        let Some(traveller) = Traveller::at_location(self.db, node, item.location, post.direction) else {
            log::warn!("Reference to invalid track node {node} for speedpost {tdb_ref}");
            return;
        };

        let signal = SignalObject {
            this_ref: self.found_signals,
            track_node: node,
            tr_ref_index: ref_index,
            direction: post.direction,
            is_signal: false,
            heads: vec![SignalHead::for_speedpost(tdb_ref)],
            tdb_traveller: traveller,
            world_object: None,
        };
        self.place(tdb_ref, signal);
    }

    fn place(&mut self, tdb_ref: usize, signal: SignalObject) {
        let slot = self.found_signals;
        if slot < self.signal_objects.len() {
            self.signal_objects[slot] = Some(signal);
        } else {
            self.signal_objects.push(Some(signal));
        }
        self.head_index.insert(tdb_ref, slot);
        self.found_signals += 1;
    }

    /// Slide all live objects to the front, renumber them and write the new
    /// references back onto the head items.
    pub(super) fn compact(&mut self) {
        let live: Vec<SignalObject> = std::mem::take(&mut self.signal_objects).into_iter().flatten().collect();

        self.head_index.clear();
        for (index, mut signal) in live.into_iter().enumerate() {
            signal.this_ref = index;
            for head in &signal.heads {
                self.head_index.insert(head.tdb_index, index);
                if let Some(item) = self.db.item_mut(head.tdb_index) {
                    item.set_sig_obj(Some(index));
                }
            }
            self.signal_objects.push(Some(signal));
        }
        self.found_signals = self.signal_objects.len();
    }

    /// Merge the heads of each world signal into the object of the head scanned
    /// first. Returns the number of objects emptied by merging.
    fn group_world_heads(&mut self) -> usize {
        let world_signals = self.world_signals;
        let mut merged = 0;

        for world in world_signals {
            let mut refs: Vec<usize> = world
                .heads
                .keys()
                .filter_map(|tdb| self.head_index.get(tdb).copied())
                .filter(|&r| self.signal_objects.get(r).and_then(Option::as_ref).is_some_and(|s| s.is_signal))
                .collect();
            refs.sort_unstable();
            refs.dedup();

            let Some((&owner, others)) = refs.split_first() else {
                continue;
            };

            let mut moved = Vec::new();
            for &other in others {
                if let Some(signal) = self.signal_objects[other].take() {
                    moved.extend(signal.heads);
                    merged += 1;
                }
            }

            if let Some(signal) = self.signal_objects[owner].as_mut() {
                for head in &moved {
                    self.head_index.insert(head.tdb_index, owner);
                }
                signal.heads.extend(moved);
                signal.world_object = Some(world.clone());
            }
        }
        merged
    }
}

/// Build the signal object array for a track database
///
/// # Errors
///
/// Returns an error if the track database is structurally unusable
pub fn build_signal_list(db: &mut TrackDb, config: &RouteConfig, world_signals: &[WorldSignal]) -> Result<SignalList> {
    SignalBuilder::new(db, config, world_signals).build()
}

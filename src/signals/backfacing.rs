//! Splitting of backfacing heads into their own signal objects.

use crate::models::{Items, Nodes, TrackDb};
use crate::traveller::Traveller;
use super::builder::SignalBuilder;
use super::types::SignalObject;

impl SignalBuilder<'_> {
    /// Move every head flagged backfacing in the world metadata into a new
    /// signal object appended after the existing ones. Objects left without
    /// heads are nulled; the caller compacts afterwards.
    pub(super) fn split_backfacing(&mut self) {
        let mut new_index = self.signal_objects.len();
        let mut new_signals = Vec::new();

        for slot in &mut self.signal_objects {
            let Some(signal) = slot.as_mut() else {
                continue;
            };
            if !signal.is_signal {
                continue;
            }
            let Some(world) = signal.world_object.as_ref() else {
                continue;
            };
            if world.backfacing.is_empty() {
                continue;
            }

            let backfacing = world.backfacing_tdb_indices();
            let (moved, kept): (Vec<_>, Vec<_>) = signal
                .heads
                .drain(..)
                .partition(|head| backfacing.contains(&head.tdb_index));
            signal.heads = kept;

            if moved.is_empty() {
                continue;
            }

            let mut new_signal = SignalObject {
                this_ref: new_index,
                heads: moved,
                ..signal.clone()
            };
            align_with_first_head(self.db, &mut new_signal);
            new_signals.push(new_signal);
            new_index += 1;

            if signal.heads.is_empty() {
                *slot = None;
            } else {
                align_with_first_head(self.db, signal);
            }
        }

        self.signal_objects.extend(new_signals.into_iter().map(Some));
    }
}

/// Take direction, item reference and traveller position from the signal's first head
fn align_with_first_head(db: &TrackDb, signal: &mut SignalObject) {
    let Some(first) = signal.heads.first() else {
        return;
    };
    let Some(item) = db.item(first.tdb_index) else {
        return;
    };

    if let Some(direction) = item.direction() {
        if direction != signal.direction {
            signal.direction = direction;
            signal.tdb_traveller.reverse_direction();
        }
    }

    if let Some(position) = db
        .vector_node(signal.track_node)
        .and_then(|v| v.item_refs.iter().position(|&r| r == first.tdb_index))
    {
        signal.tr_ref_index = position;
        if let Some(traveller) = Traveller::at_location(db, signal.track_node, item.location, signal.direction) {
            signal.tdb_traveller = traveller;
        }
    }
}

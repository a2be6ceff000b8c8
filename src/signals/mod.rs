//! Signal object construction from track database items.
//!
//! Every signal item and every speed-limit speedpost gets one signal object.
//! Heads sharing a world shape are merged into one object, then heads mounted
//! backfacing are split off again so that each object faces one way.

mod backfacing;
mod builder;
mod types;

pub use builder::{build_signal_list, SignalBuilder};
pub use types::{SignalFunction, SignalHead, SignalList, SignalObject, WorldSignal};

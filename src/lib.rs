#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod logging;
pub mod error;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod models;
pub mod traveller;
pub mod signals;
pub mod track_items;
pub mod station;

pub use config::RouteConfig;
pub use error::{Result, RouteError};
pub use models::TrackDb;
pub use signals::{build_signal_list, SignalList};
pub use station::{StationItem, StationPaths};
pub use track_items::TrackItemManager;
pub use traveller::Traveller;

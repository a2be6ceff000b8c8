mod section;
mod track_db;
mod track_item;
mod track_node;

pub use section::{SectionCurve, SectionShape, SectionTable};
pub use track_db::{Items, Junctions, Nodes, TrackDb, VectorEnd};
pub use track_item::{
    PlatformItem, SidingItem, SignalItem, SignalJunctionLink, SpeedPostFlags, SpeedPostItem,
    TrackItem, TrackItemKind,
};
pub use track_node::{JunctionNode, TrPin, TrackNode, TrackNodeKind, TravelDirection, VectorNode, VectorSection};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use super::track_node::TravelDirection;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SpeedPostFlags: u8 {
        const LIMIT     = 0b0001;
        const MILEPOST  = 0b0010;
        const PASSENGER = 0b0100;
        const FREIGHT   = 0b1000;
    }
}

/// Junction dependency of a signal item (TDB `TrSignalDirs`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalJunctionLink {
    pub track_node: usize,
    pub link_lr_path: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalItem {
    pub direction: TravelDirection,
    pub signal_type: String,
    #[serde(default)]
    pub junction_links: Vec<SignalJunctionLink>,
    /// Index of the owning signal object, set by the signal builder
    #[serde(default)]
    pub sig_obj: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedPostItem {
    pub flags: SpeedPostFlags,
    #[serde(default)]
    pub speed: f32,
    pub direction: TravelDirection,
    /// Facing angle of the post in radians
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub sig_obj: Option<usize>,
}

impl SpeedPostItem {
    #[must_use]
    pub fn is_limit(&self) -> bool {
        self.flags.contains(SpeedPostFlags::LIMIT)
    }

    #[must_use]
    pub fn is_milepost(&self) -> bool {
        self.flags.contains(SpeedPostFlags::MILEPOST)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformItem {
    pub station: String,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub linked_item: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidingItem {
    pub name: String,
    #[serde(default)]
    pub linked_item: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackItemKind {
    Signal(SignalItem),
    SpeedPost(SpeedPostItem),
    Platform(PlatformItem),
    Siding(SidingItem),
    Crossover,
    LevelCrossing,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackItem {
    pub id: usize,
    /// Distance from the start of the host vector node
    pub location: f32,
    pub kind: TrackItemKind,
}

impl TrackItem {
    #[must_use]
    pub fn as_signal(&self) -> Option<&SignalItem> {
        match &self.kind {
            TrackItemKind::Signal(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_speedpost(&self) -> Option<&SpeedPostItem> {
        match &self.kind {
            TrackItemKind::SpeedPost(s) => Some(s),
            _ => None,
        }
    }

    /// Direction of a signal or speedpost item
    #[must_use]
    pub fn direction(&self) -> Option<TravelDirection> {
        match &self.kind {
            TrackItemKind::Signal(s) => Some(s.direction),
            TrackItemKind::SpeedPost(s) => Some(s.direction),
            _ => None,
        }
    }

    /// Record the owning signal object on a signal or speedpost item
    pub fn set_sig_obj(&mut self, sig_obj: Option<usize>) {
        match &mut self.kind {
            TrackItemKind::Signal(s) => s.sig_obj = sig_obj,
            TrackItemKind::SpeedPost(s) => s.sig_obj = sig_obj,
            _ => {}
        }
    }

    #[must_use]
    pub fn sig_obj(&self) -> Option<usize> {
        match &self.kind {
            TrackItemKind::Signal(s) => s.sig_obj,
            TrackItemKind::SpeedPost(s) => s.sig_obj,
            _ => None,
        }
    }

    /// Name and linked partner of a platform or siding marker
    #[must_use]
    pub fn marker(&self) -> Option<(&str, Option<usize>)> {
        match &self.kind {
            TrackItemKind::Platform(p) => {
                let name = if p.platform_name.is_empty() { &p.station } else { &p.platform_name };
                Some((name.as_str(), p.linked_item))
            }
            TrackItemKind::Siding(s) => Some((s.name.as_str(), s.linked_item)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_platform(&self) -> bool {
        matches!(self.kind, TrackItemKind::Platform(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speedpost(flags: SpeedPostFlags) -> TrackItem {
        TrackItem {
            id: 4,
            location: 10.0,
            kind: TrackItemKind::SpeedPost(SpeedPostItem {
                flags,
                speed: 80.0,
                direction: TravelDirection::Forward,
                angle: 0.0,
                sig_obj: None,
            }),
        }
    }

    #[test]
    fn test_speedpost_flags() {
        let item = speedpost(SpeedPostFlags::LIMIT | SpeedPostFlags::PASSENGER);
        let post = item.as_speedpost().expect("speedpost");
        assert!(post.is_limit());
        assert!(!post.is_milepost());
    }

    #[test]
    fn test_set_sig_obj() {
        let mut item = speedpost(SpeedPostFlags::LIMIT);
        assert_eq!(item.sig_obj(), None);
        item.set_sig_obj(Some(5));
        assert_eq!(item.sig_obj(), Some(5));
    }

    #[test]
    fn test_platform_marker_prefers_platform_name() {
        let item = TrackItem {
            id: 1,
            location: 0.0,
            kind: TrackItemKind::Platform(PlatformItem {
                station: "Hillside".to_string(),
                platform_name: "Hillside 2".to_string(),
                linked_item: Some(2),
            }),
        };
        assert_eq!(item.marker(), Some(("Hillside 2", Some(2))));
        assert!(item.is_platform());
        assert!(item.direction().is_none());
    }

    #[test]
    fn test_speedpost_flags_serde() {
        let json = serde_json::to_string(&(SpeedPostFlags::LIMIT | SpeedPostFlags::FREIGHT)).expect("serialize");
        let back: SpeedPostFlags = serde_json::from_str(&json).expect("deserialize");
        assert!(back.contains(SpeedPostFlags::FREIGHT));
        assert!(!back.contains(SpeedPostFlags::MILEPOST));
    }
}

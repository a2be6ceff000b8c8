use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Curvature of a track section; `angle` is signed, in radians (positive curves right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionCurve {
    pub radius: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionShape {
    #[serde(default)]
    pub length: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<SectionCurve>,
}

impl SectionShape {
    #[must_use]
    pub fn straight(length: f32) -> Self {
        Self { length, curve: None }
    }

    #[must_use]
    pub fn curved(radius: f32, angle: f32) -> Self {
        Self {
            length: radius * angle.abs(),
            curve: Some(SectionCurve { radius, angle }),
        }
    }

    /// Track length of the section; curved sections use their arc length
    #[must_use]
    pub fn length(&self) -> f32 {
        match self.curve {
            Some(curve) => curve.radius * curve.angle.abs(),
            None => self.length,
        }
    }
}

/// Section geometry lookup (tsection table)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionTable {
    sections: IndexMap<u32, SectionShape>,
}

impl SectionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32, shape: SectionShape) {
        self.sections.insert(index, shape);
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&SectionShape> {
        self.sections.get(&index)
    }

    /// Length of a section, 0 for unknown section indices
    #[must_use]
    pub fn length(&self, index: u32) -> f32 {
        self.get(index).map_or(0.0, SectionShape::length)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

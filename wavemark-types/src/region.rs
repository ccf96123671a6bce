//! Canonical region record and overlap metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LabelKey, RegionId};

/// A labeled time interval drawn over the waveform. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub start: f64,
    pub end: f64,
    pub label: LabelKey,
}

impl Region {
    pub fn new(id: impl Into<String>, start: f64, end: f64, label: impl Into<LabelKey>) -> Self {
        Self {
            id: RegionId::new(id),
            start,
            end,
            label: label.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` lies within the region, widened by `tolerance` on both sides.
    pub fn contains(&self, time: f64, tolerance: f64) -> bool {
        self.start - tolerance <= time && time <= self.end + tolerance
    }
}

/// Externally computed stacking tier for a region that overlaps others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapTier {
    pub level: u32,
    pub num_levels: u32,
}

impl OverlapTier {
    pub fn new(level: u32, num_levels: u32) -> Self {
        Self { level, num_levels }
    }

    /// Styling class for this tier, e.g. `overlap-1-2`.
    pub fn class_name(&self) -> String {
        format!("overlap-{}-{}", self.level, self.num_levels)
    }
}

pub type OverlapMap = BTreeMap<RegionId, OverlapTier>;

/// Set equality of two region sequences on `(id, start, end, label)`.
/// Sequence order is ignored.
pub fn regions_equivalent(a: &[Region], b: &[Region]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let index: BTreeMap<&RegionId, &Region> = a.iter().map(|r| (&r.id, r)).collect();
    if index.len() != a.len() {
        return false;
    }
    b.iter().all(|r| index.get(&r.id).is_some_and(|other| *other == r))
}

//! Events reported by the waveform rendering engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LabelKey, Region, RegionId};

/// Name of the custom engine attribute that carries a region's label.
pub const LABEL_ATTRIBUTE: &str = "label";

/// A region as the rendering engine holds it: geometry plus free-form
/// attributes that survive a round trip through the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRegion {
    pub id: RegionId,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl EngineRegion {
    pub fn new(id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: RegionId::new(id),
            start,
            end,
            attributes: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> Option<LabelKey> {
        self.attributes.get(LABEL_ATTRIBUTE).map(|l| LabelKey::new(l.as_str()))
    }

    pub fn with_label(mut self, label: &LabelKey) -> Self {
        self.attributes
            .insert(LABEL_ATTRIBUTE.to_string(), label.as_str().to_string());
        self
    }
}

impl From<&Region> for EngineRegion {
    fn from(region: &Region) -> Self {
        EngineRegion {
            id: region.id.clone(),
            start: region.start,
            end: region.end,
            attributes: BTreeMap::new(),
        }
        .with_label(&region.label)
    }
}

/// Events flowing from the rendering engine into the widget (view -> state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Audio decoded and ready; duration in seconds.
    Ready { duration: f64 },
    /// A region appeared in the engine (drag-select or programmatic add).
    RegionCreated { region: EngineRegion },
    /// A region drag or resize finished.
    RegionUpdated { region: EngineRegion },
    RegionClicked { id: RegionId },
    /// Periodic progress while playing.
    Tick { time: f64 },
    Seek { time: f64 },
    Finished,
    Zoomed { zoom: f64 },
}

impl EngineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::Ready { .. } => "ready",
            EngineEvent::RegionCreated { .. } => "region_created",
            EngineEvent::RegionUpdated { .. } => "region_updated",
            EngineEvent::RegionClicked { .. } => "region_clicked",
            EngineEvent::Tick { .. } => "tick",
            EngineEvent::Seek { .. } => "seek",
            EngineEvent::Finished => "finished",
            EngineEvent::Zoomed { .. } => "zoomed",
        }
    }

    /// High-frequency playback progress, not a user action.
    pub fn is_tick(&self) -> bool {
        matches!(self, EngineEvent::Tick { .. })
    }
}

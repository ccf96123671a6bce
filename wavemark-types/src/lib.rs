//! # wavemark-types
//!
//! Shared type definitions for the wavemark annotation widget.
//! This crate contains the data that crosses the host boundary (shared state,
//! patches, engine events, command tokens) and carries no behaviour beyond
//! small helpers on the types themselves.

pub mod command;
pub mod event;
pub mod region;
pub mod state;
pub mod style;

pub use command::{Command, CommandAction, CommandToken};
pub use event::{EngineEvent, EngineRegion, LABEL_ATTRIBUTE};
pub use region::{regions_equivalent, OverlapMap, OverlapTier, Region};
pub use state::{ChangeSet, ColorMap, EmptySentinel, Field, LabelSet, StatePatch, WidgetState, DEFAULT_ZOOM};
pub use style::{LabelTag, RegionStyle};

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque region identifier, assigned by the rendering engine (drawn regions)
/// or generated by the widget (inserted, cut or imported regions).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RegionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Key into the label and color maps.
///
/// Hosts send label keys either as strings (`"a"`) or as integer indices
/// (`0`). Both are normalized to the string form on the way in, and keys
/// always serialize as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LabelKey(String);

impl LabelKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for LabelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LabelKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LabelKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for LabelKey {
    fn from(index: u32) -> Self {
        Self(index.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabelKey {
    Text(String),
    Index(i64),
}

impl<'de> Deserialize<'de> for LabelKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawLabelKey::deserialize(deserializer)? {
            RawLabelKey::Text(s) => LabelKey(s),
            RawLabelKey::Index(i) => LabelKey(i.to_string()),
        })
    }
}

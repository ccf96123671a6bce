//! Shared widget state, the patches that travel between host and widget,
//! and the field names used for change notification.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{CommandToken, LabelKey, OverlapMap, Region, RegionId};

pub type LabelSet = BTreeMap<LabelKey, String>;
pub type ColorMap = BTreeMap<LabelKey, String>;

pub const DEFAULT_ZOOM: f64 = 20.0;

/// Name of a shared field. Declaration order is the order in which local
/// observers see the fields of one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Audio,
    Minimap,
    Labels,
    Colors,
    Regions,
    Overlap,
    ActiveRegion,
    ActiveLabel,
    Zoom,
    Playing,
    Time,
    PlayCommand,
    ControlBar,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Audio,
        Field::Minimap,
        Field::Labels,
        Field::Colors,
        Field::Regions,
        Field::Overlap,
        Field::ActiveRegion,
        Field::ActiveLabel,
        Field::Zoom,
        Field::Playing,
        Field::Time,
        Field::PlayCommand,
        Field::ControlBar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Audio => "audio",
            Field::Minimap => "minimap",
            Field::Labels => "labels",
            Field::Colors => "colors",
            Field::Regions => "regions",
            Field::Overlap => "overlap",
            Field::ActiveRegion => "active_region",
            Field::ActiveLabel => "active_label",
            Field::Zoom => "zoom",
            Field::Playing => "playing",
            Field::Time => "time",
            Field::PlayCommand => "play_command",
            Field::ControlBar => "control_bar",
        }
    }
}

/// Ordered set of changed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeSet<Field>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field) {
        self.0.insert(field);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }

    pub fn merge(&mut self, other: ChangeSet) {
        self.0.extend(other.0);
    }
}

impl FromIterator<Field> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Values whose empty form stands for "nothing selected" on the wire.
pub trait EmptySentinel {
    fn is_sentinel(&self) -> bool;
    fn sentinel_str(&self) -> &str;
}

impl EmptySentinel for RegionId {
    fn is_sentinel(&self) -> bool {
        self.as_str().is_empty()
    }
    fn sentinel_str(&self) -> &str {
        self.as_str()
    }
}

impl EmptySentinel for LabelKey {
    fn is_sentinel(&self) -> bool {
        self.is_empty()
    }
    fn sentinel_str(&self) -> &str {
        self.as_str()
    }
}

/// `None` <-> `""` on the wire.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EmptySentinel;

    pub fn serialize<T: EmptySentinel, S: Serializer>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map(|v| v.sentinel_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de> + EmptySentinel,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.filter(|v| !v.is_sentinel()))
    }
}

/// Patch variant: absent field -> `None`, present field -> `Some(value)`.
mod patch_empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EmptySentinel;

    pub fn serialize<T: EmptySentinel, S: Serializer>(
        value: &Option<Option<T>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => super::empty_as_none::serialize(inner, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de> + EmptySentinel,
        D: Deserializer<'de>,
    {
        super::empty_as_none::deserialize(deserializer).map(Some)
    }
}

/// Every field the widget shares with its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub colors: ColorMap,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default, with = "empty_as_none")]
    pub active_region: Option<RegionId>,
    #[serde(default, with = "empty_as_none")]
    pub active_label: Option<LabelKey>,
    #[serde(default)]
    pub overlap: OverlapMap,
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub time: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Data URL carrying the transport-encoded audio.
    #[serde(default, alias = "b64")]
    pub audio: Option<String>,
    #[serde(default)]
    pub play_command: CommandToken,
    #[serde(default)]
    pub control_bar: CommandToken,
    #[serde(default = "default_minimap")]
    pub minimap: bool,
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_minimap() -> bool {
    true
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            colors: ColorMap::new(),
            labels: LabelSet::new(),
            active_region: None,
            active_label: None,
            overlap: OverlapMap::new(),
            playing: false,
            time: 0.0,
            zoom: DEFAULT_ZOOM,
            audio: None,
            play_command: CommandToken::None,
            control_bar: CommandToken::None,
            minimap: true,
        }
    }
}

macro_rules! apply_field {
    ($self:ident, $patch:ident, $changed:ident, $name:ident, $field:expr) => {
        if let Some(value) = &$patch.$name {
            if $self.$name != *value {
                $self.$name = value.clone();
                $changed.insert($field);
            }
        }
    };
}

impl WidgetState {
    /// Apply every field present in `patch`, returning the fields whose value
    /// actually changed.
    pub fn apply(&mut self, patch: &StatePatch) -> ChangeSet {
        let mut changed = ChangeSet::new();
        apply_field!(self, patch, changed, audio, Field::Audio);
        apply_field!(self, patch, changed, minimap, Field::Minimap);
        apply_field!(self, patch, changed, labels, Field::Labels);
        apply_field!(self, patch, changed, colors, Field::Colors);
        apply_field!(self, patch, changed, regions, Field::Regions);
        apply_field!(self, patch, changed, overlap, Field::Overlap);
        apply_field!(self, patch, changed, active_region, Field::ActiveRegion);
        apply_field!(self, patch, changed, active_label, Field::ActiveLabel);
        apply_field!(self, patch, changed, zoom, Field::Zoom);
        apply_field!(self, patch, changed, playing, Field::Playing);
        apply_field!(self, patch, changed, time, Field::Time);
        apply_field!(self, patch, changed, play_command, Field::PlayCommand);
        apply_field!(self, patch, changed, control_bar, Field::ControlBar);
        changed
    }

    /// Build a patch carrying the current value of each field in `fields`.
    pub fn patch_for(&self, fields: &ChangeSet) -> StatePatch {
        let mut patch = StatePatch::default();
        for field in fields.iter() {
            match field {
                Field::Audio => patch.audio = Some(self.audio.clone()),
                Field::Minimap => patch.minimap = Some(self.minimap),
                Field::Labels => patch.labels = Some(self.labels.clone()),
                Field::Colors => patch.colors = Some(self.colors.clone()),
                Field::Regions => patch.regions = Some(self.regions.clone()),
                Field::Overlap => patch.overlap = Some(self.overlap.clone()),
                Field::ActiveRegion => patch.active_region = Some(self.active_region.clone()),
                Field::ActiveLabel => patch.active_label = Some(self.active_label.clone()),
                Field::Zoom => patch.zoom = Some(self.zoom),
                Field::Playing => patch.playing = Some(self.playing),
                Field::Time => patch.time = Some(self.time),
                Field::PlayCommand => patch.play_command = Some(self.play_command),
                Field::ControlBar => patch.control_bar = Some(self.control_bar),
            }
        }
        patch
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }
}

/// A partial update of [`WidgetState`]. Used both for changes arriving from
/// the host and for the commits the widget sends back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelSet>,
    #[serde(
        default,
        with = "patch_empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_region: Option<Option<RegionId>>,
    #[serde(
        default,
        with = "patch_empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_label: Option<Option<LabelKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap: Option<OverlapMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, alias = "b64", skip_serializing_if = "Option::is_none")]
    pub audio: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_command: Option<CommandToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_bar: Option<CommandToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimap: Option<bool>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Fields present in this patch.
    pub fn fields(&self) -> ChangeSet {
        let mut fields = ChangeSet::new();
        let present = [
            (self.audio.is_some(), Field::Audio),
            (self.minimap.is_some(), Field::Minimap),
            (self.labels.is_some(), Field::Labels),
            (self.colors.is_some(), Field::Colors),
            (self.regions.is_some(), Field::Regions),
            (self.overlap.is_some(), Field::Overlap),
            (self.active_region.is_some(), Field::ActiveRegion),
            (self.active_label.is_some(), Field::ActiveLabel),
            (self.zoom.is_some(), Field::Zoom),
            (self.playing.is_some(), Field::Playing),
            (self.time.is_some(), Field::Time),
            (self.play_command.is_some(), Field::PlayCommand),
            (self.control_bar.is_some(), Field::ControlBar),
        ];
        for (is_present, field) in present {
            if is_present {
                fields.insert(field);
            }
        }
        fields
    }
}

//! The shared application-state store.
//!
//! `SharedModel` holds the widget's copy of the host-persisted state. Local
//! writes only mark fields pending; [`SharedModel::touch`] commits them, which
//! appends one [`StatePatch`] to the outbox the host drains. A write that does
//! not change a value marks nothing, so committing it produces no patch.

use wavemark_types::{
    ChangeSet, ColorMap, CommandToken, Field, LabelKey, LabelSet, OverlapMap, Region, RegionId,
    StatePatch, WidgetState,
};

#[derive(Debug, Default)]
pub struct SharedModel {
    state: WidgetState,
    pending: ChangeSet,
    outbox: Vec<StatePatch>,
}

macro_rules! setter {
    ($(#[$doc:meta])* $fn_name:ident, $field:ident, $ty:ty, $tag:expr) => {
        $(#[$doc])*
        pub fn $fn_name(&mut self, value: $ty) {
            if self.state.$field != value {
                self.state.$field = value;
                self.pending.insert($tag);
            }
        }
    };
}

impl SharedModel {
    pub fn new(state: WidgetState) -> Self {
        Self {
            state,
            pending: ChangeSet::new(),
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    setter!(set_regions, regions, Vec<Region>, Field::Regions);
    setter!(set_labels, labels, LabelSet, Field::Labels);
    setter!(set_colors, colors, ColorMap, Field::Colors);
    setter!(set_overlap, overlap, OverlapMap, Field::Overlap);
    setter!(set_active_region, active_region, Option<RegionId>, Field::ActiveRegion);
    setter!(set_active_label, active_label, Option<LabelKey>, Field::ActiveLabel);
    setter!(set_playing, playing, bool, Field::Playing);
    setter!(set_zoom, zoom, f64, Field::Zoom);
    setter!(set_play_command, play_command, CommandToken, Field::PlayCommand);
    setter!(set_control_bar, control_bar, CommandToken, Field::ControlBar);

    /// Playback position; negative times are clamped to zero.
    pub fn set_time(&mut self, time: f64) {
        let time = time.max(0.0);
        if self.state.time != time {
            self.state.time = time;
            self.pending.insert(Field::Time);
        }
    }

    /// Write a command token into `field` (`PlayCommand` or `ControlBar`).
    pub fn set_command(&mut self, field: Field, token: CommandToken) {
        match field {
            Field::PlayCommand => self.set_play_command(token),
            Field::ControlBar => self.set_control_bar(token),
            other => log::warn!(target: "model", "{} is not a command field", other.as_str()),
        }
    }

    pub fn command(&self, field: Field) -> CommandToken {
        match field {
            Field::PlayCommand => self.state.play_command,
            Field::ControlBar => self.state.control_bar,
            _ => CommandToken::None,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Commit pending writes. Returns the committed fields; an empty set
    /// means nothing was sent to the host.
    pub fn touch(&mut self) -> ChangeSet {
        let changed = std::mem::take(&mut self.pending);
        if !changed.is_empty() {
            let patch = self.state.patch_for(&changed);
            log::trace!(target: "model", "commit {:?}", changed);
            self.outbox.push(patch);
        }
        changed
    }

    /// Apply a change that originated in the host. Nothing is echoed back to
    /// the outbox.
    pub fn apply_remote(&mut self, patch: &StatePatch) -> ChangeSet {
        self.state.apply(patch)
    }

    /// Commits not yet collected by the host, oldest first.
    pub fn drain_commits(&mut self) -> Vec<StatePatch> {
        std::mem::take(&mut self.outbox)
    }

    pub fn commits(&self) -> &[StatePatch] {
        &self.outbox
    }
}

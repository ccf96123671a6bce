use wavemark_types::{Command, CommandAction, CommandToken, Field, LabelKey};

use super::AnnotationWidget;
use crate::editing::{self, Edge, Edit};
use crate::engine::WaveformEngine;
use crate::error::{WidgetError, WidgetResult};
use crate::interaction_log::LoggedInput;
use crate::keys::{self, KeyAction, KeyPress};
use crate::rttm::{self, SpeechTurn};
use crate::{labels, playback};

impl<E: WaveformEngine> AnnotationWidget<E> {
    /// A control surface writes `token` into `field` (`PlayCommand` or
    /// `ControlBar`). The relay runs it and resets the field in the same turn.
    pub fn send_command(&mut self, field: Field, token: CommandToken) -> WidgetResult {
        self.record(LoggedInput::Command { field, token });
        self.model.set_command(field, token);
        let result = self.commit();
        self.finish(result)
    }

    /// [`send_command`](Self::send_command) for a raw wire token. Unknown
    /// tokens reset the field and are reported.
    pub fn send_command_str(&mut self, field: Field, token: &str) -> WidgetResult {
        match CommandToken::parse(token) {
            Some(token) => self.send_command(field, token),
            None => {
                log::warn!(target: "relay", "unknown command {:?} on {}", token, field.as_str());
                self.model.set_command(field, CommandToken::None);
                let reset = self.commit();
                self.finish(reset)?;
                Err(WidgetError::UnknownCommand(token.to_string()))
            }
        }
    }

    pub(super) fn run_command(&mut self, command: Command) -> WidgetResult {
        match command.action() {
            CommandAction::Nudge { direction, fast } => {
                let edge = if fast { Edge::End } else { Edge::Start };
                self.nudge_inner(direction, fast, edge)
            }
            CommandAction::TogglePlaying => self.toggle_playing_inner(),
            CommandAction::Zoom { direction } => self.zoom_inner(direction),
            CommandAction::InsertRegion => self.insert_inner(),
            CommandAction::CutRegion => self.cut_inner(),
            CommandAction::DeleteRegion => self.delete_inner(1),
        }
    }

    pub fn handle_key(&mut self, press: &KeyPress) -> WidgetResult {
        let Some(action) = keys::action_for(press) else {
            log::trace!(target: "keys", "unbound key {:?}", press.key);
            return Ok(());
        };
        self.record(LoggedInput::Key {
            press: press.clone(),
        });
        let result = match action {
            KeyAction::TogglePlaying => self.toggle_playing_inner(),
            KeyAction::Navigate { direction } => self.navigate_inner(direction),
            KeyAction::ClearSelection => {
                self.model.set_active_region(None);
                self.commit()
            }
            KeyAction::SelectLabel(key) => self.choose_label(key),
            KeyAction::Nudge {
                direction,
                fast,
                edge,
            } => self.nudge_inner(direction, fast, edge),
            KeyAction::Zoom { direction } => self.zoom_inner(direction),
            KeyAction::Delete { direction } => self.delete_inner(direction),
            KeyAction::Insert => self.insert_inner(),
            KeyAction::Cut => self.cut_inner(),
        };
        self.finish(result)
    }

    pub fn toggle_playing(&mut self) -> WidgetResult {
        let result = self.toggle_playing_inner();
        self.finish(result)
    }

    /// Insert a region at the cursor with the active label and select it.
    pub fn insert_region(&mut self) -> WidgetResult {
        let result = self.insert_inner();
        self.finish(result)
    }

    /// Split the active region at the cursor.
    pub fn cut_region(&mut self) -> WidgetResult {
        let result = self.cut_inner();
        self.finish(result)
    }

    /// Delete the active region; `direction` picks which neighbour is
    /// selected next.
    pub fn delete_region(&mut self, direction: i8) -> WidgetResult {
        let result = self.delete_inner(direction);
        self.finish(result)
    }

    /// Move one bound of the active region, or the cursor when nothing is
    /// selected. Playback pauses for the edit and then resumes.
    pub fn nudge(&mut self, direction: i8, fast: bool, edge: Edge) -> WidgetResult {
        let result = self.nudge_inner(direction, fast, edge);
        self.finish(result)
    }

    pub fn navigate(&mut self, direction: i8) -> WidgetResult {
        let result = self.navigate_inner(direction);
        self.finish(result)
    }

    pub fn zoom_by(&mut self, direction: i8) -> WidgetResult {
        let result = self.zoom_inner(direction);
        self.finish(result)
    }

    /// Make `key` the active label. A selected region is relabeled.
    pub fn select_label(&mut self, key: LabelKey) -> WidgetResult {
        self.record(LoggedInput::SelectLabel { key: key.clone() });
        let result = self.choose_label(key);
        self.finish(result)
    }

    /// Add a label under the next free key.
    pub fn add_label(&mut self, text: &str) -> WidgetResult<LabelKey> {
        self.record(LoggedInput::AddLabel {
            text: text.to_string(),
        });
        let mut next = self.model.state().labels.clone();
        let key = labels::next_label_key(&next);
        next.insert(key.clone(), text.to_string());
        self.model.set_labels(next);
        let result = self.commit();
        self.finish(result)?;
        Ok(key)
    }

    pub fn rename_label(&mut self, key: &LabelKey, text: &str) -> WidgetResult {
        self.record(LoggedInput::RenameLabel {
            key: key.clone(),
            text: text.to_string(),
        });
        let mut next = self.model.state().labels.clone();
        match next.get_mut(key) {
            Some(existing) => *existing = text.to_string(),
            None => {
                log::debug!(target: "labels", "rename of unknown label {:?}", key.as_str());
                return Ok(());
            }
        }
        self.model.set_labels(next);
        let result = self.commit();
        self.finish(result)
    }

    /// Replace all regions with imported speech turns.
    pub fn import_turns(&mut self, turns: &[SpeechTurn]) -> WidgetResult {
        let (regions, labels) = rttm::import(turns, &self.model.state().labels, &mut self.ids);
        log::info!(target: "rttm", "imported {} regions", regions.len());
        self.model.set_labels(labels);
        self.model.set_regions(regions);
        let result = self.commit();
        self.finish(result)
    }

    pub fn export_rttm(&self, uri: &str) -> String {
        let state = self.model.state();
        rttm::export(uri, &state.regions, &state.labels)
    }

    fn apply_edit(&mut self, edit: Edit) -> WidgetResult {
        self.model.set_regions(edit.regions);
        self.model.set_active_region(edit.active);
        if let Some(time) = edit.time {
            self.model.set_time(time);
        }
        self.commit()
    }

    /// Run `edit` with playback paused, then restore the previous state.
    fn paused<F>(&mut self, edit: F) -> WidgetResult
    where
        F: FnOnce(&mut Self) -> WidgetResult,
    {
        let was_playing = self.model.state().playing;
        if was_playing {
            self.model.set_playing(false);
            self.commit()?;
        }
        let result = edit(self);
        if was_playing {
            self.model.set_playing(true);
            self.commit()?;
        }
        result
    }

    fn toggle_playing_inner(&mut self) -> WidgetResult {
        let playing = !self.model.state().playing;
        self.model.set_playing(playing);
        self.commit()
    }

    fn zoom_inner(&mut self, direction: i8) -> WidgetResult {
        let zoom = playback::stepped_zoom(self.model.state().zoom, direction, self.settings.zoom_step);
        self.model.set_zoom(zoom);
        self.commit()
    }

    fn insert_inner(&mut self) -> WidgetResult {
        let id = self.ids.next_id();
        let state = self.model.state();
        let label = state.active_label.clone().unwrap_or_default();
        let edit = editing::insert_at(&state.regions, state.time, self.settings.insert_length, label, id);
        self.apply_edit(edit)
    }

    fn cut_inner(&mut self) -> WidgetResult {
        let state = self.model.state();
        let Some(active) = state.active_region.clone() else {
            log::debug!(target: "editing", "cut without an active region");
            return Ok(());
        };
        let time = state.time;
        let new_id = self.ids.next_id();
        let state = self.model.state();
        match editing::cut_active(&state.regions, Some(&active), time, new_id) {
            Some(edit) => self.apply_edit(edit),
            None => {
                log::debug!(target: "editing", "cursor {:.3} is not inside {}", time, active);
                Ok(())
            }
        }
    }

    fn delete_inner(&mut self, direction: i8) -> WidgetResult {
        let state = self.model.state();
        match editing::delete_active(&state.regions, state.active_region.as_ref(), direction) {
            Some(edit) => self.apply_edit(edit),
            None => Ok(()),
        }
    }

    fn nudge_inner(&mut self, direction: i8, fast: bool, edge: Edge) -> WidgetResult {
        let delta = self.settings.precision(fast) * f64::from(direction.signum());
        self.paused(|widget| {
            let state = widget.model.state();
            let edit = editing::nudge(
                &state.regions,
                state.active_region.as_ref(),
                state.time,
                delta,
                edge,
            );
            widget.apply_edit(edit)
        })
    }

    fn navigate_inner(&mut self, direction: i8) -> WidgetResult {
        self.paused(|widget| {
            let state = widget.model.state();
            match editing::navigate(&state.regions, state.active_region.as_ref(), direction) {
                Some(edit) => widget.apply_edit(edit),
                None => Ok(()),
            }
        })
    }

    fn choose_label(&mut self, key: LabelKey) -> WidgetResult {
        self.model.set_active_label(Some(key.clone()));
        let state = self.model.state();
        if let Some(edit) = editing::relabel_active(&state.regions, state.active_region.as_ref(), &key) {
            self.model.set_regions(edit.regions);
        }
        self.commit()
    }
}

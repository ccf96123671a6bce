use wavemark_types::{ChangeSet, Field, Region};

use super::AnnotationWidget;
use crate::audio::AudioPayload;
use crate::engine::WaveformEngine;
use crate::error::WidgetResult;
use crate::guard::SyncPhase;
use crate::{adapter, labels, playback, relay, selection};

impl<E: WaveformEngine> AnnotationWidget<E> {
    pub(super) fn on_field_changed(&mut self, field: Field, changed: &ChangeSet) -> WidgetResult {
        match field {
            Field::Audio => self.load_audio(changed.contains(Field::Regions)),
            Field::Minimap => {
                log::debug!(target: "widget", "minimap changes apply on the next attach");
                Ok(())
            }
            Field::Labels => {
                let result = self.sync_colors();
                self.reproject();
                result
            }
            Field::Colors | Field::Overlap => {
                self.reproject();
                Ok(())
            }
            Field::Regions => self.on_regions_changed(),
            Field::ActiveRegion => self.on_active_region_changed(),
            // only read when a region is drawn or inserted
            Field::ActiveLabel => Ok(()),
            Field::Zoom => {
                playback::apply_zoom(&mut self.engine, self.model.state().zoom);
                self.reproject();
                Ok(())
            }
            Field::Playing => {
                playback::apply_playing(&mut self.engine, self.model.state().playing);
                Ok(())
            }
            Field::Time => self.on_time_changed(),
            Field::PlayCommand | Field::ControlBar => self.relay(field),
        }
    }

    /// A new payload replaces the audio and, unless the same change carried
    /// regions for it, drops the old regions. Regions are only dropped once
    /// the engine has accepted the payload.
    fn load_audio(&mut self, keep_regions: bool) -> WidgetResult {
        let Some(url) = self.model.state().audio.clone() else {
            return Ok(());
        };
        let payload = AudioPayload::parse(&url)?;
        log::info!(
            target: "widget",
            "loading {} bytes of {}",
            payload.bytes.len(),
            payload.mime
        );
        self.engine.load_audio(&payload.mime, &payload.bytes)?;
        if !keep_regions {
            self.model.set_regions(Vec::new());
            self.model.set_active_region(None);
            self.commit()?;
        }
        Ok(())
    }

    fn sync_colors(&mut self) -> WidgetResult {
        let state = self.model.state();
        let colors = labels::assign_colors(&state.labels, &state.colors, &mut self.colors);
        self.model.set_colors(colors);
        self.commit()
    }

    fn on_regions_changed(&mut self) -> WidgetResult {
        if self.guard.echo_suppressed() {
            log::trace!(target: "sync", "regions written from the engine, not pushed back");
            return Ok(());
        }
        let state = self.model.state();
        let regions = state.regions.clone();
        let active = selection::retain_valid(state.active_region.as_ref(), &regions);
        let registered = labels::register_missing(&regions, &state.labels);
        if active.is_none() && state.active_region.is_some() {
            log::debug!(target: "widget", "active region no longer exists");
        }
        self.model.set_active_region(active);
        if let Some(labels) = registered {
            self.model.set_labels(labels);
        }
        self.commit()?;
        self.push_regions(&regions)
    }

    /// Rebuild the engine's regions from `regions`. Region events the
    /// rebuild causes are drained while the guard marks them as artifacts.
    pub(super) fn push_regions(&mut self, regions: &[Region]) -> WidgetResult {
        self.guard.enter(SyncPhase::ApplyingExternal)?;
        adapter::push(&mut self.engine, regions);
        let drained = self.drain_engine_events();
        self.guard.exit(SyncPhase::ApplyingExternal)?;
        drained?;
        self.reproject();
        Ok(())
    }

    fn on_active_region_changed(&mut self) -> WidgetResult {
        let state = self.model.state();
        if let Some(id) = &state.active_region {
            if state.region(id).is_none() {
                log::debug!(target: "widget", "dropping unknown active region {}", id);
                self.model.set_active_region(None);
                return self.commit();
            }
        }
        self.reproject();
        Ok(())
    }

    fn on_time_changed(&mut self) -> WidgetResult {
        let state = self.model.state();
        let (time, playing) = (state.time, state.playing);
        playback::apply_time(&mut self.engine, time, playing, self.settings.seek_epsilon);

        if !self.settings.auto_select {
            return Ok(());
        }
        let state = self.model.state();
        let Some(id) = selection::region_at(&state.regions, time).map(|r| r.id.clone()) else {
            return Ok(());
        };
        self.model.set_active_region(Some(id));
        self.commit()
    }

    fn relay(&mut self, field: Field) -> WidgetResult {
        let Some(command) = relay::take_command(&mut self.model, field) else {
            return Ok(());
        };
        let result = self.run_command(command);
        // the neutral token, if the action itself committed nothing
        let reset = self.commit();
        result.and(reset)
    }
}

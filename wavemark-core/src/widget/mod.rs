//! The annotation widget: one shared model, one waveform engine, and the
//! observers that keep the two in step.
//!
//! Changes reach the widget from three directions:
//!
//! - the host, as [`StatePatch`]es ([`AnnotationWidget::handle_remote_patch`]),
//! - the engine, as [`EngineEvent`]s ([`AnnotationWidget::pump_engine_events`]),
//! - the user, as key presses, command tokens and label list edits.
//!
//! Every handler takes `&mut self`, writes to the model, commits, and lets the
//! field observers (`on_field_changed`) push the consequences into the engine.
//! Commits collect in an outbox the host drains with
//! [`AnnotationWidget::drain_commits`].

mod commands;
mod events;
mod observers;

use std::collections::BTreeMap;

use wavemark_types::{ChangeSet, EngineEvent, Field, StatePatch, WidgetState};

use crate::config::WidgetSettings;
use crate::engine::WaveformEngine;
use crate::error::WidgetResult;
use crate::guard::{SyncGuard, SyncPhase};
use crate::ids::RegionIdGenerator;
use crate::interaction_log::{InteractionLog, LoggedInput};
use crate::labels::{self, ColorPool, LabelEntry};
use crate::model::SharedModel;
use crate::projector::{self, ProjectionInput, TagPolicy};

/// Upper bound on engine event rounds drained in one go. An engine that keeps
/// reporting past this is logged and left for the next pump.
const MAX_DRAIN_ROUNDS: usize = 64;

pub struct AnnotationWidget<E: WaveformEngine> {
    model: SharedModel,
    engine: E,
    guard: SyncGuard,
    settings: WidgetSettings,
    ids: RegionIdGenerator,
    colors: ColorPool,
    log: Option<InteractionLog>,
}

impl<E: WaveformEngine> AnnotationWidget<E> {
    pub fn new(engine: E, settings: WidgetSettings, state: WidgetState) -> Self {
        let colors = ColorPool::new(settings.palette.clone());
        Self {
            model: SharedModel::new(state),
            engine,
            guard: SyncGuard::new(),
            settings,
            ids: RegionIdGenerator::new(),
            colors,
            log: None,
        }
    }

    pub fn with_ids(mut self, ids: RegionIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Record every input from now on. The current state is written first so
    /// the log can be replayed from scratch.
    pub fn with_log(mut self, log: InteractionLog) -> Self {
        self.log = Some(log);
        self.record(LoggedInput::Init {
            state: self.model.state().clone(),
        });
        self
    }

    /// Push the whole shared state into the engine. Call once after
    /// construction; the minimap setting is only read here.
    pub fn attach(&mut self) -> WidgetResult {
        self.engine.set_minimap(self.model.state().minimap);
        let changed: ChangeSet = [
            Field::Audio,
            Field::Labels,
            Field::Regions,
            Field::Zoom,
            Field::Playing,
            Field::Time,
        ]
        .into_iter()
        .collect();
        let result = self.observe(&changed);
        self.finish(result)
    }

    pub fn state(&self) -> &WidgetState {
        self.model.state()
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access, for driving user gestures. Events the engine
    /// reports are picked up by the next handler or pump.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn sync_phase(&self) -> SyncPhase {
        self.guard.phase()
    }

    /// Commits not yet collected by the host, oldest first.
    pub fn drain_commits(&mut self) -> Vec<StatePatch> {
        self.model.drain_commits()
    }

    pub fn commits(&self) -> &[StatePatch] {
        self.model.commits()
    }

    pub fn label_entries(&self) -> Vec<LabelEntry> {
        let state = self.model.state();
        labels::entries(&state.labels, &state.colors, state.active_label.as_ref())
    }

    /// Apply a change made by the host. Nothing the host sent is echoed back;
    /// only consequences (a cleared selection, a reset command) are committed.
    pub fn handle_remote_patch(&mut self, patch: &StatePatch) -> WidgetResult {
        self.record(LoggedInput::Host {
            patch: patch.clone(),
        });
        let changed = self.model.apply_remote(patch);
        log::debug!(target: "widget", "remote patch changed {:?}", changed);
        let result = self.observe(&changed);
        self.finish(result)
    }

    /// Handle one event reported by the engine, then anything it caused.
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> WidgetResult {
        let result = self.on_engine_event(event);
        self.finish(result)
    }

    /// Handle every event the engine has queued.
    pub fn pump_engine_events(&mut self) -> WidgetResult {
        self.drain_engine_events()
    }

    fn record(&mut self, input: LoggedInput) {
        if let Some(log) = self.log.as_mut() {
            log.record(&input);
        }
    }

    /// Commit pending model writes and run the observers of whatever changed.
    fn commit(&mut self) -> WidgetResult {
        let changed = self.model.touch();
        if changed.is_empty() {
            return Ok(());
        }
        self.observe(&changed)
    }

    /// Run the observer of every changed field, in field order. A failing
    /// observer does not stop the others; the first error is returned.
    fn observe(&mut self, changed: &ChangeSet) -> WidgetResult {
        let mut first_err = None;
        for field in changed.iter() {
            if let Err(e) = self.on_field_changed(field, changed) {
                log::warn!(target: "widget", "{} observer failed: {}", field.as_str(), e);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn drain_engine_events(&mut self) -> WidgetResult {
        let mut first_err = None;
        for _ in 0..MAX_DRAIN_ROUNDS {
            let events = self.engine.poll_events();
            if events.is_empty() {
                return first_err.map_or(Ok(()), Err);
            }
            for event in events {
                if let Err(e) = self.on_engine_event(event) {
                    log::warn!(target: "widget", "engine event failed: {}", e);
                    first_err.get_or_insert(e);
                }
            }
        }
        log::warn!(
            target: "widget",
            "engine still reporting events after {} rounds",
            MAX_DRAIN_ROUNDS
        );
        first_err.map_or(Ok(()), Err)
    }

    /// Drain what `result`'s handler made the engine report.
    fn finish(&mut self, result: WidgetResult) -> WidgetResult {
        let drained = self.drain_engine_events();
        result.and(drained)
    }

    /// Restyle every engine region from the current state.
    fn reproject(&mut self) {
        let state = self.model.state();
        let mut geometry = BTreeMap::new();
        if self.settings.label_tags {
            for region in &state.regions {
                let text = projector::tag_text(region, &state.labels);
                match self.engine.measure_region(&region.id, &text) {
                    Some(g) => {
                        geometry.insert(region.id.clone(), g);
                    }
                    None => log::trace!(target: "projector", "no geometry for {}", region.id),
                }
            }
        }
        let input = ProjectionInput {
            regions: &state.regions,
            active: state.active_region.as_ref(),
            colors: &state.colors,
            labels: &state.labels,
            overlap: &state.overlap,
            tags: self.settings.label_tags.then_some(TagPolicy {
                max_ratio: self.settings.label_tag_max_ratio,
                geometry: &geometry,
            }),
        };
        let styles = projector::project(&input);
        for (id, style) in styles {
            self.engine.style_region(&id, &style);
        }
    }
}

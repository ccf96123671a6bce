use wavemark_types::{EngineEvent, EngineRegion, RegionId, LABEL_ATTRIBUTE};

use super::AnnotationWidget;
use crate::engine::WaveformEngine;
use crate::error::WidgetResult;
use crate::guard::SyncPhase;
use crate::interaction_log::LoggedInput;
use crate::{adapter, labels, selection};

impl<E: WaveformEngine> AnnotationWidget<E> {
    pub(super) fn on_engine_event(&mut self, event: EngineEvent) -> WidgetResult {
        if matches!(
            event,
            EngineEvent::RegionCreated { .. } | EngineEvent::RegionUpdated { .. }
        ) && self.guard.applying_external_update()
        {
            log::trace!(target: "sync", "ignoring {} during rebuild", event.kind());
            return Ok(());
        }
        if !event.is_tick() {
            self.record(LoggedInput::Engine {
                event: event.clone(),
            });
        }

        match event {
            EngineEvent::Ready { duration } => {
                log::info!(target: "widget", "audio ready, {:.3}s", duration);
                self.reproject();
                Ok(())
            }
            EngineEvent::RegionCreated { region } => self.on_region_drawn(region),
            EngineEvent::RegionUpdated { .. } => self.propagate_engine_regions(),
            EngineEvent::RegionClicked { id } => self.on_region_clicked(&id),
            EngineEvent::Tick { time } | EngineEvent::Seek { time } => {
                self.model.set_time(time);
                self.commit()
            }
            EngineEvent::Finished => {
                self.model.set_playing(false);
                self.commit()
            }
            EngineEvent::Zoomed { zoom } => {
                self.model.set_zoom(zoom);
                self.commit()
            }
        }
    }

    /// The user drew a region: stamp it with the active label and select it.
    fn on_region_drawn(&mut self, region: EngineRegion) -> WidgetResult {
        let label = self.model.state().active_label.clone().unwrap_or_default();
        self.engine
            .set_region_attribute(&region.id, LABEL_ATTRIBUTE, label.as_str());
        log::debug!(target: "widget", "region {} drawn with label {:?}", region.id, label.as_str());
        self.model.set_active_region(Some(region.id));
        self.propagate_engine_regions()
    }

    fn on_region_clicked(&mut self, id: &RegionId) -> WidgetResult {
        let next = selection::toggle(self.model.state().active_region.as_ref(), id);
        self.model.set_active_region(next);
        self.commit()
    }

    /// Write the engine's regions into state without pushing them back.
    fn propagate_engine_regions(&mut self) -> WidgetResult {
        let regions = adapter::pull(&self.engine);
        if let Some(labels) = labels::register_missing(&regions, &self.model.state().labels) {
            self.model.set_labels(labels);
        }
        self.model.set_regions(regions);

        self.guard.enter(SyncPhase::PropagatingLocal)?;
        let result = self.commit();
        self.guard.exit(SyncPhase::PropagatingLocal)?;
        result?;
        self.reproject();
        Ok(())
    }
}

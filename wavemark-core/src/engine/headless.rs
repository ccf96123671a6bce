use std::collections::{BTreeMap, VecDeque};

use wavemark_types::{EngineEvent, EngineRegion, RegionId, RegionStyle};

use super::{EngineError, EngineResult, RegionGeometry, WaveformEngine};

/// An operation recorded by `HeadlessEngine` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOp {
    LoadAudio { mime: String, len: usize },
    SetMinimap(bool),
    Seek(f64),
    Play,
    Pause,
    Zoom(f64),
    AddRegion(RegionId),
    SetAttribute { id: RegionId, key: String, value: String },
    ClearRegions,
    Style { id: RegionId, style: RegionStyle },
}

/// In-memory engine. Records every operation and reports the events a
/// browser renderer would: region-created on add, seek on seek, zoomed on
/// zoom, ready on load. User gestures are simulated with the `drag_region`,
/// `click_region`, `advance` and `user_zoom` helpers.
#[derive(Debug)]
pub struct HeadlessEngine {
    ops: Vec<EngineOp>,
    events: VecDeque<EngineEvent>,
    regions: Vec<EngineRegion>,
    styles: BTreeMap<RegionId, RegionStyle>,
    audio: Option<(String, usize)>,
    duration: f64,
    minimap: bool,
    playing: bool,
    time: f64,
    zoom: f64,
    /// Pixels per tag character; tags also get fixed padding.
    char_width: f64,
}

const TAG_PADDING: f64 = 8.0;

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            events: VecDeque::new(),
            regions: Vec::new(),
            styles: BTreeMap::new(),
            audio: None,
            duration: 60.0,
            minimap: false,
            playing: false,
            time: 0.0,
            zoom: 0.0,
            char_width: 7.0,
        }
    }
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration reported when audio is loaded.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_char_width(mut self, char_width: f64) -> Self {
        self.char_width = char_width;
        self
    }

    pub fn operations(&self) -> &[EngineOp] {
        &self.ops
    }

    pub fn clear_operations(&mut self) {
        self.ops.clear();
    }

    pub fn count<F: Fn(&EngineOp) -> bool>(&self, f: F) -> usize {
        self.ops.iter().filter(|op| f(op)).count()
    }

    /// Last style applied to `id`.
    pub fn style(&self, id: &RegionId) -> Option<&RegionStyle> {
        self.styles.get(id)
    }

    pub fn styles(&self) -> &BTreeMap<RegionId, RegionStyle> {
        &self.styles
    }

    pub fn loaded_audio(&self) -> Option<(&str, usize)> {
        self.audio.as_ref().map(|(mime, len)| (mime.as_str(), *len))
    }

    pub fn minimap(&self) -> bool {
        self.minimap
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// The user drags out a new region. Reports creation, then the final
    /// geometry once the drag ends.
    pub fn drag_region(&mut self, region: EngineRegion) {
        self.regions.push(region.clone());
        self.events.push_back(EngineEvent::RegionCreated {
            region: region.clone(),
        });
        self.events.push_back(EngineEvent::RegionUpdated { region });
    }

    /// The user moves or resizes an existing region.
    pub fn resize_region(&mut self, id: &RegionId, start: f64, end: f64) {
        if let Some(region) = self.regions.iter_mut().find(|r| &r.id == id) {
            region.start = start;
            region.end = end;
            let region = region.clone();
            self.events.push_back(EngineEvent::RegionUpdated { region });
        }
    }

    pub fn click_region(&mut self, id: &RegionId) {
        self.events
            .push_back(EngineEvent::RegionClicked { id: id.clone() });
    }

    /// Let playback run for `dt` seconds. Reaching the end of the audio
    /// stops playback.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.time = (self.time + dt).min(self.duration);
        self.events.push_back(EngineEvent::Tick { time: self.time });
        if self.time >= self.duration {
            self.playing = false;
            self.events.push_back(EngineEvent::Finished);
        }
    }

    /// The user scrolls the zoom control.
    pub fn user_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.events.push_back(EngineEvent::Zoomed { zoom });
    }

    /// Mirror an event that happened in some other engine instance into this
    /// one without reporting it again.
    pub fn apply_external(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::Ready { duration } => self.duration = *duration,
            EngineEvent::RegionCreated { region } => {
                if !self.regions.iter().any(|r| r.id == region.id) {
                    self.regions.push(region.clone());
                }
            }
            EngineEvent::RegionUpdated { region } => {
                match self.regions.iter_mut().find(|r| r.id == region.id) {
                    Some(existing) => {
                        existing.start = region.start;
                        existing.end = region.end;
                    }
                    None => self.regions.push(region.clone()),
                }
            }
            EngineEvent::Tick { time } | EngineEvent::Seek { time } => self.time = *time,
            EngineEvent::Finished => self.playing = false,
            EngineEvent::Zoomed { zoom } => self.zoom = *zoom,
            EngineEvent::RegionClicked { .. } => {}
        }
    }
}

impl WaveformEngine for HeadlessEngine {
    fn load_audio(&mut self, mime: &str, bytes: &[u8]) -> EngineResult {
        if bytes.is_empty() {
            return Err(EngineError("empty audio payload".to_string()));
        }
        self.ops.push(EngineOp::LoadAudio {
            mime: mime.to_string(),
            len: bytes.len(),
        });
        self.audio = Some((mime.to_string(), bytes.len()));
        self.playing = false;
        self.time = 0.0;
        self.events.push_back(EngineEvent::Ready {
            duration: self.duration,
        });
        Ok(())
    }

    fn set_minimap(&mut self, visible: bool) {
        self.ops.push(EngineOp::SetMinimap(visible));
        self.minimap = visible;
    }

    fn seek(&mut self, time: f64) {
        self.ops.push(EngineOp::Seek(time));
        self.time = time.clamp(0.0, self.duration);
        self.events.push_back(EngineEvent::Seek { time: self.time });
    }

    fn play(&mut self) {
        self.ops.push(EngineOp::Play);
        self.playing = true;
    }

    fn pause(&mut self) {
        self.ops.push(EngineOp::Pause);
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn zoom(&mut self, pixels_per_second: f64) {
        self.ops.push(EngineOp::Zoom(pixels_per_second));
        self.zoom = pixels_per_second;
        self.events.push_back(EngineEvent::Zoomed {
            zoom: pixels_per_second,
        });
    }

    fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn regions(&self) -> Vec<EngineRegion> {
        self.regions.clone()
    }

    fn add_region(&mut self, region: EngineRegion) {
        self.ops.push(EngineOp::AddRegion(region.id.clone()));
        self.regions.push(region.clone());
        self.events.push_back(EngineEvent::RegionCreated { region });
    }

    fn set_region_attribute(&mut self, id: &RegionId, key: &str, value: &str) {
        self.ops.push(EngineOp::SetAttribute {
            id: id.clone(),
            key: key.to_string(),
            value: value.to_string(),
        });
        if let Some(region) = self.regions.iter_mut().find(|r| &r.id == id) {
            region.attributes.insert(key.to_string(), value.to_string());
        }
    }

    fn clear_regions(&mut self) {
        self.ops.push(EngineOp::ClearRegions);
        self.regions.clear();
        self.styles.clear();
    }

    fn style_region(&mut self, id: &RegionId, style: &RegionStyle) {
        if !self.regions.iter().any(|r| &r.id == id) {
            return;
        }
        self.ops.push(EngineOp::Style {
            id: id.clone(),
            style: style.clone(),
        });
        let mut next = style.clone();
        if next.color.is_none() {
            // no color keeps the one already shown
            next.color = self.styles.get(id).and_then(|s| s.color.clone());
        }
        self.styles.insert(id.clone(), next);
    }

    fn measure_region(&self, id: &RegionId, tag_text: &str) -> Option<RegionGeometry> {
        let region = self.regions.iter().find(|r| &r.id == id)?;
        if self.zoom <= 0.0 {
            return None;
        }
        Some(RegionGeometry {
            region_width: (region.end - region.start) * self.zoom,
            tag_width: tag_text.chars().count() as f64 * self.char_width + TAG_PADDING,
        })
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }
}

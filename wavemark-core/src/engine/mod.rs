//! Waveform engine trait: the seam between the widget and whatever draws the
//! waveform, plays the audio and lets the user drag regions.
//!
//! `WaveformEngine` captures what the widget *means* to do (load audio, seek,
//! rebuild regions, restyle one region) independently of how a concrete
//! renderer does it. [`HeadlessEngine`] implements it in memory so that the
//! sync logic can be tested without a renderer.

mod headless;

use std::fmt;

use wavemark_types::{EngineEvent, EngineRegion, RegionId, RegionStyle};

pub use headless::{EngineOp, HeadlessEngine};

/// Result type for engine operations.
pub type EngineResult<T = ()> = Result<T, EngineError>;

/// Error from an engine operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineError(pub String);

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EngineError {}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError(s)
    }
}

/// Rendered size of a region and of its label tag, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGeometry {
    pub region_width: f64,
    pub tag_width: f64,
}

/// Semantic-level waveform engine.
pub trait WaveformEngine {
    /// Decode and display an audio payload. The engine reports
    /// [`EngineEvent::Ready`] once the duration is known.
    fn load_audio(&mut self, mime: &str, bytes: &[u8]) -> EngineResult;

    /// Show or hide the overview minimap. Only read once, at construction.
    fn set_minimap(&mut self, visible: bool);

    fn seek(&mut self, time: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// Playback cursor, seconds.
    fn current_time(&self) -> f64;

    /// Set the horizontal scale in pixels per second.
    fn zoom(&mut self, pixels_per_second: f64);

    fn zoom_level(&self) -> f64;

    /// Every region currently drawn, in engine order.
    fn regions(&self) -> Vec<EngineRegion>;

    fn add_region(&mut self, region: EngineRegion);

    fn set_region_attribute(&mut self, id: &RegionId, key: &str, value: &str);

    fn clear_regions(&mut self);

    /// Replace the visual classification of one region. Unknown ids are ignored.
    fn style_region(&mut self, id: &RegionId, style: &RegionStyle);

    /// Rendered geometry of a region carrying a tag with `tag_text`, if the
    /// region is currently laid out.
    fn measure_region(&self, id: &RegionId, tag_text: &str) -> Option<RegionGeometry>;

    /// Take every event reported since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

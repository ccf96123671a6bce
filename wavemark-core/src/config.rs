use std::path::PathBuf;

use serde::Deserialize;

use wavemark_types::WidgetState;

use crate::labels::DEFAULT_PALETTE;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    editing: EditingConfig,
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    view: ViewConfig,
}

#[derive(Deserialize, Default)]
struct EditingConfig {
    precision_slow: Option<f64>,
    precision_fast: Option<f64>,
    insert_length: Option<f64>,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    initial_zoom: Option<f64>,
    zoom_step: Option<f64>,
    seek_epsilon: Option<f64>,
    auto_select: Option<bool>,
}

#[derive(Deserialize, Default)]
struct ViewConfig {
    minimap: Option<bool>,
    label_tags: Option<bool>,
    label_tag_max_ratio: Option<f64>,
    palette: Option<Vec<String>>,
}

/// Resolved widget settings handed to [`crate::widget::AnnotationWidget`].
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSettings {
    /// Nudge step when moving a region start or the cursor.
    pub precision_slow: f64,
    /// Nudge step when moving a region end.
    pub precision_fast: f64,
    pub insert_length: f64,
    pub initial_zoom: f64,
    pub zoom_step: f64,
    /// Engine positions closer than this to the requested time are not re-seeked.
    pub seek_epsilon: f64,
    pub auto_select: bool,
    pub minimap: bool,
    pub label_tags: bool,
    pub label_tag_max_ratio: f64,
    pub palette: Vec<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            precision_slow: 0.1,
            precision_fast: 0.5,
            insert_length: 0.5,
            initial_zoom: 20.0,
            zoom_step: 1.0,
            seek_epsilon: 0.001,
            auto_select: false,
            minimap: true,
            label_tags: true,
            label_tag_max_ratio: 0.9,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl WidgetSettings {
    /// Nudge step for a slow or fast move.
    pub fn precision(&self, fast: bool) -> f64 {
        if fast {
            self.precision_fast
        } else {
            self.precision_slow
        }
    }

    /// Shared state for a fresh widget with nothing loaded.
    pub fn initial_state(&self) -> WidgetState {
        WidgetState {
            zoom: self.initial_zoom,
            minimap: self.minimap,
            ..WidgetState::default()
        }
    }
}

pub struct Config {
    editing: EditingConfig,
    playback: PlaybackConfig,
    view: ViewConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut config = Self::embedded();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => config.merge(user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Embedded defaults with `overrides` (TOML text) merged on top.
    pub fn from_toml_str(overrides: &str) -> Result<Self, toml::de::Error> {
        let user: ConfigFile = toml::from_str(overrides)?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    fn embedded() -> Self {
        let base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {}", e);
                ConfigFile::default()
            }
        };
        Config {
            editing: base.editing,
            playback: base.playback,
            view: base.view,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_editing(&mut self.editing, user.editing);
        merge_playback(&mut self.playback, user.playback);
        merge_view(&mut self.view, user.view);
    }

    pub fn settings(&self) -> WidgetSettings {
        let fallback = WidgetSettings::default();
        WidgetSettings {
            precision_slow: positive(self.editing.precision_slow).unwrap_or(fallback.precision_slow),
            precision_fast: positive(self.editing.precision_fast).unwrap_or(fallback.precision_fast),
            insert_length: positive(self.editing.insert_length).unwrap_or(fallback.insert_length),
            initial_zoom: positive(self.playback.initial_zoom).unwrap_or(fallback.initial_zoom),
            zoom_step: positive(self.playback.zoom_step).unwrap_or(fallback.zoom_step),
            seek_epsilon: self
                .playback
                .seek_epsilon
                .filter(|e| *e >= 0.0)
                .unwrap_or(fallback.seek_epsilon),
            auto_select: self.playback.auto_select.unwrap_or(fallback.auto_select),
            minimap: self.view.minimap.unwrap_or(fallback.minimap),
            label_tags: self.view.label_tags.unwrap_or(fallback.label_tags),
            label_tag_max_ratio: self
                .view
                .label_tag_max_ratio
                .unwrap_or(fallback.label_tag_max_ratio)
                .clamp(0.0, 1.0),
            palette: self
                .view
                .palette
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or(fallback.palette),
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wavemark").join("config.toml"))
}

fn merge_editing(base: &mut EditingConfig, user: EditingConfig) {
    if user.precision_slow.is_some() {
        base.precision_slow = user.precision_slow;
    }
    if user.precision_fast.is_some() {
        base.precision_fast = user.precision_fast;
    }
    if user.insert_length.is_some() {
        base.insert_length = user.insert_length;
    }
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.initial_zoom.is_some() {
        base.initial_zoom = user.initial_zoom;
    }
    if user.zoom_step.is_some() {
        base.zoom_step = user.zoom_step;
    }
    if user.seek_epsilon.is_some() {
        base.seek_epsilon = user.seek_epsilon;
    }
    if user.auto_select.is_some() {
        base.auto_select = user.auto_select;
    }
}

fn merge_view(base: &mut ViewConfig, user: ViewConfig) {
    if user.minimap.is_some() {
        base.minimap = user.minimap;
    }
    if user.label_tags.is_some() {
        base.label_tags = user.label_tags;
    }
    if user.label_tag_max_ratio.is_some() {
        base.label_tag_max_ratio = user.label_tag_max_ratio;
    }
    if user.palette.is_some() {
        base.palette = user.palette;
    }
}

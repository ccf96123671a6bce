#![allow(dead_code)]
//! Test harness utilities for wavemark-core integration tests.

use wavemark_core::audio::AudioPayload;
use wavemark_core::config::WidgetSettings;
use wavemark_core::engine::HeadlessEngine;
use wavemark_core::AnnotationWidget;
use wavemark_types::{CommandToken, LabelKey, LabelSet, Region, RegionId, StatePatch, WidgetState};

pub type TestWidget = AnnotationWidget<HeadlessEngine>;

pub fn settings() -> WidgetSettings {
    WidgetSettings::default()
}

/// Attached widget over a headless engine, with the attach commits drained
/// and the engine's operation log cleared.
pub fn widget_with(state: WidgetState) -> TestWidget {
    widget_with_settings(state, settings())
}

pub fn widget_with_settings(state: WidgetState, settings: WidgetSettings) -> TestWidget {
    let mut widget = AnnotationWidget::new(HeadlessEngine::new(), settings, state);
    widget.attach().unwrap();
    widget.drain_commits();
    widget.engine_mut().clear_operations();
    widget
}

pub fn region(id: &str, start: f64, end: f64, label: &str) -> Region {
    Region::new(id, start, end, label)
}

pub fn id(id: &str) -> RegionId {
    RegionId::new(id)
}

pub fn labels(pairs: &[(&str, &str)]) -> LabelSet {
    pairs
        .iter()
        .map(|(k, v)| (LabelKey::new(*k), v.to_string()))
        .collect()
}

pub fn state_with_regions(regions: Vec<Region>) -> WidgetState {
    WidgetState {
        regions,
        labels: labels(&[("0", "speaker A"), ("1", "speaker B")]),
        ..WidgetState::default()
    }
}

pub fn regions_patch(regions: Vec<Region>) -> StatePatch {
    StatePatch {
        regions: Some(regions),
        ..StatePatch::default()
    }
}

/// A short silent WAV file as a data URL.
pub fn wav_data_url() -> String {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&[0u8; 40]);
    AudioPayload::from_wav_bytes(bytes).to_data_url()
}

/// Every command token value seen across `commits` on the command fields,
/// in commit order.
pub fn command_history(commits: &[StatePatch]) -> Vec<CommandToken> {
    commits
        .iter()
        .flat_map(|c| c.play_command.into_iter().chain(c.control_bar))
        .collect()
}

/// Fails if two consecutive commits carry the same non-neutral token.
pub fn assert_no_repeated_command(commits: &[StatePatch]) {
    for pair in commits.windows(2) {
        for token in [
            (pair[0].play_command, pair[1].play_command),
            (pair[0].control_bar, pair[1].control_bar),
        ] {
            if let (Some(a), Some(b)) = token {
                assert!(
                    a.is_neutral() || a != b,
                    "command {:?} committed twice in a row",
                    a
                );
            }
        }
    }
}

mod common;

use wavemark_core::adapter;
use wavemark_core::engine::{EngineOp, WaveformEngine};
use wavemark_core::guard::SyncPhase;
use wavemark_core::WidgetError;
use wavemark_types::{regions_equivalent, EngineRegion, LabelKey, StatePatch, WidgetState};

use common::{id, region, regions_patch, state_with_regions, widget_with};

#[test]
fn test_host_replace_rebuilds_engine_without_echo() {
    let mut widget = widget_with(state_with_regions(vec![]));
    let regions = vec![region("a", 1.0, 3.0, "0"), region("b", 2.0, 5.0, "1")];

    widget.handle_remote_patch(&regions_patch(regions.clone())).unwrap();

    assert!(widget.drain_commits().is_empty());
    assert_eq!(widget.sync_phase(), SyncPhase::Idle);
    assert!(regions_equivalent(&adapter::pull(widget.engine()), &regions));
    let engine = widget.engine();
    assert_eq!(engine.count(|op| matches!(op, EngineOp::ClearRegions)), 1);
    assert_eq!(engine.count(|op| matches!(op, EngineOp::AddRegion(_))), 2);
    assert!(engine.style(&id("a")).is_some());
    assert!(engine.style(&id("b")).is_some());
}

#[test]
fn test_bulk_replace_clears_dangling_selection() {
    let mut state = state_with_regions(vec![region("a", 1.0, 3.0, "0"), region("b", 4.0, 5.0, "1")]);
    state.active_region = Some(id("a"));
    let mut widget = widget_with(state);

    widget
        .handle_remote_patch(&regions_patch(vec![region("b", 4.0, 5.0, "1")]))
        .unwrap();

    let commits = widget.drain_commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].active_region, Some(None));
    assert!(commits[0].regions.is_none());
    assert_eq!(widget.state().active_region, None);
}

#[test]
fn test_bulk_replace_keeps_existing_selection() {
    let mut state = state_with_regions(vec![region("a", 1.0, 3.0, "0")]);
    state.active_region = Some(id("a"));
    let mut widget = widget_with(state);

    widget
        .handle_remote_patch(&regions_patch(vec![region("a", 1.5, 3.0, "0")]))
        .unwrap();

    assert!(widget.drain_commits().is_empty());
    assert_eq!(widget.state().active_region, Some(id("a")));
    assert!(widget.engine().style(&id("a")).unwrap().active);
}

#[test]
fn test_drawn_region_is_selected_and_labeled() {
    let mut state = state_with_regions(vec![region("a", 1.0, 3.0, "0")]);
    state.active_label = Some(LabelKey::new("1"));
    let mut widget = widget_with(state);

    widget
        .engine_mut()
        .drag_region(EngineRegion::new("drawn", 5.0, 7.0));
    widget.pump_engine_events().unwrap();

    let commits = widget.drain_commits();
    assert_eq!(commits.len(), 1);
    let regions = commits[0].regions.as_ref().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(commits[0].active_region, Some(Some(id("drawn"))));

    let drawn = widget.state().region(&id("drawn")).unwrap();
    assert_eq!(drawn.label, LabelKey::new("1"));
    assert_eq!((drawn.start, drawn.end), (5.0, 7.0));
    // engine-derived regions are never pushed back
    assert_eq!(
        widget.engine().count(|op| matches!(op, EngineOp::ClearRegions)),
        0
    );
    assert!(widget.engine().style(&id("drawn")).unwrap().active);
}

#[test]
fn test_resized_region_is_written_back() {
    let mut widget = widget_with(state_with_regions(vec![region("a", 1.0, 3.0, "0")]));

    widget.engine_mut().resize_region(&id("a"), 1.5, 4.0);
    widget.pump_engine_events().unwrap();

    let commits = widget.drain_commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].regions, Some(vec![region("a", 1.5, 4.0, "0")]));
    assert_eq!(commits[0].active_region, None);
    assert_eq!(
        widget.engine().count(|op| matches!(op, EngineOp::ClearRegions)),
        0
    );
}

#[test]
fn test_unknown_region_labels_are_registered() {
    let mut widget = widget_with(state_with_regions(vec![]));

    widget
        .handle_remote_patch(&regions_patch(vec![region("a", 1.0, 2.0, "spk")]))
        .unwrap();

    let state = widget.state();
    assert_eq!(state.labels.get(&LabelKey::new("spk")).map(String::as_str), Some("spk"));
    assert!(state.colors.contains_key(&LabelKey::new("spk")));
    let commits = widget.drain_commits();
    assert!(commits.iter().any(|c| c.labels.is_some()));
    assert!(commits.iter().any(|c| c.colors.is_some()));
    assert!(commits.iter().all(|c| c.regions.is_none()));
}

#[test]
fn test_new_audio_clears_regions() {
    let mut state = state_with_regions(vec![region("a", 1.0, 3.0, "0")]);
    state.active_region = Some(id("a"));
    let mut widget = widget_with(state);

    let patch = StatePatch {
        audio: Some(Some(common::wav_data_url())),
        ..StatePatch::default()
    };
    widget.handle_remote_patch(&patch).unwrap();

    assert!(widget.state().regions.is_empty());
    assert_eq!(widget.state().active_region, None);
    assert!(widget.engine().regions().is_empty());
    let (mime, len) = widget.engine().loaded_audio().unwrap();
    assert_eq!(mime, "audio/x-wav");
    assert_eq!(len, 44);
    let commits = widget.drain_commits();
    assert_eq!(commits[0].regions, Some(vec![]));
}

#[test]
fn test_audio_with_regions_keeps_them() {
    let mut widget = widget_with(state_with_regions(vec![]));
    let patch = StatePatch {
        audio: Some(Some(common::wav_data_url())),
        regions: Some(vec![region("a", 1.0, 3.0, "0")]),
        ..StatePatch::default()
    };

    widget.handle_remote_patch(&patch).unwrap();

    assert_eq!(widget.state().regions.len(), 1);
    assert_eq!(widget.engine().regions().len(), 1);
    assert!(widget.drain_commits().is_empty());
}

#[test]
fn test_malformed_audio_is_reported() {
    let mut widget = widget_with(state_with_regions(vec![region("a", 1.0, 3.0, "0")]));
    let patch = StatePatch {
        audio: Some(Some("not a data url".to_string())),
        ..StatePatch::default()
    };

    let err = widget.handle_remote_patch(&patch).unwrap_err();

    assert!(matches!(err, WidgetError::Audio(_)));
    assert_eq!(widget.state().regions.len(), 1);
    assert_eq!(widget.state().audio.as_deref(), Some("not a data url"));
    assert!(widget.drain_commits().is_empty());
    assert!(widget.engine().loaded_audio().is_none());
}

#[test]
fn test_rejected_audio_keeps_regions() {
    let mut widget = widget_with(state_with_regions(vec![region("a", 1.0, 3.0, "0")]));
    // a valid data URL with an empty body, which the engine refuses
    let patch = StatePatch {
        audio: Some(Some("data:audio/x-wav;base64,".to_string())),
        ..StatePatch::default()
    };

    let err = widget.handle_remote_patch(&patch).unwrap_err();

    assert!(matches!(err, WidgetError::Engine(_)));
    assert_eq!(widget.state().regions.len(), 1);
    assert!(widget.drain_commits().is_empty());
    assert_eq!(widget.engine().regions().len(), 1);
    assert!(widget.engine().loaded_audio().is_none());
}

#[test]
fn test_attach_pushes_initial_state() {
    let state = WidgetState {
        minimap: false,
        ..state_with_regions(vec![region("a", 1.0, 3.0, "0")])
    };
    let mut widget = wavemark_core::AnnotationWidget::new(
        wavemark_core::engine::HeadlessEngine::new(),
        common::settings(),
        state,
    );
    widget.attach().unwrap();

    let engine = widget.engine();
    assert!(!engine.minimap());
    assert_eq!(engine.regions().len(), 1);
    assert_eq!(engine.zoom_level(), 20.0);
    // colors are assigned to the initial labels
    let commits = widget.drain_commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].colors.as_ref().map(|c| c.len()), Some(2));
}

mod common;

use wavemark_core::engine::HeadlessEngine;
use wavemark_core::ids::RegionIdGenerator;
use wavemark_core::interaction_log::{self, InteractionLog};
use wavemark_core::keys::KeyPress;
use wavemark_core::AnnotationWidget;
use wavemark_types::{CommandToken, EngineRegion, Field, LabelKey, StatePatch};

use common::{id, region, regions_patch, settings, state_with_regions};

const SEED: u64 = 7;

#[test]
fn test_recorded_session_replays_to_same_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let mut state = state_with_regions(Vec::new());
    state.active_label = Some(LabelKey::new("1"));
    let mut widget = AnnotationWidget::new(HeadlessEngine::new(), settings(), state)
        .with_ids(RegionIdGenerator::seeded(SEED))
        .with_log(InteractionLog::open(&path).unwrap());
    widget.attach().unwrap();

    widget
        .handle_remote_patch(&regions_patch(vec![
            region("a", 1.0, 3.0, "0"),
            region("b", 4.0, 6.0, "1"),
        ]))
        .unwrap();
    widget.handle_key(&KeyPress::new("Tab")).unwrap();
    widget.handle_key(&KeyPress::new("ArrowRight").shift().alt()).unwrap();

    widget.engine_mut().drag_region(EngineRegion::new("drawn", 10.0, 12.0));
    widget.pump_engine_events().unwrap();
    widget.engine_mut().resize_region(&id("drawn"), 9.5, 12.0);
    widget.pump_engine_events().unwrap();
    widget.engine_mut().click_region(&id("b"));
    widget.pump_engine_events().unwrap();

    widget.send_command(Field::ControlBar, CommandToken::InsertRegion).unwrap();
    widget.send_command(Field::PlayCommand, CommandToken::ZoomIn).unwrap();
    let key = widget.add_label("carol").unwrap();
    widget.select_label(key).unwrap();
    widget.handle_key(&KeyPress::new("Enter")).unwrap();
    widget
        .handle_remote_patch(&StatePatch {
            time: Some(5.0),
            ..StatePatch::default()
        })
        .unwrap();
    widget.engine_mut().click_region(&id("b"));
    widget.pump_engine_events().unwrap();
    widget.handle_key(&KeyPress::new("Enter").shift()).unwrap();

    let live = widget.state().clone();
    drop(widget);

    let replayed = interaction_log::replay(&path, &settings(), SEED).unwrap();

    assert_eq!(replayed.regions, live.regions);
    assert_eq!(replayed.active_region, live.active_region);
    assert_eq!(replayed.active_label, live.active_label);
    assert_eq!(replayed.labels, live.labels);
    assert_eq!(replayed.colors, live.colors);
    assert_eq!(replayed.zoom, live.zoom);
    assert_eq!(replayed.time, live.time);
    assert_eq!(live.regions.len(), 6);
}

#[test]
fn test_log_has_one_line_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let mut widget = AnnotationWidget::new(HeadlessEngine::new(), settings(), state_with_regions(Vec::new()))
        .with_log(InteractionLog::open(&path).unwrap());
    widget.attach().unwrap();
    widget.handle_key(&KeyPress::new("ArrowUp")).unwrap();
    // unbound keys are not inputs
    widget.handle_key(&KeyPress::new("F1")).unwrap();
    drop(widget);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    // header, init, the attach zoom echo, key, then its zoom echo
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("session_start"));
    assert!(lines[1].contains(r#""source":"init""#));
    assert!(lines[2].contains(r#""source":"engine""#));
    assert!(lines[3].contains(r#""source":"key""#));
    assert!(lines[4].contains(r#""zoom":21.0"#));
}

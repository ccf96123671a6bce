//! Append-only JSONL log of widget inputs, for debugging and replay.
//!
//! One line per input that crossed the widget boundary: host patches, engine
//! events, key presses, command tokens and label list edits. Playback ticks
//! are high-frequency engine feedback and are not logged. The default log
//! lives at `<data dir>/wavemark/session.jsonl` and is tailable with
//! `tail -f`.
//!
//! Direct calls to the editing methods (`insert_region`, `nudge`, ...) are
//! not recorded; drive the widget through keys or command tokens when the
//! session should be replayable.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use wavemark_types::{CommandToken, EngineEvent, Field, LabelKey, StatePatch, WidgetState};

use crate::config::WidgetSettings;
use crate::engine::HeadlessEngine;
use crate::ids::RegionIdGenerator;
use crate::keys::KeyPress;
use crate::widget::AnnotationWidget;

/// Default log location.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavemark")
        .join("session.jsonl")
}

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LoggedInput {
    /// Full state when logging started.
    Init { state: WidgetState },
    Host { patch: StatePatch },
    Engine { event: EngineEvent },
    Key { press: KeyPress },
    Command { field: Field, token: CommandToken },
    SelectLabel { key: LabelKey },
    AddLabel { text: String },
    RenameLabel { key: LabelKey, text: String },
}

pub struct InteractionLog {
    writer: BufWriter<File>,
    session_start: Instant,
}

#[derive(Serialize)]
struct SessionHeader {
    event: &'static str,
    epoch_ms: u128,
    pid: u32,
}

#[derive(Serialize)]
struct LogEntry<'a> {
    t_ms: u128,
    input: &'a LoggedInput,
}

#[derive(Deserialize)]
struct ReplayEntry {
    #[allow(dead_code)]
    t_ms: Option<u128>,
    input: Option<LoggedInput>,
    // session headers have `event` instead of `input`
    #[allow(dead_code)]
    event: Option<String>,
}

impl InteractionLog {
    /// Open `path` for appending, creating parent directories. Returns `None`
    /// when the file cannot be opened; logging is best-effort.
    pub fn open(path: &Path) -> Option<Self> {
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!(target: "interaction_log", "cannot create {}: {}", dir.display(), e);
                return None;
            }
        }
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!(target: "interaction_log", "cannot open {}: {}", path.display(), e);
                return None;
            }
        };
        let mut writer = BufWriter::new(file);

        let header = SessionHeader {
            event: "session_start",
            epoch_ms: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            pid: std::process::id(),
        };
        if let Ok(json) = serde_json::to_string(&header) {
            let _ = writeln!(writer, "{}", json);
            let _ = writer.flush();
        }

        Some(Self {
            writer,
            session_start: Instant::now(),
        })
    }

    /// Open the default session log.
    pub fn session() -> Option<Self> {
        Self::open(&default_log_path())
    }

    pub fn record(&mut self, input: &LoggedInput) {
        if matches!(input, LoggedInput::Engine { event } if event.is_tick()) {
            return;
        }
        let entry = LogEntry {
            t_ms: self.session_start.elapsed().as_millis(),
            input,
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = writeln!(self.writer, "{}", json);
            let _ = self.writer.flush();
        }
    }
}

/// Error type for log replay.
#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ReplayError {}

fn replay_widget(
    settings: &WidgetSettings,
    state: WidgetState,
    seed: u64,
) -> AnnotationWidget<HeadlessEngine> {
    let mut widget = AnnotationWidget::new(HeadlessEngine::new(), settings.clone(), state)
        .with_ids(RegionIdGenerator::seeded(seed));
    if let Err(e) = widget.attach() {
        log::warn!(target: "replay", "attach failed: {}", e);
    }
    widget
}

/// Replay a session log against a headless engine and return the final
/// shared state.
///
/// Region ids generated during replay come from `seed`; a session recorded
/// with `RegionIdGenerator::seeded(seed)` replays to identical ids. Handler
/// errors are logged and replay continues; session headers and unparseable
/// lines are skipped.
pub fn replay(path: &Path, settings: &WidgetSettings, seed: u64) -> Result<WidgetState, ReplayError> {
    let mut widget = replay_widget(settings, settings.initial_state(), seed);
    let file = File::open(path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ReplayEntry = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(_) => continue,
        };
        let Some(input) = entry.input else {
            continue;
        };
        let result = match input {
            LoggedInput::Init { state } => {
                widget = replay_widget(settings, state, seed);
                Ok(())
            }
            LoggedInput::Host { patch } => widget.handle_remote_patch(&patch),
            LoggedInput::Engine { event } => {
                if event.is_tick() {
                    continue;
                }
                widget.engine_mut().apply_external(&event);
                widget.handle_engine_event(event)
            }
            LoggedInput::Key { press } => widget.handle_key(&press),
            LoggedInput::Command { field, token } => widget.send_command(field, token),
            LoggedInput::SelectLabel { key } => widget.select_label(key),
            LoggedInput::AddLabel { text } => widget.add_label(&text).map(|_| ()),
            LoggedInput::RenameLabel { key, text } => widget.rename_label(&key, &text),
        };
        if let Err(e) = result {
            log::warn!(target: "replay", "{}", e);
        }
    }
    Ok(widget.state().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn replay_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        File::create(&path).unwrap();

        let state = replay(&path, &WidgetSettings::default(), 0).unwrap();
        assert!(state.regions.is_empty());
        assert_eq!(state.zoom, WidgetSettings::default().initial_zoom);
    }

    #[test]
    fn replay_with_session_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"event":"session_start","epoch_ms":1739290222000,"pid":12345}}"#
        )
        .unwrap();

        let state = replay(&path, &WidgetSettings::default(), 0).unwrap();
        assert!(state.regions.is_empty());
    }

    #[test]
    fn replay_host_patch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"t_ms":5,"input":{{"source":"host","patch":{{"regions":[{{"id":"r1","start":1.0,"end":2.0,"label":0}}]}}}}}}"#
        )
        .unwrap();

        let state = replay(&path, &WidgetSettings::default(), 0).unwrap();
        assert_eq!(state.regions.len(), 1);
        assert_eq!(state.regions[0].label.as_str(), "0");
        // unknown label keys register themselves
        assert!(state.labels.contains_key(&LabelKey::new("0")));
    }

    #[test]
    fn replay_skips_unparseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_lines.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "not valid json at all").unwrap();
        writeln!(f).unwrap();
        writeln!(
            f,
            r#"{{"t_ms":100,"input":{{"source":"add_label","text":"speaker"}}}}"#
        )
        .unwrap();

        let state = replay(&path, &WidgetSettings::default(), 0).unwrap();
        assert_eq!(state.labels.get(&LabelKey::new("a")).map(String::as_str), Some("speaker"));
    }

    #[test]
    fn ticks_are_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.jsonl");
        let mut log = InteractionLog::open(&path).unwrap();
        log.record(&LoggedInput::Engine {
            event: EngineEvent::Tick { time: 1.0 },
        });
        log.record(&LoggedInput::Engine {
            event: EngineEvent::Finished,
        });
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("session_start"));
        assert!(lines[1].contains("finished"));
    }
}

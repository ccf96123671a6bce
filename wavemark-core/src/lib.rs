//! # wavemark-core
//!
//! Sync engine for an audio-annotation widget. Keeps a host-persisted state
//! (regions, labels, selection, playback) and an interactive waveform
//! renderer in step, in both directions, without echo loops.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wavemark_core::config::Config;
//! use wavemark_core::engine::HeadlessEngine;
//! use wavemark_core::widget::AnnotationWidget;
//!
//! // 1. Resolve settings (embedded defaults + user config)
//! let settings = Config::load().settings();
//!
//! // 2. Build the widget around an engine and push the initial state into it
//! let state = settings.initial_state();
//! let mut widget = AnnotationWidget::new(HeadlessEngine::new(), settings, state);
//! widget.attach()?;
//!
//! // 3. Feed host changes and engine events
//! widget.handle_remote_patch(&patch)?;
//! widget.pump_engine_events()?;
//!
//! // 4. Send the resulting commits back to the host
//! for commit in widget.drain_commits() { /* ... */ }
//! ```
//!
//! ## Module Overview
//!
//! - [`widget`]: `AnnotationWidget` with its observers, engine event handlers, commands
//! - [`model`]: `SharedModel`, the state store with pending writes and a commit outbox
//! - [`engine`]: `WaveformEngine` trait and the in-memory `HeadlessEngine`
//! - [`adapter`]: engine regions <-> state regions
//! - [`guard`]: `SyncGuard` reentrancy state machine
//! - [`selection`], [`projector`], [`playback`], [`relay`]: the sync rules
//! - [`editing`], [`keys`], [`labels`]: region editing, shortcuts, label registry
//! - [`rttm`]: RTTM speaker-turn import/export
//! - [`audio`]: data-URL audio payloads
//! - [`interaction_log`]: JSONL session log and replay
//! - [`config`]: TOML configuration (embedded + user override)

pub mod adapter;
pub mod audio;
pub mod config;
pub mod editing;
pub mod engine;
pub mod error;
pub mod guard;
pub mod ids;
pub mod interaction_log;
pub mod keys;
pub mod labels;
pub mod model;
pub mod playback;
pub mod projector;
pub mod relay;
pub mod rttm;
pub mod selection;
pub mod widget;

pub use error::{WidgetError, WidgetResult};
pub use widget::AnnotationWidget;

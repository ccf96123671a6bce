//! State -> engine rules for transport and zoom.
//!
//! Each function returns whether it touched the engine. None of them act when
//! the engine already matches, so an engine event that writes back the value
//! it just reported ends the loop.

use crate::engine::WaveformEngine;

pub fn apply_playing<E: WaveformEngine + ?Sized>(engine: &mut E, playing: bool) -> bool {
    if engine.is_playing() == playing {
        return false;
    }
    if playing {
        engine.play();
    } else {
        engine.pause();
    }
    true
}

/// Seek to `time` unless playback owns the cursor or the engine is already
/// within `epsilon` of it.
pub fn apply_time<E: WaveformEngine + ?Sized>(
    engine: &mut E,
    time: f64,
    playing: bool,
    epsilon: f64,
) -> bool {
    if playing {
        return false;
    }
    if (engine.current_time() - time).abs() <= epsilon {
        return false;
    }
    engine.seek(time);
    true
}

pub fn apply_zoom<E: WaveformEngine + ?Sized>(engine: &mut E, zoom: f64) -> bool {
    if engine.zoom_level() == zoom {
        return false;
    }
    engine.zoom(zoom);
    true
}

/// Zoom after one zoom-in (`direction > 0`) or zoom-out step. Never below
/// one pixel per second.
pub fn stepped_zoom(zoom: f64, direction: i8, step: f64) -> f64 {
    (zoom + f64::from(direction.signum()) * step).max(1.0)
}

//! Reentrancy guard for the two sync directions.
//!
//! Pushing state regions into the engine makes the engine report a
//! region-created event per region; writing engine regions into state makes
//! the regions observer fire. `SyncGuard` tracks which of the two is in
//! progress so each side can recognise its own echo and ignore it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    /// State regions are being pushed into the engine.
    ApplyingExternal,
    /// Engine-derived regions are being written into state.
    PropagatingLocal,
}

/// A phase transition other than `Idle -> X` or `X -> Idle` was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardError {
    pub current: SyncPhase,
    pub requested: SyncPhase,
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sync guard busy: cannot move from {:?} to {:?}",
            self.current, self.requested
        )
    }
}

impl std::error::Error for GuardError {}

#[derive(Debug, Default)]
pub struct SyncGuard {
    phase: SyncPhase,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SyncPhase::Idle
    }

    /// Leave `Idle` for `phase`.
    pub fn enter(&mut self, phase: SyncPhase) -> Result<(), GuardError> {
        if self.phase != SyncPhase::Idle || phase == SyncPhase::Idle {
            let err = GuardError {
                current: self.phase,
                requested: phase,
            };
            log::warn!(target: "sync", "{}", err);
            return Err(err);
        }
        log::trace!(target: "sync", "enter {:?}", phase);
        self.phase = phase;
        Ok(())
    }

    /// Return to `Idle` from `phase`.
    pub fn exit(&mut self, phase: SyncPhase) -> Result<(), GuardError> {
        if self.phase != phase {
            let err = GuardError {
                current: self.phase,
                requested: SyncPhase::Idle,
            };
            log::warn!(target: "sync", "{}", err);
            return Err(err);
        }
        log::trace!(target: "sync", "exit {:?}", phase);
        self.phase = SyncPhase::Idle;
        Ok(())
    }

    /// Region events from the engine are artifacts of a bulk rebuild.
    pub fn applying_external_update(&self) -> bool {
        self.phase == SyncPhase::ApplyingExternal
    }

    /// Region writes to state came from the engine and must not be pushed back.
    pub fn echo_suppressed(&self) -> bool {
        self.phase == SyncPhase::PropagatingLocal
    }
}

use std::fmt;

use crate::audio::AudioPayloadError;
use crate::engine::EngineError;
use crate::guard::GuardError;

pub type WidgetResult<T = ()> = Result<T, WidgetError>;

/// Failure surfaced to the host by a widget handler.
#[derive(Debug)]
pub enum WidgetError {
    /// The audio field did not hold a decodable data URL.
    Audio(AudioPayloadError),
    Engine(EngineError),
    /// A command token outside the known command set.
    UnknownCommand(String),
    Guard(GuardError),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Audio(e) => write!(f, "{}", e),
            WidgetError::Engine(e) => write!(f, "engine error: {}", e),
            WidgetError::UnknownCommand(token) => write!(f, "unknown command: {:?}", token),
            WidgetError::Guard(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Audio(e) => Some(e),
            WidgetError::Engine(e) => Some(e),
            WidgetError::Guard(e) => Some(e),
            WidgetError::UnknownCommand(_) => None,
        }
    }
}

impl From<AudioPayloadError> for WidgetError {
    fn from(e: AudioPayloadError) -> Self {
        WidgetError::Audio(e)
    }
}

impl From<EngineError> for WidgetError {
    fn from(e: EngineError) -> Self {
        WidgetError::Engine(e)
    }
}

impl From<GuardError> for WidgetError {
    fn from(e: GuardError) -> Self {
        WidgetError::Guard(e)
    }
}

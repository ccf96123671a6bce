//! One-shot command tokens written by a control surface.

use serde::{Deserialize, Serialize};

/// Value of a command field. `None` is the neutral token the relay resets to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandToken {
    #[default]
    None,
    FastBackward,
    Backward,
    Play,
    Forward,
    FastForward,
    ZoomIn,
    ZoomOut,
    InsertRegion,
    CutRegion,
    DeleteRegion,
}

impl CommandToken {
    pub fn is_neutral(&self) -> bool {
        matches!(self, CommandToken::None)
    }

    /// The command carried by this token, if it is not neutral.
    pub fn command(&self) -> Option<Command> {
        match self {
            CommandToken::None => None,
            CommandToken::FastBackward => Some(Command::FastBackward),
            CommandToken::Backward => Some(Command::Backward),
            CommandToken::Play => Some(Command::Play),
            CommandToken::Forward => Some(Command::Forward),
            CommandToken::FastForward => Some(Command::FastForward),
            CommandToken::ZoomIn => Some(Command::ZoomIn),
            CommandToken::ZoomOut => Some(Command::ZoomOut),
            CommandToken::InsertRegion => Some(Command::InsertRegion),
            CommandToken::CutRegion => Some(Command::CutRegion),
            CommandToken::DeleteRegion => Some(Command::DeleteRegion),
        }
    }

    /// Parse a wire token. Accepts the short control-bar spellings
    /// (`insert`, `cut`, `delete`) as well.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "none" | "" => Some(CommandToken::None),
            "fast_backward" => Some(CommandToken::FastBackward),
            "backward" => Some(CommandToken::Backward),
            "play" => Some(CommandToken::Play),
            "forward" => Some(CommandToken::Forward),
            "fast_forward" => Some(CommandToken::FastForward),
            "zoom_in" => Some(CommandToken::ZoomIn),
            "zoom_out" => Some(CommandToken::ZoomOut),
            "insert_region" | "insert" => Some(CommandToken::InsertRegion),
            "cut_region" | "cut" => Some(CommandToken::CutRegion),
            "delete_region" | "delete" => Some(CommandToken::DeleteRegion),
            _ => None,
        }
    }
}

impl From<Command> for CommandToken {
    fn from(command: Command) -> Self {
        match command {
            Command::FastBackward => CommandToken::FastBackward,
            Command::Backward => CommandToken::Backward,
            Command::Play => CommandToken::Play,
            Command::Forward => CommandToken::Forward,
            Command::FastForward => CommandToken::FastForward,
            Command::ZoomIn => CommandToken::ZoomIn,
            Command::ZoomOut => CommandToken::ZoomOut,
            Command::InsertRegion => CommandToken::InsertRegion,
            Command::CutRegion => CommandToken::CutRegion,
            Command::DeleteRegion => CommandToken::DeleteRegion,
        }
    }
}

/// The ten control-surface commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    FastBackward,
    Backward,
    Play,
    Forward,
    FastForward,
    ZoomIn,
    ZoomOut,
    InsertRegion,
    CutRegion,
    DeleteRegion,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::FastBackward,
        Command::Backward,
        Command::Play,
        Command::Forward,
        Command::FastForward,
        Command::ZoomIn,
        Command::ZoomOut,
        Command::InsertRegion,
        Command::CutRegion,
        Command::DeleteRegion,
    ];

    /// The single action this command performs.
    pub fn action(&self) -> CommandAction {
        match self {
            Command::FastBackward => CommandAction::Nudge { direction: -1, fast: true },
            Command::Backward => CommandAction::Nudge { direction: -1, fast: false },
            Command::Play => CommandAction::TogglePlaying,
            Command::Forward => CommandAction::Nudge { direction: 1, fast: false },
            Command::FastForward => CommandAction::Nudge { direction: 1, fast: true },
            Command::ZoomIn => CommandAction::Zoom { direction: 1 },
            Command::ZoomOut => CommandAction::Zoom { direction: -1 },
            Command::InsertRegion => CommandAction::InsertRegion,
            Command::CutRegion => CommandAction::CutRegion,
            Command::DeleteRegion => CommandAction::DeleteRegion,
        }
    }
}

/// What the relay does for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    /// Move the active region's start (slow) or end (fast), or the cursor
    /// when nothing is selected.
    Nudge { direction: i8, fast: bool },
    TogglePlaying,
    Zoom { direction: i8 },
    InsertRegion,
    CutRegion,
    DeleteRegion,
}

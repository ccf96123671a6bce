//! Keyboard shortcuts.
//!
//! | key | action |
//! |---|---|
//! | space | toggle playback |
//! | Tab / Shift+Tab | select next / previous region |
//! | Escape | clear selection |
//! | a-z | select label (relabels the active region) |
//! | Left / Right | nudge start, or the cursor; Alt moves the end, Shift the fast step |
//! | Up / Down | zoom in / out |
//! | Delete / Backspace | delete active region, select next / previous |
//! | Enter / Shift+Enter | insert region / cut active region |

use serde::{Deserialize, Serialize};

use wavemark_types::LabelKey;

use crate::editing::Edge;

/// A key event as a browser reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    #[serde(default, rename = "shiftKey")]
    pub shift: bool,
    #[serde(default, rename = "altKey")]
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
            alt: false,
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    TogglePlaying,
    Navigate { direction: i8 },
    ClearSelection,
    SelectLabel(LabelKey),
    Nudge { direction: i8, fast: bool, edge: Edge },
    Zoom { direction: i8 },
    Delete { direction: i8 },
    Insert,
    Cut,
}

pub fn action_for(press: &KeyPress) -> Option<KeyAction> {
    let action = match press.key.as_str() {
        " " => KeyAction::TogglePlaying,
        "Tab" => KeyAction::Navigate {
            direction: if press.shift { -1 } else { 1 },
        },
        "Escape" => KeyAction::ClearSelection,
        "ArrowLeft" | "ArrowRight" => KeyAction::Nudge {
            direction: if press.key == "ArrowLeft" { -1 } else { 1 },
            fast: press.shift,
            edge: if press.alt { Edge::End } else { Edge::Start },
        },
        "ArrowUp" => KeyAction::Zoom { direction: 1 },
        "ArrowDown" => KeyAction::Zoom { direction: -1 },
        "Backspace" => KeyAction::Delete { direction: -1 },
        "Delete" => KeyAction::Delete { direction: 1 },
        "Enter" if press.shift => KeyAction::Cut,
        "Enter" => KeyAction::Insert,
        key => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_lowercase() => {
                    KeyAction::SelectLabel(LabelKey::new(c.to_string()))
                }
                _ => return None,
            }
        }
    };
    Some(action)
}

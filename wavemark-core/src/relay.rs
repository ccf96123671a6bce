//! Edge-triggered command relay.
//!
//! A control surface requests an action by writing a command token into
//! `play_command` or `control_bar`. The relay takes the token, resets the
//! field to neutral and hands the command back for execution; the reset is
//! committed in the same turn, so re-sending the same command is again a
//! change the widget sees.

use wavemark_types::{Command, CommandToken, Field};

use crate::model::SharedModel;

/// The two fields commands arrive on.
pub const COMMAND_FIELDS: [Field; 2] = [Field::PlayCommand, Field::ControlBar];

/// Take the pending command on `field`, leaving the neutral token behind
/// (pending, not yet committed).
pub fn take_command(model: &mut SharedModel, field: Field) -> Option<Command> {
    let token = model.command(field);
    let command = token.command()?;
    model.set_command(field, CommandToken::None);
    log::debug!(target: "relay", "{} -> {:?}", field.as_str(), command);
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets_to_neutral() {
        let mut model = SharedModel::default();
        model.set_command(Field::PlayCommand, CommandToken::ZoomIn);
        model.touch();

        assert_eq!(take_command(&mut model, Field::PlayCommand), Some(Command::ZoomIn));
        assert_eq!(model.command(Field::PlayCommand), CommandToken::None);
        assert!(model.has_pending());
        assert_eq!(take_command(&mut model, Field::PlayCommand), None);
    }

    #[test]
    fn neutral_token_is_a_no_op() {
        let mut model = SharedModel::default();
        assert_eq!(take_command(&mut model, Field::ControlBar), None);
        assert!(!model.has_pending());
    }
}

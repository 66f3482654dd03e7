use tracing::{error, warn};

use super::{Chapter, ChapterError};
use crate::app::events::ChapterCommand;

/// Handlers may queue commands while commands are being applied; a chain
/// longer than this is left for the next tick.
const MAX_COMMAND_ROUNDS: usize = 8;

impl Chapter {
    pub(super) fn apply_commands(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            let commands = self.events.take_commands();
            if commands.is_empty() {
                return;
            }
            for command in commands {
                let name = command.name();
                if let Err(error) = self.apply_command(command) {
                    error!(command = name, %error, "command_rejected");
                }
            }
        }
        if self.events.has_pending_commands() {
            warn!(rounds = MAX_COMMAND_ROUNDS, "command_rounds_exhausted");
        }
    }

    /// Applies one behavior-layer request immediately.
    pub fn apply_command(&mut self, command: ChapterCommand) -> Result<(), ChapterError> {
        match command {
            ChapterCommand::JumpTo {
                destination,
                fade_seconds,
            } => self.jump_to(destination, fade_seconds),
            ChapterCommand::AddItem { item } => self.add_item(item).map(|_| ()),
            ChapterCommand::RemoveItem { item } => self.remove_item(item),
            ChapterCommand::DropCarriedItem => {
                self.drop_carried_item();
                Ok(())
            }
            ChapterCommand::SetInteractableActive { target, active } => {
                self.set_interactable_active(target, active)
            }
            ChapterCommand::ShowDescription { text } => {
                self.show_description(&text);
                Ok(())
            }
            ChapterCommand::ShakeLocation {
                location,
                vertical,
                horizontal,
                duration_seconds,
            } => self.shake_location(location, vertical, horizontal, duration_seconds),
            ChapterCommand::ChangeBackground {
                location,
                background,
            } => self.change_background(location, &background),
            ChapterCommand::UpdateItem { item, update } => self.update_item(item, update),
            ChapterCommand::PlayCutscene { cutscene } => self.play_cutscene(&cutscene),
            ChapterCommand::CutsceneLoaded => self.cutscene_loaded(),
            ChapterCommand::EndCutscene => self.end_cutscene(),
            ChapterCommand::SetReceivingInputs { receive } => {
                self.set_receiving_inputs(receive);
                Ok(())
            }
        }
    }
}

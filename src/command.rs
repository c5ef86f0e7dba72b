/// Input commands understood by the navigation engine. Keys map to these
/// through the `[keys]` table in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
  MoveUp,
  MoveDown,
  NextPane,
  PreviousPane,
  Activate,
  Backspace,
  TypeChar(char),
  Escape,
  Quit,
  Rename,
  Move,
  Copy,
  Delete,
  RunCommand,
  None,
}

impl Command {
  pub fn from_name(name: &str) -> Option<Command> {
    match name {
      "move_up" => Some(Command::MoveUp),
      "move_down" => Some(Command::MoveDown),
      "next_pane" => Some(Command::NextPane),
      "previous_pane" => Some(Command::PreviousPane),
      "activate" => Some(Command::Activate),
      "backspace" => Some(Command::Backspace),
      "escape" => Some(Command::Escape),
      "quit" => Some(Command::Quit),
      "rename" => Some(Command::Rename),
      "move" => Some(Command::Move),
      "copy" => Some(Command::Copy),
      "delete" => Some(Command::Delete),
      "run_command" => Some(Command::RunCommand),
      "none" => Some(Command::None),
      _ => None,
    }
  }
}

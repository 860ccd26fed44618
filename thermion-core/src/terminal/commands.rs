//! Terminal command table
//!
//! A command is selected by its first word: the word must be a
//! case-insensitive prefix of the command name, and the first entry in
//! table order wins. So `s` selects `stop`, `sh` selects `show` and `sa`
//! selects `save`.

use super::editor::ProtocolError;

/// Commands understood by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Help,
    Info,
    Run,
    Stop,
    Default,
    Show,
    Load,
    Save,
    Set,
}

/// Command table in match order
pub const COMMANDS: [(&str, Command, &str); 9] = [
    ("help", Command::Help, "List commands"),
    ("info", Command::Info, "Show readings and loop state"),
    ("run", Command::Run, "Start the control loop"),
    ("stop", Command::Stop, "Stop the control loop, heater off"),
    ("default", Command::Default, "Restore the default profile"),
    ("show", Command::Show, "Print the profile"),
    ("load", Command::Load, "Load the profile from flash"),
    ("save", Command::Save, "Save the profile to flash"),
    ("set", Command::Set, "set <key> <value>"),
];

/// Resolve a completed line against the command table
///
/// Only the first word selects; anything after it is ignored.
pub fn parse(line: &[u8]) -> Result<Command, ProtocolError> {
    let word = match line.iter().position(|&b| b == b' ') {
        Some(idx) => &line[..idx],
        None => line,
    };

    if word.is_empty() {
        return Err(ProtocolError::UnknownCommand);
    }

    COMMANDS
        .iter()
        .find(|(name, _, _)| is_prefix_ignore_case(word, name.as_bytes()))
        .map(|&(_, command, _)| command)
        .ok_or(ProtocolError::UnknownCommand)
}

fn is_prefix_ignore_case(word: &[u8], name: &[u8]) -> bool {
    word.len() <= name.len() && word.eq_ignore_ascii_case(&name[..word.len()])
}

//! Command module
//!
//! Turns one line of player input into a tagged [`Command`]. Input is only
//! ever matched against the legal command set computed for the current turn.

use crate::error::EngineError;

use std::collections::BTreeSet;
use std::fmt::Display;

pub const PICK_UP_PREFIX: &str = "pick up: ";
pub const DROP_PREFIX: &str = "drop: ";
pub const HOLD_PREFIX: &str = "hold: ";

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A location command that leads somewhere.
    Move(String),
    PickUp(String),
    Drop(String),
    Hold(String),
    Menu(MenuCommand),
    /// A location command bound to a script.
    Scripted(String),
}

/// Cost-free commands available everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, variantly::Variantly)]
pub enum MenuCommand {
    Look,
    Inventory,
    Score,
    Undo,
    Log,
    Quit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 6] = [
        MenuCommand::Look,
        MenuCommand::Inventory,
        MenuCommand::Score,
        MenuCommand::Undo,
        MenuCommand::Log,
        MenuCommand::Quit,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            MenuCommand::Look => "look",
            MenuCommand::Inventory => "inventory",
            MenuCommand::Score => "score",
            MenuCommand::Undo => "undo",
            MenuCommand::Log => "log",
            MenuCommand::Quit => "quit",
        }
    }

    pub fn from_keyword(word: &str) -> Option<MenuCommand> {
        MenuCommand::ALL.into_iter().find(|menu| menu.keyword() == word)
    }
}

impl Display for MenuCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The commands a player may enter on this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalCommands {
    /// Keys of the current location's command map.
    pub location: Vec<String>,
    /// Location commands that run a script instead of moving.
    pub scripted: BTreeSet<String>,
    /// Items lying at the current location.
    pub pick_up: Vec<String>,
    /// Inventory items, in pick-up order.
    pub drop: Vec<String>,
    /// Inventory items other than the one already held.
    pub hold: Vec<String>,
}

impl LegalCommands {
    /// Every legal input, in the order they are offered to the player.
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = MenuCommand::ALL.iter().map(|menu| menu.keyword().to_string()).collect();
        entries.extend(
            self.location
                .iter()
                .filter(|cmd| MenuCommand::from_keyword(cmd).is_none())
                .cloned(),
        );
        entries.extend(self.pick_up.iter().map(|item| format!("{PICK_UP_PREFIX}{item}")));
        entries.extend(self.drop.iter().map(|item| format!("{DROP_PREFIX}{item}")));
        entries.extend(self.hold.iter().map(|item| format!("{HOLD_PREFIX}{item}")));
        entries
    }

    pub fn contains(&self, input: &str) -> bool {
        parse_command(input, self).is_ok()
    }
}

/// Case-fold and trim raw input.
pub fn normalize_input(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classify normalized input against the legal set.
///
/// Menu keywords take precedence over a location command of the same name.
///
/// # Errors
/// - `InvalidCommand` if the input is not in the legal set
pub fn parse_command(input: &str, legal: &LegalCommands) -> Result<Command, EngineError> {
    let invalid = || EngineError::InvalidCommand(input.to_string());
    if let Some(menu) = MenuCommand::from_keyword(input) {
        return Ok(Command::Menu(menu));
    }
    let listed = |names: &[String], item: &str| names.iter().any(|name| name == item);
    if let Some(item) = input.strip_prefix(PICK_UP_PREFIX) {
        return listed(&legal.pick_up, item)
            .then(|| Command::PickUp(item.to_string()))
            .ok_or_else(invalid);
    }
    if let Some(item) = input.strip_prefix(DROP_PREFIX) {
        return listed(&legal.drop, item)
            .then(|| Command::Drop(item.to_string()))
            .ok_or_else(invalid);
    }
    if let Some(item) = input.strip_prefix(HOLD_PREFIX) {
        return listed(&legal.hold, item)
            .then(|| Command::Hold(item.to_string()))
            .ok_or_else(invalid);
    }
    if legal.location.iter().any(|cmd| cmd == input) {
        if legal.scripted.contains(input) {
            return Ok(Command::Scripted(input.to_string()));
        }
        return Ok(Command::Move(input.to_string()));
    }
    Err(invalid())
}

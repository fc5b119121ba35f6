//! Transition records.
//!
//! One `Event` is produced for every world-affecting turn. Besides what the
//! player sees (location, description, command, item) it carries an `Effect`
//! holding the exact pre-turn facts needed to reverse the turn, so undo never
//! has to look at neighbouring records.

use crate::world::{Container, LocationId};

use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Description used for every scripted turn.
pub const SCRIPTED_DESCRIPTION: &str = "Completed special event";

/// Immutable record of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Where the player ended the turn.
    pub location: LocationId,
    pub description: String,
    /// Absent only on the synthetic start record.
    pub command: Option<String>,
    /// The item involved in an item turn.
    pub item: Option<String>,
    pub effect: Effect,
}

/// What a turn changed, with enough detail to put it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The seed record.
    Start,
    Move {
        from: LocationId,
        /// Points paid for a first visit, if this was one.
        first_visit_points: Option<usize>,
    },
    PickUp {
        from: LocationId,
    },
    Drop {
        to: LocationId,
        was_held: bool,
        /// Delivery award paid by this drop.
        delivery_points: Option<usize>,
    },
    Hold {
        /// Item that occupied the held slot before.
        previous: Option<String>,
    },
    Scripted(ScriptDelta),
}

/// Everything a scripted command changed, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDelta {
    pub reversible: bool,
    pub changes: Vec<Change>,
}

/// A single reversible mutation made by a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Variantly)]
pub enum Change {
    /// Score change actually applied (after flooring).
    Score(isize),
    Moves(u32),
    CommandAdded {
        location: LocationId,
        command: String,
        replaced: Option<LocationId>,
    },
    CommandRemoved {
        location: LocationId,
        command: String,
        destination: LocationId,
    },
    ItemMoved {
        item: String,
        from: Container,
        to: Container,
    },
    Relocated {
        from: LocationId,
        to: LocationId,
        first_visit_points: Option<usize>,
    },
    Victory,
}

impl Event {
    /// The synthetic first record of a session.
    pub fn start(location: LocationId, description: impl Into<String>) -> Event {
        Event {
            location,
            description: description.into(),
            command: None,
            item: None,
            effect: Effect::Start,
        }
    }

    /// True for turns that moved an item between containers or the held slot.
    pub fn is_item_turn(&self) -> bool {
        self.item.is_some()
    }

    /// Description of a scripted turn for a command.
    pub fn scripted_description(command: &str) -> String {
        format!("{SCRIPTED_DESCRIPTION} '{command}'")
    }
}

impl Effect {
    pub fn is_start(&self) -> bool {
        matches!(self, Effect::Start)
    }
}

impl ScriptDelta {
    pub fn new(reversible: bool) -> ScriptDelta {
        ScriptDelta {
            reversible,
            changes: Vec::new(),
        }
    }

    pub fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Net score change of the script.
    pub fn score(&self) -> isize {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Score(amount) => Some(*amount),
                Change::Relocated {
                    first_visit_points: Some(points),
                    ..
                } => Some(points.cast_signed()),
                _ => None,
            })
            .sum()
    }

    /// Whether the script ended the session in victory.
    pub fn is_victory(&self) -> bool {
        self.changes.iter().any(Change::is_victory)
    }
}

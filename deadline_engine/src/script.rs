//! Scripted commands.
//!
//! A script binds bespoke behavior to one command at one location: dialogue that
//! reveals a path, a purchase, a minigame, the final submission. Actions run in
//! declaration order and each one records exactly what it changed.

use crate::world::LocationId;

use deadline_data::{MinigameDef, ScriptActionDef, ScriptDef};
use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Runtime form of a scripted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub location: LocationId,
    pub command: String,
    /// Narrative shown when the script runs.
    pub text: String,
    /// Items that must be in the inventory for the script to run.
    pub requires: Vec<String>,
    pub denied_message: String,
    /// False if undo must refuse to revert this script.
    pub reversible: bool,
    pub actions: Vec<ScriptAction>,
}

/// One effect of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Variantly)]
pub enum ScriptAction {
    AwardPoints(isize),
    AddMoves(u32),
    AddCommand {
        location: LocationId,
        command: String,
        destination: LocationId,
    },
    RemoveCommand {
        location: LocationId,
        command: String,
    },
    GiveItem(String),
    PlaceItem {
        item: String,
        location: LocationId,
    },
    Teleport(Vec<LocationId>),
    Minigame {
        game: MinigameDef,
        item: String,
        points: isize,
        award_on_loss: bool,
    },
    Submit {
        items: Vec<String>,
        bonus_per_item: usize,
        refusal: String,
        victory_text: String,
    },
}

impl Script {
    /// The submission objective of this script, if it has one.
    pub fn submission(&self) -> Option<&[String]> {
        self.actions.iter().find_map(|action| match action {
            ScriptAction::Submit { items, .. } => Some(items.as_slice()),
            _ => None,
        })
    }

    /// Largest score this script can ever add.
    pub fn max_award(&self) -> usize {
        self.actions
            .iter()
            .map(|action| match action {
                ScriptAction::AwardPoints(amount) | ScriptAction::Minigame { points: amount, .. } => {
                    usize::try_from(*amount).unwrap_or(0)
                },
                ScriptAction::Submit {
                    items, bonus_per_item, ..
                } => items.len() * bonus_per_item,
                _ => 0,
            })
            .sum()
    }
}

impl From<ScriptDef> for Script {
    fn from(def: ScriptDef) -> Self {
        Script {
            location: def.location,
            command: def.command,
            text: def.text,
            requires: def.requires,
            denied_message: def
                .denied_message
                .unwrap_or_else(|| "You aren't ready to do that yet.".to_string()),
            reversible: def.reversible,
            actions: def.actions.into_iter().map(ScriptAction::from).collect(),
        }
    }
}

impl From<ScriptActionDef> for ScriptAction {
    fn from(def: ScriptActionDef) -> Self {
        match def {
            ScriptActionDef::AwardPoints { amount } => ScriptAction::AwardPoints(amount as isize),
            ScriptActionDef::AddMoves { amount } => ScriptAction::AddMoves(amount),
            ScriptActionDef::AddCommand {
                location,
                command,
                destination,
            } => ScriptAction::AddCommand {
                location,
                command,
                destination,
            },
            ScriptActionDef::RemoveCommand { location, command } => ScriptAction::RemoveCommand { location, command },
            ScriptActionDef::GiveItem { item } => ScriptAction::GiveItem(item),
            ScriptActionDef::PlaceItem { item, location } => ScriptAction::PlaceItem { item, location },
            ScriptActionDef::Teleport { destinations } => ScriptAction::Teleport(destinations),
            ScriptActionDef::Minigame {
                game,
                item,
                points,
                award_on_loss,
            } => ScriptAction::Minigame {
                game,
                item,
                points: points as isize,
                award_on_loss,
            },
            ScriptActionDef::Submit {
                items,
                bonus_per_item,
                refusal,
                victory_text,
            } => ScriptAction::Submit {
                items,
                bonus_per_item: bonus_per_item as usize,
                refusal: refusal.unwrap_or_else(|| "You don't have everything you need to submit yet.".to_string()),
                victory_text: victory_text.unwrap_or_else(|| "You made the deadline!".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit_script() -> Script {
        let def: ScriptDef = serde_json::from_str(
            r#"{
                "location": 1,
                "command": "submit work",
                "actions": [
                    { "type": "awardPoints", "amount": 5 },
                    { "type": "submit", "items": ["mug", "usb drive"], "bonus_per_item": 20 }
                ]
            }"#,
        )
        .unwrap();
        Script::from(def)
    }

    #[test]
    fn defaults_fill_in_missing_text() {
        let script = submit_script();
        assert!(script.reversible);
        assert_eq!(script.denied_message, "You aren't ready to do that yet.");
        match &script.actions[1] {
            ScriptAction::Submit { refusal, .. } => assert!(refusal.contains("submit")),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn submission_lists_required_items() {
        let script = submit_script();
        assert_eq!(
            script.submission(),
            Some(["mug".to_string(), "usb drive".to_string()].as_slice())
        );
    }

    #[test]
    fn max_award_counts_points_and_bonus() {
        assert_eq!(submit_script().max_award(), 45);
    }

    #[test]
    fn negative_awards_do_not_count_toward_max() {
        let mut script = submit_script();
        script.actions = vec![ScriptAction::AwardPoints(-10)];
        assert_eq!(script.max_award(), 0);
    }
}

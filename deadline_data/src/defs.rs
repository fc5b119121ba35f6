use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric identifier of a location, unique across the world description.
pub type LocationId = u32;

/// Top-level world description loaded by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub scripts: Vec<ScriptDef>,
}

/// A movable item. The name doubles as its identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
    pub start_position: LocationId,
    #[serde(default)]
    pub target_position: Option<LocationId>,
    #[serde(default)]
    pub target_points: u32,
}

/// A node of the world graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDef {
    pub id: LocationId,
    pub name: String,
    pub brief_description: String,
    pub long_description: String,
    #[serde(default)]
    pub available_commands: BTreeMap<String, LocationId>,
    #[serde(default)]
    pub items: Vec<String>,
    /// Commands that only work while the player carries a particular item.
    #[serde(default)]
    pub gates: BTreeMap<String, GateDef>,
}

/// Requirement attached to one of a location's commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDef {
    pub requires: String,
    pub barred_message: Option<String>,
}

/// Bespoke behavior bound to a command at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDef {
    pub location: LocationId,
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub denied_message: Option<String>,
    #[serde(default = "default_reversible")]
    pub reversible: bool,
    #[serde(default)]
    pub actions: Vec<ScriptActionDef>,
}

fn default_reversible() -> bool {
    true
}

/// Effects a script may apply, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptActionDef {
    AwardPoints {
        amount: i32,
    },
    AddMoves {
        amount: u32,
    },
    AddCommand {
        location: LocationId,
        command: String,
        destination: LocationId,
    },
    RemoveCommand {
        location: LocationId,
        command: String,
    },
    GiveItem {
        item: String,
    },
    PlaceItem {
        item: String,
        location: LocationId,
    },
    Teleport {
        #[serde(default)]
        destinations: Vec<LocationId>,
    },
    Minigame {
        game: MinigameDef,
        item: String,
        #[serde(default)]
        points: i32,
        #[serde(default)]
        award_on_loss: bool,
    },
    Submit {
        items: Vec<String>,
        #[serde(default)]
        bonus_per_item: u32,
        #[serde(default)]
        refusal: Option<String>,
        #[serde(default)]
        victory_text: Option<String>,
    },
}

/// Minigame flavors the engine knows how to run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MinigameDef {
    ShufflingDrawers {
        #[serde(default = "default_drawers")]
        drawers: u32,
        #[serde(default = "default_attempts")]
        attempts: u32,
    },
    TruthfulLabels {
        labels: Vec<String>,
        answer: u32,
    },
}

fn default_drawers() -> u32 {
    3
}

fn default_attempts() -> u32 {
    3
}

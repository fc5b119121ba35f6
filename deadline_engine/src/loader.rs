//! Loader utilities for building a `World` from serialized data.
//!
//! The world description is JSON (`world.json`), session tuning is TOML
//! (`session.toml`). Names and commands are case-folded on load so they match
//! normalized player input, then the description is validated as a whole
//! before any runtime structure is built.

pub mod config;

use crate::data_paths::data_path;
use crate::item::Item;
use crate::location::{Gate, Location};
use crate::script::Script;
use crate::session::Session;
use crate::world::{Container, World};

use config::{SessionConfig, load_config};

use anyhow::{Context, Result, bail};
use deadline_data::{ScriptActionDef, WorldDef};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;

pub const WORLD_FILE: &str = "world.json";
pub const CONFIG_FILE: &str = "session.toml";

/// Load a `WorldDef` from a JSON file.
///
/// # Errors
/// - file can't be read or isn't a valid world description
pub fn load_world_def(path: &Path) -> Result<WorldDef> {
    let text = fs::read_to_string(path).with_context(|| format!("reading world from '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing world JSON from '{}'", path.display()))
}

/// Load, normalize, validate and build the world at `path`.
///
/// # Errors
/// - IO and parse failures, or every integrity problem found in the description
pub fn load_world(path: &Path) -> Result<World> {
    let mut def = load_world_def(path)?;
    normalize(&mut def);
    validate_worlddef(&def)?;
    let world = build_world(def).context("while building world from description")?;
    info!("{} locations added to World", world.locations.len());
    info!("{} items added to World", world.items.len());
    info!("{} scripts added to World", world.scripts.len());
    Ok(world)
}

/// Load a world and config and start a session. A `seed` makes minigames repeatable.
///
/// Missing paths default to the files in the data directory.
///
/// # Errors
/// - the world can't be loaded, or the configured start location doesn't exist
pub fn load_session(world_path: Option<&Path>, config_path: Option<&Path>, seed: Option<u64>) -> Result<Session> {
    let world_path = world_path.map_or_else(|| data_path(WORLD_FILE), Path::to_path_buf);
    let config_path = config_path.map_or_else(|| data_path(CONFIG_FILE), Path::to_path_buf);
    let world = load_world(&world_path)?;
    let config = load_config(&config_path);
    let rng = match seed {
        Some(seed) => {
            info!("minigame rng seeded with {seed}");
            StdRng::seed_from_u64(seed)
        },
        None => StdRng::from_os_rng(),
    };
    start_session(world, config, rng)
}

/// Start a session on an already built world.
///
/// # Errors
/// - the configured start location doesn't exist
pub fn start_session(world: World, config: SessionConfig, rng: StdRng) -> Result<Session> {
    let start = config.start_location;
    Session::new(world, config, rng).with_context(|| format!("starting session at location {start}"))
}

fn fold(text: &mut String) {
    *text = text.trim().to_lowercase();
}

/// Case-fold every name and command so they compare equal to normalized input.
pub fn normalize(def: &mut WorldDef) {
    for item in &mut def.items {
        fold(&mut item.name);
    }
    for location in &mut def.locations {
        location.available_commands = std::mem::take(&mut location.available_commands)
            .into_iter()
            .map(|(cmd, dest)| (cmd.trim().to_lowercase(), dest))
            .collect();
        location.items.iter_mut().for_each(fold);
        location.gates = std::mem::take(&mut location.gates)
            .into_iter()
            .map(|(cmd, mut gate)| {
                fold(&mut gate.requires);
                (cmd.trim().to_lowercase(), gate)
            })
            .collect();
    }
    for script in &mut def.scripts {
        fold(&mut script.command);
        script.requires.iter_mut().for_each(fold);
        for action in &mut script.actions {
            match action {
                ScriptActionDef::AddCommand { command, .. } | ScriptActionDef::RemoveCommand { command, .. } => {
                    fold(command);
                },
                ScriptActionDef::GiveItem { item }
                | ScriptActionDef::PlaceItem { item, .. }
                | ScriptActionDef::Minigame { item, .. } => fold(item),
                ScriptActionDef::Submit { items, .. } => items.iter_mut().for_each(fold),
                ScriptActionDef::AwardPoints { .. } | ScriptActionDef::AddMoves { .. } | ScriptActionDef::Teleport { .. } => {},
            }
        }
    }
}

/// Validate the world description and return a single aggregated error.
///
/// # Errors
/// - lists every `ValidationError` found
pub fn validate_worlddef(def: &WorldDef) -> Result<()> {
    let errors = deadline_data::validate_world(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("world validation failed:\n{details}");
}

/// Convert a validated `WorldDef` into a runtime `World`.
///
/// Items listed in a location start there; the rest are out of play until a
/// script brings them in.
///
/// # Errors
/// - an item is placed twice or a location list names an unknown item
pub fn build_world(def: WorldDef) -> Result<World> {
    let mut world = World::new_empty();

    for item_def in def.items {
        let item = Item {
            name: item_def.name.clone(),
            description: item_def.description,
            container: Container::Nowhere,
            start: item_def.start_position,
            target: item_def.target_position,
            target_points: item_def.target_points as usize,
            delivered: false,
            acquired: 0,
        };
        world.items.insert(item_def.name, item);
    }

    let mut placements = Vec::new();
    for loc_def in def.locations {
        placements.extend(loc_def.items.iter().map(|name| (loc_def.id, name.clone())));
        let location = Location {
            id: loc_def.id,
            name: loc_def.name,
            brief_description: loc_def.brief_description,
            long_description: loc_def.long_description,
            commands: loc_def.available_commands,
            gates: loc_def
                .gates
                .into_iter()
                .map(|(cmd, gate)| {
                    let barred_message = gate
                        .barred_message
                        .unwrap_or_else(|| format!("You can't do that without the {}.", gate.requires));
                    (
                        cmd,
                        Gate {
                            requires: gate.requires,
                            barred_message,
                        },
                    )
                })
                .collect(),
            visited: false,
        };
        world.locations.insert(location.id, location);
    }

    for (id, name) in placements {
        world
            .add_item_at(id, &name)
            .with_context(|| format!("placing '{name}' at location {id}"))?;
    }

    for script_def in def.scripts {
        let script = Script::from(script_def);
        world.scripts.insert((script.location, script.command.clone()), script);
    }
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WORLD: &str = r#"{
        "items": [
            { "name": "Mug", "description": "A travel mug.", "start_position": 2, "target_position": 1, "target_points": 5 },
            { "name": "potion", "description": "A repairing potion.", "start_position": 2 }
        ],
        "locations": [
            { "id": 1, "name": "New College", "brief_description": "New College.",
              "long_description": "The courtyard of New College.",
              "available_commands": { "Go East": 2 }, "items": [] },
            { "id": 2, "name": "Sidney Smith", "brief_description": "Sid Smith.",
              "long_description": "The long halls of Sidney Smith.",
              "available_commands": { "go west": 1, "buy potion": 2 }, "items": ["mug"],
              "gates": { "go west": { "requires": "Mug" } } }
        ],
        "scripts": [
            { "location": 2, "command": "Buy Potion", "reversible": false,
              "actions": [ { "type": "giveItem", "item": "Potion" } ] }
        ]
    }"#;

    fn write_world(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_places_items() {
        let file = write_world(WORLD);
        let world = load_world(file.path()).unwrap();
        assert_eq!(world.locations.len(), 2);
        assert_eq!(world.item("mug").unwrap().container, Container::Location(2));
        assert!(world.item("potion").unwrap().container.is_nowhere());
    }

    #[test]
    fn names_and_commands_are_case_folded() {
        let file = write_world(WORLD);
        let world = load_world(file.path()).unwrap();
        assert_eq!(world.location(1).unwrap().commands.get("go east"), Some(&2));
        assert!(world.script(2, "buy potion").is_some());
        assert_eq!(world.location(2).unwrap().gate("go west").unwrap().requires, "mug");
        assert_eq!(
            world.script(2, "buy potion").unwrap().actions[0],
            crate::script::ScriptAction::GiveItem("potion".into())
        );
    }

    #[test]
    fn gate_gets_default_barred_message() {
        let file = write_world(WORLD);
        let world = load_world(file.path()).unwrap();
        assert_eq!(
            world.location(2).unwrap().gate("go west").unwrap().barred_message,
            "You can't do that without the mug."
        );
    }

    #[test]
    fn validation_errors_are_aggregated() {
        let broken = WORLD
            .replace(r#""Go East": 2"#, r#""go east": 9"#)
            .replace(r#""start_position": 2, "target_position""#, r#""start_position": 7, "target_position""#);
        let file = write_world(&broken);
        let err = load_world(file.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("world validation failed"));
        assert!(message.matches("\n- ").count() >= 2, "{message}");
    }

    #[test]
    fn unreadable_world_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("world.json");
        let err = load_world(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("world.json"));
    }

    #[test]
    fn session_starts_from_files_with_seed() {
        let world = write_world(WORLD);
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "max_moves = 7").unwrap();
        let session = load_session(Some(world.path()), Some(config.path()), Some(1)).unwrap();
        assert_eq!(session.player.moves_remaining, 7);
        assert_eq!(session.current, 1);
    }

    #[test]
    fn bad_start_location_fails_session() {
        let world = write_world(WORLD);
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "start_location = 42").unwrap();
        assert!(load_session(Some(world.path()), Some(config.path()), Some(1)).is_err());
    }
}

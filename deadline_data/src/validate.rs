use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a `WorldDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a `WorldDef`.
///
/// ```
/// use std::collections::BTreeMap;
/// use deadline_data::{LocationDef, WorldDef, validate_world};
///
/// let world = WorldDef {
///     locations: vec![LocationDef {
///         id: 1,
///         name: "Start".into(),
///         brief_description: "A room.".into(),
///         long_description: "A plain room.".into(),
///         available_commands: BTreeMap::new(),
///         items: Vec::new(),
///         gates: BTreeMap::new(),
///     }],
///     ..WorldDef::default()
/// };
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if world.locations.is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "world has no locations".to_string(),
        });
    }

    let mut locations = HashSet::new();
    let mut items = HashSet::new();
    track_ids(
        "location",
        world.locations.iter().map(|l| l.id.to_string()),
        &mut locations,
        &mut errors,
    );
    track_ids(
        "item",
        world.items.iter().map(|i| i.name.clone()),
        &mut items,
        &mut errors,
    );
    let ids = IdSets {
        locations: &locations,
        items: &items,
    };

    for item in &world.items {
        let context = format!("item '{}'", item.name);
        ids.location(item.start_position, format!("{context} start position"), &mut errors);
        if let Some(target) = item.target_position {
            ids.location(target, format!("{context} target position"), &mut errors);
        }
    }

    // an item may start in at most one location's item list, and only where it says it starts
    let start_positions: HashMap<&str, LocationId> =
        world.items.iter().map(|i| (i.name.as_str(), i.start_position)).collect();
    let mut placed: HashMap<&str, LocationId> = HashMap::new();
    for location in &world.locations {
        for (command, destination) in &location.available_commands {
            ids.location(
                *destination,
                format!("location {} command '{command}'", location.id),
                &mut errors,
            );
        }
        for name in &location.items {
            ids.item(name, format!("location {} items", location.id), &mut errors);
            if let Some(previous) = placed.insert(name.as_str(), location.id) {
                errors.push(ValidationError::InvalidValue {
                    context: format!(
                        "item '{name}' placed in both location {previous} and location {}",
                        location.id
                    ),
                });
            }
            if let Some(start) = start_positions.get(name.as_str())
                && *start != location.id
            {
                errors.push(ValidationError::InvalidValue {
                    context: format!(
                        "item '{name}' listed at location {} but starts at location {start}",
                        location.id
                    ),
                });
            }
        }
        for (command, gate) in &location.gates {
            if !location.available_commands.contains_key(command) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("location {} gates unknown command '{command}'", location.id),
                });
            }
            ids.item(
                &gate.requires,
                format!("location {} gate on '{command}'", location.id),
                &mut errors,
            );
        }
    }

    validate_scripts(world, &ids, &mut errors);

    errors
}

fn validate_scripts(world: &WorldDef, ids: &IdSets<'_>, errors: &mut Vec<ValidationError>) {
    // commands that can become available at some point during play
    let mut reachable: HashSet<(LocationId, &str)> = HashSet::new();
    for location in &world.locations {
        reachable.extend(location.available_commands.keys().map(|c| (location.id, c.as_str())));
    }
    for script in &world.scripts {
        for action in &script.actions {
            if let ScriptActionDef::AddCommand { location, command, .. } = action {
                reachable.insert((*location, command.as_str()));
            }
        }
    }

    let mut seen = HashSet::new();
    for script in &world.scripts {
        let context = format!("script '{}' at location {}", script.command, script.location);
        if !seen.insert((script.location, script.command.as_str())) {
            errors.push(ValidationError::DuplicateId {
                kind: "script",
                id: format!("{}@{}", script.command, script.location),
            });
        }
        ids.location(script.location, context.clone(), errors);
        if !reachable.contains(&(script.location, script.command.as_str())) {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} is never an available command"),
            });
        }
        for required in &script.requires {
            ids.item(required, format!("{context} requirement"), errors);
        }
        for action in &script.actions {
            validate_action(action, ids, errors, &context);
        }
    }
}

fn validate_action(action: &ScriptActionDef, ids: &IdSets<'_>, errors: &mut Vec<ValidationError>, context: &str) {
    match action {
        ScriptActionDef::AwardPoints { .. } | ScriptActionDef::AddMoves { .. } => {},
        ScriptActionDef::AddCommand {
            location, destination, ..
        } => {
            ids.location(*location, context.to_string(), errors);
            ids.location(*destination, context.to_string(), errors);
        },
        ScriptActionDef::RemoveCommand { location, .. } => {
            ids.location(*location, context.to_string(), errors);
        },
        ScriptActionDef::GiveItem { item } => ids.item(item, context.to_string(), errors),
        ScriptActionDef::PlaceItem { item, location } => {
            ids.item(item, context.to_string(), errors);
            ids.location(*location, context.to_string(), errors);
        },
        ScriptActionDef::Teleport { destinations } => {
            for destination in destinations {
                ids.location(*destination, context.to_string(), errors);
            }
        },
        ScriptActionDef::Minigame { game, item, .. } => {
            ids.item(item, context.to_string(), errors);
            match game {
                MinigameDef::ShufflingDrawers { drawers, attempts } => {
                    if *drawers < 2 || *attempts == 0 {
                        errors.push(ValidationError::InvalidValue {
                            context: format!("{context}: drawers game needs 2+ drawers and 1+ attempts"),
                        });
                    }
                },
                MinigameDef::TruthfulLabels { labels, answer } => {
                    let count = u32::try_from(labels.len()).unwrap_or(u32::MAX);
                    if *answer == 0 || *answer > count {
                        errors.push(ValidationError::InvalidValue {
                            context: format!("{context}: labels answer {answer} out of range 1..={count}"),
                        });
                    }
                },
            }
        },
        ScriptActionDef::Submit { items, .. } => {
            for item in items {
                ids.item(item, context.to_string(), errors);
            }
        },
    }
}

struct IdSets<'a> {
    locations: &'a HashSet<String>,
    items: &'a HashSet<String>,
}

impl IdSets<'_> {
    fn location(&self, id: LocationId, context: String, errors: &mut Vec<ValidationError>) {
        check_ref("location", &id.to_string(), self.locations, context, errors);
    }

    fn item(&self, name: &str, context: String, errors: &mut Vec<ValidationError>) {
        check_ref("item", name, self.items, context, errors);
    }
}

fn track_ids(
    kind: &'static str,
    ids: impl Iterator<Item = String>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id.clone()) {
            errors.push(ValidationError::DuplicateId { kind, id });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<String>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn location(id: LocationId) -> LocationDef {
        LocationDef {
            id,
            name: format!("Location {id}"),
            brief_description: "Brief".into(),
            long_description: "Long".into(),
            available_commands: BTreeMap::new(),
            items: Vec::new(),
            gates: BTreeMap::new(),
        }
    }

    fn item(name: &str, start: LocationId) -> ItemDef {
        ItemDef {
            name: name.to_string(),
            description: format!("A {name}"),
            start_position: start,
            target_position: None,
            target_points: 0,
        }
    }

    fn base_world() -> WorldDef {
        let mut start = location(1);
        start.available_commands.insert("go east".into(), 2);
        let mut east = location(2);
        east.available_commands.insert("go west".into(), 1);
        east.items.push("mug".into());
        WorldDef {
            items: vec![item("mug", 2)],
            locations: vec![start, east],
            scripts: Vec::new(),
        }
    }

    #[test]
    fn well_formed_world_has_no_errors() {
        assert!(validate_world(&base_world()).is_empty());
    }

    #[test]
    fn empty_world_is_reported() {
        let errors = validate_world(&WorldDef::default());
        assert!(errors.iter().any(|err| matches!(err, ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let mut world = base_world();
        world.locations.push(location(2));
        world.items.push(item("mug", 2));

        let errors = validate_world(&world);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "location" && id == "2"))
        );
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "item" && id == "mug"))
        );
    }

    #[test]
    fn dangling_command_destination_is_reported() {
        let mut world = base_world();
        world.locations[0].available_commands.insert("go north".into(), 99);

        let errors = validate_world(&world);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "location" && id == "99")));
    }

    #[test]
    fn item_listed_away_from_start_is_reported() {
        let mut world = base_world();
        world.locations[0].items.push("mug".into());

        let errors = validate_world(&world);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("both"))));
        assert!(errors.iter().any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("starts at"))));
    }

    #[test]
    fn gate_on_unknown_command_is_reported() {
        let mut world = base_world();
        world.locations[0].gates.insert(
            "board the streetcar".into(),
            GateDef {
                requires: "mug".into(),
                barred_message: None,
            },
        );

        let errors = validate_world(&world);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unreachable_script_is_reported() {
        let mut world = base_world();
        world.scripts.push(ScriptDef {
            location: 1,
            command: "talk to the wall".into(),
            text: String::new(),
            requires: Vec::new(),
            denied_message: None,
            reversible: true,
            actions: Vec::new(),
        });

        let errors = validate_world(&world);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("never"))));
    }

    #[test]
    fn script_made_reachable_by_another_script_is_accepted() {
        let mut world = base_world();
        world.locations[0].available_commands.insert("talk to sadia".into(), 1);
        world.scripts.push(ScriptDef {
            location: 1,
            command: "talk to sadia".into(),
            text: "Sadia points at the stairs.".into(),
            requires: Vec::new(),
            denied_message: None,
            reversible: true,
            actions: vec![ScriptActionDef::AddCommand {
                location: 2,
                command: "ask about the charger".into(),
                destination: 2,
            }],
        });
        world.scripts.push(ScriptDef {
            location: 2,
            command: "ask about the charger".into(),
            text: String::new(),
            requires: Vec::new(),
            denied_message: None,
            reversible: true,
            actions: vec![ScriptActionDef::AwardPoints { amount: 5 }],
        });

        assert!(validate_world(&world).is_empty());
    }

    #[test]
    fn labels_answer_out_of_range_is_reported() {
        let mut world = base_world();
        world.locations[0].available_commands.insert("open backpacks".into(), 1);
        world.scripts.push(ScriptDef {
            location: 1,
            command: "open backpacks".into(),
            text: String::new(),
            requires: Vec::new(),
            denied_message: None,
            reversible: true,
            actions: vec![ScriptActionDef::Minigame {
                game: MinigameDef::TruthfulLabels {
                    labels: vec!["a".into(), "b".into()],
                    answer: 3,
                },
                item: "mug".into(),
                points: 10,
                award_on_loss: true,
            }],
        });

        let errors = validate_world(&world);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn script_actions_deserialize_from_tagged_json() {
        let json = r#"{"type": "minigame", "game": {"kind": "shufflingDrawers"}, "item": "charger", "points": 20, "award_on_loss": true}"#;
        let action: ScriptActionDef = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ScriptActionDef::Minigame {
                game: MinigameDef::ShufflingDrawers { drawers: 3, attempts: 3 },
                item: "charger".into(),
                points: 20,
                award_on_loss: true,
            }
        );
    }
}

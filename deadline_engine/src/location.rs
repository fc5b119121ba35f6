//! Locations: the nodes of the world graph.

use crate::world::{LocationId, WorldObject};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A place the player can be, with the commands that lead away from it.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Shown on revisits.
    pub brief_description: String,
    /// Shown on the first visit.
    pub long_description: String,
    /// Command text -> destination location.
    pub commands: BTreeMap<String, LocationId>,
    /// Commands that require the player to carry an item.
    pub gates: BTreeMap<String, Gate>,
    pub visited: bool,
}

/// An item requirement on one of a location's commands.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Gate {
    pub requires: String,
    pub barred_message: String,
}

impl WorldObject for Location {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.long_description
    }
}

impl Location {
    /// A location with no commands or descriptions.
    pub fn new(id: LocationId, name: impl Into<String>) -> Location {
        Location {
            id,
            name: name.into(),
            ..Location::default()
        }
    }

    /// Description to show on arrival: long the first time, brief afterwards.
    pub fn arrival_description(&self) -> &str {
        if self.visited {
            &self.brief_description
        } else {
            &self.long_description
        }
    }

    /// Gate guarding a command, if any.
    pub fn gate(&self, command: &str) -> Option<&Gate> {
        self.gates.get(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_uses_long_description_until_visited() {
        let mut location = Location {
            brief_description: "Bahen again.".into(),
            long_description: "A glass atrium hums with students.".into(),
            ..Location::new(3, "Bahen Centre")
        };
        assert_eq!(location.arrival_description(), "A glass atrium hums with students.");
        location.visited = true;
        assert_eq!(location.arrival_description(), "Bahen again.");
    }

    #[test]
    fn gate_lookup_by_command() {
        let mut location = Location::new(6, "Streetcar Stop");
        location.gates.insert(
            "get on the streetcar".into(),
            Gate {
                requires: "presto card".into(),
                barred_message: "You need a PRESTO card.".into(),
            },
        );
        assert_eq!(
            location.gate("get on the streetcar").map(|g| g.requires.as_str()),
            Some("presto card")
        );
        assert!(location.gate("go north").is_none());
    }
}

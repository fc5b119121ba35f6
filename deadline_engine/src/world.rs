//! Data structures representing the game world.
//!
//! This module defines [`World`], the single source of truth for where every
//! item is. Each [`Item`] carries an explicit [`Container`] tag; a location's
//! contents, the player's inventory and the held slot are all derived views
//! over the item table, so an item can never be in two places at once.

use crate::error::EngineError;
use crate::script::Script;
use crate::{Item, Location};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use variantly::Variantly;

pub use deadline_data::LocationId;

/// Kinds of places where an `Item` may be.
///
/// `Held` implies the item is also part of the inventory. Items not yet in play
/// (awarded later by a script) are `Nowhere`.
#[derive(Copy, Debug, Default, Clone, Serialize, Deserialize, Variantly, PartialEq, Eq)]
pub enum Container {
    Location(LocationId),
    Inventory,
    Held,
    #[default]
    Nowhere,
}
impl Container {
    /// True for items the player owns (inventory or held slot).
    pub fn is_carried(self) -> bool {
        matches!(self, Container::Inventory | Container::Held)
    }
}

/// Methods common to any named object in the world.
pub trait WorldObject {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

/// Locations, items and scripted commands of a running session.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub locations: BTreeMap<LocationId, Location>,
    pub items: BTreeMap<String, Item>,
    pub scripts: BTreeMap<(LocationId, String), Script>,
    next_stamp: u64,
}
impl World {
    /// Create a new empty world.
    pub fn new_empty() -> World {
        info!("new, empty 'World' created");
        World::default()
    }

    /// Look a location up by id.
    ///
    /// # Errors
    /// - `NotFound` if no location has this id
    pub fn location(&self, id: LocationId) -> Result<&Location, EngineError> {
        self.locations.get(&id).ok_or_else(|| EngineError::location_not_found(id))
    }

    /// Mutable location lookup.
    ///
    /// # Errors
    /// - `NotFound` if no location has this id
    pub fn location_mut(&mut self, id: LocationId) -> Result<&mut Location, EngineError> {
        self.locations
            .get_mut(&id)
            .ok_or_else(|| EngineError::location_not_found(id))
    }

    /// Look an item up by name. A missing item is a normal outcome.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    /// Get mutable reference to a world item.
    pub fn item_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.get_mut(name)
    }

    /// Items lying at a location, in name order.
    pub fn items_at(&self, id: LocationId) -> impl Iterator<Item = &Item> {
        self.items
            .values()
            .filter(move |item| item.container == Container::Location(id))
    }

    /// The player's inventory in pick-up order. Includes the held item.
    pub fn inventory(&self) -> Vec<&Item> {
        let mut carried: Vec<&Item> = self.items.values().filter(|item| item.is_carried()).collect();
        carried.sort_by_key(|item| item.acquired);
        carried
    }

    /// The item in the held slot, if any.
    pub fn held(&self) -> Option<&Item> {
        self.items.values().find(|item| item.container == Container::Held)
    }

    /// True if the named item is in the inventory (held or not).
    pub fn in_inventory(&self, name: &str) -> bool {
        self.item(name).is_some_and(Item::is_carried)
    }

    /// Bring an item that is not in play into a location.
    ///
    /// # Errors
    /// - `NotFound` for an unknown item or location
    /// - `InvariantViolation` if the item is already somewhere
    pub fn add_item_at(&mut self, id: LocationId, name: &str) -> Result<(), EngineError> {
        self.transfer(name, Container::Nowhere, Container::Location(id))
    }

    /// Take an item out of play from the location it lies at.
    ///
    /// # Errors
    /// - `NotFound` for an unknown item
    /// - `InvariantViolation` if the item is not at that location
    pub fn remove_item_at(&mut self, id: LocationId, name: &str) -> Result<(), EngineError> {
        self.transfer(name, Container::Location(id), Container::Nowhere)
    }

    /// Move an item between containers, checking it is where the caller expects.
    /// Items entering the inventory from outside go to the end of the pick-up order.
    ///
    /// # Errors
    /// - `NotFound` for an unknown item or destination location
    /// - `InvariantViolation` if the item is not currently in `from`
    pub fn transfer(&mut self, name: &str, from: Container, to: Container) -> Result<(), EngineError> {
        self.relocate_item(name, from, to, true)
    }

    /// Undo a previous `transfer(name, from, to)`, returning the item to `from`
    /// without disturbing its place in the pick-up order.
    ///
    /// # Errors
    /// - `NotFound` for an unknown item or location
    /// - `InvariantViolation` if the item is not currently in `to`
    pub fn revert_transfer(&mut self, name: &str, from: Container, to: Container) -> Result<(), EngineError> {
        self.relocate_item(name, to, from, false)
    }

    fn relocate_item(&mut self, name: &str, from: Container, to: Container, restamp: bool) -> Result<(), EngineError> {
        if let Container::Location(id) = to {
            self.location(id)?;
        }
        if to == Container::Held && self.held().is_some_and(|held| held.name != name) {
            return Err(EngineError::InvariantViolation(format!(
                "cannot hold '{name}': the held slot is occupied"
            )));
        }
        let stamp = self.next_stamp;
        let item = self.items.get_mut(name).ok_or_else(|| EngineError::item_not_found(name))?;
        if item.container != from {
            return Err(EngineError::InvariantViolation(format!(
                "'{name}' expected in {from:?} but found in {:?}",
                item.container
            )));
        }
        if restamp && to.is_carried() && !from.is_carried() {
            item.acquired = stamp;
            self.next_stamp += 1;
        }
        item.container = to;
        debug!("'{name}' moved from {from:?} to {to:?}");
        Ok(())
    }

    /// Make a command available at a location. Returns the destination it replaced, if any.
    ///
    /// # Errors
    /// - `NotFound` if either location doesn't exist
    pub fn add_command(
        &mut self,
        id: LocationId,
        command: &str,
        destination: LocationId,
    ) -> Result<Option<LocationId>, EngineError> {
        self.location(destination)?;
        let location = self.location_mut(id)?;
        Ok(location.commands.insert(command.to_string(), destination))
    }

    /// Withdraw a command from a location. Returns the destination it led to.
    ///
    /// # Errors
    /// - `NotFound` if the location doesn't exist
    /// - `InvariantViolation` if the command isn't available there
    pub fn remove_command(&mut self, id: LocationId, command: &str) -> Result<LocationId, EngineError> {
        let location = self.location_mut(id)?;
        location.commands.remove(command).ok_or_else(|| {
            EngineError::InvariantViolation(format!("command '{command}' not available at location {id}"))
        })
    }

    /// The script bound to a command at a location, if any.
    pub fn script(&self, id: LocationId, command: &str) -> Option<&Script> {
        self.scripts.get(&(id, command.to_string()))
    }

    /// Number of locations the player has seen.
    pub fn visited_count(&self) -> usize {
        self.locations.values().filter(|location| location.visited).count()
    }
}

//! `repl::inventory` module
//!
//! Handlers for the synthesized item commands: pick up, drop and hold.

use crate::command::{DROP_PREFIX, HOLD_PREFIX, PICK_UP_PREFIX};
use crate::error::EngineError;
use crate::event::{Effect, Event};
use crate::session::Session;
use crate::view::{View, ViewItem};
use crate::world::Container;

use anyhow::Result;
use log::info;

/// Move an item from the current location into the inventory.
///
/// # Errors
/// - `InvariantViolation` if the item isn't lying here
pub fn pick_up_handler(session: &mut Session, view: &mut View, item: &str) -> Result<Option<Event>> {
    let here = session.current;
    session
        .world
        .transfer(item, Container::Location(here), Container::Inventory)?;
    info!("picked up '{item}' at {here}");
    view.push(ViewItem::ActionSuccess(format!("You pick up the {item}.")));
    Ok(Some(Event {
        location: here,
        description: format!("{PICK_UP_PREFIX}{item}"),
        command: Some(format!("{PICK_UP_PREFIX}{item}")),
        item: Some(item.to_string()),
        effect: Effect::PickUp { from: here },
    }))
}

/// Put an inventory item down at the current location, paying its delivery award
/// if this is where it belongs.
///
/// # Errors
/// - `NotFound` if the item doesn't exist
/// - `InvariantViolation` if the item isn't carried
pub fn drop_handler(session: &mut Session, view: &mut View, item: &str) -> Result<Option<Event>> {
    let here = session.current;
    let (was_held, delivers) = {
        let found = session.world.item(item).ok_or_else(|| EngineError::item_not_found(item))?;
        (found.is_held(), found.delivers_at(here).then_some(found.target_points))
    };
    let from = if was_held { Container::Held } else { Container::Inventory };
    session.world.transfer(item, from, Container::Location(here))?;
    view.push(ViewItem::ActionSuccess(format!("You drop the {item}.")));

    if let Some(points) = delivers {
        if let Some(found) = session.world.item_mut(item) {
            found.delivered = true;
        }
        session.player.add_points(points.cast_signed());
        info!("'{item}' delivered at {here}: +{points}");
        view.push(ViewItem::PointsAwarded {
            amount: points.cast_signed(),
            reason: format!("The {item} is right where it belongs"),
        });
    }
    info!("dropped '{item}' at {here}");
    Ok(Some(Event {
        location: here,
        description: format!("{DROP_PREFIX}{item}"),
        command: Some(format!("{DROP_PREFIX}{item}")),
        item: Some(item.to_string()),
        effect: Effect::Drop {
            to: here,
            was_held,
            delivery_points: delivers,
        },
    }))
}

/// Put an inventory item in the held slot, returning any previously held item
/// to plain inventory.
///
/// # Errors
/// - `InvariantViolation` if the item isn't in plain inventory
pub fn hold_handler(session: &mut Session, view: &mut View, item: &str) -> Result<Option<Event>> {
    let previous = session.world.held().map(|held| held.name.clone());
    if let Some(prev) = &previous {
        session.world.transfer(prev, Container::Held, Container::Inventory)?;
    }
    session.world.transfer(item, Container::Inventory, Container::Held)?;
    info!("now holding '{item}' (was {previous:?})");
    view.push(ViewItem::ActionSuccess(format!("You hold the {item} at the ready.")));
    Ok(Some(Event {
        location: session.current,
        description: format!("{HOLD_PREFIX}{item}"),
        command: Some(format!("{HOLD_PREFIX}{item}")),
        item: Some(item.to_string()),
        effect: Effect::Hold { previous },
    }))
}

//! `repl::movement` module
//!
//! Handler for location commands that take the player somewhere else.

use crate::error::EngineError;
use crate::event::{Effect, Event};
use crate::session::Session;
use crate::view::{View, ViewItem};

use anyhow::Result;
use log::info;

/// Follow a location command to its destination.
///
/// Returns `None` when a gate bars the way; nothing changes and no move is spent.
///
/// # Errors
/// - `InvalidCommand` if the command isn't offered here
/// - `NotFound` if the destination is missing from the world
pub fn move_handler(session: &mut Session, view: &mut View, command: &str) -> Result<Option<Event>> {
    let from = session.current;
    let destination = {
        let location = session.current_location()?;
        let destination = *location
            .commands
            .get(command)
            .ok_or_else(|| EngineError::InvalidCommand(command.to_string()))?;
        if let Some(gate) = location.gate(command)
            && !session.world.in_inventory(&gate.requires)
        {
            info!("'{command}' at {from} barred: '{}' not carried", gate.requires);
            view.push(ViewItem::ActionFailure(gate.barred_message.clone()));
            return Ok(None);
        }
        destination
    };

    view.push(ViewItem::ActionSuccess(format!("You decided to: {command}.")));
    let (description, first_visit_points) = session.arrive(destination)?;
    if let Some(points) = first_visit_points {
        view.push(ViewItem::PointsAwarded {
            amount: points.cast_signed(),
            reason: "Somewhere new".to_string(),
        });
    }
    info!("moved from {from} to {destination} via '{command}'");
    Ok(Some(Event {
        location: destination,
        description,
        command: Some(command.to_string()),
        item: None,
        effect: Effect::Move {
            from,
            first_visit_points,
        },
    }))
}

//! `repl::undo` module
//!
//! Reverses the most recent turn. Every record carries its own `Effect`, so
//! reverting is a local operation on that one record.

use crate::error::EngineError;
use crate::event::{Change, Effect, Event};
use crate::session::{Ending, Session};
use crate::view::{View, ViewItem};
use crate::world::Container;

use anyhow::Result;
use log::{info, warn};

/// Undo the last turn and report the result to the player.
///
/// # Errors
/// - propagates `NotFound`/`InvariantViolation` (world state no longer matches the log)
pub fn undo_handler(session: &mut Session, view: &mut View) -> Result<()> {
    match undo_last(session) {
        Ok(event) => {
            let location = session.current_location()?;
            view.push(ViewItem::ActionSuccess(format!(
                "Undid '{}'. You are back at Location {}: {}",
                event.command.as_deref().unwrap_or_default(),
                location.id,
                location.name
            )));
            Ok(())
        },
        Err(EngineError::Underflow) => {
            view.push(ViewItem::ActionFailure("Nothing to undo.".to_string()));
            Ok(())
        },
        Err(err @ EngineError::Irreversible(_)) => {
            warn!("undo refused: {err}");
            view.push(ViewItem::ActionFailure(err.to_string()));
            Ok(())
        },
        Err(err) => Err(err.into()),
    }
}

/// Revert the last record's effect and remove it from the log.
///
/// # Errors
/// - `Underflow` if only the seed record remains
/// - `Irreversible` if the last turn ran an irreversible script
/// - `NotFound`/`InvariantViolation` if the world no longer matches the record
///
/// On `Underflow` and `Irreversible` nothing is changed. If the reverted turn
/// granted the moves the player was living on, the session ends out of moves.
pub fn undo_last(session: &mut Session) -> Result<Event, EngineError> {
    if !session.log.can_undo() {
        return Err(EngineError::Underflow);
    }
    let event = session.log.last()?.clone();
    let command = event.command.clone().unwrap_or_default();
    let item = event.item.as_deref().unwrap_or_default();

    match &event.effect {
        Effect::Start => return Err(EngineError::Underflow),
        Effect::Move {
            from,
            first_visit_points,
        } => session.revert_arrival(*from, event.location, *first_visit_points)?,
        Effect::PickUp { from } => {
            session
                .world
                .revert_transfer(item, Container::Location(*from), Container::Inventory)?;
        },
        Effect::Drop {
            to,
            was_held,
            delivery_points,
        } => {
            let origin = if *was_held { Container::Held } else { Container::Inventory };
            session.world.revert_transfer(item, origin, Container::Location(*to))?;
            if let Some(points) = delivery_points {
                if let Some(found) = session.world.item_mut(item) {
                    found.delivered = false;
                }
                session.player.revert_points(points.cast_signed());
            }
        },
        Effect::Hold { previous } => {
            session.world.revert_transfer(item, Container::Inventory, Container::Held)?;
            if let Some(prev) = previous {
                session.world.revert_transfer(prev, Container::Held, Container::Inventory)?;
            }
        },
        Effect::Scripted(delta) => {
            if !delta.reversible {
                return Err(EngineError::Irreversible(format!("'{command}' can't be taken back")));
            }
            for change in delta.changes.iter().rev() {
                revert_change(session, change)?;
            }
        },
    }
    let removed = session.log.remove_last()?;
    info!("undid '{command}', back at location {}", session.current);
    // taking back granted moves (or a victory) can leave the budget empty
    if session.ongoing && session.player.out_of_moves() {
        session.end(Ending::OutOfMoves);
    }
    Ok(removed)
}

fn revert_change(session: &mut Session, change: &Change) -> Result<(), EngineError> {
    match change {
        Change::Score(applied) => session.player.revert_points(*applied),
        Change::Moves(amount) => session.player.remove_moves(*amount),
        Change::CommandAdded {
            location,
            command,
            replaced,
        } => {
            session.world.remove_command(*location, command)?;
            if let Some(previous) = replaced {
                session.world.add_command(*location, command, *previous)?;
            }
        },
        Change::CommandRemoved {
            location,
            command,
            destination,
        } => {
            session.world.add_command(*location, command, *destination)?;
        },
        Change::ItemMoved { item, from, to } => session.world.revert_transfer(item, *from, *to)?,
        Change::Relocated {
            from,
            to,
            first_visit_points,
        } => session.revert_arrival(*from, *to, *first_visit_points)?,
        Change::Victory => session.resume(),
    }
    Ok(())
}

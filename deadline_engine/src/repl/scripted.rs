//! `repl::scripted` module
//!
//! Runs the script bound to a command: dialogue, purchases, minigames, the
//! teleport secret and the final submission. Each action records what it
//! changed on the turn's `ScriptDelta`.

use crate::error::EngineError;
use crate::event::{Change, Effect, Event, ScriptDelta};
use crate::helpers::name_list;
use crate::minigame::{build_minigame, read_choice};
use crate::repl::input::LineSource;
use crate::script::{Script, ScriptAction};
use crate::session::{Ending, Session};
use crate::view::{View, ViewItem};
use crate::world::{Container, LocationId};

use anyhow::{Context, Result};
use log::{info, warn};
use std::fmt::Write;

/// Run a scripted command.
///
/// Returns `None` when a precondition fails (missing required items or an
/// incomplete submission); nothing changes and no move is spent.
///
/// # Errors
/// - `InvalidCommand` if no script is bound to the command here
/// - `NotFound`/`InvariantViolation` if the script references inconsistent world state
pub fn scripted_handler(
    session: &mut Session,
    view: &mut View,
    io: &mut dyn LineSource,
    command: &str,
) -> Result<Option<Event>> {
    let here = session.current;
    let script = session
        .world
        .script(here, command)
        .cloned()
        .ok_or_else(|| EngineError::InvalidCommand(command.to_string()))?;

    if let Some(refusal) = precondition_failure(session, &script) {
        info!("script '{command}' at {here} refused");
        view.push(ViewItem::ActionFailure(refusal));
        return Ok(None);
    }

    if !script.text.is_empty() {
        view.push(ViewItem::Narrative(script.text.clone()));
    }
    let mut delta = ScriptDelta::new(script.reversible);
    for action in &script.actions {
        apply_action(session, view, io, action, &mut delta)
            .with_context(|| format!("running script '{command}' at location {here}"))?;
    }
    info!(
        "script '{command}' completed with {} change(s), score delta {}",
        delta.changes.len(),
        delta.score()
    );
    if delta.is_victory() {
        info!("submission accepted at {here}");
    }

    // the first item the script brought into play, given or placed
    let item = delta.changes.iter().find_map(|change| match change {
        Change::ItemMoved { item, to, .. } if !to.is_nowhere() => Some(item.clone()),
        _ => None,
    });
    Ok(Some(Event {
        location: session.current,
        description: Event::scripted_description(command),
        command: Some(command.to_string()),
        item,
        effect: Effect::Scripted(delta),
    }))
}

/// The refusal text if the script can't run right now.
fn precondition_failure(session: &Session, script: &Script) -> Option<String> {
    let carried = |name: &String| session.world.in_inventory(name);
    if !script.requires.iter().all(carried) {
        return Some(script.denied_message.clone());
    }
    let missing: Vec<String> = script
        .submission()?
        .iter()
        .filter(|name| !carried(*name))
        .cloned()
        .collect();
    if missing.is_empty() {
        return None;
    }
    let refusal = script.actions.iter().find_map(|action| match action {
        ScriptAction::Submit { refusal, .. } => Some(refusal.as_str()),
        _ => None,
    })?;
    Some(format!("{refusal} Still missing: {}.", name_list(&missing)))
}

fn apply_action(
    session: &mut Session,
    view: &mut View,
    io: &mut dyn LineSource,
    action: &ScriptAction,
    delta: &mut ScriptDelta,
) -> Result<()> {
    match action {
        ScriptAction::AwardPoints(amount) => {
            let applied = session.player.add_points(*amount);
            delta.record(Change::Score(applied));
            view.push(ViewItem::PointsAwarded {
                amount: *amount,
                reason: "Special event".to_string(),
            });
        },
        ScriptAction::AddMoves(amount) => {
            session.player.add_moves(*amount);
            delta.record(Change::Moves(*amount));
            view.push(ViewItem::ActionSuccess(format!("You gain {amount} extra moves!")));
        },
        ScriptAction::AddCommand {
            location,
            command,
            destination,
        } => {
            let replaced = session.world.add_command(*location, command, *destination)?;
            delta.record(Change::CommandAdded {
                location: *location,
                command: command.clone(),
                replaced,
            });
        },
        ScriptAction::RemoveCommand { location, command } => {
            let destination = session.world.remove_command(*location, command)?;
            delta.record(Change::CommandRemoved {
                location: *location,
                command: command.clone(),
                destination,
            });
        },
        ScriptAction::GiveItem(item) => {
            move_item(session, delta, item, Container::Inventory)?;
            view.push(ViewItem::ActionSuccess(format!("The {item} is now in your inventory.")));
        },
        ScriptAction::PlaceItem { item, location } => {
            move_item(session, delta, item, Container::Location(*location))?;
        },
        ScriptAction::Teleport(destinations) => teleport(session, view, io, destinations, delta)?,
        ScriptAction::Minigame {
            game,
            item,
            points,
            award_on_loss,
        } => {
            let mut minigame = build_minigame(game, item, *points);
            let outcome = minigame.play(io, view, &mut session.rng)?;
            info!("minigame '{}' for '{item}': {outcome:?}", minigame.title());
            let applied = session.player.add_points(outcome.score_delta);
            if applied != 0 {
                delta.record(Change::Score(applied));
            }
            let here = session.current;
            if outcome.won {
                view.push(ViewItem::PointsAwarded {
                    amount: outcome.score_delta,
                    reason: format!("You win! The {item} shows up"),
                });
                move_item(session, delta, item, Container::Location(here))?;
            } else if *award_on_loss {
                view.push(ViewItem::Narrative(format!(
                    "The {item} reveals itself in disappointment. +0 points"
                )));
                move_item(session, delta, item, Container::Location(here))?;
            } else {
                view.push(ViewItem::ActionFailure(format!("The {item} stays hidden.")));
            }
        },
        ScriptAction::Submit {
            items,
            bonus_per_item,
            victory_text,
            ..
        } => {
            let bonus = items.len() * bonus_per_item;
            view.push(ViewItem::Narrative(victory_text.clone()));
            let applied = session.player.add_points(bonus.cast_signed());
            delta.record(Change::Score(applied));
            if bonus > 0 {
                view.push(ViewItem::PointsAwarded {
                    amount: applied,
                    reason: format!("Submitted {} required item(s)", items.len()),
                });
            }
            delta.record(Change::Victory);
            session.end(Ending::Victory);
        },
    }
    Ok(())
}

/// Move an item to `to` from wherever it is now, recording the change.
/// An item already at `to` is left alone.
fn move_item(session: &mut Session, delta: &mut ScriptDelta, item: &str, to: Container) -> Result<()> {
    let from = session
        .world
        .item(item)
        .ok_or_else(|| EngineError::item_not_found(item))?
        .container;
    if from == to || (from.is_carried() && to.is_carried()) {
        warn!("script wanted '{item}' moved to {to:?}, but it is already {from:?}");
        return Ok(());
    }
    session.world.transfer(item, from, to)?;
    delta.record(Change::ItemMoved {
        item: item.to_string(),
        from,
        to,
    });
    Ok(())
}

/// Ask the player where to go, among `destinations` (every location when empty).
/// End of input leaves the player where they are.
fn teleport(
    session: &mut Session,
    view: &mut View,
    io: &mut dyn LineSource,
    destinations: &[LocationId],
    delta: &mut ScriptDelta,
) -> Result<()> {
    let choices: Vec<LocationId> = if destinations.is_empty() {
        session.world.locations.keys().copied().collect()
    } else {
        destinations.to_vec()
    };
    let mut listing = String::from("Where to?");
    for id in &choices {
        let location = session.world.location(*id)?;
        let _ = write!(listing, "\n  {id}: {}", location.name);
    }
    view.push(ViewItem::Narrative(listing));

    let Some(to) = read_choice(io, view, "Teleport me to location... (enter id) ", |id| choices.contains(&id))? else {
        view.push(ViewItem::ActionFailure("Nothing happens. You stay put.".to_string()));
        return Ok(());
    };
    let from = session.current;
    let (description, first_visit_points) = session.arrive(to)?;
    info!("teleported from {from} to {to}");
    if let Some(points) = first_visit_points {
        view.push(ViewItem::PointsAwarded {
            amount: points.cast_signed(),
            reason: "Somewhere new".to_string(),
        });
    }
    view.push(ViewItem::Description(description));
    delta.record(Change::Relocated {
        from,
        to,
        first_visit_points,
    });
    Ok(())
}

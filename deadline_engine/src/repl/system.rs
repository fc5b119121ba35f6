//! `repl::system` module
//!
//! Menu commands that read session state without spending a move, plus
//! quitting and the end-of-game summary.

use crate::session::{Ending, Session};
use crate::view::{EndingReport, InventoryLine, LogLine, View, ViewItem};
use crate::world::{LocationId, WorldObject};

use anyhow::Result;
use log::info;

/// Show the long description of the current location and what lies here.
///
/// # Errors
/// - `NotFound` if the current location is missing
pub fn look_handler(session: &Session, view: &mut View) -> Result<()> {
    let location = session.current_location()?;
    view.push(ViewItem::LocationBanner {
        id: location.id,
        name: location.name.clone(),
    });
    view.push(ViewItem::Description(location.description().to_string()));
    view.push(ViewItem::LocationItems(
        session
            .world
            .items_at(location.id)
            .map(|item| item.name.clone())
            .collect(),
    ));
    Ok(())
}

/// List the inventory in pick-up order, marking the held item.
pub fn inventory_handler(session: &Session, view: &mut View) {
    let lines = session
        .world
        .inventory()
        .into_iter()
        .map(|item| InventoryLine {
            name: item.name.clone(),
            held: item.is_held(),
        })
        .collect();
    view.push(ViewItem::Inventory(lines));
}

pub fn score_handler(session: &Session, view: &mut View) {
    view.push(ViewItem::Score {
        score: session.player.score,
        moves_remaining: session.player.moves_remaining,
    });
}

/// Show every turn so far: where the player was and what they chose there.
///
/// # Errors
/// - `NotFound` if a record names a missing location
pub fn log_handler(session: &Session, view: &mut View) -> Result<()> {
    let line = |location_id: LocationId, command: &str| -> Result<LogLine> {
        Ok(LogLine {
            location_id,
            location_name: session.world.location(location_id)?.name.clone(),
            command: command.to_string(),
        })
    };
    let events = session.log.to_sequence();
    let mut entries = Vec::with_capacity(events.len());
    for pair in events.windows(2) {
        entries.push(line(pair[0].location, pair[1].command.as_deref().unwrap_or_default())?);
    }
    let current = line(session.log.last()?.location, "")?;
    view.push(ViewItem::LogEntries { entries, current });
    Ok(())
}

pub fn quit_handler(session: &mut Session) {
    info!("player quit");
    session.end(Ending::Quit);
}

/// Push the final banner, score and rank.
pub fn ending_summary(session: &Session, view: &mut View, ending: Ending) {
    let endings = &session.config.endings;
    let banner = match ending {
        Ending::Quit => endings.quit.clone(),
        Ending::OutOfMoves => format!("{}\nGAME OVER.", endings.out_of_moves),
        Ending::Victory => format!("{} Final score: {}", endings.victory, session.player.score),
    };
    let (rank, rank_description) = session.config.scoring.get_rank(session.score_percent());
    view.push(ViewItem::EndingSummary(EndingReport {
        banner,
        success: ending.is_victory(),
        score: session.player.score,
        max_score: session.max_score(),
        visited: session.world.visited_count(),
        total_locations: session.world.locations.len(),
        rank: rank.to_string(),
        rank_description: rank_description.to_string(),
    }));
}

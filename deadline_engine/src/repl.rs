//! REPL and command dispatch.
//!
//! The game runs in a read-eval-print loop. Each line is normalized, checked
//! against the turn's legal command set, and dispatched to a handler in one of
//! the submodules. World-affecting handlers return the turn's `Event`, which is
//! appended to the log together with spending one move; menu commands and
//! refused commands cost nothing.

pub mod input;
pub mod inventory;
pub mod movement;
pub mod scripted;
pub mod system;
pub mod undo;

pub use inventory::*;
pub use movement::*;
pub use scripted::*;
pub use system::*;
pub use undo::*;

use crate::command::{Command, MenuCommand, normalize_input, parse_command};
use crate::error::EngineError;
use crate::event::Event;
use crate::session::{Ending, Session};
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

use anyhow::{Context, Result};
use log::info;

use input::{InputEvent, LineSource};

/// What a single line of input amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A world-affecting turn; its record is now last in the log.
    Advanced(Event),
    /// A cost-free menu command.
    Menu(MenuCommand),
    /// A legal command whose precondition failed (gate, requirement, submission).
    Refused,
    /// Input outside the legal set.
    Rejected(String),
}

/// Run the main read–eval–print loop until the session ends.
///
/// End of input counts as quitting. Returns how the session ended.
///
/// # Errors
/// - input failures, or world state inconsistent with the log
pub fn run_repl(session: &mut Session, view: &mut View, io: &mut dyn LineSource) -> Result<Ending> {
    let start = session.current_location()?;
    view.push(ViewItem::LocationBanner {
        id: start.id,
        name: start.name.clone(),
    });
    view.push(ViewItem::Description(session.log.first()?.description.clone()));

    let mut show_menu = true;
    while session.ongoing {
        let legal = session.legal_commands()?;
        let entries = legal.entries();
        if show_menu {
            let (menu, location) = entries.split_at(MenuCommand::ALL.len());
            view.push(ViewItem::CommandMenu {
                menu: menu.to_vec(),
                location: location.to_vec(),
            });
        }
        view.flush();
        io.set_completions(&entries);

        let prompt = format!(
            "[Score: {}|Moves left: {}]>> ",
            session.player.score, session.player.moves_remaining
        )
        .prompt_style()
        .to_string();
        let line = match io.read_line(&prompt).context("reading command")? {
            InputEvent::Line(line) => line,
            InputEvent::Eof => {
                info!("end of input; quitting");
                quit_handler(session);
                break;
            },
            InputEvent::Interrupted => {
                view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                show_menu = false;
                continue;
            },
        };
        let outcome = play_line(session, view, io, &line)?;
        show_menu = !matches!(outcome, TurnOutcome::Rejected(_));
    }

    let ending = session.ending.unwrap_or(Ending::Quit);
    ending_summary(session, view, ending);
    view.flush();
    Ok(ending)
}

/// Normalize, validate and apply one line of input.
///
/// # Errors
/// - world state inconsistent with the command (never for invalid input)
pub fn play_line(session: &mut Session, view: &mut View, io: &mut dyn LineSource, raw: &str) -> Result<TurnOutcome> {
    let input = normalize_input(raw);
    let legal = session.legal_commands()?;
    match parse_command(&input, &legal) {
        Ok(command) => take_turn(session, view, io, &command),
        Err(EngineError::InvalidCommand(rejected)) => {
            info!("rejected input '{rejected}'");
            view.push(ViewItem::ActionFailure("That was an invalid option; try again.".to_string()));
            Ok(TurnOutcome::Rejected(rejected))
        },
        Err(err) => Err(err.into()),
    }
}

/// Dispatch a parsed command.
///
/// # Errors
/// - world state inconsistent with the command
pub fn take_turn(
    session: &mut Session,
    view: &mut View,
    io: &mut dyn LineSource,
    command: &Command,
) -> Result<TurnOutcome> {
    let event = match command {
        Command::Menu(menu) => {
            run_menu(session, view, *menu)?;
            return Ok(TurnOutcome::Menu(*menu));
        },
        Command::Move(cmd) => move_handler(session, view, cmd)?,
        Command::PickUp(item) => pick_up_handler(session, view, item)?,
        Command::Drop(item) => drop_handler(session, view, item)?,
        Command::Hold(item) => hold_handler(session, view, item)?,
        Command::Scripted(cmd) => scripted_handler(session, view, io, cmd)?,
    };
    let Some(event) = event else {
        return Ok(TurnOutcome::Refused);
    };
    show_turn_result(session, view, &event)?;
    session.finish_turn(event.clone());
    Ok(TurnOutcome::Advanced(event))
}

fn run_menu(session: &mut Session, view: &mut View, menu: MenuCommand) -> Result<()> {
    match menu {
        MenuCommand::Look => look_handler(session, view)?,
        MenuCommand::Inventory => inventory_handler(session, view),
        MenuCommand::Score => score_handler(session, view),
        MenuCommand::Undo => undo_handler(session, view)?,
        MenuCommand::Log => log_handler(session, view)?,
        MenuCommand::Quit => quit_handler(session),
    }
    Ok(())
}

/// Item description (for item turns), then the location banner and outcome text.
fn show_turn_result(session: &Session, view: &mut View, event: &Event) -> Result<()> {
    if event.is_item_turn()
        && let Some(item) = event.item.as_deref().and_then(|name| session.world.item(name))
    {
        item.show(view);
    }
    let location = session.world.location(event.location)?;
    view.push(ViewItem::LocationBanner {
        id: location.id,
        name: location.name.clone(),
    });
    view.push(ViewItem::Description(event.description.clone()));
    Ok(())
}

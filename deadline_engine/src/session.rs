//! Session state.
//!
//! A [`Session`] bundles everything one game needs: the world, the player,
//! the event log and the random source used by minigames. The driving loop owns
//! the session and hands it by reference to the command handlers.

use crate::command::{LegalCommands, MenuCommand};
use crate::error::EngineError;
use crate::event::Event;
use crate::history::EventLog;
use crate::loader::config::SessionConfig;
use crate::world::{LocationId, World};
use crate::{Location, Player};

use log::{info, warn};
use rand::rngs::StdRng;
use std::fmt::Write;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, variantly::Variantly)]
pub enum Ending {
    Quit,
    OutOfMoves,
    Victory,
}

impl Ending {
    /// Process exit status for this ending.
    pub fn exit_code(self) -> u8 {
        match self {
            Ending::Victory => 0,
            Ending::OutOfMoves => 1,
            Ending::Quit => 2,
        }
    }
}

/// One game in progress.
#[derive(Debug)]
pub struct Session {
    pub world: World,
    pub player: Player,
    pub current: LocationId,
    pub ongoing: bool,
    pub ending: Option<Ending>,
    pub log: EventLog,
    pub rng: StdRng,
    pub config: SessionConfig,
}

impl Session {
    /// Start a session at the configured location.
    ///
    /// The start location is marked visited without paying first-visit points,
    /// and the log is seeded with the intro text.
    ///
    /// # Errors
    /// - `NotFound` if the start location isn't in the world
    pub fn new(mut world: World, config: SessionConfig, rng: StdRng) -> Result<Session, EngineError> {
        let start = config.start_location;
        world.location_mut(start)?.visited = true;
        let player = Player::new(config.player_name.clone(), config.max_moves);
        let seed = Event::start(start, intro_text(&config));
        info!(
            "session started at location {start} with {} moves for '{}'",
            player.moves_remaining, player.name
        );
        Ok(Session {
            world,
            player,
            current: start,
            ongoing: true,
            ending: None,
            log: EventLog::seeded(seed),
            rng,
            config,
        })
    }

    /// The location the player is at.
    ///
    /// # Errors
    /// - `NotFound` if the current id is dangling
    pub fn current_location(&self) -> Result<&Location, EngineError> {
        self.world.location(self.current)
    }

    /// The legal command set for this turn.
    ///
    /// # Errors
    /// - `NotFound` if the current id is dangling
    pub fn legal_commands(&self) -> Result<LegalCommands, EngineError> {
        let location = self.current_location()?;
        let inventory = self.world.inventory();
        let held = self.world.held().map(|item| item.name.clone());
        Ok(LegalCommands {
            location: location.commands.keys().cloned().collect(),
            scripted: location
                .commands
                .keys()
                .filter(|cmd| self.world.script(self.current, cmd).is_some())
                .cloned()
                .collect(),
            pick_up: self.world.items_at(self.current).map(|item| item.name.clone()).collect(),
            drop: inventory.iter().map(|item| item.name.clone()).collect(),
            hold: inventory
                .iter()
                .filter(|item| Some(&item.name) != held.as_ref())
                .map(|item| item.name.clone())
                .collect(),
        })
    }

    /// Move the player to a location, marking it visited and paying first-visit points.
    /// Returns the arrival description and the points paid, if any.
    ///
    /// # Errors
    /// - `NotFound` if the destination doesn't exist
    pub fn arrive(&mut self, to: LocationId) -> Result<(String, Option<usize>), EngineError> {
        let first_visit_points = self.config.first_visit_points;
        let location = self.world.location_mut(to)?;
        let description = location.arrival_description().to_string();
        let award = if location.visited {
            None
        } else {
            location.visited = true;
            Some(first_visit_points)
        };
        if let Some(points) = award {
            self.player.add_points(points.cast_signed());
            info!("first visit to location {to}: +{points}");
        }
        self.current = to;
        Ok((description, award))
    }

    /// Reverse an `arrive`, putting the player back at `from`.
    ///
    /// # Errors
    /// - `NotFound` if either location doesn't exist
    pub fn revert_arrival(
        &mut self,
        from: LocationId,
        to: LocationId,
        first_visit_points: Option<usize>,
    ) -> Result<(), EngineError> {
        self.world.location(from)?;
        if let Some(points) = first_visit_points {
            self.world.location_mut(to)?.visited = false;
            self.player.revert_points(points.cast_signed());
        }
        self.current = from;
        Ok(())
    }

    /// Close out a world-affecting turn: spend a move, append the record, and
    /// end the session if the budget ran out.
    pub fn finish_turn(&mut self, event: Event) {
        if !self.player.spend_move() {
            warn!("turn taken with no moves remaining");
        }
        info!(
            "turn '{}' -> location {} ({} moves left)",
            event.command.as_deref().unwrap_or("<start>"),
            event.location,
            self.player.moves_remaining
        );
        self.log.append(event);
        if self.ongoing && self.player.out_of_moves() {
            self.end(Ending::OutOfMoves);
        }
    }

    /// Stop the session.
    pub fn end(&mut self, ending: Ending) {
        info!(
            "session ended ({ending:?}) with score {} and {} item(s) carried",
            self.player.score,
            self.world.inventory().len()
        );
        self.ongoing = false;
        self.ending = Some(ending);
    }

    /// Undo a `Victory` ending set during the turn being reverted.
    pub fn resume(&mut self) {
        self.ongoing = true;
        self.ending = None;
    }

    /// Highest score attainable in this world.
    pub fn max_score(&self) -> usize {
        let visits = self.config.first_visit_points * self.world.locations.len().saturating_sub(1);
        let deliveries: usize = self.world.items.values().map(|item| item.target_points).sum();
        let scripts: usize = self.world.scripts.values().map(crate::script::Script::max_award).sum();
        visits + deliveries + scripts
    }

    /// Score as a percentage of `max_score`.
    #[allow(clippy::cast_precision_loss)]
    pub fn score_percent(&self) -> f32 {
        let max = self.max_score();
        if max == 0 {
            return 100.0;
        }
        (self.player.score as f32 / max as f32 * 100.0).min(100.0)
    }
}

fn intro_text(config: &SessionConfig) -> String {
    let mut text = config.intro.clone();
    let _ = write!(text, "\n\nCOMMANDS:");
    for menu in MenuCommand::ALL {
        let _ = write!(text, "\n{menu}: {}", menu_help(menu));
    }
    let _ = write!(
        text,
        "\n\nAt certain locations you can pick up items. You can also drop or hold the items you carry.\n\
         Certain locations have special command options.\n\
         Maximum number of moves (each command takes 1 move): {}",
        config.max_moves
    );
    text
}

fn menu_help(menu: MenuCommand) -> &'static str {
    match menu {
        MenuCommand::Look => "get a long description of your location",
        MenuCommand::Inventory => "check the items you carry",
        MenuCommand::Score => "check your score",
        MenuCommand::Undo => "take back your last move, pick-up, drop or special event",
        MenuCommand::Log => "review every move so far",
        MenuCommand::Quit => "quit the game",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Item;
    use crate::world::Container;
    use rand::SeedableRng;

    fn small_world() -> World {
        let mut world = World::new_empty();
        let mut one = Location::new(1, "New College");
        one.commands.insert("go east".into(), 2);
        let mut two = Location::new(2, "Sidney Smith Hall");
        two.brief_description = "Sid Smith.".into();
        two.long_description = "The long halls of Sidney Smith.".into();
        two.commands.insert("go west".into(), 1);
        world.locations.insert(1, one);
        world.locations.insert(2, two);
        let mut mug = Item::new("mug", 2);
        mug.container = Container::Location(2);
        world.items.insert("mug".into(), mug);
        world
    }

    fn session(moves: u32) -> Session {
        let config = SessionConfig {
            max_moves: moves,
            ..SessionConfig::default()
        };
        Session::new(small_world(), config, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn new_session_marks_start_visited_and_seeds_log() {
        let s = session(5);
        assert!(s.current_location().unwrap().visited);
        assert_eq!(s.player.score, 0);
        assert_eq!(s.log.len(), 1);
        assert!(s.log.first().unwrap().description.contains("Maximum number of moves (each command takes 1 move): 5"));
    }

    #[test]
    fn missing_start_location_is_not_found() {
        let config = SessionConfig {
            start_location: 99,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(small_world(), config, StdRng::seed_from_u64(1)),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn legal_commands_reflect_location_and_inventory() {
        let mut s = session(5);
        s.current = 2;
        let legal = s.legal_commands().unwrap();
        assert_eq!(legal.location, vec!["go west".to_string()]);
        assert_eq!(legal.pick_up, vec!["mug".to_string()]);
        assert!(legal.drop.is_empty());
    }

    #[test]
    fn arrival_pays_first_visit_once() {
        let mut s = session(5);
        let (description, award) = s.arrive(2).unwrap();
        assert_eq!(description, "The long halls of Sidney Smith.");
        assert_eq!(award, Some(10));
        s.arrive(1).unwrap();
        let (description, award) = s.arrive(2).unwrap();
        assert_eq!(description, "Sid Smith.");
        assert_eq!(award, None);
        assert_eq!(s.player.score, 10);
    }

    #[test]
    fn reverting_arrival_restores_visit_and_score() {
        let mut s = session(5);
        let (_, award) = s.arrive(2).unwrap();
        s.revert_arrival(1, 2, award).unwrap();
        assert_eq!(s.current, 1);
        assert_eq!(s.player.score, 0);
        assert!(!s.world.location(2).unwrap().visited);
    }

    #[test]
    fn last_move_ends_session() {
        let mut s = session(1);
        s.finish_turn(Event::start(1, "noop"));
        assert!(!s.ongoing);
        assert_eq!(s.ending, Some(Ending::OutOfMoves));
    }

    #[test]
    fn victory_is_not_overwritten_by_empty_budget() {
        let mut s = session(1);
        s.end(Ending::Victory);
        s.finish_turn(Event::start(1, "submit"));
        assert_eq!(s.ending, Some(Ending::Victory));
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(Ending::Victory.exit_code(), 0);
        assert_eq!(Ending::OutOfMoves.exit_code(), 1);
        assert_eq!(Ending::Quit.exit_code(), 2);
    }

    #[test]
    fn max_score_counts_unvisited_locations() {
        let s = session(5);
        assert_eq!(s.max_score(), 10);
        assert!((s.score_percent() - 0.0).abs() < f32::EPSILON);
    }
}

#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const DEADLINE_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod command;
pub mod data_paths;
pub mod error;
pub mod event;
pub mod helpers;
pub mod history;
pub mod item;
pub mod loader;
pub mod location;
pub mod minigame;
pub mod player;
pub mod repl;
pub mod script;
pub mod session;
pub mod style;
pub mod view;
pub mod world;

// Re-exports for convenience
pub use command::{Command, LegalCommands, MenuCommand};
pub use error::EngineError;
pub use event::{Effect, Event};
pub use history::EventLog;
pub use item::Item;
pub use loader::{load_session, load_world};
pub use location::Location;
pub use player::Player;
pub use repl::run_repl;
pub use session::{Ending, Session};
pub use view::{View, ViewItem};
pub use world::{Container, LocationId, World, WorldObject};

#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Deadline **
//! A race across campus before the 4 PM submission deadline.

use deadline_engine::repl::input::{InputManager, LineSource, ScriptedInput};
use deadline_engine::{DEADLINE_VERSION, View, load_session, run_repl};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use std::path::PathBuf;
use std::process::ExitCode;

/// Play Deadline, or replay a list of commands against it.
#[derive(Parser, Debug)]
#[command(name = "deadline", version = DEADLINE_VERSION, about)]
struct Cli {
    /// World description (JSON). Defaults to the data directory's `world.json`.
    #[arg(long)]
    world: Option<PathBuf>,
    /// Session configuration (TOML). Defaults to the data directory's `session.toml`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run the commands in this file instead of reading the terminal.
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Seed for the minigames' random choices.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    info!("Start: loading Deadline world...");
    let mut session = load_session(cli.world.as_deref(), cli.config.as_deref(), cli.seed)
        .context("while loading the game session")?;
    info!("Session loaded successfully.");

    println!("{:^60}", "DEADLINE: 4 PM".bright_yellow().underline());
    println!("\nGood luck, {}.\n", session.player.name.bold().bright_blue());

    let mut view = View::new();
    let mut input: Box<dyn LineSource> = match &cli.replay {
        Some(path) => {
            let mut scripted = ScriptedInput::from_file(path)?;
            scripted.echo = true;
            Box::new(scripted)
        },
        None => Box::new(InputManager::new()),
    };
    let ending = run_repl(&mut session, &mut view, input.as_mut())?;

    if cli.replay.is_some() {
        println!("Visited location ids: {:?}", session.log.id_log());
    }
    info!("exiting with {ending:?}");
    Ok(ExitCode::from(ending.exit_code()))
}

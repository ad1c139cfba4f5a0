#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Everlight **
//! A small action-adventure, driven from the terminal.

use std::env;
use std::io::Write;
use std::path::PathBuf;

use everlight_engine::style::GameStyle;
use everlight_engine::{FileStore, load_session, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    let world_path = env::args().nth(1).map(PathBuf::from);
    info!("Start: loading Everlight session...");
    let mut session = load_session(world_path.as_deref()).context("while loading game session")?;
    info!("Session loaded successfully.");

    let save_dir = session
        .config
        .save_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("saved_games"));
    let mut store = FileStore::new(save_dir);

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().context("flushing stdout")?;

    println!("{:^84}", session.title.to_uppercase().bright_yellow().underline());
    println!(
        "\n{}\n",
        "Type 'help' for commands. An empty line advances dialogue.".dialogue_style()
    );

    run_repl(&mut session, &mut store)
}

//! The text driver.
//!
//! Stands in for the rendering, collision and input collaborators: each typed command is
//! turned into session events (or a save/load request), then whatever the session queued in
//! its view is printed.

pub mod hud;
mod input;

use anyhow::Result;
use colored::Colorize;
use everlight_data::Point;
use log::{info, warn};

use crate::command::{Command, DEFAULT_TICK_MS, MAX_TICK_MS, parse_command};
use crate::dispatch::Event;
use crate::enemy::EnemyId;
use crate::persistence::{self, LoadOutcome};
use crate::session::GameSession;
use crate::store::SaveStore;
use crate::style::GameStyle;

use input::{InputEvent, InputManager};

/// Control flow signal used by handlers to exit the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the read-eval-print loop until the player quits or input ends.
///
/// Store failures are reported at the prompt and the game carries on.
///
/// # Errors
/// Currently always returns `Ok`.
pub fn run_repl(session: &mut GameSession, store: &mut dyn SaveStore) -> Result<()> {
    let mut input_manager = InputManager::new();
    let opening = session.drain_view();
    hud::render(session, &opening);
    hud::print_status(session);

    loop {
        let prompt = format!("\n[{} ms|{}]>> ", session.clock_ms(), hud::hearts_line(session))
            .prompt_style()
            .to_string();
        let line = match input_manager.read_line(&prompt) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Eof) => break,
            Ok(InputEvent::Interrupted) => {
                println!("{}", "Command canceled.".dimmed());
                continue;
            },
            Err(err) => {
                warn!("failed to read input: {err}");
                println!("{}", "Failed to read input. Try again.".error_style());
                continue;
            },
        };

        let command = parse_command(&line);
        let control = match execute(session, store, &command) {
            Ok(control) => control,
            Err(e) => {
                warn!("command {command:?} failed: {e:#}");
                println!("{}", format!("That didn't work: {e}").error_style());
                ReplControl::Continue
            },
        };
        let items = session.drain_view();
        hud::render(session, &items);
        if control == ReplControl::Quit {
            break;
        }
    }
    info!("driver exiting at {} ms", session.clock_ms());
    Ok(())
}

/// Advance time in frame-sized steps so per-tick behavior matches a real frame loop.
/// At most [`MAX_TICK_MS`] passes per call.
pub fn run_ticks(session: &mut GameSession, total_ms: u64) {
    let mut remaining = total_ms.min(MAX_TICK_MS);
    while remaining > 0 {
        let step = remaining.min(DEFAULT_TICK_MS);
        session.dispatch(Event::Tick { elapsed_ms: step });
        remaining -= step;
    }
}

/// Carry out one command.
///
/// # Errors
/// Propagates persistence store failures.
pub fn execute(session: &mut GameSession, store: &mut dyn SaveStore, command: &Command) -> Result<ReplControl> {
    match command {
        Command::Tick(ms) => run_ticks(session, *ms),
        Command::Move(direction) => session.dispatch(Event::MoveInput(Some(*direction))),
        Command::Stop => session.dispatch(Event::MoveInput(None)),
        Command::Attack => session.dispatch(Event::AttackPressed),
        Command::Next => session.dispatch(Event::AdvancePressed),
        Command::Touch(id) => session.dispatch(Event::PlayerEnemyContact(EnemyId(*id))),
        Command::Take(instance) => {
            let kind = session
                .world_items
                .iter()
                .find(|item| item.id == *instance)
                .map(|item| item.kind);
            match kind {
                Some(kind) => session.dispatch(Event::PlayerItemOverlap {
                    kind,
                    instance: instance.clone(),
                }),
                None => println!("{}", format!("There is no '{instance}' lying around.").error_style()),
            }
        },
        Command::Switch => session.dispatch(Event::PlayerSwitchOverlap),
        Command::Push(direction) => {
            let block = session.block_position();
            let (ux, uy) = direction.unit();
            let pusher = Point::new(block.x - ux * 16.0, block.y - uy * 16.0);
            session.dispatch(Event::PlayerBlockCollide { pusher, block });
        },
        Command::TalkTo(npc) => session.dispatch(Event::PlayerNpcOverlap(npc.clone())),
        Command::Use(slot) => session.dispatch(Event::UseItem(*slot)),
        Command::Save(slot) => {
            persistence::save(session, store, slot.as_deref())?;
        },
        Command::Load(slot) => {
            if persistence::load(session, store, slot.as_deref()) == LoadOutcome::NothingToLoad {
                println!("{}", "Nothing to load.".dimmed());
            }
        },
        Command::Saves => {
            let saves = persistence::list_saves(store)?;
            if saves.is_empty() {
                println!("{}", "No saved games.".dimmed());
            }
            for key in saves {
                println!("  {key}");
            }
        },
        Command::Status => hud::print_status(session),
        Command::Quests => hud::print_quests(session),
        Command::Help => print_help(),
        Command::Quit => return Ok(ReplControl::Quit),
        Command::Teleport { x, y } => {
            warn!("dev-mode teleport to ({x}, {y})");
            session.vitality.set_position(Point::new(*x, *y));
        },
        Command::Unknown(text) => {
            println!("{}", format!("Didn't quite catch \"{text}\". Try 'help'.").error_style());
        },
    }
    Ok(ReplControl::Continue)
}

fn print_help() {
    const LINES: &[(&str, &str)] = &[
        ("tick [ms] / wait [ms]", "let time pass (default one frame, at most 60 s)"),
        ("move <dir> / <dir>", "hold a direction: up, down, left, right"),
        ("stop", "release the direction"),
        ("attack", "swing the sword"),
        ("next (or empty line)", "advance dialogue"),
        ("talk to <npc>", "walk into an NPC"),
        ("take <item>", "walk over an item"),
        ("touch <enemy id>", "let an enemy bump into you"),
        ("switch", "step on the switch"),
        ("push <dir>", "shove the block"),
        ("use <slot>", "select an inventory slot"),
        ("save [slot] / load [slot] / saves", "persistence"),
        ("status / quests", "show the HUD"),
        ("quit", "leave"),
    ];
    println!("{}", "Commands".section_style());
    for (cmd, what) in LINES {
        println!("  {:<36} {}", cmd.bold(), what.dimmed());
    }
}

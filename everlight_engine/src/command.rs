//! Command module
//!
//! Words typed at the driver prompt, parsed into commands. Most commands become one
//! [`Event`](crate::dispatch::Event); the rest are driver housekeeping (saving, listing, help).
use variantly::Variantly;

use crate::DEV_MODE;
use crate::enemy::Direction;

/// Frame length used by a bare `tick`.
pub const DEFAULT_TICK_MS: u64 = 16;
/// Longest wait a single `tick` may ask for.
pub const MAX_TICK_MS: u64 = 60_000;

/// Commands that can be typed at the prompt.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum Command {
    /// Advance simulated time.
    Tick(u64),
    /// Start holding a direction.
    #[variantly(rename = "walk")]
    Move(Direction),
    /// Release the held direction.
    Stop,
    Attack,
    /// Step the open dialogue.
    Next,
    /// An enemy touches the player.
    Touch(u32),
    /// Walk over a world item.
    Take(String),
    /// Step on the switch.
    Switch,
    /// Shove the block in a direction.
    Push(Direction),
    TalkTo(String),
    /// Select an inventory slot (1-based at the prompt).
    #[variantly(rename = "select")]
    Use(usize),
    Save(Option<String>),
    Load(Option<String>),
    Saves,
    Status,
    Quests,
    Help,
    Quit,
    /// Place the player anywhere (dev-mode only).
    Teleport { x: f32, y: f32 },
    Unknown(String),
}

/// Parse a direction word.
pub fn parse_direction(word: &str) -> Option<Direction> {
    match word {
        "up" | "north" | "n" => Some(Direction::Up),
        "down" | "south" | "s" => Some(Direction::Down),
        "left" | "west" | "w" => Some(Direction::Left),
        "right" | "east" | "e" => Some(Direction::Right),
        _ => None,
    }
}

/// Parses an input line and returns the corresponding `Command`.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let unknown = || Command::Unknown(input.trim().to_string());
    match words.as_slice() {
        ["tick" | "wait" | "t"] => Command::Tick(DEFAULT_TICK_MS),
        ["tick" | "wait" | "t", ms] => match ms.parse::<u64>() {
            Ok(ms) if ms <= MAX_TICK_MS => Command::Tick(ms),
            _ => unknown(),
        },
        ["move" | "go" | "walk", dir] | [dir] if parse_direction(dir).is_some() => {
            parse_direction(dir).map_or_else(unknown, Command::Move)
        },
        ["stop"] => Command::Stop,
        ["attack" | "swing" | "a"] => Command::Attack,
        [] | ["next" | "space"] => Command::Next,
        ["touch" | "hit-by", id] => id
            .trim_start_matches("enemy#")
            .parse()
            .map_or_else(|_| unknown(), Command::Touch),
        ["take" | "get" | "pick", item] | ["pick", "up", item] => Command::Take((*item).to_string()),
        ["switch" | "flip"] | ["step", "on", "switch"] => Command::Switch,
        ["push" | "shove", dir] | ["push" | "shove", "block", dir] => {
            parse_direction(dir).map_or_else(unknown, Command::Push)
        },
        ["talk" | "speak", "to" | "with", npc] | ["talk", npc] => Command::TalkTo((*npc).to_string()),
        ["use" | "select", slot] => match slot.parse::<usize>() {
            Ok(n) if n > 0 => Command::Use(n - 1),
            _ => unknown(),
        },
        ["save"] => Command::Save(None),
        ["save", slot @ ..] => Command::Save(Some(slot.join(" "))),
        ["load"] => Command::Load(None),
        ["load", slot @ ..] => Command::Load(Some(slot.join(" "))),
        ["saves" | "slots"] => Command::Saves,
        ["status" | "look" | "l"] => Command::Status,
        ["quests" | "goals" | "q"] => Command::Quests,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        [":tp" | ":teleport", x, y] if DEV_MODE => match (x.parse::<f32>(), y.parse::<f32>()) {
            (Ok(x), Ok(y)) => Command::Teleport { x, y },
            _ => unknown(),
        },
        _ => unknown(),
    }
}

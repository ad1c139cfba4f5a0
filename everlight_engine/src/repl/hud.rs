//! Text rendering of the HUD and of drained view items.

use colored::Colorize;
use everlight_data::ItemKind;

use crate::GameSession;
use crate::quest::QuestState;
use crate::style::GameStyle;
use crate::view::{Panel, ViewItem};

/// Width used for wrapping long lines.
fn wrap_width() -> usize {
    textwrap::termwidth().clamp(40, 100)
}

fn wrapped(text: &str, indent: &str) -> String {
    let options = textwrap::Options::new(wrap_width())
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

/// `♥♥♥♡♡`
pub fn hearts_line(session: &GameSession) -> String {
    let full = "♥".repeat(session.hearts() as usize);
    let empty = "♡".repeat(session.max_hearts().saturating_sub(session.hearts()) as usize);
    format!("{}{}", full.heart_style(), empty.empty_heart_style())
}

fn item_icon(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Key => "🔑",
        ItemKind::Heart => "♥",
        ItemKind::Potion => "🧪",
        ItemKind::QuestItem => "📜",
    }
}

pub fn inventory_line(session: &GameSession) -> String {
    if session.inventory_items().is_empty() {
        return "(empty)".dimmed().to_string();
    }
    session
        .inventory_items()
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}:{} {}", i + 1, item_icon(*kind), kind.to_string().item_style()))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn quest_lines(session: &GameSession) -> Vec<String> {
    session
        .quest_list()
        .iter()
        .map(|quest| {
            let line = quest.display_line();
            match quest.state {
                QuestState::Completed => line.quest_complete_style().to_string(),
                QuestState::Active => line.quest_active_style().to_string(),
                QuestState::NotStarted => line.dimmed().to_string(),
            }
        })
        .collect()
}

fn puzzle_line(session: &GameSession) -> String {
    let state = session.puzzle_state();
    let door = if state.switch_door_solved {
        "door open".solved_style()
    } else {
        "door locked".dimmed()
    };
    let block = if state.block_solved {
        "block on mark".solved_style()
    } else {
        format!("block at {}", session.block_position()).dimmed()
    };
    format!("{door}, {block}")
}

fn enemy_line(session: &GameSession) -> String {
    let enemies = session.enemy_list();
    if enemies.is_empty() {
        return "none".dimmed().to_string();
    }
    enemies
        .iter()
        .map(|e| format!("{} {} {}", e.id.to_string().enemy_style(), e.position, e.direction))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full status screen.
pub fn print_status(session: &GameSession) {
    println!("{}", session.title.as_str().section_style());
    println!("Hearts    {}", hearts_line(session));
    println!("Position  {} (t = {} ms)", session.player_position(), session.clock_ms());
    println!("Items     {}", inventory_line(session));
    println!("Puzzles   {}", puzzle_line(session));
    println!("Enemies   {}", enemy_line(session));
    let ground = session
        .world_items
        .iter()
        .map(|item| format!("{} {}", item.id.as_str().item_style(), item.position))
        .collect::<Vec<_>>();
    if !ground.is_empty() {
        println!("On ground {}", ground.join(", "));
    }
    print_quests(session);
    if let Some(line) = session.dialogue_line() {
        println!("{}", wrapped(line, "  ").dialogue_style());
    }
}

pub fn print_quests(session: &GameSession) {
    println!("{}", "Quests".section_style());
    for line in quest_lines(session) {
        println!("  {line}");
    }
}

/// Print drained view items. Refresh requests redraw only the panels they name.
pub fn render(session: &GameSession, items: &[ViewItem]) {
    for item in items {
        match item {
            ViewItem::Message(text) => println!("{}", wrapped(text, "» ").message_style()),
            ViewItem::DialogueOpened { npc_id, line } => {
                println!("{}", npc_id.as_str().npc_style());
                println!("{}", wrapped(line, "  ").dialogue_style());
            },
            ViewItem::DialogueLine(line) => println!("{}", wrapped(line, "  ").dialogue_style()),
            ViewItem::DialogueClosed { .. } => println!("{}", "(dialogue closed)".dimmed()),
            ViewItem::QuestActivated { title, .. } => {
                println!("{} {}", "New quest:".quest_active_style(), title);
            },
            ViewItem::QuestCompleted { title, .. } => {
                println!("{} {}", "Quest done:".solved_style(), title);
            },
            ViewItem::Refresh(Panel::Hearts) => println!("Hearts    {}", hearts_line(session)),
            ViewItem::Refresh(Panel::Inventory) => println!("Items     {}", inventory_line(session)),
            ViewItem::Refresh(Panel::Quests) => print_quests(session),
            ViewItem::Refresh(Panel::Puzzles) => println!("Puzzles   {}", puzzle_line(session)),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::loader::builtin_worlddef;

    #[test]
    fn hud_lines_reflect_state() {
        colored::control::set_override(false);
        let mut session = GameSession::new(&builtin_worlddef().unwrap(), EngineConfig::default()).unwrap();
        assert_eq!(hearts_line(&session), "♥♥♥♡♡");
        assert_eq!(inventory_line(&session), "(empty)");
        session.inventory.pickup(ItemKind::Key);
        assert_eq!(inventory_line(&session), "1:🔑 Key");
        assert_eq!(quest_lines(&session)[0], "❔ Find the Lost Key: Not started");
    }
}

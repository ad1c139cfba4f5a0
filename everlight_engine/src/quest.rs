//! Quest Module
//!
//! The quest ledger owns every quest and its lifecycle state. States only move forward:
//! `NotStarted -> Active -> Completed`. Activation comes from dialogue; completion comes
//! from item pickups and solved puzzles, and only ever applies to an already active quest.

use everlight_data::{ItemKind, PuzzleId, QuestDef, Requirement};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::view::{Panel, View, ViewItem};

/// Lifecycle state of a quest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestState {
    NotStarted,
    Active,
    Completed,
}

impl Display for QuestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestState::NotStarted => write!(f, "Not started"),
            QuestState::Active => write!(f, "Active"),
            QuestState::Completed => write!(f, "Completed"),
        }
    }
}

/// A quest and its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub state: QuestState,
    #[serde(rename = "triggerNpcId")]
    pub trigger_npc: String,
    pub requirement: Requirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_message: Option<String>,
}

impl Quest {
    pub fn from_def(def: &QuestDef) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            state: QuestState::NotStarted,
            trigger_npc: def.trigger_npc.clone(),
            requirement: def.requirement,
            completion_message: def.completion_message.clone(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.state {
            QuestState::Completed => "✔️",
            QuestState::Active => "➡️",
            QuestState::NotStarted => "❔",
        }
    }

    /// Text shown next to the title: the description while active, otherwise the state.
    pub fn status_text(&self) -> &str {
        match self.state {
            QuestState::Active => &self.description,
            QuestState::Completed => "Completed",
            QuestState::NotStarted => "Not started",
        }
    }

    /// One line of the quest panel, e.g. `➡️ Find the Lost Key: Find the villager's key.`
    pub fn display_line(&self) -> String {
        format!("{} {}: {}", self.icon(), self.title, self.status_text())
    }

    /// Message to show on completion.
    pub fn completion_text(&self) -> String {
        self.completion_message
            .clone()
            .unwrap_or_else(|| format!("Quest complete: {}", self.title))
    }
}

/// All quests of a session, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestLedger {
    quests: Vec<Quest>,
}

impl QuestLedger {
    pub fn from_defs(defs: &[QuestDef]) -> Self {
        Self {
            quests: defs.iter().map(Quest::from_def).collect(),
        }
    }

    /// Move a quest from `NotStarted` to `Active`.
    ///
    /// Unknown ids and quests that are already active or completed are left alone; returns
    /// true only if a transition happened.
    pub fn activate(&mut self, quest_id: &str, view: &mut View) -> bool {
        let Some(quest) = self.quests.iter_mut().find(|q| q.id == quest_id) else {
            warn!("activate: no quest with id '{quest_id}'");
            return false;
        };
        if quest.state != QuestState::NotStarted {
            return false;
        }
        quest.state = QuestState::Active;
        info!("quest '{}' activated", quest.id);
        view.push(ViewItem::QuestActivated {
            id: quest.id.clone(),
            title: quest.title.clone(),
        });
        view.refresh(Panel::Quests);
        true
    }

    /// Complete the first active quest that requires an item of `kind`.
    pub fn report_item_acquired(&mut self, kind: ItemKind, view: &mut View) -> Option<&Quest> {
        self.complete_first(Requirement::Item(kind), view)
    }

    /// Complete the first active quest that requires `puzzle` to be solved.
    pub fn report_puzzle_solved(&mut self, puzzle: PuzzleId, view: &mut View) -> Option<&Quest> {
        self.complete_first(Requirement::Puzzle(puzzle), view)
    }

    fn complete_first(&mut self, requirement: Requirement, view: &mut View) -> Option<&Quest> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.state == QuestState::Active && q.requirement == requirement)?;
        quest.state = QuestState::Completed;
        info!("quest '{}' completed", quest.id);
        view.push(ViewItem::QuestCompleted {
            id: quest.id.clone(),
            title: quest.title.clone(),
        });
        view.refresh(Panel::Quests);
        Some(quest)
    }

    /// Quests in declaration order.
    pub fn query_all(&self) -> &[Quest] {
        &self.quests
    }

    pub fn get(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn state_of(&self, quest_id: &str) -> Option<QuestState> {
        self.get(quest_id).map(|q| q.state)
    }

    pub fn display_lines(&self) -> Vec<String> {
        self.quests.iter().map(Quest::display_line).collect()
    }

    /// Replace the whole quest list, as loading a save does. Quests missing from `quests`
    /// are dropped.
    pub fn replace_all(&mut self, quests: Vec<Quest>) {
        self.quests = quests;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> QuestLedger {
        QuestLedger::from_defs(&[
            QuestDef {
                id: "findKey".into(),
                title: "Find the Lost Key".into(),
                description: "Help the villager find their key.".into(),
                trigger_npc: "villager".into(),
                requirement: Requirement::Item(ItemKind::Key),
                completion_message: Some("You found the key!".into()),
            },
            QuestDef {
                id: "blockPuzzle".into(),
                title: "Solve the Block Puzzle".into(),
                description: "Push the block onto the target.".into(),
                trigger_npc: "sage".into(),
                requirement: Requirement::Puzzle(PuzzleId::Block),
                completion_message: None,
            },
        ])
    }

    #[test]
    fn activation_only_from_not_started() {
        let mut view = View::new();
        let mut quests = ledger();
        assert!(quests.activate("findKey", &mut view));
        assert!(!quests.activate("findKey", &mut view));
        assert!(!quests.activate("nope", &mut view));
        assert_eq!(quests.state_of("findKey"), Some(QuestState::Active));
        assert!(view.wants_refresh(Panel::Quests));
    }

    #[test]
    fn item_completes_only_active_quest() {
        let mut view = View::new();
        let mut quests = ledger();
        assert!(quests.report_item_acquired(ItemKind::Key, &mut view).is_none());
        assert_eq!(quests.state_of("findKey"), Some(QuestState::NotStarted));

        quests.activate("findKey", &mut view);
        assert!(quests.report_item_acquired(ItemKind::Potion, &mut view).is_none());
        let done = quests.report_item_acquired(ItemKind::Key, &mut view).unwrap();
        assert_eq!(done.completion_text(), "You found the key!");
        assert_eq!(quests.state_of("findKey"), Some(QuestState::Completed));

        // a second key does nothing further
        assert!(quests.report_item_acquired(ItemKind::Key, &mut view).is_none());
    }

    #[test]
    fn puzzle_completion_and_display() {
        let mut view = View::new();
        let mut quests = ledger();
        quests.activate("blockPuzzle", &mut view);
        assert!(quests.report_puzzle_solved(PuzzleId::SwitchDoor, &mut view).is_none());
        let done = quests.report_puzzle_solved(PuzzleId::Block, &mut view).unwrap();
        assert_eq!(done.completion_text(), "Quest complete: Solve the Block Puzzle");

        let lines = quests.display_lines();
        assert_eq!(lines[0], "❔ Find the Lost Key: Not started");
        assert_eq!(lines[1], "✔️ Solve the Block Puzzle: Completed");
    }

    #[test]
    fn quest_serializes_with_camel_case_fields() {
        let quest = Quest::from_def(&QuestDef {
            id: "q".into(),
            title: "T".into(),
            description: "D".into(),
            trigger_npc: "n".into(),
            requirement: Requirement::Item(ItemKind::Key),
            completion_message: None,
        });
        let json = serde_json::to_value(&quest).unwrap();
        assert_eq!(json["triggerNpcId"], "n");
        assert_eq!(json["state"], "notStarted");
        assert!(json.get("completionMessage").is_none());
    }
}

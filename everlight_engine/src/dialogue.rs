//! Dialogue Module
//!
//! NPCs speak canned line sequences chosen by the state of the quest they give out. At most
//! one conversation runs at a time; while it does, the session ignores player movement and
//! attacks. Stepping onto the accept sentinel line activates the NPC's quest.

use everlight_data::{NpcDef, Point};
use log::{debug, info, warn};

use crate::quest::{QuestLedger, QuestState};
use crate::view::{Panel, View, ViewItem};

/// Line that, when reached by advancing, accepts the speaker's quest.
pub const ACCEPT_QUEST_LINE: &str = "[Press SPACE to accept quest]";

/// A non-playable character who hands out one quest.
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub position: Point,
    pub quest_id: String,
    not_started: Vec<String>,
    in_progress: Vec<String>,
    completed: Vec<String>,
}

impl Npc {
    pub fn from_def(def: &NpcDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            position: def.position,
            quest_id: def.quest.clone(),
            not_started: def.dialogue.not_started.clone(),
            in_progress: def.dialogue.in_progress.clone(),
            completed: def.dialogue.completed.clone(),
        }
    }

    /// The line sequence for the given state of this NPC's quest.
    pub fn lines_for(&self, state: QuestState) -> &[String] {
        match state {
            QuestState::NotStarted => &self.not_started,
            QuestState::Active => &self.in_progress,
            QuestState::Completed => &self.completed,
        }
    }
}

/// A conversation in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueSession {
    pub npc_id: String,
    pub quest_id: String,
    pub lines: Vec<String>,
    pub index: usize,
}

impl DialogueSession {
    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.index).map(String::as_str)
    }
}

/// What an `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// No conversation was running.
    Idle,
    /// Moved to the next line. `accepted_quest` is set only when that line moved a quest
    /// from not started to active.
    Line { accepted_quest: Option<String> },
    /// The last line was passed and the conversation ended.
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    session: Option<DialogueSession>,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DialogueSession> {
        self.session.as_ref()
    }

    pub fn current_line(&self) -> Option<&str> {
        self.session.as_ref().and_then(DialogueSession::current_line)
    }

    /// Open a conversation with `npc_id`.
    ///
    /// Ignored (returns false) while another conversation is running, or if the NPC or its
    /// quest cannot be found.
    pub fn start(&mut self, npc_id: &str, npcs: &[Npc], quests: &QuestLedger, view: &mut View) -> bool {
        if let Some(session) = &self.session {
            debug!("dialogue with '{}' already running, ignoring '{npc_id}'", session.npc_id);
            return false;
        }
        let Some(npc) = npcs.iter().find(|n| n.id == npc_id) else {
            warn!("start dialogue: no npc with id '{npc_id}'");
            return false;
        };
        let Some(state) = quests.state_of(&npc.quest_id) else {
            warn!("start dialogue: npc '{npc_id}' refers to unknown quest '{}'", npc.quest_id);
            return false;
        };
        let lines = npc.lines_for(state).to_vec();
        let Some(first) = lines.first().cloned() else {
            warn!("start dialogue: npc '{npc_id}' has nothing to say while quest is {state:?}");
            return false;
        };

        info!("dialogue with '{npc_id}' opened ({} lines, quest {state:?})", lines.len());
        view.push(ViewItem::DialogueOpened {
            npc_id: npc_id.to_string(),
            line: first,
        });
        view.refresh(Panel::Dialogue);
        self.session = Some(DialogueSession {
            npc_id: npc.id.clone(),
            quest_id: npc.quest_id.clone(),
            lines,
            index: 0,
        });
        true
    }

    /// Step to the next line, activating the speaker's quest if that line is the accept
    /// sentinel, or close the conversation after its last line.
    pub fn advance(&mut self, quests: &mut QuestLedger, view: &mut View) -> Advance {
        let Some(session) = self.session.as_mut() else {
            return Advance::Idle;
        };
        session.index += 1;
        let Some(line) = session.lines.get(session.index).cloned() else {
            self.close(view);
            return Advance::Closed;
        };

        view.push(ViewItem::DialogueLine(line.clone()));
        view.refresh(Panel::Dialogue);
        let accepted_quest = if line == ACCEPT_QUEST_LINE && quests.activate(&session.quest_id, view) {
            Some(session.quest_id.clone())
        } else {
            None
        };
        Advance::Line { accepted_quest }
    }

    /// End the conversation, if any.
    pub fn close(&mut self, view: &mut View) {
        if let Some(session) = self.session.take() {
            info!("dialogue with '{}' closed", session.npc_id);
            view.push(ViewItem::DialogueClosed {
                npc_id: session.npc_id,
            });
            view.refresh(Panel::Dialogue);
        }
    }
}

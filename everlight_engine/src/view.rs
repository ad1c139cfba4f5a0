//! View module.
//!
//! Rather than poking the presentation layer from every handler, the core aggregates what
//! happened while handling a trigger as `ViewItem`s. The presentation collaborator drains the
//! queue once per frame and refreshes whatever panels were flagged.

use everlight_data::{Point, PuzzleId};
use variantly::Variantly;

use crate::enemy::EnemyId;

/// On-screen areas that can be asked to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Hearts,
    Inventory,
    Quests,
    Dialogue,
    Message,
    Puzzles,
    Enemies,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::Hearts,
        Panel::Inventory,
        Panel::Quests,
        Panel::Dialogue,
        Panel::Message,
        Panel::Puzzles,
        Panel::Enemies,
    ];
}

/// Things the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ViewItem {
    Message(String),
    MessageCleared,
    QuestActivated {
        id: String,
        title: String,
    },
    QuestCompleted {
        id: String,
        title: String,
    },
    DialogueOpened {
        npc_id: String,
        line: String,
    },
    DialogueLine(String),
    DialogueClosed {
        npc_id: String,
    },
    PlayerHarmed {
        amount: u32,
        hearts: u32,
    },
    PlayerHealed {
        amount: u32,
        hearts: u32,
    },
    PlayerRespawned {
        position: Point,
    },
    ItemCollected {
        instance_id: String,
    },
    EnemySpawned {
        id: EnemyId,
        position: Point,
    },
    EnemyDefeated {
        id: EnemyId,
    },
    SwitchActivated,
    BlockMoved {
        position: Point,
    },
    PuzzleSolved(PuzzleId),
    GameSaved {
        key: String,
    },
    GameLoaded {
        key: String,
    },
    Refresh(Panel),
}

/// Queue of `ViewItem`s produced since the last drain.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub items: Vec<ViewItem>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Flag a panel for redraw. Repeated requests before the next drain collapse into one.
    pub fn refresh(&mut self, panel: Panel) {
        let request = ViewItem::Refresh(panel);
        if !self.items.contains(&request) {
            self.items.push(request);
        }
    }

    /// Flag every panel for redraw.
    pub fn refresh_all(&mut self) {
        for panel in Panel::ALL {
            self.refresh(panel);
        }
    }

    /// Take everything queued so far, leaving the view empty.
    pub fn drain(&mut self) -> Vec<ViewItem> {
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if a refresh of `panel` is pending.
    pub fn wants_refresh(&self, panel: Panel) -> bool {
        self.items.contains(&ViewItem::Refresh(panel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_requests_are_deduplicated() {
        let mut view = View::new();
        view.refresh(Panel::Hearts);
        view.push(ViewItem::Message("hi".into()));
        view.refresh(Panel::Hearts);
        assert_eq!(view.items.len(), 2);
        assert!(view.wants_refresh(Panel::Hearts));
        assert!(!view.wants_refresh(Panel::Quests));
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut view = View::new();
        view.refresh_all();
        let drained = view.drain();
        assert_eq!(drained.len(), Panel::ALL.len());
        assert!(view.is_empty());
        view.refresh(Panel::Quests);
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn variant_helpers_identify_items() {
        let item = ViewItem::Message("Door unlocked!".into());
        assert!(item.is_message());
        assert!(!item.is_refresh());
    }
}

//! The game session.
//!
//! [`GameSession`] owns every piece of mutable progression state: vitality, inventory, quest
//! ledger, dialogue, enemies, puzzles, world items and timers. Collaborators change it only
//! through [`GameSession::dispatch`] and the persistence functions, and observe it through
//! the read-only queries here plus the drained [`View`].

use anyhow::{Context, Result};
use everlight_data::{ItemKind, Point, WorldDef};
use log::{debug, info};

use crate::config::EngineConfig;
use crate::dialogue::{DialogueEngine, Npc};
use crate::enemy::{Direction, Enemy, EnemyManager};
use crate::inventory::Inventory;
use crate::loader::validate_worlddef;
use crate::puzzle::{PuzzleState, Puzzles};
use crate::quest::{Quest, QuestLedger};
use crate::timers::{TimerKind, Timers};
use crate::view::{Panel, View, ViewItem};
use crate::vitality::Vitality;

/// An item instance still lying in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldItem {
    pub id: String,
    pub kind: ItemKind,
    pub position: Point,
}

/// Complete state of a running game.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub title: String,
    pub slug: String,
    pub version: String,
    pub config: EngineConfig,
    pub vitality: Vitality,
    pub inventory: Inventory,
    pub quests: QuestLedger,
    pub dialogue: DialogueEngine,
    pub npcs: Vec<Npc>,
    pub enemies: EnemyManager,
    pub puzzles: Puzzles,
    pub world_items: Vec<WorldItem>,
    pub timers: Timers,
    pub view: View,
    pub(crate) clock_ms: u64,
    pub(crate) is_attacking: bool,
    pub(crate) move_input: Option<Direction>,
    pub(crate) active_quest: Option<String>,
    pub(crate) message: Option<String>,
}

impl GameSession {
    /// Build a session from validated content.
    ///
    /// Enemies fill every spawn point and the repeating respawn check is scheduled.
    ///
    /// # Errors
    /// Returns an error listing every problem `validate_world` finds in `world`.
    pub fn new(world: &WorldDef, mut config: EngineConfig) -> Result<Self> {
        validate_worlddef(world).context("while building game session")?;
        (config.world_width, config.world_height) = config.world_bounds();

        let mut session = Self {
            title: world.game.title.clone(),
            slug: world.game.slug.clone(),
            version: world.game.version.clone(),
            vitality: Vitality::new(&world.game.player),
            inventory: Inventory::new(),
            quests: QuestLedger::from_defs(&world.quests),
            dialogue: DialogueEngine::new(),
            npcs: world.npcs.iter().map(Npc::from_def).collect(),
            enemies: EnemyManager::new(&world.enemies.spawn_points, &config),
            puzzles: Puzzles::new(&world.puzzles, config.block_step),
            world_items: world
                .items
                .iter()
                .map(|def| WorldItem {
                    id: def.id.clone(),
                    kind: def.kind,
                    position: def.position,
                })
                .collect(),
            timers: Timers::new(),
            view: View::new(),
            clock_ms: 0,
            is_attacking: false,
            move_input: None,
            active_quest: None,
            message: None,
            config,
        };
        session.enemies.spawn_missing(&mut session.view);
        session
            .timers
            .schedule(TimerKind::EnemyRespawn, 0, session.config.respawn_interval_ms);
        session.view.refresh_all();
        info!(
            "game session '{}' started: {} quests, {} npcs, {} items, {} enemies",
            session.title,
            session.quests.query_all().len(),
            session.npcs.len(),
            session.world_items.len(),
            session.enemies.live_count()
        );
        Ok(session)
    }

    /// Show a transient message. It is cleared after `message_duration_ms` unless a newer
    /// message replaces it first.
    pub fn log_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!("message: {text}");
        self.view.push(ViewItem::Message(text.clone()));
        self.view.refresh(Panel::Message);
        self.message = Some(text);
        self.timers
            .schedule(TimerKind::MessageClear, self.clock_ms, self.config.message_duration_ms);
    }

    pub(crate) fn clear_message(&mut self) {
        if self.message.take().is_some() {
            debug!("message cleared at {} ms", self.clock_ms);
            self.view.push(ViewItem::MessageCleared);
            self.view.refresh(Panel::Message);
        }
    }

    /// Take everything the presentation layer has not seen yet.
    pub fn drain_view(&mut self) -> Vec<ViewItem> {
        self.view.drain()
    }

    /// Elapsed simulated time.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn hearts(&self) -> u32 {
        self.vitality.hearts()
    }

    pub fn max_hearts(&self) -> u32 {
        self.vitality.max_hearts()
    }

    pub fn player_position(&self) -> Point {
        self.vitality.position()
    }

    pub fn inventory_items(&self) -> &[ItemKind] {
        self.inventory.items()
    }

    pub fn quest_list(&self) -> &[Quest] {
        self.quests.query_all()
    }

    /// The quest most recently accepted through dialogue, if it still exists.
    pub fn active_quest(&self) -> Option<&Quest> {
        self.active_quest.as_deref().and_then(|id| self.quests.get(id))
    }

    pub fn dialogue_visible(&self) -> bool {
        self.dialogue.is_active()
    }

    pub fn dialogue_line(&self) -> Option<&str> {
        self.dialogue.current_line()
    }

    /// The transient message currently on screen.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn puzzle_state(&self) -> PuzzleState {
        self.puzzles.state()
    }

    pub fn door_open(&self) -> bool {
        self.puzzles.door_open()
    }

    pub fn block_position(&self) -> Point {
        self.puzzles.block_position()
    }

    /// Living enemies for rendering.
    pub fn enemy_list(&self) -> Vec<&Enemy> {
        self.enemies.enemies().collect()
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn move_input(&self) -> Option<Direction> {
        self.move_input
    }
}

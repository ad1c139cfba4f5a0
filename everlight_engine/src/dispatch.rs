//! Event dispatch.
//!
//! Every trigger the collision, input and frame collaborators can raise is an [`Event`].
//! [`GameSession::dispatch`] routes each one to the components that own the affected state,
//! in a fixed order, so the whole core can be driven without a live engine.

use everlight_data::{ItemKind, Point, PuzzleId};
use log::{debug, info};
use variantly::Variantly;

use crate::dialogue::Advance;
use crate::enemy::{Direction, EnemyId, HitOutcome};
use crate::session::GameSession;
use crate::timers::TimerKind;
use crate::view::{Panel, ViewItem};
use crate::vitality::DamageOutcome;

/// Triggers consumed by the session.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum Event {
    /// One frame of simulated time.
    Tick { elapsed_ms: u64 },
    /// Direction currently held, or `None` when no direction key is down.
    MoveInput(Option<Direction>),
    PlayerEnemyContact(EnemyId),
    PlayerItemOverlap { kind: ItemKind, instance: String },
    PlayerSwitchOverlap,
    PlayerBlockCollide { pusher: Point, block: Point },
    PlayerNpcOverlap(String),
    AttackPressed,
    AdvancePressed,
    /// Inventory slot selected.
    UseItem(usize),
}

impl GameSession {
    /// Apply one event to the session.
    pub fn dispatch(&mut self, event: Event) {
        debug!("dispatching {event:?} at {} ms", self.clock_ms);
        match event {
            Event::Tick { elapsed_ms } => self.tick(elapsed_ms),
            Event::MoveInput(direction) => self.set_move_input(direction),
            Event::PlayerEnemyContact(id) => self.enemy_contact(id),
            Event::PlayerItemOverlap { kind, instance } => self.item_overlap(kind, &instance),
            Event::PlayerSwitchOverlap => self.switch_overlap(),
            Event::PlayerBlockCollide { pusher, block } => {
                self.puzzles.push_block(pusher, block, &mut self.view);
            },
            Event::PlayerNpcOverlap(npc_id) => self.npc_overlap(&npc_id),
            Event::AttackPressed => self.attack(),
            Event::AdvancePressed => self.advance_dialogue(),
            Event::UseItem(index) => self.use_item(index),
        }
    }

    fn tick(&mut self, elapsed_ms: u64) {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);

        let mut respawn_due = false;
        while let Some((kind, handle)) = self.timers.pop_due(self.clock_ms) {
            debug!("timer {kind:?} {handle:?} fired at {} ms", self.clock_ms);
            match kind {
                TimerKind::AttackLockout => self.is_attacking = false,
                TimerKind::MessageClear => self.clear_message(),
                TimerKind::EnemyRespawn => {
                    respawn_due = true;
                    self.timers
                        .schedule(TimerKind::EnemyRespawn, self.clock_ms, self.config.respawn_interval_ms);
                },
            }
        }

        if !self.dialogue.is_active()
            && !self.is_attacking
            && let Some(direction) = self.move_input
        {
            let distance = self.config.player_speed * (elapsed_ms as f32 / 1000.0);
            let (ux, uy) = direction.unit();
            self.vitality.move_by(
                ux * distance,
                uy * distance,
                self.config.world_width,
                self.config.world_height,
            );
        }

        self.enemies.patrol(elapsed_ms);

        if respawn_due && self.enemies.live_count() < self.enemies.cap() {
            self.enemies.spawn_missing(&mut self.view);
        }

        if self.puzzles.check_block(&mut self.view) {
            self.log_message("Block puzzle solved!");
            self.report_puzzle(PuzzleId::Block);
        }

        if self.enemies.live_count() > 0 {
            self.view.refresh(Panel::Enemies);
        }
    }

    fn set_move_input(&mut self, direction: Option<Direction>) {
        if self.dialogue.is_active() {
            return;
        }
        self.move_input = direction;
    }

    fn enemy_contact(&mut self, id: EnemyId) {
        if self.dialogue.is_active() || self.enemies.get(id).is_none() {
            return;
        }
        match self.vitality.damage(self.config.contact_damage, &mut self.view) {
            DamageOutcome::Unharmed => {},
            DamageOutcome::Harmed { .. } => self.log_message("Ouch! You lost a heart."),
            DamageOutcome::Respawned => {
                self.log_message("Ouch! You lost a heart.");
                self.log_message("You died! Respawned.");
            },
        }
        if self.enemies.apply_hit(id, 1, &mut self.view) == HitOutcome::Destroyed {
            self.log_message("Enemy defeated!");
        }
    }

    fn item_overlap(&mut self, kind: ItemKind, instance: &str) {
        let Some(pos) = self.world_items.iter().position(|item| item.id == instance) else {
            debug!("item instance '{instance}' already collected or unknown");
            return;
        };
        let item = self.world_items.remove(pos);
        if item.kind != kind {
            debug!("item '{instance}' reported as {kind} but defined as {}", item.kind);
        }

        if kind == ItemKind::Heart {
            self.vitality.heal(1, &mut self.view);
        }
        let line = self.inventory.pickup(kind);
        self.view.push(ViewItem::ItemCollected {
            instance_id: item.id,
        });
        self.view.refresh(Panel::Inventory);
        self.log_message(line);

        if let Some(text) = self
            .quests
            .report_item_acquired(kind, &mut self.view)
            .map(|quest| quest.completion_text())
        {
            self.log_message(text);
        }
    }

    fn switch_overlap(&mut self) {
        if self.puzzles.activate_switch(&self.inventory, &mut self.view) {
            self.log_message("Door unlocked!");
            self.report_puzzle(PuzzleId::SwitchDoor);
        }
    }

    fn report_puzzle(&mut self, puzzle: PuzzleId) {
        if let Some(text) = self
            .quests
            .report_puzzle_solved(puzzle, &mut self.view)
            .map(|quest| quest.completion_text())
        {
            self.log_message(text);
        }
    }

    fn npc_overlap(&mut self, npc_id: &str) {
        if self
            .dialogue
            .start(npc_id, &self.npcs, &self.quests, &mut self.view)
        {
            self.move_input = None;
        }
    }

    fn attack(&mut self) {
        if self.is_attacking || self.dialogue.is_active() {
            debug!("attack ignored (attacking: {}, dialogue: {})", self.is_attacking, self.dialogue.is_active());
            return;
        }
        self.is_attacking = true;
        self.timers
            .schedule(TimerKind::AttackLockout, self.clock_ms, self.config.attack_lockout_ms);
        let defeated =
            self.enemies
                .defeat_in_range(self.vitality.position(), self.config.attack_range, &mut self.view);
        for _ in &defeated {
            self.log_message("Enemy defeated!");
        }
    }

    fn advance_dialogue(&mut self) {
        if let Advance::Line {
            accepted_quest: Some(quest_id),
        } = self.dialogue.advance(&mut self.quests, &mut self.view)
        {
            info!("quest '{quest_id}' is now the active quest");
            self.active_quest = Some(quest_id);
        }
    }

    fn use_item(&mut self, index: usize) {
        let Some(kind) = self.inventory.get(index) else {
            debug!("no inventory item in slot {index}");
            return;
        };
        if kind == ItemKind::Potion && !self.vitality.is_full() && self.inventory.consume(index, kind) {
            self.vitality.heal(1, &mut self.view);
            self.view.refresh(Panel::Inventory);
            self.log_message("Used a potion!");
        } else {
            self.log_message(format!("Selected: {kind}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::loader::builtin_worlddef;

    fn session() -> GameSession {
        let config = EngineConfig {
            rng_seed: Some(11),
            enemy_turn_chance: 0.0,
            ..EngineConfig::default()
        };
        GameSession::new(&builtin_worlddef().unwrap(), config).unwrap()
    }

    #[test]
    fn attack_locks_out_until_timer_fires() {
        let mut s = session();
        s.dispatch(Event::AttackPressed);
        assert!(s.is_attacking());
        s.dispatch(Event::MoveInput(Some(Direction::Right)));
        s.dispatch(Event::Tick { elapsed_ms: 100 });
        assert_eq!(s.player_position(), s.vitality.spawn());

        // the lockout expires at 400 ms; movement resumes within the same tick
        s.dispatch(Event::Tick { elapsed_ms: 300 });
        assert!(!s.is_attacking());
        assert!((s.player_position().x - 136.0).abs() < 1e-3);
        s.dispatch(Event::Tick { elapsed_ms: 500 });
        assert!((s.player_position().x - 196.0).abs() < 1e-3);
    }

    #[test]
    fn attack_defeats_enemies_in_range() {
        let mut s = session();
        s.vitality.set_position(Point::new(360.0, 200.0));
        s.dispatch(Event::AttackPressed);
        assert_eq!(s.enemies.live_count(), 2);
        assert_eq!(s.message(), Some("Enemy defeated!"));
    }

    #[test]
    fn heart_pickup_heals_and_is_stored() {
        let mut s = session();
        s.dispatch(Event::PlayerItemOverlap {
            kind: ItemKind::Heart,
            instance: "heart".into(),
        });
        assert_eq!(s.hearts(), 4);
        assert_eq!(s.inventory_items(), &[ItemKind::Heart]);
        assert!(s.world_items.iter().all(|i| i.id != "heart"));

        // the instance is gone; a repeated overlap does nothing
        s.dispatch(Event::PlayerItemOverlap {
            kind: ItemKind::Heart,
            instance: "heart".into(),
        });
        assert_eq!(s.hearts(), 4);
        assert_eq!(s.inventory.len(), 1);
    }

    #[test]
    fn potion_used_only_below_max() {
        let mut s = session();
        s.dispatch(Event::PlayerItemOverlap {
            kind: ItemKind::Potion,
            instance: "potion".into(),
        });
        s.dispatch(Event::UseItem(0));
        assert_eq!(s.hearts(), 4);
        assert!(s.inventory.is_empty());
        assert_eq!(s.message(), Some("Used a potion!"));

        s.vitality.restore(5, s.player_position());
        s.inventory.pickup(ItemKind::Potion);
        s.dispatch(Event::UseItem(0));
        assert_eq!(s.inventory.len(), 1);
        assert_eq!(s.message(), Some("Selected: Potion"));
    }

    #[test]
    fn message_clear_uses_latest_message() {
        let mut s = session();
        s.log_message("first");
        s.dispatch(Event::Tick { elapsed_ms: 1000 });
        s.log_message("second");
        s.dispatch(Event::Tick { elapsed_ms: 900 });
        assert_eq!(s.message(), Some("second"));
        s.dispatch(Event::Tick { elapsed_ms: 900 });
        assert!(s.message().is_none());
    }

    #[test]
    fn npc_overlap_clears_held_input() {
        let mut s = session();
        s.dispatch(Event::MoveInput(Some(Direction::Down)));
        s.dispatch(Event::PlayerNpcOverlap("villager".into()));
        assert!(s.dialogue_visible());
        assert!(s.move_input().is_none());
    }
}

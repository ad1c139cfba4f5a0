//! Vitality Module
//!
//! Tracks the player's hearts and position, including death and respawn.
use std::cmp;

use everlight_data::{PlayerDef, Point};
use log::info;
use serde::{Deserialize, Serialize};

use crate::view::{Panel, View, ViewItem};

/// Result of applying damage to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing was lost (zero damage).
    Unharmed,
    /// Hearts went down but the player is still standing.
    Harmed { hearts: u32 },
    /// Hearts reached zero; the player has been reset at the spawn point.
    Respawned,
}

/// Hearts and position of the player.
///
/// `hearts` stays within `[0, max_hearts]` at all times. Damage and healing are the only
/// mutators of hearts during play; [`Vitality::restore`] is reserved for loading a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitality {
    hearts: u32,
    max_hearts: u32,
    position: Point,
    spawn: Point,
}

impl Vitality {
    /// Create vitality from the player definition, placed at the spawn point.
    pub fn new(def: &PlayerDef) -> Self {
        let max_hearts = def.max_hearts.max(1);
        Self {
            hearts: def.hearts.min(max_hearts),
            max_hearts,
            position: def.spawn,
            spawn: def.spawn,
        }
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn max_hearts(&self) -> u32 {
        self.max_hearts
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn spawn(&self) -> Point {
        self.spawn
    }

    pub fn is_full(&self) -> bool {
        self.hearts >= self.max_hearts
    }

    /// Remove hearts, saturating at zero. Reaching zero respawns the player at once.
    pub fn damage(&mut self, amount: u32, view: &mut View) -> DamageOutcome {
        if amount == 0 {
            return DamageOutcome::Unharmed;
        }
        self.hearts = self.hearts.saturating_sub(amount);
        view.push(ViewItem::PlayerHarmed {
            amount,
            hearts: self.hearts,
        });
        view.refresh(Panel::Hearts);
        if self.hearts == 0 {
            self.respawn(view);
            DamageOutcome::Respawned
        } else {
            info!("player harmed (-{amount}), {} of {} hearts left", self.hearts, self.max_hearts);
            DamageOutcome::Harmed { hearts: self.hearts }
        }
    }

    /// Add hearts, saturating at max. Returns how many hearts were actually gained.
    pub fn heal(&mut self, amount: u32, view: &mut View) -> u32 {
        let before = self.hearts;
        self.hearts = cmp::min(self.max_hearts, self.hearts.saturating_add(amount));
        let gained = self.hearts - before;
        if gained > 0 {
            info!("player healed (+{gained}), {} of {} hearts", self.hearts, self.max_hearts);
            view.push(ViewItem::PlayerHealed {
                amount: gained,
                hearts: self.hearts,
            });
            view.refresh(Panel::Hearts);
        }
        gained
    }

    /// Back to full hearts at the spawn point.
    pub fn respawn(&mut self, view: &mut View) {
        self.hearts = self.max_hearts;
        self.position = self.spawn;
        info!("player respawned at {} with {} hearts", self.spawn, self.hearts);
        view.push(ViewItem::PlayerRespawned { position: self.spawn });
        view.refresh(Panel::Hearts);
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Move by `(dx, dy)`, staying inside a `width` x `height` world.
    pub fn move_by(&mut self, dx: f32, dy: f32, width: f32, height: f32) {
        self.position = Point::new(
            (self.position.x + dx).clamp(0.0, width),
            (self.position.y + dy).clamp(0.0, height),
        );
    }

    /// Overwrite hearts and position from a saved game. Hearts are clamped to `[0, max]`.
    pub fn restore(&mut self, hearts: u32, position: Point) {
        self.hearts = hearts.min(self.max_hearts);
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitality(hearts: u32) -> Vitality {
        Vitality::new(&PlayerDef {
            spawn: Point::new(100.0, 100.0),
            hearts,
            max_hearts: 5,
        })
    }

    #[test]
    fn damage_saturates_and_respawns_at_zero() {
        let mut view = View::new();
        let mut vit = vitality(1);
        vit.set_position(Point::new(250.0, 300.0));
        assert_eq!(vit.damage(3, &mut view), DamageOutcome::Respawned);
        assert_eq!(vit.hearts(), 5);
        assert_eq!(vit.position(), Point::new(100.0, 100.0));
        assert!(view.items.iter().any(ViewItem::is_player_respawned));
    }

    #[test]
    fn heal_is_capped_at_max() {
        let mut view = View::new();
        let mut vit = vitality(4);
        assert_eq!(vit.heal(3, &mut view), 1);
        assert_eq!(vit.hearts(), 5);
        assert_eq!(vit.heal(1, &mut view), 0);
    }

    #[test]
    fn zero_amounts_change_nothing() {
        let mut view = View::new();
        let mut vit = vitality(3);
        assert_eq!(vit.damage(0, &mut view), DamageOutcome::Unharmed);
        assert_eq!(vit.heal(0, &mut view), 0);
        assert_eq!(vit.hearts(), 3);
        assert!(view.is_empty());
    }

    #[test]
    fn movement_is_clamped_to_world() {
        let mut vit = vitality(3);
        vit.move_by(-500.0, 1000.0, 800.0, 600.0);
        assert_eq!(vit.position(), Point::new(0.0, 600.0));
    }

    #[test]
    fn restore_clamps_hearts() {
        let mut vit = vitality(3);
        vit.restore(99, Point::new(1.0, 2.0));
        assert_eq!(vit.hearts(), 5);
        assert_eq!(vit.position(), Point::new(1.0, 2.0));
    }
}

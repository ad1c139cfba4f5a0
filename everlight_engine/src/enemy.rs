//! Enemy Module
//!
//! Spawning, patrolling and destroying enemies. Each spawn point is a slot that holds at
//! most one living enemy, so the number of spawn points is the population cap.

use std::fmt::Display;

use everlight_data::Point;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::view::{Panel, View, ViewItem};

/// Session-unique enemy identifier. Respawned enemies get fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

impl Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Cardinal patrol directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step in world coordinates (y grows downward).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    /// Index of the spawn point this enemy occupies.
    pub slot: usize,
    pub position: Point,
    pub direction: Direction,
    pub health: u32,
    pub alive: bool,
}

/// Result of hitting an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// No living enemy with that id.
    Ignored,
    Wounded { remaining: u32 },
    Destroyed,
}

/// Owns every living enemy and the random source that drives their patrols.
#[derive(Debug, Clone)]
pub struct EnemyManager {
    spawn_points: Vec<Point>,
    slots: Vec<Option<Enemy>>,
    next_id: u32,
    speed: f32,
    health: u32,
    turn_chance: f64,
    bounds: (f32, f32),
    rng: StdRng,
}

impl EnemyManager {
    /// Create a manager with empty slots. Nothing spawns until `spawn_missing` is called.
    pub fn new(spawn_points: &[Point], config: &EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            spawn_points: spawn_points.to_vec(),
            slots: vec![None; spawn_points.len()],
            next_id: 1,
            speed: config.enemy_speed,
            health: config.enemy_health.max(1),
            turn_chance: config.turn_chance(),
            bounds: config.world_bounds(),
            rng,
        }
    }

    /// Population cap.
    pub fn cap(&self) -> usize {
        self.spawn_points.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().filter(|e| e.alive).count()
    }

    /// Living enemies in slot order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter().flatten().filter(|e| e.alive)
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies().find(|e| e.id == id)
    }

    /// Fill every free spawn slot with a fresh enemy. Returns how many were spawned.
    pub fn spawn_missing(&mut self, view: &mut View) -> usize {
        let mut spawned = 0;
        for slot in 0..self.slots.len() {
            if self.slots[slot].as_ref().is_some_and(|e| e.alive) {
                continue;
            }
            let id = EnemyId(self.next_id);
            self.next_id += 1;
            let direction = self.random_direction();
            let position = self.spawn_points[slot];
            self.slots[slot] = Some(Enemy {
                id,
                slot,
                position,
                direction,
                health: self.health,
                alive: true,
            });
            debug!("{id} spawned at {position} heading {direction}");
            view.push(ViewItem::EnemySpawned { id, position });
            spawned += 1;
        }
        if spawned > 0 {
            info!("{spawned} enemies spawned ({} of {} alive)", self.live_count(), self.cap());
            view.refresh(Panel::Enemies);
        }
        spawned
    }

    /// Advance every living enemy along its heading, then maybe turn it.
    pub fn patrol(&mut self, elapsed_ms: u64) {
        let step = self.speed * (elapsed_ms as f32 / 1000.0);
        let (width, height) = self.bounds;
        for slot in 0..self.slots.len() {
            let turn = self.rng.random_bool(self.turn_chance);
            let new_direction = if turn { Some(self.random_direction()) } else { None };
            let Some(enemy) = self.slots[slot].as_mut().filter(|e| e.alive) else {
                continue;
            };
            let (ux, uy) = enemy.direction.unit();
            enemy.position = Point::new(
                (enemy.position.x + ux * step).clamp(0.0, width),
                (enemy.position.y + uy * step).clamp(0.0, height),
            );
            if let Some(direction) = new_direction {
                enemy.direction = direction;
            }
        }
    }

    /// Take `damage` from an enemy's health, destroying it at zero.
    pub fn apply_hit(&mut self, id: EnemyId, damage: u32, view: &mut View) -> HitOutcome {
        let Some(enemy) = self.find_mut(id) else {
            return HitOutcome::Ignored;
        };
        enemy.health = enemy.health.saturating_sub(damage);
        if enemy.health == 0 {
            self.defeat(id, view);
            HitOutcome::Destroyed
        } else {
            debug!("{id} wounded, {} health left", enemy.health);
            HitOutcome::Wounded {
                remaining: enemy.health,
            }
        }
    }

    /// Destroy an enemy outright, freeing its slot. Returns false if it was not alive.
    pub fn defeat(&mut self, id: EnemyId, view: &mut View) -> bool {
        let Some(slot) = self.find_mut(id).map(|e| e.slot) else {
            return false;
        };
        self.slots[slot] = None;
        info!("{id} defeated ({} of {} alive)", self.live_count(), self.cap());
        view.push(ViewItem::EnemyDefeated { id });
        view.refresh(Panel::Enemies);
        true
    }

    /// Destroy every living enemy strictly closer than `range` to `center`.
    pub fn defeat_in_range(&mut self, center: Point, range: f32, view: &mut View) -> Vec<EnemyId> {
        let targets: Vec<EnemyId> = self
            .enemies()
            .filter(|e| e.position.distance(center) < range)
            .map(|e| e.id)
            .collect();
        for id in &targets {
            self.defeat(*id, view);
        }
        targets
    }

    fn find_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots.iter_mut().flatten().find(|e| e.alive && e.id == id)
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> EnemyManager {
        let config = EngineConfig {
            rng_seed: Some(42),
            ..EngineConfig::default()
        };
        EnemyManager::new(
            &[
                Point::new(300.0, 200.0),
                Point::new(360.0, 200.0),
                Point::new(420.0, 200.0),
            ],
            &config,
        )
    }

    #[test]
    fn spawn_fills_only_free_slots() {
        let mut view = View::new();
        let mut enemies = manager();
        assert_eq!(enemies.spawn_missing(&mut view), 3);
        assert_eq!(enemies.spawn_missing(&mut view), 0);

        let first = enemies.enemies().next().unwrap().id;
        assert!(enemies.defeat(first, &mut view));
        assert_eq!(enemies.live_count(), 2);
        assert_eq!(enemies.spawn_missing(&mut view), 1);
        assert_eq!(enemies.live_count(), 3);
        assert!(enemies.get(first).is_none());
    }

    #[test]
    fn hits_wound_then_destroy() {
        let mut view = View::new();
        let mut enemies = manager();
        enemies.spawn_missing(&mut view);
        let id = enemies.enemies().next().unwrap().id;
        assert_eq!(enemies.apply_hit(id, 1, &mut view), HitOutcome::Wounded { remaining: 1 });
        assert_eq!(enemies.apply_hit(id, 1, &mut view), HitOutcome::Destroyed);
        assert_eq!(enemies.apply_hit(id, 1, &mut view), HitOutcome::Ignored);
    }

    #[test]
    fn attack_range_is_strict() {
        let mut view = View::new();
        let mut enemies = manager();
        enemies.spawn_missing(&mut view);
        // spawn points are 60 apart; only the middle one is within 40 of (360, 200)
        let defeated = enemies.defeat_in_range(Point::new(360.0, 200.0), 40.0, &mut view);
        assert_eq!(defeated.len(), 1);
        // exactly 40 away is out of range
        let defeated = enemies.defeat_in_range(Point::new(340.0, 200.0), 40.0, &mut view);
        assert!(defeated.is_empty());
        let defeated = enemies.defeat_in_range(Point::new(339.0, 200.0), 40.0, &mut view);
        assert_eq!(defeated.len(), 1);
        assert_eq!(enemies.live_count(), 1);
    }

    #[test]
    fn patrol_moves_at_fixed_speed_within_bounds() {
        let mut view = View::new();
        let mut enemies = manager();
        enemies.turn_chance = 0.0;
        enemies.spawn_missing(&mut view);
        let before: Vec<_> = enemies.enemies().map(|e| e.position).collect();
        enemies.patrol(500);
        for (enemy, start) in enemies.enemies().zip(before) {
            assert!((enemy.position.distance(start) - 20.0).abs() < 1e-3);
        }
        for _ in 0..100 {
            enemies.patrol(1000);
        }
        for enemy in enemies.enemies() {
            assert!((0.0..=800.0).contains(&enemy.position.x));
            assert!((0.0..=600.0).contains(&enemy.position.y));
        }
    }

    #[test]
    fn seeded_managers_patrol_identically() {
        let mut view = View::new();
        let mut a = manager();
        let mut b = manager();
        a.spawn_missing(&mut view);
        b.spawn_missing(&mut view);
        for _ in 0..50 {
            a.patrol(16);
            b.patrol(16);
        }
        let pa: Vec<_> = a.enemies().map(|e| (e.position, e.direction)).collect();
        let pb: Vec<_> = b.enemies().map(|e| (e.position, e.direction)).collect();
        assert_eq!(pa, pb);
    }
}

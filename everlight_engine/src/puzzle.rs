//! Puzzle Module
//!
//! Two independent puzzles, each with a latch that is set once and never cleared:
//! the key-operated switch that opens a door, and a block to be pushed onto a target zone.

use everlight_data::{ItemKind, Point, PuzzleId, PuzzlesDef, Zone};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inventory::Inventory;
use crate::view::{Panel, View, ViewItem};

/// Solved flags for both puzzles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    pub switch_door_solved: bool,
    pub block_solved: bool,
}

/// Where the block ends up when pushed from `pusher`.
///
/// The block moves one `step` along the axis of greater displacement, away from the pusher.
/// Equal displacement (including none at all) moves it vertically; with no downward
/// displacement it moves up.
pub fn push_destination(pusher: Point, block: Point, step: f32) -> Point {
    let dx = block.x - pusher.x;
    let dy = block.y - pusher.y;
    if dx.abs() > dy.abs() {
        Point::new(block.x + if dx > 0.0 { step } else { -step }, block.y)
    } else {
        Point::new(block.x, block.y + if dy > 0.0 { step } else { -step })
    }
}

#[derive(Debug, Clone)]
pub struct Puzzles {
    state: PuzzleState,
    switch: Point,
    door: Point,
    block: Point,
    target: Zone,
    step: f32,
}

impl Puzzles {
    pub fn new(def: &PuzzlesDef, step: f32) -> Self {
        Self {
            state: PuzzleState::default(),
            switch: def.switch,
            door: def.door,
            block: def.block,
            target: def.target,
            step,
        }
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn switch_position(&self) -> Point {
        self.switch
    }

    pub fn door_position(&self) -> Point {
        self.door
    }

    pub fn block_position(&self) -> Point {
        self.block
    }

    pub fn target(&self) -> Zone {
        self.target
    }

    /// The door is gone once the switch has been thrown.
    pub fn door_open(&self) -> bool {
        self.state.switch_door_solved
    }

    /// Throw the switch. Needs a key in the inventory; does nothing once already solved.
    pub fn activate_switch(&mut self, inventory: &Inventory, view: &mut View) -> bool {
        if self.state.switch_door_solved {
            return false;
        }
        if !inventory.contains(ItemKind::Key) {
            debug!("switch touched without a key");
            return false;
        }
        self.state.switch_door_solved = true;
        info!("switch activated, door at {} unlocked", self.door);
        view.push(ViewItem::SwitchActivated);
        view.push(ViewItem::PuzzleSolved(PuzzleId::SwitchDoor));
        view.refresh(Panel::Puzzles);
        true
    }

    /// Push the block away from `pusher`.
    ///
    /// `block` is where the collision collaborator saw the block; the block's tracked position
    /// is replaced by the pushed result, which is returned.
    pub fn push_block(&mut self, pusher: Point, block: Point, view: &mut View) -> Point {
        self.block = push_destination(pusher, block, self.step);
        debug!("block pushed from {block} to {}", self.block);
        view.push(ViewItem::BlockMoved { position: self.block });
        view.refresh(Panel::Puzzles);
        self.block
    }

    /// Latch the block puzzle if the block sits inside the target. Returns true only on the
    /// check that sets the latch.
    pub fn check_block(&mut self, view: &mut View) -> bool {
        if self.state.block_solved || !self.target.contains(self.block) {
            return false;
        }
        self.state.block_solved = true;
        info!("block puzzle solved at {}", self.block);
        view.push(ViewItem::PuzzleSolved(PuzzleId::Block));
        view.refresh(Panel::Puzzles);
        true
    }

    /// Overwrite both latches, as loading a save does.
    pub fn restore(&mut self, state: PuzzleState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_follows_dominant_axis() {
        let block = Point::new(400.0, 200.0);
        assert_eq!(push_destination(Point::new(380.0, 205.0), block, 32.0), Point::new(432.0, 200.0));
        assert_eq!(push_destination(Point::new(420.0, 195.0), block, 32.0), Point::new(368.0, 200.0));
        assert_eq!(push_destination(Point::new(402.0, 180.0), block, 32.0), Point::new(400.0, 232.0));
    }

    #[test]
    fn ties_move_vertically() {
        let block = Point::new(400.0, 200.0);
        assert_eq!(push_destination(Point::new(390.0, 190.0), block, 32.0), Point::new(400.0, 232.0));
        assert_eq!(push_destination(Point::new(410.0, 210.0), block, 32.0), Point::new(400.0, 168.0));
        assert_eq!(push_destination(block, block, 32.0), Point::new(400.0, 168.0));
    }

    #[test]
    fn switch_needs_key_and_latches_once() {
        let mut view = View::new();
        let mut puzzles = Puzzles::new(&PuzzlesDef::default(), 32.0);
        let mut inventory = Inventory::new();
        assert!(!puzzles.activate_switch(&inventory, &mut view));
        inventory.pickup(ItemKind::Key);
        assert!(puzzles.activate_switch(&inventory, &mut view));
        assert!(!puzzles.activate_switch(&inventory, &mut view));
        assert!(puzzles.door_open());
    }

    #[test]
    fn block_latch_is_idempotent() {
        let mut view = View::new();
        let mut puzzles = Puzzles::new(&PuzzlesDef::default(), 32.0);
        assert!(!puzzles.check_block(&mut view));
        puzzles.push_block(Point::new(570.0, 200.0), Point::new(590.0, 200.0), &mut view);
        assert_eq!(puzzles.block_position(), Point::new(622.0, 200.0));
        assert!(!puzzles.check_block(&mut view));
        puzzles.push_block(Point::new(640.0, 200.0), Point::new(622.0, 200.0), &mut view);
        assert!(puzzles.check_block(&mut view));
        assert!(!puzzles.check_block(&mut view));
        assert!(puzzles.state().block_solved);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier used across WorldDef references.
pub type Id = String;

/// Top-level content loaded by the engine at game start.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    pub game: GameDef,
    #[serde(default)]
    pub quests: Vec<QuestDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub enemies: EnemiesDef,
    #[serde(default)]
    pub puzzles: PuzzlesDef,
}

/// Game-level metadata and player startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameDef {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub player: PlayerDef,
}

/// Player starting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    /// Where the player starts, and where they return after dying.
    pub spawn: Point,
    /// Hearts at game start.
    pub hearts: u32,
    /// Fixed heart capacity.
    pub max_hearts: u32,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            spawn: Point::new(100.0, 100.0),
            hearts: 3,
            max_hearts: 5,
        }
    }
}

/// A position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle described by its center and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub center: Point,
    pub width: f32,
    pub height: f32,
}

impl Zone {
    /// True if `point` lies inside the zone. Edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        point.x >= self.center.x - half_w
            && point.x <= self.center.x + half_w
            && point.y >= self.center.y - half_h
            && point.y <= self.center.y + half_h
    }
}

/// Kinds of collectible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Key,
    Heart,
    Potion,
    QuestItem,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Key => write!(f, "Key"),
            ItemKind::Heart => write!(f, "Heart"),
            ItemKind::Potion => write!(f, "Potion"),
            ItemKind::QuestItem => write!(f, "QuestItem"),
        }
    }
}

/// The puzzles a quest can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleId {
    SwitchDoor,
    Block,
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleId::SwitchDoor => write!(f, "switch door"),
            PuzzleId::Block => write!(f, "block"),
        }
    }
}

/// What completes a quest once it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Item(ItemKind),
    Puzzle(PuzzleId),
}

/// Static quest definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: Id,
    pub title: String,
    pub description: String,
    /// NPC whose dialogue offers this quest.
    pub trigger_npc: Id,
    pub requirement: Requirement,
    /// Message shown when the quest completes.
    #[serde(default)]
    pub completion_message: Option<String>,
}

/// NPC definition, including the dialogue sequences used for each state of its quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: Id,
    pub name: String,
    pub position: Point,
    /// The quest this NPC gives out.
    pub quest: Id,
    pub dialogue: DialogueDef,
}

/// Canned line sequences, selected by the state of the NPC's quest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueDef {
    pub not_started: Vec<String>,
    pub in_progress: Vec<String>,
    pub completed: Vec<String>,
}

/// An item instance lying in the world, waiting to be picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub kind: ItemKind,
    pub position: Point,
}

/// Enemy spawn layout. The number of spawn points is the population cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemiesDef {
    pub spawn_points: Vec<Point>,
}

impl Default for EnemiesDef {
    fn default() -> Self {
        Self {
            spawn_points: vec![
                Point::new(300.0, 200.0),
                Point::new(360.0, 200.0),
                Point::new(420.0, 200.0),
            ],
        }
    }
}

/// Layout of the switch/door and push-block puzzles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzlesDef {
    pub switch: Point,
    pub door: Point,
    /// Starting position of the pushable block.
    pub block: Point,
    /// Zone the block has to be pushed into.
    pub target: Zone,
}

impl Default for PuzzlesDef {
    fn default() -> Self {
        Self {
            switch: Point::new(700.0, 100.0),
            door: Point::new(750.0, 100.0),
            block: Point::new(400.0, 200.0),
            target: Zone {
                center: Point::new(600.0, 200.0),
                width: 32.0,
                height: 32.0,
            },
        }
    }
}

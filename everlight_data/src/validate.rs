use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a WorldDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a WorldDef.
///
/// ```
/// use everlight_data::*;
///
/// let world = WorldDef {
///     quests: vec![QuestDef {
///         id: "findKey".into(),
///         title: "Find the Lost Key".into(),
///         description: "Find the lost key.".into(),
///         trigger_npc: "villager".into(),
///         requirement: Requirement::Item(ItemKind::Key),
///         completion_message: None,
///     }],
///     npcs: vec![NpcDef {
///         id: "villager".into(),
///         name: "Villager".into(),
///         position: Point::new(200.0, 400.0),
///         quest: "findKey".into(),
///         dialogue: DialogueDef {
///             not_started: vec!["I lost my key!".into()],
///             in_progress: vec!["Please hurry!".into()],
///             completed: vec!["Thank you!".into()],
///         },
///     }],
///     ..WorldDef::default()
/// };
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut quests = HashSet::new();
    let mut npcs = HashSet::new();
    let mut items = HashSet::new();

    track_ids(
        "quest",
        world.quests.iter().map(|q| q.id.as_str()),
        &mut quests,
        &mut errors,
    );
    track_ids("npc", world.npcs.iter().map(|n| n.id.as_str()), &mut npcs, &mut errors);
    track_ids(
        "item",
        world.items.iter().map(|i| i.id.as_str()),
        &mut items,
        &mut errors,
    );

    let player = &world.game.player;
    if player.max_hearts == 0 {
        errors.push(ValidationError::InvalidValue {
            context: "player max_hearts must be at least 1".to_string(),
        });
    }
    if player.hearts == 0 || player.hearts > player.max_hearts {
        errors.push(ValidationError::InvalidValue {
            context: format!(
                "player starting hearts {} outside 1..={}",
                player.hearts, player.max_hearts
            ),
        });
    }

    for quest in &world.quests {
        check_ref(
            "npc",
            &quest.trigger_npc,
            &npcs,
            format!("quest '{}' trigger npc", quest.id),
            &mut errors,
        );
    }

    for npc in &world.npcs {
        check_ref(
            "quest",
            &npc.quest,
            &quests,
            format!("npc '{}' quest", npc.id),
            &mut errors,
        );
        let sequences = [
            ("not_started", &npc.dialogue.not_started),
            ("in_progress", &npc.dialogue.in_progress),
            ("completed", &npc.dialogue.completed),
        ];
        for (name, lines) in sequences {
            if lines.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    context: format!("npc '{}' dialogue '{name}' has no lines", npc.id),
                });
            }
        }
    }

    if world.enemies.spawn_points.is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "enemy spawn point list is empty".to_string(),
        });
    }

    let target = &world.puzzles.target;
    if target.width <= 0.0 || target.height <= 0.0 {
        errors.push(ValidationError::InvalidValue {
            context: format!("block target size {}x{} must be positive", target.width, target.height),
        });
    }

    errors
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    seen: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !seen.insert(id.to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(
    kind: &'static str,
    id: &str,
    known: &HashSet<String>,
    context: String,
    errors: &mut Vec<ValidationError>,
) {
    if !known.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

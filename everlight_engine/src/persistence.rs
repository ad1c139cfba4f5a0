//! Save and load.
//!
//! A save is one JSON record per slot holding the player position and hearts, the inventory,
//! the full quest log, the active quest id and both puzzle latches. It is written wholesale.
//! Loading parses the whole record before touching the session, then overwrites each part;
//! a malformed field falls back to its default without discarding the rest of the record.

use anyhow::{Context, Result};
use everlight_data::{ItemKind, Point};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EVERLIGHT_VERSION;
use crate::inventory::Inventory;
use crate::puzzle::PuzzleState;
use crate::quest::Quest;
use crate::session::GameSession;
use crate::slug::sanitize_slug;
use crate::store::SaveStore;
use crate::view::ViewItem;

/// Store key of the default save slot.
pub const SAVE_KEY: &str = "everlightSave";
/// Hearts restored when a save has none (or zero).
pub const DEFAULT_HEARTS: u32 = 3;

/// The persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    #[serde(default)]
    pub version: String,
    pub player: Point,
    pub hearts: u32,
    pub inventory: Vec<ItemKind>,
    pub quest_log: Vec<Quest>,
    pub active_quest_id: Option<String>,
    pub puzzle_solved: bool,
    pub block_solved: bool,
}

impl SaveRecord {
    /// Capture the session's persistent state.
    pub fn capture(session: &GameSession) -> Self {
        let puzzles = session.puzzle_state();
        Self {
            version: EVERLIGHT_VERSION.to_string(),
            player: session.player_position(),
            hearts: session.hearts(),
            inventory: session.inventory_items().to_vec(),
            quest_log: session.quest_list().to_vec(),
            active_quest_id: session.active_quest().map(|q| q.id.clone()),
            puzzle_solved: puzzles.switch_door_solved,
            block_solved: puzzles.block_solved,
        }
    }
}

/// Result of a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { key: String },
    /// No record under the key, an unreadable one, or one without a usable player position.
    NothingToLoad,
}

/// Store key for a save slot. `None` or a blank name selects the default slot.
pub fn save_key(slot: Option<&str>) -> String {
    match slot.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => format!("{SAVE_KEY}-{}", sanitize_slug(name)),
        None => SAVE_KEY.to_string(),
    }
}

/// Keys of every save slot in `store`.
///
/// # Errors
/// Returns an error if the store cannot be listed.
pub fn list_saves(store: &dyn SaveStore) -> Result<Vec<String>> {
    let keys = store.keys().context("listing save slots")?;
    Ok(keys
        .into_iter()
        .filter(|key| key == SAVE_KEY || key.starts_with(&format!("{SAVE_KEY}-")))
        .collect())
}

/// Write the session to `store` under the slot's key, replacing any previous record.
///
/// # Errors
/// Returns an error if the record cannot be encoded or written. The session is unchanged
/// apart from the confirmation message, which is only shown on success.
pub fn save(session: &mut GameSession, store: &mut dyn SaveStore, slot: Option<&str>) -> Result<String> {
    let key = save_key(slot);
    let record = SaveRecord::capture(session);
    let json = serde_json::to_string_pretty(&record).context("encoding save record")?;
    store
        .write(&key, &json)
        .with_context(|| format!("writing save record '{key}'"))?;
    info!("game saved to '{key}' at {} ms", session.clock_ms());
    session.view.push(ViewItem::GameSaved { key: key.clone() });
    session.log_message("Game saved!");
    Ok(key)
}

/// Restore the session from the slot's record in `store`.
///
/// Loading never fails: a missing record, one the store cannot read back, or one without
/// a usable player position leaves the session untouched and reports
/// [`LoadOutcome::NothingToLoad`].
pub fn load(session: &mut GameSession, store: &dyn SaveStore, slot: Option<&str>) -> LoadOutcome {
    let key = save_key(slot);
    let raw = match store.read(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("no save under '{key}'");
            return LoadOutcome::NothingToLoad;
        },
        Err(e) => {
            warn!("save record '{key}' could not be read ({e}), nothing to load");
            return LoadOutcome::NothingToLoad;
        },
    };
    let Some(record) = parse_record(&raw, session) else {
        return LoadOutcome::NothingToLoad;
    };
    apply_record(session, record);
    info!("game loaded from '{key}'");
    session.view.push(ViewItem::GameLoaded { key: key.clone() });
    session.log_message("Game loaded!");
    LoadOutcome::Loaded { key }
}

/// Decode a record field by field, defaulting whatever is missing or malformed.
///
/// Returns `None` if the text is not JSON or carries no usable `player` position.
fn parse_record(raw: &str, session: &GameSession) -> Option<SaveRecord> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("save record is not valid JSON ({e}), nothing to load");
            return None;
        },
    };
    let player = match value.get("player").map(|p| serde_json::from_value::<Point>(p.clone())) {
        Some(Ok(point)) => point,
        Some(Err(e)) => {
            warn!("save record has an unusable player position ({e}), nothing to load");
            return None;
        },
        None => return None,
    };

    let version = value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if version != EVERLIGHT_VERSION {
        warn!("save record version '{version}' differs from engine version '{EVERLIGHT_VERSION}'");
    }

    let hearts = match value.get("hearts").and_then(Value::as_u64) {
        Some(h) if h > 0 => u32::try_from(h).unwrap_or(u32::MAX),
        Some(_) => DEFAULT_HEARTS,
        None => {
            if value.get("hearts").is_some_and(|h| !h.is_null()) {
                warn!("save record hearts is not a count, using {DEFAULT_HEARTS}");
            }
            DEFAULT_HEARTS
        },
    };

    let inventory = match value.get("inventory") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<ItemKind>(entry.clone()) {
                Ok(kind) => Some(kind),
                Err(_) => {
                    warn!("dropping unknown inventory entry {entry} from save record");
                    None
                },
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!("save record inventory is not a list ({other}), starting empty");
            Vec::new()
        },
    };

    let quest_log = match value.get("questLog") {
        Some(saved) if !saved.is_null() => match serde_json::from_value::<Vec<Quest>>(saved.clone()) {
            Ok(quests) => quests,
            Err(e) => {
                warn!("save record quest log is malformed ({e}), keeping current quests");
                session.quest_list().to_vec()
            },
        },
        _ => session.quest_list().to_vec(),
    };

    let active_quest_id = value
        .get("activeQuestId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let flag = |name: &str| value.get(name).and_then(Value::as_bool).unwrap_or(false);

    Some(SaveRecord {
        version,
        player,
        hearts,
        inventory,
        quest_log,
        active_quest_id,
        puzzle_solved: flag("puzzleSolved"),
        block_solved: flag("blockSolved"),
    })
}

/// Overwrite the session's persistent state with `record`.
fn apply_record(session: &mut GameSession, record: SaveRecord) {
    session.dialogue.close(&mut session.view);

    session.vitality.restore(record.hearts, record.player);
    session.inventory = Inventory::from_items(record.inventory);
    session.quests.replace_all(record.quest_log);
    session.active_quest = record
        .active_quest_id
        .filter(|id| session.quests.get(id).is_some());
    session.puzzles.restore(PuzzleState {
        switch_door_solved: record.puzzle_solved,
        block_solved: record.block_solved,
    });
    session.move_input = None;
    session.view.refresh_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::loader::builtin_worlddef;
    use crate::quest::QuestState;
    use crate::store::MemoryStore;
    use crate::view::View;

    fn session() -> GameSession {
        let config = EngineConfig {
            rng_seed: Some(5),
            ..EngineConfig::default()
        };
        GameSession::new(&builtin_worlddef().unwrap(), config).unwrap()
    }

    #[test]
    fn slot_keys() {
        assert_eq!(save_key(None), "everlightSave");
        assert_eq!(save_key(Some("  ")), "everlightSave");
        assert_eq!(save_key(Some("Before Boss")), "everlightSave-before-boss");
    }

    #[test]
    fn load_without_record_is_a_no_op() {
        let mut s = session();
        let store = MemoryStore::new();
        assert_eq!(load(&mut s, &store, None), LoadOutcome::NothingToLoad);
    }

    #[test]
    fn record_without_player_is_nothing_to_load() {
        let mut s = session();
        let mut store = MemoryStore::new();
        store.write(SAVE_KEY, r#"{"hearts": 1, "inventory": ["Key"]}"#).unwrap();
        assert_eq!(load(&mut s, &store, None), LoadOutcome::NothingToLoad);
        assert!(s.inventory_items().is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let mut s = session();
        let mut store = MemoryStore::new();
        store
            .write(
                SAVE_KEY,
                r#"{"player": {"x": 10.0, "y": 20.0}, "hearts": 0,
                    "inventory": ["Key", "Sword", "Potion"], "questLog": 7,
                    "activeQuestId": "ghost", "puzzleSolved": "yes", "blockSolved": true}"#,
            )
            .unwrap();
        let outcome = load(&mut s, &store, None);
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                key: SAVE_KEY.to_string()
            }
        );
        assert_eq!(s.player_position(), Point::new(10.0, 20.0));
        assert_eq!(s.hearts(), DEFAULT_HEARTS);
        assert_eq!(s.inventory_items(), &[ItemKind::Key, ItemKind::Potion]);
        assert_eq!(s.quest_list().len(), 2);
        assert!(s.active_quest().is_none());
        assert!(!s.puzzle_state().switch_door_solved);
        assert!(s.puzzle_state().block_solved);
    }

    #[test]
    fn saved_hearts_are_clamped_to_max() {
        let mut s = session();
        let mut store = MemoryStore::new();
        store
            .write(SAVE_KEY, r#"{"player": {"x": 1.0, "y": 1.0}, "hearts": 40}"#)
            .unwrap();
        load(&mut s, &store, None);
        assert_eq!(s.hearts(), s.max_hearts());
    }

    #[test]
    fn save_writes_camel_case_record() {
        let mut s = session();
        let mut view = View::new();
        s.quests.activate("findKey", &mut view);
        s.active_quest = Some("findKey".into());
        let mut store = MemoryStore::new();
        let key = save(&mut s, &mut store, Some("slot 1")).unwrap();
        assert_eq!(key, "everlightSave-slot-1");
        assert_eq!(s.message(), Some("Game saved!"));

        let raw = store.read(&key).unwrap().unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["activeQuestId"], "findKey");
        assert_eq!(json["questLog"][0]["state"], "active");
        assert_eq!(json["puzzleSolved"], false);
        assert_eq!(json["hearts"], 3);
        assert_eq!(list_saves(&store).unwrap(), vec![key]);
    }

    #[test]
    fn load_closes_dialogue_and_restores_quests() {
        let mut s = session();
        let mut store = MemoryStore::new();
        save(&mut s, &mut store, None).unwrap();

        let mut view = View::new();
        s.quests.activate("findKey", &mut view);
        s.dispatch(crate::dispatch::Event::PlayerNpcOverlap("sage".into()));
        assert!(s.dialogue_visible());

        load(&mut s, &store, None);
        assert!(!s.dialogue_visible());
        assert_eq!(s.quests.state_of("findKey"), Some(QuestState::NotStarted));
    }
}

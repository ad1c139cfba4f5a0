use ee::persistence::{self, SAVE_KEY};
use ee::*;
use everlight_data::{ItemKind, Point};
use everlight_engine as ee;
use tempfile::tempdir;

fn session() -> GameSession {
    let config = EngineConfig {
        rng_seed: Some(21),
        ..EngineConfig::default()
    };
    GameSession::new(&builtin_worlddef().unwrap(), config).unwrap()
}

fn progress(s: &mut GameSession) {
    s.dispatch(Event::PlayerNpcOverlap("villager".into()));
    for _ in 0..3 {
        s.dispatch(Event::AdvancePressed);
    }
    s.dispatch(Event::PlayerItemOverlap {
        kind: ItemKind::Key,
        instance: "key".into(),
    });
    s.dispatch(Event::PlayerSwitchOverlap);
    s.vitality.restore(2, Point::new(250.0, 320.0));
}

#[test]
fn save_then_load_restores_progress() {
    let mut store = MemoryStore::new();
    let mut s = session();
    progress(&mut s);
    let key = persistence::save(&mut s, &mut store, None).unwrap();
    assert_eq!(key, SAVE_KEY);

    let mut fresh = session();
    let outcome = persistence::load(&mut fresh, &store, None);
    assert_eq!(outcome, LoadOutcome::Loaded { key: SAVE_KEY.into() });
    assert_eq!(fresh.hearts(), 2);
    assert_eq!(fresh.player_position(), Point::new(250.0, 320.0));
    assert_eq!(fresh.inventory_items(), &[ItemKind::Key]);
    assert_eq!(fresh.quests.state_of("findKey"), Some(QuestState::Completed));
    assert_eq!(fresh.active_quest().map(|q| q.id.as_str()), Some("findKey"));
    assert!(fresh.puzzle_state().switch_door_solved);
    assert!(!fresh.puzzle_state().block_solved);
    assert_eq!(fresh.message(), Some("Game loaded!"));
}

#[test]
fn load_without_save_changes_nothing() {
    let store = MemoryStore::new();
    let mut s = session();
    let before = SaveRecord::capture(&s);
    assert_eq!(persistence::load(&mut s, &store, None), LoadOutcome::NothingToLoad);
    assert_eq!(SaveRecord::capture(&s), before);
}

#[test]
fn named_slots_live_in_a_file_store() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("saves"));
    let mut s = session();
    progress(&mut s);
    persistence::save(&mut s, &mut store, Some("Before Boss")).unwrap();
    persistence::save(&mut s, &mut store, None).unwrap();
    assert_eq!(
        persistence::list_saves(&store).unwrap(),
        vec![SAVE_KEY.to_string(), format!("{SAVE_KEY}-before-boss")]
    );

    let mut fresh = session();
    persistence::load(&mut fresh, &store, Some("Before Boss"));
    assert_eq!(fresh.inventory_items(), &[ItemKind::Key]);
}

#[test]
fn unreadable_save_file_is_nothing_to_load() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("everlightSave.json"), [0xff, 0xfe, 0x00]).unwrap();
    let store = FileStore::new(dir.path());
    let mut s = session();
    let before = SaveRecord::capture(&s);
    assert_eq!(persistence::load(&mut s, &store, None), LoadOutcome::NothingToLoad);
    assert_eq!(SaveRecord::capture(&s), before);
}

#[test]
fn partial_record_uses_defaults() {
    let mut store = MemoryStore::new();
    store
        .write(SAVE_KEY, r#"{"player":{"x":40.0,"y":60.0},"hearts":0,"inventory":["Key","Sword"]}"#)
        .unwrap();
    let mut s = session();
    persistence::load(&mut s, &store, None);
    assert_eq!(s.hearts(), 3);
    assert_eq!(s.player_position(), Point::new(40.0, 60.0));
    assert_eq!(s.inventory_items(), &[ItemKind::Key]);
    assert_eq!(s.quests.state_of("findKey"), Some(QuestState::NotStarted));
    assert!(!s.puzzle_state().switch_door_solved);
}

#[test]
fn load_closes_open_dialogue() {
    let mut store = MemoryStore::new();
    let mut s = session();
    persistence::save(&mut s, &mut store, None).unwrap();
    s.dispatch(Event::PlayerNpcOverlap("sage".into()));
    assert!(s.dialogue_visible());
    persistence::load(&mut s, &store, None);
    assert!(!s.dialogue_visible());
}

#[test]
fn record_uses_camel_case_fields() {
    let mut store = MemoryStore::new();
    let mut s = session();
    progress(&mut s);
    persistence::save(&mut s, &mut store, None).unwrap();
    let raw = store.read(SAVE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["hearts"], 2);
    assert_eq!(value["activeQuestId"], "findKey");
    assert_eq!(value["puzzleSolved"], true);
    assert_eq!(value["blockSolved"], false);
    assert_eq!(value["questLog"][0]["state"], "completed");
    assert_eq!(value["questLog"][0]["triggerNpcId"], "villager");
}

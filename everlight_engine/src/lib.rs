#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const EVERLIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEV_MODE: bool = cfg!(feature = "dev-mode");

// Core modules
pub mod command;
pub mod config;
pub mod data_paths;
pub mod dialogue;
pub mod dispatch;
pub mod enemy;
pub mod inventory;
pub mod loader;
pub mod persistence;
pub mod puzzle;
pub mod quest;
pub mod repl;
pub mod session;
pub mod slug;
pub mod store;
pub mod style;
pub mod timers;
pub mod view;
pub mod vitality;

// Re-exports for convenience
pub use config::EngineConfig;
pub use dispatch::Event;
pub use enemy::{Direction, EnemyId};
pub use loader::{builtin_worlddef, load_session};
pub use persistence::{LoadOutcome, SaveRecord};
pub use quest::{Quest, QuestState};
pub use repl::run_repl;
pub use session::GameSession;
pub use store::{FileStore, MemoryStore, SaveStore};
pub use view::{Panel, View, ViewItem};

//! Adventure game engine: world data, the per-player state machine, combat,
//! item effects and text command dispatch. Nothing in here performs network
//! I/O; the HTTP layer lives in [`crate::web`].

pub mod combat;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod items;
pub mod seed_loader;
pub mod state;
pub mod types;
pub mod world;

pub use commands::{dispatch, handle_command, parse_command, AdventureCommand};
pub use engine::GameSession;
pub use errors::AdventureError;
pub use seed_loader::load_world_seed;
pub use state::{canonical_world_seed, START_ROOM_ID, VICTORY_ITEM, VICTORY_ROOM_ID};
pub use types::*;
pub use world::{World, WorldSeed};

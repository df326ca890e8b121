//! World seed loading.
//!
//! Operators can replace the built-in world with a JSON file holding an array
//! of rooms (same shape as [`Room`]). The file is validated exactly like the
//! built-in seed before any session is created.

use std::fs;
use std::path::Path;

use log::info;

use crate::adventure::errors::AdventureError;
use crate::adventure::types::Room;
use crate::adventure::world::WorldSeed;

/// Load rooms from a JSON world file without validating them.
pub fn load_rooms_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Room>, AdventureError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let rooms: Vec<Room> = serde_json::from_str(&contents)?;
    Ok(rooms)
}

/// Build the validated seed: from `world_file` when configured, otherwise the
/// canonical world.
pub fn load_world_seed(world_file: Option<&str>) -> Result<WorldSeed, AdventureError> {
    match world_file {
        Some(path) => {
            let rooms = load_rooms_from_json(path)?;
            let seed = WorldSeed::new(rooms)?;
            info!("Loaded world from {} ({} rooms)", path, seed.rooms().len());
            Ok(seed)
        }
        None => WorldSeed::canonical(),
    }
}

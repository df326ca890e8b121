use thiserror::Error;

use crate::adventure::types::Direction;

/// Errors raised while loading or validating the adventure world.
///
/// Gameplay failures (locked paths, missing items) are not errors; they are
/// reported to the player as text in the snapshot.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// Lookup of a room id that is not in the room table.
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    /// An exit points at a room that does not exist.
    #[error("room '{room}' has a {direction} exit to missing room '{target}'")]
    DanglingExit {
        room: String,
        direction: Direction,
        target: String,
    },

    /// A lock is declared on a direction the room has no exit for.
    #[error("room '{room}' locks {direction} but has no exit that way")]
    DanglingLock { room: String, direction: Direction },

    /// Two seed entries share an id.
    #[error("duplicate room id: {0}")]
    DuplicateRoom(String),

    /// The start or victory room is missing from the seed.
    #[error("required room missing from world: {0}")]
    MissingRequiredRoom(&'static str),

    /// Enemy declared with zero health.
    #[error("room '{0}' declares an enemy with no health")]
    InvalidEnemy(String),

    /// An item or lock key that a typed command could never match. Commands
    /// are lowercased and trimmed before lookup.
    #[error("room '{room}' names item '{item}'; item names must be lowercase with no surrounding spaces")]
    InvalidItemName { room: String, item: String },

    /// Wrapper around IO errors (reading a world file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON errors (parsing a world file).
    #[error("world file parse error: {0}")]
    Json(#[from] serde_json::Error),
}

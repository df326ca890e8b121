use crate::adventure::types::{Direction, Enemy, Room, RoomFlag};

/// Room every new or reset player starts in.
pub const START_ROOM_ID: &str = "clearing";

/// Room where holding the victory item ends the game.
pub const VICTORY_ROOM_ID: &str = "tower";

/// Item that wins the game when carried into the victory room.
pub const VICTORY_ITEM: &str = "ancient book";

/// Room ids of the built-in world, in display order.
pub const CANONICAL_ROOM_IDS: &[&str] = &[START_ROOM_ID, "cave", "river", VICTORY_ROOM_ID];

/// Built-in four room world: clearing <-> cave, clearing <-> river <-> tower.
/// The bridge from the river to the tower needs the silver key from the cave.
pub fn canonical_world_seed() -> Vec<Room> {
    let clearing = Room::new(
        START_ROOM_ID,
        "You are in a forest clearing. Paths lead north and east.",
    )
    .with_exit(Direction::North, "cave")
    .with_exit(Direction::East, "river")
    .with_items(&["map", "apple", "torch"]);

    let cave = Room::new("cave", "A dark cave with strange noises. You feel uneasy.")
        .with_exit(Direction::South, START_ROOM_ID)
        .with_items(&["torch", "old coin", "silver key", "sword"])
        .with_enemy(Enemy::new("giant spider", 30, 4))
        .with_flag(RoomFlag::Dark);

    let river = Room::new(
        "river",
        "A flowing river blocks your way. There’s a bridge to the north.",
    )
    .with_exit(Direction::West, START_ROOM_ID)
    .with_exit(Direction::North, VICTORY_ROOM_ID)
    .with_lock(Direction::North, "silver key")
    .with_items(&["fishing rod", "shield"]);

    let tower = Room::new(
        VICTORY_ROOM_ID,
        "You enter a tall, ancient tower. A chill runs down your spine...",
    )
    .with_exit(Direction::South, "river")
    .with_items(&[VICTORY_ITEM])
    .with_enemy(Enemy::new("shadow beast", 50, 8));

    vec![clearing, cave, river, tower]
}

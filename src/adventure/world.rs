//! Room table for a single session plus the validated seed it is built from.
//!
//! The seed is immutable after startup. Every session owns a [`World`] cloned
//! from it, and reset copies items and enemies back from the seed by room id.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::adventure::errors::AdventureError;
use crate::adventure::state::{START_ROOM_ID, VICTORY_ROOM_ID};
use crate::adventure::types::Room;

/// Validated initial world.
#[derive(Debug, Clone)]
pub struct WorldSeed {
    rooms: Vec<Room>,
}

impl WorldSeed {
    /// Validate `rooms` and wrap them as a seed.
    pub fn new(rooms: Vec<Room>) -> Result<Self, AdventureError> {
        validate_rooms(&rooms)?;
        Ok(Self { rooms })
    }

    /// The built-in four room world.
    pub fn canonical() -> Result<Self, AdventureError> {
        Self::new(crate::adventure::state::canonical_world_seed())
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn build_world(&self) -> World {
        World {
            order: self.rooms.iter().map(|r| r.id.clone()).collect(),
            rooms: self
                .rooms
                .iter()
                .map(|r| (r.id.clone(), r.clone()))
                .collect(),
        }
    }
}

/// Check the structural invariants of a room table:
/// unique ids, start and victory rooms present, every exit and lock resolvable,
/// item names a player can type, and no enemy that is already dead.
pub fn validate_rooms(rooms: &[Room]) -> Result<(), AdventureError> {
    let mut ids = HashSet::new();
    for room in rooms {
        if !ids.insert(room.id.as_str()) {
            return Err(AdventureError::DuplicateRoom(room.id.clone()));
        }
    }

    for required in [START_ROOM_ID, VICTORY_ROOM_ID] {
        if !ids.contains(required) {
            return Err(AdventureError::MissingRequiredRoom(required));
        }
    }

    for room in rooms {
        for (direction, target) in &room.exits {
            if !ids.contains(target.as_str()) {
                return Err(AdventureError::DanglingExit {
                    room: room.id.clone(),
                    direction: *direction,
                    target: target.clone(),
                });
            }
        }
        for direction in room.locked.keys() {
            if !room.exits.contains_key(direction) {
                return Err(AdventureError::DanglingLock {
                    room: room.id.clone(),
                    direction: *direction,
                });
            }
        }
        if let Some(item) = room
            .items
            .iter()
            .chain(room.locked.values())
            .find(|item| !is_typeable_item_name(item))
        {
            return Err(AdventureError::InvalidItemName {
                room: room.id.clone(),
                item: item.clone(),
            });
        }
        if matches!(&room.enemy, Some(enemy) if enemy.health == 0) {
            return Err(AdventureError::InvalidEnemy(room.id.clone()));
        }
    }

    debug!("World validated: {} rooms", rooms.len());
    Ok(())
}

fn is_typeable_item_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && name.to_lowercase() == name
}

/// Mutable room table owned by one session.
#[derive(Debug, Clone)]
pub struct World {
    rooms: HashMap<String, Room>,
    order: Vec<String>,
}

impl World {
    pub fn room(&self, room_id: &str) -> Result<&Room, AdventureError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| AdventureError::UnknownRoom(room_id.to_string()))
    }

    pub fn room_mut(&mut self, room_id: &str) -> Result<&mut Room, AdventureError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| AdventureError::UnknownRoom(room_id.to_string()))
    }

    /// Rooms in seed order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Restore every room's items and enemy from the seed, matched by room id.
    pub fn reset_from(&mut self, seed: &WorldSeed) {
        for seed_room in seed.rooms() {
            match self.rooms.get_mut(&seed_room.id) {
                Some(room) => {
                    room.items = seed_room.items.clone();
                    room.enemy = seed_room.enemy.clone();
                }
                None => {
                    self.order.push(seed_room.id.clone());
                    self.rooms.insert(seed_room.id.clone(), seed_room.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::state::canonical_world_seed;
    use crate::adventure::types::{Direction, Enemy};

    #[test]
    fn canonical_seed_is_valid() {
        let seed = WorldSeed::canonical().expect("canonical world validates");
        assert_eq!(seed.rooms().len(), 4);
        assert!(seed.get("cave").is_some());
    }

    #[test]
    fn dangling_exit_is_rejected() {
        let mut rooms = canonical_world_seed();
        rooms[0].exits.insert(Direction::West, "swamp".to_string());
        match validate_rooms(&rooms) {
            Err(AdventureError::DanglingExit { room, target, .. }) => {
                assert_eq!(room, "clearing");
                assert_eq!(target, "swamp");
            }
            other => panic!("expected dangling exit, got {:?}", other),
        }
    }

    #[test]
    fn lock_without_exit_is_rejected() {
        let mut rooms = canonical_world_seed();
        rooms[1].locked.insert(Direction::East, "sword".to_string());
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::DanglingLock { .. })
        ));
    }

    #[test]
    fn duplicate_and_missing_rooms_are_rejected() {
        let mut rooms = canonical_world_seed();
        rooms.push(rooms[2].clone());
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::DuplicateRoom(id)) if id == "river"
        ));

        let rooms: Vec<Room> = canonical_world_seed()
            .into_iter()
            .filter(|r| r.id != VICTORY_ROOM_ID)
            .map(|mut r| {
                r.exits.retain(|_, target| target != VICTORY_ROOM_ID);
                r.locked.clear();
                r
            })
            .collect();
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::MissingRequiredRoom(VICTORY_ROOM_ID))
        ));
    }

    #[test]
    fn dead_enemy_is_rejected() {
        let mut rooms = canonical_world_seed();
        rooms[1].enemy = Some(Enemy::new("ghost", 0, 1));
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::InvalidEnemy(id)) if id == "cave"
        ));
    }

    #[test]
    fn item_names_must_match_lowercased_commands() {
        let mut rooms = canonical_world_seed();
        rooms[0].items.push("Golden Apple".to_string());
        match validate_rooms(&rooms) {
            Err(AdventureError::InvalidItemName { room, item }) => {
                assert_eq!(room, "clearing");
                assert_eq!(item, "Golden Apple");
            }
            other => panic!("expected invalid item name, got {:?}", other),
        }

        let mut rooms = canonical_world_seed();
        rooms[0]
            .locked
            .insert(Direction::North, "Rusty Key".to_string());
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::InvalidItemName { item, .. }) if item == "Rusty Key"
        ));

        let mut rooms = canonical_world_seed();
        rooms[2].items.push(" rope".to_string());
        assert!(matches!(
            validate_rooms(&rooms),
            Err(AdventureError::InvalidItemName { .. })
        ));
    }

    #[test]
    fn reset_matches_rooms_by_id_even_with_shared_descriptions() {
        let mut rooms = canonical_world_seed();
        // Two rooms with identical text must still reset independently.
        rooms[2].description = rooms[0].description.clone();
        let seed = WorldSeed::new(rooms).unwrap();
        let mut world = seed.build_world();

        world.room_mut("clearing").unwrap().items.clear();
        world.room_mut("river").unwrap().items.push("apple".into());
        world.reset_from(&seed);

        assert_eq!(
            world.room("clearing").unwrap().items,
            vec!["map", "apple", "torch"]
        );
        assert_eq!(
            world.room("river").unwrap().items,
            vec!["fishing rod", "shield"]
        );
    }

    #[test]
    fn rooms_iterate_in_seed_order() {
        let world = WorldSeed::canonical().unwrap().build_world();
        let ids: Vec<&str> = world.rooms().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["clearing", "cave", "river", "tower"]);
        assert_eq!(world.len(), 4);
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Health every player starts with, and the ceiling healing can reach.
pub const MAX_HEALTH: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoomFlag {
    /// Needs a light source to see properly; the torch reacts to it.
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enemy {
    pub name: String,
    pub health: u32,
    /// Base damage before the die roll and armour are applied.
    #[serde(default = "default_enemy_attack")]
    pub attack: u32,
}

fn default_enemy_attack() -> u32 {
    4
}

impl Enemy {
    pub fn new(name: &str, health: u32, attack: u32) -> Self {
        Self {
            name: name.to_string(),
            health,
            attack,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub exits: BTreeMap<Direction, String>,
    /// Exits that need an item in the player's inventory before they can be used.
    #[serde(default)]
    pub locked: BTreeMap<Direction, String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub enemy: Option<Enemy>,
    #[serde(default)]
    pub flags: Vec<RoomFlag>,
}

impl Room {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            exits: BTreeMap::new(),
            locked: BTreeMap::new(),
            items: Vec::new(),
            enemy: None,
            flags: Vec::new(),
        }
    }

    pub fn with_exit(mut self, direction: Direction, destination: &str) -> Self {
        self.exits.insert(direction, destination.to_string());
        self
    }

    pub fn with_lock(mut self, direction: Direction, required_item: &str) -> Self {
        self.locked.insert(direction, required_item.to_string());
        self
    }

    pub fn with_items(mut self, items: &[&str]) -> Self {
        self.items = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_enemy(mut self, enemy: Enemy) -> Self {
        self.enemy = Some(enemy);
        self
    }

    pub fn with_flag(mut self, flag: RoomFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn exit(&self, direction: Direction) -> Option<&str> {
        self.exits.get(&direction).map(String::as_str)
    }

    pub fn is_dark(&self) -> bool {
        self.flags.contains(&RoomFlag::Dark)
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Removes the first matching item, returning whether it was present.
    pub fn remove_item(&mut self, item: &str) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn directions(&self) -> Directions {
        Directions {
            north: self.exit(Direction::North).map(str::to_string),
            south: self.exit(Direction::South).map(str::to_string),
            east: self.exit(Direction::East).map(str::to_string),
            west: self.exit(Direction::West).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub location: String,
    pub inventory: Vec<String>,
    pub health: u32,
}

impl Player {
    pub fn new(start_room: &str) -> Self {
        Self {
            location: start_room.to_string(),
            inventory: Vec::new(),
            health: MAX_HEALTH,
        }
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    pub fn remove_item(&mut self, item: &str) -> bool {
        match self.inventory.iter().position(|i| i == item) {
            Some(idx) => {
                self.inventory.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
        self.health - before
    }

    pub fn wound(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Exit targets of the current room, keyed the way clients expect them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Directions {
    pub north: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub west: Option<String>,
}

/// Full state returned after every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub room_description: String,
    pub inventory: Vec<String>,
    pub health: u32,
    pub game_over: bool,
    pub directions: Directions,
    pub items: Vec<String>,
}

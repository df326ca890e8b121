//! What `use <item>` does for each item.
//!
//! Unknown items have no effect. Only the apple is consumed; everything else
//! stays in the inventory so repeating a use gives the same answer.

use crate::adventure::state::VICTORY_ITEM;
use crate::adventure::types::Room;
use crate::adventure::world::World;

/// Health restored by eating an apple.
pub const APPLE_HEAL: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUse {
    /// Restores health and is removed from the inventory.
    Eat { heal: u32 },
    /// Reacts to dark rooms.
    Light,
    /// Lists the rooms of the world.
    ReadMap,
    /// Opens the game's ending when read in the victory room.
    ReadBook,
    /// Passive combat bonus.
    Weapon,
    /// Passive combat protection.
    Armor,
    Nothing,
}

pub fn item_use(item: &str) -> ItemUse {
    match item {
        "apple" => ItemUse::Eat { heal: APPLE_HEAL },
        "torch" => ItemUse::Light,
        "map" => ItemUse::ReadMap,
        VICTORY_ITEM => ItemUse::ReadBook,
        "sword" => ItemUse::Weapon,
        "shield" => ItemUse::Armor,
        _ => ItemUse::Nothing,
    }
}

/// Direction names of locks in `room` that `item` opens.
pub fn locks_opened_by(room: &Room, item: &str) -> Vec<&'static str> {
    room.locked
        .iter()
        .filter(|(_, required)| required.as_str() == item)
        .map(|(direction, _)| direction.as_str())
        .collect()
}

pub fn light_text(room: &Room) -> String {
    if room.is_dark() {
        "🔥 You raise the torch. Its light pushes back the darkness, and the shadows retreat to the corners."
            .to_string()
    } else {
        "You wave the torch around, but it is bright enough here already.".to_string()
    }
}

/// One line per room with its exits, marking where the player stands.
pub fn render_map(world: &World, current_room: &str) -> String {
    let mut out = String::from("🗺️ The map shows:");
    for room in world.rooms() {
        let exits: Vec<String> = room
            .exits
            .iter()
            .map(|(direction, target)| {
                if room.locked.contains_key(direction) {
                    format!("{} → {} (locked)", direction, target)
                } else {
                    format!("{} → {}", direction, target)
                }
            })
            .collect();
        let marker = if room.id == current_room {
            " (you are here)"
        } else {
            ""
        };
        out.push_str(&format!("\n  {}{}: {}", room.id, marker, exits.join(", ")));
    }
    out
}

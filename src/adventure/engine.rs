//! Game state machine for one player.
//!
//! A [`GameSession`] owns a private [`World`] built from the shared seed plus
//! the player's state and combat RNG. Every operation returns a full
//! [`Snapshot`] so callers never need to assemble one themselves.

use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::adventure::combat::{self, Outcome, DEFEAT_TEXT};
use crate::adventure::errors::AdventureError;
use crate::adventure::items::{self, ItemUse};
use crate::adventure::state::{START_ROOM_ID, VICTORY_ITEM, VICTORY_ROOM_ID};
use crate::adventure::types::{Direction, Directions, Player, Room, Snapshot};
use crate::adventure::world::{World, WorldSeed};
use crate::metrics;

const VICTORY_OPENING: &str = "📖 You open the ancient book inside the tower.";
const VICTORY_CLOSING: &str = "🎉 You have completed your quest and won the game!";

pub const QUIT_TEXT: &str = "Thanks for playing!";

pub const INVENTORY_EMPTY_TEXT: &str = "Your inventory is empty.";

pub type EngineResult = Result<Snapshot, AdventureError>;

pub struct GameSession {
    seed: Arc<WorldSeed>,
    world: World,
    player: Player,
    rng: StdRng,
    rng_seed: u64,
    /// Set once the victory has been counted, so re-describing the tower
    /// does not count it again.
    victory_recorded: bool,
}

impl GameSession {
    pub fn new(seed: Arc<WorldSeed>, rng_seed: u64) -> Self {
        let world = seed.build_world();
        Self {
            seed,
            world,
            player: Player::new(START_ROOM_ID),
            rng: StdRng::seed_from_u64(rng_seed),
            rng_seed,
            victory_recorded: false,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn current_room(&self) -> Result<&Room, AdventureError> {
        self.world.room(&self.player.location)
    }

    fn current_room_mut(&mut self) -> Result<&mut Room, AdventureError> {
        self.world.room_mut(&self.player.location)
    }

    /// Snapshot of the current room with the given message text.
    pub fn snapshot(&self, text: impl Into<String>, game_over: bool) -> EngineResult {
        let room = self.current_room()?;
        Ok(Snapshot {
            room_description: text.into(),
            inventory: self.player.inventory.clone(),
            health: self.player.health,
            game_over,
            directions: room.directions(),
            items: room.items.clone(),
        })
    }

    pub fn has_won(&self) -> bool {
        self.player.location == VICTORY_ROOM_ID && self.player.has_item(VICTORY_ITEM)
    }

    pub fn is_defeated(&self) -> bool {
        self.player.is_defeated()
    }

    /// Snapshot shown for every command after the player has died.
    pub fn defeat_snapshot(&self) -> EngineResult {
        self.snapshot(DEFEAT_TEXT, true)
    }

    /// Describe the current room. Checks the victory condition every time,
    /// removing any enemy in the victory room once it is met.
    pub fn describe(&mut self) -> EngineResult {
        let won = self.has_won();
        let room = self.current_room()?;

        let mut output = room.description.clone();
        if !room.items.is_empty() {
            output.push_str("\nOn the ground, you see:");
            for item in &room.items {
                output.push_str(&format!("\n  - {}", item));
            }
        }
        if let Some(enemy) = &room.enemy {
            output.push_str(&format!(
                "\n⚔️ A {} lurks here with {} health remaining.",
                enemy.name, enemy.health
            ));
        }

        if won {
            output.push('\n');
            output.push_str(&self.victory_text());
            if let Some(enemy) = self.current_room_mut()?.enemy.take() {
                debug!("victory banished {}", enemy.name);
            }
            if !self.victory_recorded {
                self.victory_recorded = true;
                metrics::inc_wins();
                info!(target: "tinyquest::game", "game.win room={}", self.player.location);
            }
        }

        self.snapshot(output, won)
    }

    /// Victory banner. Names the victory room's seeded enemy, so the text is
    /// the same whether or not that enemy was already slain.
    fn victory_text(&self) -> String {
        let light = match self.seed.get(VICTORY_ROOM_ID).and_then(|r| r.enemy.as_ref()) {
            Some(enemy) => format!(
                "✨ Light bursts from the pages, and the {} vanishes!",
                enemy.name
            ),
            None => "✨ Light bursts from the pages.".to_string(),
        };
        format!("{}\n{}\n{}", VICTORY_OPENING, light, VICTORY_CLOSING)
    }

    /// Move in the direction typed by the player. Unparseable directions are
    /// echoed back in the "can't go" message.
    pub fn go(&mut self, direction: &str) -> EngineResult {
        let parsed = direction.parse::<Direction>().ok();
        let room = self.current_room()?;

        let Some(dir) = parsed else {
            return self.snapshot(format!("You can't go {} from here.", direction), false);
        };

        if let Some(required) = room.locked.get(&dir) {
            if !self.player.has_item(required) {
                let text = format!("The path {} is locked. You need the {}.", dir, required);
                return self.snapshot(text, false);
            }
        }

        match room.exit(dir) {
            Some(target) => {
                let target = target.to_string();
                debug!("player moved {} from {} to {}", dir, self.player.location, target);
                self.player.location = target;
                self.describe()
            }
            None => self.snapshot(format!("You can't go {} from here.", dir), false),
        }
    }

    pub fn take(&mut self, item: &str) -> EngineResult {
        if self.current_room_mut()?.remove_item(item) {
            self.player.inventory.push(item.to_string());
            self.snapshot(format!("You picked up the {}.", item), false)
        } else {
            self.snapshot(format!("There is no {} here.", item), false)
        }
    }

    pub fn drop_item(&mut self, item: &str) -> EngineResult {
        if self.player.remove_item(item) {
            self.current_room_mut()?.items.push(item.to_string());
            self.snapshot(format!("You dropped the {}.", item), false)
        } else {
            self.snapshot(format!("You don’t have {}.", item), false)
        }
    }

    pub fn use_item(&mut self, item: &str) -> EngineResult {
        if !self.player.has_item(item) {
            return self.snapshot(format!("You don’t have {}.", item), false);
        }

        let opened = items::locks_opened_by(self.current_room()?, item);
        if !opened.is_empty() {
            let text = format!(
                "🔑 The {} fits the lock on the path {}. The way is open.",
                item,
                opened.join(" and ")
            );
            return self.snapshot(text, false);
        }

        match items::item_use(item) {
            ItemUse::Eat { heal } => {
                self.player.remove_item(item);
                let restored = self.player.heal(heal);
                let text = if restored > 0 {
                    format!(
                        "🍎 You eat the {} and recover {} health.",
                        item, restored
                    )
                } else {
                    format!("🍎 You eat the {}. You already feel at full strength.", item)
                };
                self.snapshot(text, false)
            }
            ItemUse::Light => {
                let text = items::light_text(self.current_room()?);
                self.snapshot(text, false)
            }
            ItemUse::ReadMap => {
                let text = items::render_map(&self.world, &self.player.location);
                self.snapshot(text, false)
            }
            ItemUse::ReadBook => {
                if self.player.location == VICTORY_ROOM_ID {
                    self.describe()
                } else {
                    self.snapshot(
                        format!(
                            "The {}'s pages stay dark and unreadable here. Perhaps it must be opened somewhere older.",
                            item
                        ),
                        false,
                    )
                }
            }
            ItemUse::Weapon => self.snapshot(
                format!("You swing the {}. It will serve you well when you fight.", item),
                false,
            ),
            ItemUse::Armor => self.snapshot(
                format!("You raise the {}. It will soften the blows you take in a fight.", item),
                false,
            ),
            ItemUse::Nothing => self.snapshot(
                format!("You can’t figure out how to use the {} here.", item),
                false,
            ),
        }
    }

    /// Resolve one combat exchange with the enemy in the current room.
    pub fn fight(&mut self) -> EngineResult {
        let location = self.player.location.clone();
        let room = self.world.room_mut(&location)?;
        let Some(enemy) = room.enemy.as_mut() else {
            return self.snapshot("There’s nothing to fight here.", false);
        };

        let exchange = combat::resolve_exchange(&mut self.player, enemy, &mut self.rng);
        match exchange.outcome {
            Outcome::EnemyDefeated => {
                room.enemy = None;
                info!(
                    target: "tinyquest::game",
                    "game.enemy_defeated room={} enemy={}",
                    location, exchange.enemy_name
                );
            }
            Outcome::PlayerDefeated => {
                metrics::inc_defeats();
                info!(
                    target: "tinyquest::game",
                    "game.defeat room={} enemy={}",
                    location, exchange.enemy_name
                );
            }
            Outcome::Ongoing => {}
        }

        let game_over = exchange.outcome == Outcome::PlayerDefeated;
        self.snapshot(exchange.describe(), game_over)
    }

    pub fn inventory(&self) -> EngineResult {
        if self.player.inventory.is_empty() {
            return self.snapshot(INVENTORY_EMPTY_TEXT, false);
        }
        let lines: Vec<String> = self
            .player
            .inventory
            .iter()
            .map(|item| format!("- {}", item))
            .collect();
        self.snapshot(format!("You are carrying:\n{}", lines.join("\n")), false)
    }

    /// Ends the game from the client's point of view; no state changes.
    pub fn quit(&self) -> EngineResult {
        let mut snapshot = self.snapshot(QUIT_TEXT, true)?;
        snapshot.directions = Directions::default();
        Ok(snapshot)
    }

    /// Restore the world from the seed, recreate the player and replay the
    /// combat RNG from its starting seed.
    pub fn reset(&mut self) -> EngineResult {
        self.world.reset_from(&self.seed);
        self.player = Player::new(START_ROOM_ID);
        self.rng = StdRng::seed_from_u64(self.rng_seed);
        self.victory_recorded = false;
        metrics::inc_resets();
        self.describe()
    }
}

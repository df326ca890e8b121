//! One-exchange combat resolution.
//!
//! Each `fight` command resolves exactly one exchange: the player strikes first,
//! and a surviving enemy strikes back. Rolls come from the session's seeded
//! `StdRng`, so a fixed seed replays identically.
//!
//! Damage:
//! - player: `6 + d6`, `+6` with a sword
//! - enemy: `attack + d6 - 3`, `-3` more with a shield, never below 1
//!
//! Health on both sides saturates at zero.

use rand::rngs::StdRng;
use rand::Rng;

use crate::adventure::types::{Enemy, Player};

pub const PLAYER_BASE_DAMAGE: u32 = 6;
pub const SWORD_BONUS: u32 = 6;
pub const ENEMY_DAMAGE_OFFSET: u32 = 3;
pub const SHIELD_BLOCK: u32 = 3;

/// Shown for every command once the player has no health left.
pub const DEFEAT_TEXT: &str =
    "💀 You have fallen. Your adventure is over. Reset the game to play again.";

fn d6(rng: &mut StdRng) -> u32 {
    rng.gen_range(1..=6)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both sides still standing.
    Ongoing,
    EnemyDefeated,
    PlayerDefeated,
}

/// Result of a single exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub enemy_name: String,
    pub dealt: u32,
    pub enemy_health: u32,
    /// `None` when the enemy fell before it could strike back.
    pub taken: Option<u32>,
    pub player_health: u32,
    pub outcome: Outcome,
}

pub fn player_damage(player: &Player, rng: &mut StdRng) -> u32 {
    let mut damage = PLAYER_BASE_DAMAGE + d6(rng);
    if player.has_item("sword") {
        damage += SWORD_BONUS;
    }
    damage
}

pub fn enemy_damage(enemy: &Enemy, player: &Player, rng: &mut StdRng) -> u32 {
    let mut block = ENEMY_DAMAGE_OFFSET;
    if player.has_item("shield") {
        block += SHIELD_BLOCK;
    }
    enemy.attack.saturating_add(d6(rng)).saturating_sub(block).max(1)
}

/// Resolve one exchange, mutating both combatants.
///
/// The caller removes the enemy from its room when the outcome is
/// [`Outcome::EnemyDefeated`].
pub fn resolve_exchange(player: &mut Player, enemy: &mut Enemy, rng: &mut StdRng) -> Exchange {
    let dealt = player_damage(player, rng);
    enemy.health = enemy.health.saturating_sub(dealt);

    if enemy.health == 0 {
        return Exchange {
            enemy_name: enemy.name.clone(),
            dealt,
            enemy_health: 0,
            taken: None,
            player_health: player.health,
            outcome: Outcome::EnemyDefeated,
        };
    }

    let taken = enemy_damage(enemy, player, rng);
    player.wound(taken);
    let outcome = if player.is_defeated() {
        Outcome::PlayerDefeated
    } else {
        Outcome::Ongoing
    };

    Exchange {
        enemy_name: enemy.name.clone(),
        dealt,
        enemy_health: enemy.health,
        taken: Some(taken),
        player_health: player.health,
        outcome,
    }
}

impl Exchange {
    pub fn describe(&self) -> String {
        let mut out = format!(
            "⚔️ You strike the {} for {} damage.",
            self.enemy_name, self.dealt
        );
        match self.outcome {
            Outcome::EnemyDefeated => {
                out.push_str(&format!("\n🏆 You defeated the {}!", self.enemy_name));
            }
            Outcome::Ongoing | Outcome::PlayerDefeated => {
                out.push_str(&format!(
                    " It has {} health remaining.",
                    self.enemy_health
                ));
                if let Some(taken) = self.taken {
                    out.push_str(&format!(
                        "\nThe {} hits you for {} damage. You have {} health remaining.",
                        self.enemy_name, taken, self.player_health
                    ));
                }
                if self.outcome == Outcome::PlayerDefeated {
                    out.push_str(&format!(
                        "\n💀 The {} strikes you down. Your adventure ends here.",
                        self.enemy_name
                    ));
                }
            }
        }
        out
    }
}

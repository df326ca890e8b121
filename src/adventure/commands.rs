//! Text command parsing and dispatch.
//!
//! Input is trimmed and lowercased, then matched exactly (`look`, `fight`,
//! `inventory`, `quit`) or by a `verb <rest>` prefix (`go`, `take`, `drop`,
//! `use`). Everything else is [`AdventureCommand::Unknown`].

use log::debug;

use crate::adventure::engine::{EngineResult, GameSession};
use crate::logutil::escape_log;

pub const UNKNOWN_COMMAND_TEXT: &str =
    "Unknown command. Try 'go north', 'take torch', 'use apple', 'fight', 'inventory', or 'quit'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdventureCommand {
    Look,
    Go(String),
    Take(String),
    Drop(String),
    Use(String),
    Fight,
    Inventory,
    Quit,
    Unknown(String),
}

impl AdventureCommand {
    /// Short name used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AdventureCommand::Look => "look",
            AdventureCommand::Go(_) => "go",
            AdventureCommand::Take(_) => "take",
            AdventureCommand::Drop(_) => "drop",
            AdventureCommand::Use(_) => "use",
            AdventureCommand::Fight => "fight",
            AdventureCommand::Inventory => "inventory",
            AdventureCommand::Quit => "quit",
            AdventureCommand::Unknown(_) => "unknown",
        }
    }
}

/// Parse raw client input into a command.
pub fn parse_command(input: &str) -> AdventureCommand {
    let normalized = input.trim().to_lowercase();

    match normalized.as_str() {
        "look" => return AdventureCommand::Look,
        "fight" => return AdventureCommand::Fight,
        "inventory" => return AdventureCommand::Inventory,
        "quit" => return AdventureCommand::Quit,
        _ => {}
    }

    let Some((verb, rest)) = normalized.split_once(' ') else {
        return AdventureCommand::Unknown(normalized);
    };
    let arg = rest.trim().to_string();

    match verb {
        "go" => AdventureCommand::Go(arg),
        "take" => AdventureCommand::Take(arg),
        "drop" => AdventureCommand::Drop(arg),
        "use" => AdventureCommand::Use(arg),
        _ => AdventureCommand::Unknown(normalized),
    }
}

/// Apply a parsed command to the session.
///
/// A defeated player gets the defeat snapshot for every command until the
/// session is reset.
pub fn dispatch(session: &mut GameSession, command: &AdventureCommand) -> EngineResult {
    if session.is_defeated() {
        return session.defeat_snapshot();
    }

    match command {
        AdventureCommand::Look => session.describe(),
        AdventureCommand::Go(direction) => session.go(direction),
        AdventureCommand::Take(item) => session.take(item),
        AdventureCommand::Drop(item) => session.drop_item(item),
        AdventureCommand::Use(item) => session.use_item(item),
        AdventureCommand::Fight => session.fight(),
        AdventureCommand::Inventory => session.inventory(),
        AdventureCommand::Quit => session.quit(),
        AdventureCommand::Unknown(_) => session.snapshot(UNKNOWN_COMMAND_TEXT, false),
    }
}

/// Parse and apply raw input in one step.
pub fn handle_command(session: &mut GameSession, input: &str) -> EngineResult {
    let command = parse_command(input);
    debug!(
        "command parsed: raw='{}' command={:?}",
        escape_log(input),
        command
    );
    dispatch(session, &command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::world::WorldSeed;
    use std::sync::Arc;

    #[test]
    fn test_command_parsing() {
        assert_eq!(parse_command("look"), AdventureCommand::Look);
        assert_eq!(parse_command("  LOOK  "), AdventureCommand::Look);
        assert_eq!(parse_command("go north"), AdventureCommand::Go("north".into()));
        assert_eq!(
            parse_command("Take Silver Key"),
            AdventureCommand::Take("silver key".into())
        );
        assert_eq!(parse_command("drop map"), AdventureCommand::Drop("map".into()));
        assert_eq!(parse_command("use apple"), AdventureCommand::Use("apple".into()));
        assert_eq!(parse_command("fight"), AdventureCommand::Fight);
        assert_eq!(parse_command("inventory"), AdventureCommand::Inventory);
        assert_eq!(parse_command("quit"), AdventureCommand::Quit);
    }

    #[test]
    fn test_unknown_and_empty_input() {
        assert_eq!(parse_command(""), AdventureCommand::Unknown("".into()));
        assert_eq!(parse_command("   "), AdventureCommand::Unknown("".into()));
        assert_eq!(parse_command("dance"), AdventureCommand::Unknown("dance".into()));
        // Bare verbs need an argument.
        assert_eq!(parse_command("take"), AdventureCommand::Unknown("take".into()));
        assert_eq!(
            parse_command("look around"),
            AdventureCommand::Unknown("look around".into())
        );
    }

    #[test]
    fn test_unknown_command_keeps_full_snapshot() {
        let mut session = GameSession::new(Arc::new(WorldSeed::canonical().unwrap()), 1);
        let snap = handle_command(&mut session, "xyzzy").unwrap();
        assert_eq!(snap.room_description, UNKNOWN_COMMAND_TEXT);
        assert!(!snap.game_over);
        assert_eq!(snap.directions.north.as_deref(), Some("cave"));
        assert_eq!(snap.items.len(), 3);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(parse_command("go west").kind(), "go");
        assert_eq!(parse_command("hello").kind(), "unknown");
    }
}

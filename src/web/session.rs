//! Session registry: one default session plus named sessions selected by the
//! `X-Session-Id` request header.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::info;
use rand::Rng;
use thiserror::Error;

use crate::adventure::{GameSession, WorldSeed};
use crate::config::Config;
use crate::metrics;

/// Header carrying the session id, lowercased as stored by the codec.
pub const SESSION_HEADER: &str = "x-session-id";
/// Id echoed back for requests without a session header.
pub const DEFAULT_SESSION_ID: &str = "default";
pub const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session id '{0}': use 1-64 letters, digits, '-' or '_'")]
    InvalidId(String),

    #[error("session limit of {0} reached, try again later")]
    Full(usize),
}

impl SessionError {
    pub fn status(&self) -> u16 {
        match self {
            SessionError::InvalidId(_) => 400,
            SessionError::Full(_) => 503,
        }
    }
}

pub fn validate_session_id(id: &str) -> Result<(), SessionError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidId(id.to_string()))
    }
}

struct SessionEntry {
    game: GameSession,
    last_activity: DateTime<Utc>,
}

pub struct SessionRegistry {
    seed: Arc<WorldSeed>,
    combat_seed: Option<u64>,
    max_sessions: usize,
    idle_timeout: Duration,
    default: GameSession,
    named: HashMap<String, SessionEntry>,
}

fn new_game(seed: &Arc<WorldSeed>, combat_seed: Option<u64>) -> GameSession {
    let rng_seed = combat_seed.unwrap_or_else(|| rand::thread_rng().gen());
    GameSession::new(Arc::clone(seed), rng_seed)
}

impl SessionRegistry {
    pub fn new(
        seed: Arc<WorldSeed>,
        combat_seed: Option<u64>,
        max_sessions: usize,
        idle_timeout: Duration,
    ) -> Self {
        let default = new_game(&seed, combat_seed);
        Self {
            seed,
            combat_seed,
            max_sessions,
            idle_timeout,
            default,
            named: HashMap::new(),
        }
    }

    pub fn from_config(seed: Arc<WorldSeed>, config: &Config) -> Self {
        Self::new(
            seed,
            config.game.combat_seed,
            config.server.max_sessions,
            Duration::minutes(i64::from(config.server.session_timeout)),
        )
    }

    /// Session for `id`, creating a named session on first use.
    /// `None` selects the default session.
    pub fn session(&mut self, id: Option<&str>) -> Result<&mut GameSession, SessionError> {
        self.session_at(id, Utc::now())
    }

    /// Same as [`SessionRegistry::session`] with an explicit clock.
    pub fn session_at(
        &mut self,
        id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&mut GameSession, SessionError> {
        let id = match id {
            None => return Ok(&mut self.default),
            Some(id) => id,
        };
        validate_session_id(id)?;

        if !self.named.contains_key(id) {
            if self.named.len() >= self.max_sessions {
                self.evict_idle(now);
            }
            if self.named.len() >= self.max_sessions {
                return Err(SessionError::Full(self.max_sessions));
            }
            metrics::inc_sessions_created();
            info!("session.created id={} active={}", id, self.named.len() + 1);
        }

        let seed = Arc::clone(&self.seed);
        let combat_seed = self.combat_seed;
        let entry = self
            .named
            .entry(id.to_string())
            .or_insert_with(|| SessionEntry {
                game: new_game(&seed, combat_seed),
                last_activity: now,
            });
        entry.last_activity = now;
        Ok(&mut entry.game)
    }

    /// Drop named sessions idle for longer than the configured timeout.
    pub fn evict_idle(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_timeout;
        let before = self.named.len();
        self.named.retain(|id, entry| {
            let keep = entry.last_activity > cutoff;
            if !keep {
                info!("session.evicted id={}", id);
                metrics::inc_sessions_evicted();
            }
            keep
        });
        before - self.named.len()
    }

    /// Named sessions plus the default one.
    pub fn active_sessions(&self) -> usize {
        self.named.len() + 1
    }

    pub fn contains(&self, id: &str) -> bool {
        self.named.contains_key(id)
    }
}

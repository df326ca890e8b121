//! # Tinyquest - A Four-Room Text Adventure over HTTP
//!
//! Tinyquest serves a small text adventure as a JSON API. Clients send free-form
//! commands (`go north`, `take torch`, `fight`) and receive a full snapshot of
//! the game after every turn.
//!
//! ## Features
//!
//! - **Typed World**: Rooms with exits, item-locked paths, ground items and an optional enemy.
//! - **Command Engine**: Look, move, take, drop, use, fight, inventory and quit.
//! - **Seeded Combat**: Dice rolls come from a per-session `StdRng`, so a fixed seed replays a fight exactly.
//! - **Sessions**: A default session plus independent sessions selected by the `X-Session-Id` header.
//! - **Custom Worlds**: Load a JSON room table instead of the built-in map; it is validated at startup.
//! - **Async Design**: Built on Tokio, one task per connection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tinyquest::adventure::load_world_seed;
//! use tinyquest::config::Config;
//! use tinyquest::web::GameServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let seed = load_world_seed(config.game.world_file.as_deref())?;
//!
//!     let server = GameServer::bind(&config, seed).await?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - World data, game state machine, combat and command parsing
//! - [`web`] - HTTP codec, session registry and routes
//! - [`config`] - Configuration management and validation
//! - [`metrics`] - Process-wide counters served by `/stats`
//! - [`logutil`] - Log escaping for client-supplied text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Server   │ ← Accept loop, routing, CORS
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ SessionRegistry │ ← One GameSession per player
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ Adventure Engine│ ← World + player state transitions
//! └─────────────────┘
//! ```

pub mod adventure;
pub mod config;
pub mod logutil;
pub mod metrics;
pub mod web;

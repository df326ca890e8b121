//! HTTP surface: a small HTTP/1.1 codec, the session registry and the
//! request router.

pub mod http;
pub mod server;
pub mod session;

pub use server::{AppState, GameServer};
pub use session::{SessionError, SessionRegistry};

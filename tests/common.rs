//! Test utilities & fixtures shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use tinyquest::adventure::{handle_command, GameSession, Snapshot, WorldSeed};
use tinyquest::config::Config;
use tinyquest::web::GameServer;
use tokio::sync::oneshot;

/// Session on the built-in world with a fixed combat seed.
pub fn session(rng_seed: u64) -> GameSession {
    let seed = WorldSeed::canonical().expect("canonical world");
    GameSession::new(Arc::new(seed), rng_seed)
}

/// Run one text command, panicking on engine errors.
pub fn run(session: &mut GameSession, input: &str) -> Snapshot {
    handle_command(session, input).expect("engine error")
}

/// Config bound to an ephemeral localhost port with deterministic combat.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.game.combat_seed = Some(1234);
    config
}

/// Running server plus the handle that stops it when dropped.
pub struct TestServer {
    pub base_url: String,
    pub addr: std::net::SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server(config: Config) -> TestServer {
    spawn_server_with_world(config, WorldSeed::canonical().expect("canonical world")).await
}

pub async fn spawn_server_with_world(config: Config, seed: WorldSeed) -> TestServer {
    let server = GameServer::bind(&config, seed).await.expect("bind");
    let addr = server.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));
    TestServer {
        base_url: format!("http://{}", addr),
        addr,
        _shutdown: tx,
    }
}

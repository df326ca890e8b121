//! HTTP front end: accept loop, per-connection tasks and route handling.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::adventure::{dispatch, parse_command, WorldSeed};
use crate::config::Config;
use crate::logutil::escape_log;
use crate::metrics;
use crate::web::http::{read_request, HttpError, Request, Response};
use crate::web::session::{SessionRegistry, DEFAULT_SESSION_ID, SESSION_HEADER};

const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);
/// How long a rejected connection is drained before closing.
const LINGER: Duration = Duration::from_millis(250);

#[derive(Debug, Default, Deserialize)]
struct CommandRequest {
    #[serde(default)]
    command: String,
}

/// Command text from a `/command` body. Anything unparseable is the empty
/// command.
fn command_text(body: &[u8]) -> String {
    serde_json::from_slice::<CommandRequest>(body)
        .map(|req| req.command)
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    counters: metrics::Snapshot,
    active_sessions: usize,
}

/// Shared state handed to every connection task.
pub struct AppState {
    sessions: Mutex<SessionRegistry>,
    allow_origin: String,
    max_body_bytes: usize,
    read_timeout: Duration,
}

impl AppState {
    pub fn new(seed: Arc<WorldSeed>, config: &Config) -> Self {
        Self {
            sessions: Mutex::new(SessionRegistry::from_config(seed, config)),
            allow_origin: config.server.allow_origin.clone(),
            max_body_bytes: config.server.max_body_bytes,
            read_timeout: Duration::from_secs(config.server.read_timeout_secs),
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Time a client has to deliver its whole request.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Route a parsed request and decorate the response with CORS headers.
    pub async fn respond(&self, request: &Request) -> Response {
        let response = self.route(request).await;
        self.finish(response)
    }

    fn finish(&self, response: Response) -> Response {
        if response.status >= 400 {
            metrics::inc_http_errors();
        }
        response
            .with_header("Access-Control-Allow-Origin", &self.allow_origin)
            .with_header("Access-Control-Expose-Headers", "X-Session-Id")
    }

    async fn route(&self, request: &Request) -> Response {
        if request.method == "OPTIONS" {
            return Response::empty(204)
                .with_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
                .with_header("Access-Control-Allow-Headers", "Content-Type, X-Session-Id")
                .with_header("Access-Control-Max-Age", "86400");
        }

        let allowed = match request.path.as_str() {
            "/start" | "/reset" | "/stats" => "GET",
            "/command" => "POST",
            other => return Response::error(404, &format!("no route for {}", other)),
        };
        if request.method != allowed {
            return Response::error(
                405,
                &format!("{} does not support {}", request.path, request.method),
            )
            .with_header("Allow", &format!("{}, OPTIONS", allowed));
        }

        if request.path == "/stats" {
            return self.stats().await;
        }

        let session_id = request.header(SESSION_HEADER);
        let label = session_id.unwrap_or(DEFAULT_SESSION_ID).to_string();

        let mut sessions = self.sessions.lock().await;
        let game = match sessions.session(session_id) {
            Ok(game) => game,
            Err(e) => {
                warn!("session rejected: {}", e);
                return Response::error(e.status(), &e.to_string());
            }
        };

        let result = match request.path.as_str() {
            "/start" => game.describe(),
            "/reset" => game.reset(),
            _ => {
                let raw = command_text(&request.body);
                let command = parse_command(&raw);
                let count = metrics::record_command(command.kind());
                debug!(
                    "session={} command='{}' kind={} count={}",
                    label,
                    escape_log(&raw),
                    command.kind(),
                    count
                );
                dispatch(game, &command)
            }
        };
        drop(sessions);

        match result {
            Ok(snapshot) => Response::json(200, &snapshot).with_header("X-Session-Id", &label),
            Err(e) => {
                error!("session={} engine error: {}", label, e);
                Response::error(500, &e.to_string()).with_header("X-Session-Id", &label)
            }
        }
    }

    async fn stats(&self) -> Response {
        let active_sessions = self.sessions.lock().await.active_sessions();
        Response::json(
            200,
            &StatsResponse {
                counters: metrics::snapshot(),
                active_sessions,
            },
        )
    }

    async fn evict_idle(&self) {
        let evicted = self.sessions.lock().await.evict_idle(Utc::now());
        if evicted > 0 {
            debug!("housekeeping evicted {} idle session(s)", evicted);
        }
    }
}

pub struct GameServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl GameServer {
    /// Bind the listener from `config.server.bind`. Port `0` picks an
    /// ephemeral port; see [`GameServer::local_addr`].
    pub async fn bind(config: &Config, seed: WorldSeed) -> Result<Self> {
        let addr = config.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))?;
        let state = Arc::new(AppState::new(Arc::new(seed), config));
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Serve forever.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` completes. Connections already accepted finish
    /// on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("tinyquest listening on http://{}", self.local_addr()?);
        tokio::pin!(shutdown);
        let mut housekeeping = tokio::time::interval(HOUSEKEEPING_INTERVAL);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                _ = housekeeping.tick() => {
                    self.state.evict_idle().await;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let state = Arc::clone(&self.state);
                            tokio::spawn(handle_connection(stream, peer, state));
                        }
                        Err(e) => {
                            warn!("accept failed: {}", e);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let request_id = Uuid::new_v4();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let read = tokio::time::timeout(
        state.read_timeout(),
        read_request(&mut reader, state.max_body_bytes()),
    )
    .await;
    let (response, drain) = match read {
        Err(_) => {
            debug!("http {} peer={} timed out sending its request", request_id, peer);
            (state.finish(Response::error(408, "request not received in time")), true)
        }
        Ok(Ok(Some(request))) => {
            let response = state.respond(&request).await;
            info!(
                "http {} {} {} -> {} peer={}",
                request_id, request.method, request.path, response.status, peer
            );
            (response, false)
        }
        Ok(Ok(None)) => {
            debug!("http {} peer={} closed without a request", request_id, peer);
            return;
        }
        Ok(Err(HttpError::Io(e))) => {
            debug!("http {} peer={} read failed: {}", request_id, peer, e);
            return;
        }
        Ok(Err(e)) => {
            warn!("http {} peer={} rejected: {}", request_id, peer, e);
            (state.finish(Response::error(e.status(), &e.to_string())), true)
        }
    };

    if let Err(e) = response.write_to(&mut write_half).await {
        debug!("http {} peer={} write failed: {}", request_id, peer, e);
        return;
    }
    let _ = write_half.shutdown().await;

    // Unread input at close makes the kernel send a reset, which can swallow
    // the response on the client side.
    if drain {
        let limit = state.max_body_bytes() as u64 * 4;
        let mut rest = reader.take(limit);
        let _ = tokio::time::timeout(LINGER, tokio::io::copy(&mut rest, &mut tokio::io::sink())).await;
    }
}

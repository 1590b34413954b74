//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browsers.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Spawning an action forwarder per session (see [`upstream`]).
//! 5. Feeding browser messages to the session's [`SessionService`] and
//!    sending its feedback back as JSON text frames.
//! 6. Arming the drag-release timer the session asks for.
//! 7. Gracefully shutting down when the `running` flag is cleared.
//!
//! [`upstream`]: crate::infrastructure::upstream

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, timeout, Instant};
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::SessionService;
use crate::domain::config::BridgeConfig;
use crate::domain::messages::{BridgeToBrowserMsg, BrowserToBridgeMsg};
use crate::infrastructure::action_channel::ChannelSender;
use crate::infrastructure::upstream::forward_actions;

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.ws_bind_addr` and serves browsers until `running` is set to
/// `false`.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server(config: BridgeConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.ws_bind_addr)
        .await
        .with_context(|| {
            format!(
                "failed to bind WebSocket listener on {}",
                config.ws_bind_addr
            )
        })?;

    info!("WebSocket bridge listening on {}", config.ws_bind_addr);
    serve(listener, config, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// Split from [`run_server`] so tests can bind port 0 and learn the address
/// before the loop starts.
///
/// # Errors
///
/// Currently infallible once the listener exists; accept errors are logged
/// and the loop continues.
pub async fn serve(
    listener: TcpListener,
    config: BridgeConfig,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the shutdown flag is checked even when idle.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("new browser connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, cfg).await;
                });
            }
            Ok(Err(e)) => {
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Wraps [`run_session`] and logs the outcome.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<BridgeConfig>,
) {
    match run_session(raw_stream, peer_addr, config).await {
        Ok(()) => info!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of a single browser WebSocket session.
///
/// 1. Completes the WebSocket handshake.
/// 2. Spawns the action forwarder for this session.
/// 3. Loops over incoming frames and the drag-release deadline.
/// 4. On disconnect, closes the session so no button stays held, then waits
///    for the forwarder to flush.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<BridgeConfig>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let session_id = Uuid::new_v4().to_string();
    info!("session {session_id}: WebSocket established with {peer_addr}");

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let forwarder = tokio::spawn(forward_actions(
        action_rx,
        config.upstream_addr,
        session_id.clone(),
    ));

    let mut service = SessionService::new(
        Arc::new(ChannelSender::new(action_tx)),
        config.default_settings,
    );

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let mut release_at: Option<Instant> = None;

    'session: loop {
        // Copy the deadline so the sleep future does not borrow `release_at`.
        let deadline = release_at;
        let release_timer = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        let ws_msg = tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(msg)) => msg,
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                    debug!("session {session_id}: browser WebSocket closed normally");
                    break;
                }
                Some(Err(e)) => {
                    warn!("session {session_id}: browser WebSocket error: {e}");
                    break;
                }
                None => {
                    debug!("session {session_id}: browser stream ended");
                    break;
                }
            },
            () = release_timer => {
                release_at = None;
                if service.fire_drag_release() {
                    debug!("session {session_id}: drag release fired");
                }
                continue;
            }
        };

        let replies = match ws_msg {
            WsMessage::Text(json_str) => {
                let browser_msg: BrowserToBridgeMsg = match serde_json::from_str(&json_str) {
                    Ok(m) => m,
                    Err(e) => {
                        // One bad frame does not end the session.
                        warn!("session {session_id}: invalid JSON from browser: {e}");
                        continue;
                    }
                };

                debug!(
                    "session {session_id}: browser → bridge: {}",
                    browser_msg_type_name(&browser_msg)
                );

                let replies = match service.handle(browser_msg) {
                    Ok(replies) => replies,
                    Err(e) => {
                        warn!("session {session_id}: {e}");
                        vec![BridgeToBrowserMsg::Error {
                            description: e.to_string(),
                        }]
                    }
                };
                release_at = next_release_at(release_at, service.pending_release_delay());
                replies
            }
            WsMessage::Binary(_) => {
                warn!("session {session_id}: unexpected binary WebSocket frame (ignored)");
                continue;
            }
            WsMessage::Ping(data) => {
                debug!("session {session_id}: WebSocket ping ({} bytes)", data.len());
                continue;
            }
            WsMessage::Pong(_) => continue,
            WsMessage::Close(_) => {
                debug!("session {session_id}: WebSocket Close frame received");
                break;
            }
            WsMessage::Frame(_) => continue,
        };

        if !send_replies(&mut ws_tx, replies, &session_id).await {
            break 'session;
        }
    }

    service.close();
    // Dropping the service drops the last action sender, which ends the
    // forwarder once it has flushed.
    drop(service);
    if let Err(e) = forwarder.await {
        warn!("session {session_id}: action forwarder failed: {e}");
    }

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Computes the drag-release deadline after a message was handled.
///
/// An armed deadline is kept as is; a new one is armed only when the session
/// reports a pending release and none is set.  No pending release clears it.
fn next_release_at(current: Option<Instant>, pending: Option<Duration>) -> Option<Instant> {
    match (current, pending) {
        (_, None) => None,
        (Some(at), Some(_)) => Some(at),
        (None, Some(delay)) => Some(Instant::now() + delay),
    }
}

/// Sends each reply as a JSON text frame.
///
/// Returns `false` as soon as a send fails: the browser is gone and the
/// session should end.
async fn send_replies<S>(sink: &mut S, replies: Vec<BridgeToBrowserMsg>, session_id: &str) -> bool
where
    S: Sink<WsMessage> + Unpin,
{
    for reply in replies {
        match serde_json::to_string(&reply) {
            Ok(json_str) => {
                if sink.send(WsMessage::Text(json_str)).await.is_err() {
                    debug!("session {session_id}: WebSocket send failed (browser disconnected)");
                    return false;
                }
            }
            Err(e) => error!("session {session_id}: JSON serialization error: {e}"),
        }
    }
    true
}

/// Returns a short type-name string for a `BrowserToBridgeMsg` variant.
///
/// Used in debug log messages to avoid logging typed text or key names.
fn browser_msg_type_name(msg: &BrowserToBridgeMsg) -> &'static str {
    match msg {
        BrowserToBridgeMsg::TouchStart { .. } => "TouchStart",
        BrowserToBridgeMsg::TouchMove { .. } => "TouchMove",
        BrowserToBridgeMsg::TouchEnd { .. } => "TouchEnd",
        BrowserToBridgeMsg::Key { .. } => "Key",
        BrowserToBridgeMsg::Text { .. } => "Text",
        BrowserToBridgeMsg::Modifier { .. } => "Modifier",
        BrowserToBridgeMsg::ComboConfirm => "ComboConfirm",
        BrowserToBridgeMsg::ComboCancel => "ComboCancel",
        BrowserToBridgeMsg::ScrollMode { .. } => "ScrollMode",
        BrowserToBridgeMsg::Settings { .. } => "Settings",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
